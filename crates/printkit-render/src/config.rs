//! Export configuration.

use printkit_core::Rgba;

/// Default output resolution, in points per physical unit.
pub const DEFAULT_RESOLUTION: f64 = 72.0;

/// Configuration for the export pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportConfig {
    /// Output points per physical unit.
    pub resolution: f64,
    /// Horizontal inset of left/right aligned text, in physical units.
    pub text_inset: f64,
    /// Longest edge of a thumbnail, in pixels.
    pub thumbnail_max_px: u32,
    /// Painted under raster output. Print has no transparency.
    pub background: Rgba,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            resolution: DEFAULT_RESOLUTION,
            text_inset: 0.1,
            thumbnail_max_px: 256,
            background: Rgba::WHITE,
        }
    }
}

impl ExportConfig {
    pub fn with_resolution(mut self, resolution: f64) -> Self {
        if resolution.is_finite() && resolution > 0.0 {
            self.resolution = resolution;
        }
        self
    }

    pub fn with_text_inset(mut self, inset: f64) -> Self {
        self.text_inset = inset.max(0.0);
        self
    }

    pub fn with_thumbnail_max_px(mut self, max_px: u32) -> Self {
        self.thumbnail_max_px = max_px.max(1);
        self
    }

    /// Background for raster output. Forced opaque.
    pub fn with_background(mut self, color: Rgba) -> Self {
        self.background = Rgba { a: 255, ..color };
        self
    }
}
