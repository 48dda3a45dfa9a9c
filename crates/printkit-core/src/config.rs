//! Editor presentation constants.

use serde::{Deserialize, Serialize};

/// Screen pixels per physical unit at 100% zoom.
pub const PIXELS_PER_UNIT: f64 = 30.0;

/// Maximum undo history size.
pub const MAX_UNDO_HISTORY: usize = 50;

/// Tunables for the interaction engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Screen pixels per physical unit at 100% zoom.
    pub pixels_per_unit: f64,
    /// Centerline snap distance in physical units.
    pub snap_tolerance: f64,
    /// Drawn handle size in screen pixels.
    pub handle_size: f64,
    /// Handle hit radius in screen pixels.
    pub handle_hit_tolerance: f64,
    /// Distance from the top edge to the rotate handle, in screen pixels.
    pub rotate_handle_offset: f64,
    /// Rotation snap increment in degrees when the modifier is held.
    pub rotation_snap_degrees: f64,
    /// Undo steps kept by a store built with [`ElementStore::with_config`].
    ///
    /// [`ElementStore::with_config`]: crate::store::ElementStore::with_config
    pub undo_depth: usize,
    /// Arrow-key nudge in physical units (×10 with shift).
    pub nudge_step: f64,
    /// Offset applied to duplicated elements, in physical units.
    pub duplicate_offset: f64,
    /// Marquees with both sides below this many physical units select nothing.
    pub min_marquee_size: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            pixels_per_unit: PIXELS_PER_UNIT,
            snap_tolerance: 0.2,
            handle_size: 10.0,
            handle_hit_tolerance: 8.0,
            rotate_handle_offset: 28.0,
            rotation_snap_degrees: 15.0,
            undo_depth: MAX_UNDO_HISTORY,
            nudge_step: 0.1,
            duplicate_offset: 0.5,
            min_marquee_size: 0.05,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_json() {
        let config: EditorConfig = serde_json::from_str(r#"{"snap_tolerance": 0.5}"#).unwrap();
        assert!((config.snap_tolerance - 0.5).abs() < f64::EPSILON);
        assert_eq!(config.undo_depth, MAX_UNDO_HISTORY);
    }
}
