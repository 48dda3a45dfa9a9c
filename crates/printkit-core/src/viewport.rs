//! Viewport: zoom and pan of the editing surface.

use crate::config::PIXELS_PER_UNIT;
use kurbo::{Affine, Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};

pub const MIN_ZOOM_PERCENT: f64 = 10.0;
pub const MAX_ZOOM_PERCENT: f64 = 800.0;

/// Maps canvas physical coordinates to screen pixels.
///
/// `screen = offset + canvas * scale_factor`, where the scale factor is the
/// zoom percentage times the pixels-per-unit constant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Pan offset in screen pixels.
    pub offset: Vec2,
    /// Zoom percentage (100 = actual size).
    zoom_percent: f64,
    pub pixels_per_unit: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            offset: Vec2::ZERO,
            zoom_percent: 100.0,
            pixels_per_unit: PIXELS_PER_UNIT,
        }
    }
}

impl Viewport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pixels_per_unit(pixels_per_unit: f64) -> Self {
        Self {
            pixels_per_unit,
            ..Self::default()
        }
    }

    pub fn zoom_percent(&self) -> f64 {
        self.zoom_percent
    }

    pub fn set_zoom_percent(&mut self, percent: f64) {
        if percent.is_finite() {
            self.zoom_percent = percent.clamp(MIN_ZOOM_PERCENT, MAX_ZOOM_PERCENT);
        }
    }

    /// Screen pixels per physical unit at the current zoom.
    pub fn scale_factor(&self) -> f64 {
        self.zoom_percent / 100.0 * self.pixels_per_unit
    }

    /// Canvas-to-screen transform.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.offset) * Affine::scale(self.scale_factor())
    }

    pub fn screen_to_canvas(&self, screen: Point) -> Point {
        let scale = self.scale_factor();
        Point::new(
            (screen.x - self.offset.x) / scale,
            (screen.y - self.offset.y) / scale,
        )
    }

    pub fn canvas_to_screen(&self, canvas: Point) -> Point {
        self.transform() * canvas
    }

    /// Convert a screen-pixel delta to physical units.
    pub fn screen_delta_to_canvas(&self, delta: Vec2) -> Vec2 {
        delta / self.scale_factor()
    }

    pub fn pan(&mut self, delta: Vec2) {
        self.offset += delta;
    }

    /// Zoom keeping the given screen point fixed.
    pub fn zoom_at(&mut self, screen: Point, percent: f64) {
        let anchor = self.screen_to_canvas(screen);
        self.set_zoom_percent(percent);
        let moved = self.canvas_to_screen(anchor);
        self.offset += screen - moved;
    }

    /// Fit a canvas of the given physical size into the visible area.
    pub fn fit_canvas(&mut self, canvas: Size, visible: Size, padding: f64) {
        if canvas.width <= 0.0 || canvas.height <= 0.0 {
            return;
        }
        let avail_w = (visible.width - padding * 2.0).max(1.0);
        let avail_h = (visible.height - padding * 2.0).max(1.0);
        let scale = (avail_w / canvas.width).min(avail_h / canvas.height);
        self.set_zoom_percent(scale / self.pixels_per_unit * 100.0);

        let scale = self.scale_factor();
        self.offset = Vec2::new(
            (visible.width - canvas.width * scale) / 2.0,
            (visible.height - canvas.height * scale) / 2.0,
        );
    }

    /// Canvas rectangle mapped to screen space.
    pub fn canvas_rect_to_screen(&self, rect: Rect) -> Rect {
        let p0 = self.canvas_to_screen(Point::new(rect.x0, rect.y0));
        let p1 = self.canvas_to_screen(Point::new(rect.x1, rect.y1));
        Rect::from_points(p0, p1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_factor() {
        let mut viewport = Viewport::new();
        assert!((viewport.scale_factor() - PIXELS_PER_UNIT).abs() < f64::EPSILON);
        viewport.set_zoom_percent(200.0);
        assert!((viewport.scale_factor() - PIXELS_PER_UNIT * 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_zoom_clamp() {
        let mut viewport = Viewport::new();
        viewport.set_zoom_percent(1.0);
        assert!((viewport.zoom_percent() - MIN_ZOOM_PERCENT).abs() < f64::EPSILON);
        viewport.set_zoom_percent(5000.0);
        assert!((viewport.zoom_percent() - MAX_ZOOM_PERCENT).abs() < f64::EPSILON);
        viewport.set_zoom_percent(f64::NAN);
        assert!((viewport.zoom_percent() - MAX_ZOOM_PERCENT).abs() < f64::EPSILON);
    }

    #[test]
    fn test_roundtrip_conversion() {
        let mut viewport = Viewport::new();
        viewport.offset = Vec2::new(30.0, -20.0);
        viewport.set_zoom_percent(150.0);

        let original = Point::new(123.0, 456.0);
        let canvas = viewport.screen_to_canvas(original);
        let back = viewport.canvas_to_screen(canvas);
        assert!((back.x - original.x).abs() < 1e-10);
        assert!((back.y - original.y).abs() < 1e-10);
    }

    #[test]
    fn test_screen_delta() {
        let mut viewport = Viewport::new();
        viewport.set_zoom_percent(50.0);
        let delta = viewport.screen_delta_to_canvas(Vec2::new(30.0, 15.0));
        assert!((delta.x - 2.0).abs() < 1e-12);
        assert!((delta.y - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_zoom_at_keeps_anchor() {
        let mut viewport = Viewport::new();
        viewport.offset = Vec2::new(40.0, 40.0);
        let screen = Point::new(200.0, 120.0);
        let before = viewport.screen_to_canvas(screen);
        viewport.zoom_at(screen, 300.0);
        let after = viewport.screen_to_canvas(screen);
        assert!((before - after).hypot() < 1e-9);
    }

    #[test]
    fn test_fit_canvas_centers() {
        let mut viewport = Viewport::new();
        viewport.fit_canvas(Size::new(10.0, 5.0), Size::new(600.0, 600.0), 0.0);
        // 600px across 10 units = 60 px/unit = 200%
        assert!((viewport.zoom_percent() - 200.0).abs() < 1e-9);
        assert!(viewport.offset.x.abs() < 1e-9);
        assert!((viewport.offset.y - 150.0).abs() < 1e-9);
    }
}
