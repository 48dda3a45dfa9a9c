//! Centerline snapping for single-element drags.

use crate::units::normalize_degrees;
use kurbo::{Point, Size};

/// Result of a snap operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapResult {
    /// Snapped top-left position.
    pub point: Point,
    /// X snapped to the vertical centerline.
    pub snapped_x: bool,
    /// Y snapped to the horizontal centerline.
    pub snapped_y: bool,
}

impl SnapResult {
    pub fn none(point: Point) -> Self {
        Self {
            point,
            snapped_x: false,
            snapped_y: false,
        }
    }

    pub fn is_snapped(&self) -> bool {
        self.snapped_x || self.snapped_y
    }
}

/// Snap a box at `position` with `size` so its center sits on the canvas
/// centerlines when within `tolerance` (all in physical units).
pub fn snap_to_centerlines(position: Point, size: Size, canvas: Size, tolerance: f64) -> SnapResult {
    let mut result = SnapResult::none(position);

    let cx = position.x + size.width / 2.0;
    if (cx - canvas.width / 2.0).abs() <= tolerance {
        result.point.x = (canvas.width - size.width) / 2.0;
        result.snapped_x = true;
    }

    let cy = position.y + size.height / 2.0;
    if (cy - canvas.height / 2.0).abs() <= tolerance {
        result.point.y = (canvas.height - size.height) / 2.0;
        result.snapped_y = true;
    }

    result
}

/// Snap an angle to the nearest increment, in `[0, 360)`.
pub fn snap_angle(angle_degrees: f64, increment: f64) -> f64 {
    if increment <= 0.0 {
        return normalize_degrees(angle_degrees);
    }
    normalize_degrees((angle_degrees / increment).round() * increment)
}
