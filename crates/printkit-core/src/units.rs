//! Physical units and size input handling.

use serde::{Deserialize, Serialize};

/// Smallest width/height an element may have, in physical units.
pub const MIN_ELEMENT_SIZE: f64 = 1.0;

/// Real-world unit in which a design's geometry is expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizeUnit {
    #[default]
    Inches,
    Feet,
    Centimeters,
    Millimeters,
}

impl SizeUnit {
    /// Number of inches in one of this unit.
    pub fn inches_per_unit(self) -> f64 {
        match self {
            SizeUnit::Inches => 1.0,
            SizeUnit::Feet => 12.0,
            SizeUnit::Centimeters => 1.0 / 2.54,
            SizeUnit::Millimeters => 1.0 / 25.4,
        }
    }

    /// Number of millimetres in one of this unit.
    pub fn millimeters_per_unit(self) -> f64 {
        self.inches_per_unit() * 25.4
    }

    /// Short suffix for display ("in", "ft", ...).
    pub fn suffix(self) -> &'static str {
        match self {
            SizeUnit::Inches => "in",
            SizeUnit::Feet => "ft",
            SizeUnit::Centimeters => "cm",
            SizeUnit::Millimeters => "mm",
        }
    }
}

/// Parse a user-typed size value.
///
/// Returns `None` for anything that is not a finite number, so the caller can
/// ignore the edit. Valid numbers are clamped to [`MIN_ELEMENT_SIZE`].
pub fn parse_size_input(input: &str) -> Option<f64> {
    let value: f64 = input.trim().parse().ok()?;
    if !value.is_finite() {
        return None;
    }
    Some(value.max(MIN_ELEMENT_SIZE))
}

/// Normalize an angle in degrees into `[0, 360)`.
pub fn normalize_degrees(degrees: f64) -> f64 {
    if !degrees.is_finite() {
        return 0.0;
    }
    let r = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if r >= 360.0 { 0.0 } else { r }
}

/// Clamp an element dimension to the minimum size.
pub fn clamp_size(value: f64) -> f64 {
    if value.is_nan() {
        MIN_ELEMENT_SIZE
    } else {
        value.max(MIN_ELEMENT_SIZE)
    }
}
