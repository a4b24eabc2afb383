#![warn(missing_docs)]

//! Math helpers for the brickarch kernel.
//!
//! Thin wrappers around nalgebra for 2D drafting geometry, plus the
//! handful of scalar routines the arch solver is built on: angle unit
//! conversion, right-triangle legs and fixed-precision rounding.

use nalgebra::Vector2;

/// A point in the 2D drawing plane.
pub type Point2 = nalgebra::Point2<f64>;

/// A vector in the 2D drawing plane.
pub type Vec2 = Vector2<f64>;

/// Decimal places kept for solved arch dimensions (skew length, brick widths).
pub const DIMENSION_PRECISION: u32 = 3;

/// Convert an angle in degrees to radians.
pub fn to_radians(degrees: f64) -> f64 {
    degrees * std::f64::consts::PI / 180.0
}

/// Convert an angle in radians to degrees.
pub fn to_degrees(radians: f64) -> f64 {
    radians * 180.0 / std::f64::consts::PI
}

/// Length of the side opposite `angle` (radians) in a right triangle whose
/// adjacent side is `adjacent`.
pub fn opposite_from_adjacent(angle: f64, adjacent: f64) -> f64 {
    angle.tan() * adjacent
}

/// Length of the side opposite `angle` (radians) in a right triangle with
/// the given hypotenuse.
pub fn opposite_from_hypotenuse(angle: f64, hypotenuse: f64) -> f64 {
    angle.sin() * hypotenuse
}

/// Length of the side adjacent to `angle` (radians) in a right triangle with
/// the given hypotenuse.
pub fn adjacent_from_hypotenuse(angle: f64, hypotenuse: f64) -> f64 {
    angle.cos() * hypotenuse
}

/// Angle in radians between the adjacent side and the hypotenuse, from the
/// two legs. Returns 0 for a zero-length opposite leg.
pub fn angle_from_legs(opposite: f64, adjacent: f64) -> f64 {
    opposite.atan2(adjacent)
}

/// Round `value` to `places` decimal places, halves away from zero.
pub fn round_to(value: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places as i32);
    (value * factor).round() / factor
}

/// Round `value` to [`DIMENSION_PRECISION`] decimal places.
pub fn round_dimension(value: f64) -> f64 {
    round_to(value, DIMENSION_PRECISION)
}

/// Unit vector perpendicular to `v`, rotated a quarter turn counter-clockwise.
///
/// Returns `None` for a zero-length vector.
pub fn left_normal(v: &Vec2) -> Option<Vec2> {
    let n = Vec2::new(-v.y, v.x);
    n.try_normalize(0.0)
}

/// Distance tolerance for geometric comparisons.
#[derive(Debug, Clone, Copy)]
pub struct Tolerance {
    /// Linear distance tolerance in mm.
    pub linear: f64,
}

impl Tolerance {
    /// Tight tolerance for exact geometry (1e-9 mm).
    pub const DEFAULT: Self = Self { linear: 1e-9 };

    /// Tolerance matching solved dimension precision.
    ///
    /// Values rounded to three places can drift by half a unit in the last
    /// place per rounding, and sums over a row accumulate that drift.
    pub const DIMENSION: Self = Self { linear: 5e-3 };

    /// Check if two points are coincident within tolerance.
    pub fn points_equal(&self, a: &Point2, b: &Point2) -> bool {
        (a - b).norm() < self.linear
    }

    /// Check if a scalar distance is effectively zero.
    pub fn is_zero(&self, d: f64) -> bool {
        d.abs() < self.linear
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::DEFAULT
    }
}
