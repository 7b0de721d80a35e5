#![warn(missing_docs)]

//! Math types for the machtool geometry engine.
//!
//! Thin wrappers around nalgebra providing the point and vector types
//! used by profiles and meshes, the tolerance constants shared by the
//! welding and tangency tests, and the one place where angles in degrees
//! are normalized.

use nalgebra::{Vector2, Vector3};

/// A point in the 2D profile half-plane (`x` radial, `y` height).
pub type Point2 = nalgebra::Point2<f64>;

/// A vector in 2D space.
pub type Vec2 = Vector2<f64>;

/// A point in 3D space.
pub type Point3 = nalgebra::Point3<f64>;

/// A vector in 3D space.
pub type Vec3 = Vector3<f64>;

/// Tolerance constants for geometric comparisons.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerance {
    /// Absolute per-axis distance under which two vertices are the same vertex.
    pub weld: f64,
    /// Dot product magnitude under which two directions count as perpendicular.
    pub tangent: f64,
    /// Radial distance under which a profile coordinate lies on the axis.
    pub axis: f64,
    /// Angular tolerance in degrees.
    pub angular: f64,
}

impl Tolerance {
    /// Default tolerances (1e-8 weld, 1e-6 tangency, 1e-8 axis, 1e-9 degrees).
    pub const DEFAULT: Self = Self {
        weld: 1e-8,
        tangent: 1e-6,
        axis: 1e-8,
        angular: 1e-9,
    };

    /// Check if two points are equal, comparing each axis independently.
    pub fn points_equal(&self, a: &Point3, b: &Point3) -> bool {
        (a.x - b.x).abs() <= self.weld
            && (a.y - b.y).abs() <= self.weld
            && (a.z - b.z).abs() <= self.weld
    }

    /// Check if two profile points are equal, comparing each axis independently.
    pub fn points2_equal(&self, a: &Point2, b: &Point2) -> bool {
        (a.x - b.x).abs() <= self.weld && (a.y - b.y).abs() <= self.weld
    }

    /// Check if a radial coordinate lies on the axis of revolution.
    pub fn is_on_axis(&self, x: f64) -> bool {
        x.abs() <= self.axis
    }

    /// Check if two heights are equal.
    pub fn heights_equal(&self, a: f64, b: f64) -> bool {
        (a - b).abs() <= self.axis
    }

    /// Check if two angles in degrees are effectively equal.
    pub fn angles_equal(&self, a: f64, b: f64) -> bool {
        (a - b).abs() < self.angular
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Reduce an angle in degrees to `[0, 360)`.
pub fn normalize_degrees(angle: f64) -> f64 {
    let a = angle.rem_euclid(360.0);
    // rem_euclid of a tiny negative value rounds up to exactly 360.0
    if a >= 360.0 {
        0.0
    } else {
        a
    }
}

/// Angle of a 2D vector in degrees, counter-clockwise from +X, in `[0, 360)`.
pub fn angle_of(v: &Vec2) -> f64 {
    normalize_degrees(v.y.atan2(v.x).to_degrees())
}

/// Counter-clockwise sweep from `from` to `to`, in `[0, 360)`.
pub fn ccw_sweep(from: f64, to: f64) -> f64 {
    normalize_degrees(normalize_degrees(to) - normalize_degrees(from))
}

/// Clockwise sweep from `from` to `to`, in `(-360, 0]`.
pub fn cw_sweep(from: f64, to: f64) -> f64 {
    -normalize_degrees(normalize_degrees(from) - normalize_degrees(to))
}

/// Unit vector at `angle` degrees, counter-clockwise from +X.
pub fn unit_at(angle: f64) -> Vec2 {
    let (s, c) = angle.to_radians().sin_cos();
    Vec2::new(c, s)
}
