//! Circular arcs in the profile plane.

use machtool_math::{
    angle_of, ccw_sweep, cw_sweep, normalize_degrees, unit_at, Point2, Tolerance, Vec2,
};

use crate::{GeomError, Result};

/// Below this length a direction vector has no usable angle.
const MIN_VECTOR_NORM: f64 = 1e-12;

/// A circular arc described by center, radius, start angle and signed span.
///
/// Angles are in degrees, measured counter-clockwise from +X. The start
/// angle is kept in `[0, 360)`. A positive span sweeps counter-clockwise,
/// a negative span clockwise.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arc {
    center: Point2,
    radius: f64,
    start_angle: f64,
    span: f64,
}

impl Arc {
    /// Create an arc from its center, radius, start angle and signed span.
    ///
    /// # Errors
    ///
    /// - `NonPositiveRadius` if `radius <= 0`
    /// - `ZeroLengthArc` if the span is zero
    pub fn new(center: Point2, radius: f64, start_angle: f64, span: f64) -> Result<Self> {
        if radius.is_nan() || radius <= 0.0 {
            return Err(GeomError::NonPositiveRadius(radius));
        }
        if Tolerance::DEFAULT.angles_equal(span, 0.0) {
            return Err(GeomError::ZeroLengthArc(start_angle));
        }
        Ok(Self {
            center,
            radius,
            start_angle: normalize_degrees(start_angle),
            span,
        })
    }

    /// Create an origin-centered arc sweeping from the direction of `v1`
    /// to the direction of `v2`.
    ///
    /// `v1` and `v2` need not be normalized. The sweep follows the requested
    /// winding: with `prefer_ccw` the span is positive, otherwise negative,
    /// and its magnitude is the congruent value in `(0, 360)`.
    ///
    /// # Errors
    ///
    /// - `ZeroVector` if either vector has zero length
    /// - `NonPositiveRadius` if `radius <= 0`
    /// - `ZeroLengthArc` if the two directions coincide
    pub fn from_vectors(v1: Vec2, v2: Vec2, radius: f64, prefer_ccw: bool) -> Result<Self> {
        if v1.norm() < MIN_VECTOR_NORM || v2.norm() < MIN_VECTOR_NORM {
            return Err(GeomError::ZeroVector);
        }
        let start = angle_of(&v1);
        let end = angle_of(&v2);
        let span = if prefer_ccw {
            ccw_sweep(start, end)
        } else {
            cw_sweep(start, end)
        };
        let tol = Tolerance::DEFAULT;
        if tol.angles_equal(span, 0.0) || tol.angles_equal(span.abs(), 360.0) {
            return Err(GeomError::ZeroLengthArc(start));
        }
        Self::new(Point2::origin(), radius, start, span)
    }

    /// The same arc moved to a new center.
    pub fn with_center(self, center: Point2) -> Self {
        Self { center, ..self }
    }

    /// Center of the arc's circle.
    pub fn center(&self) -> Point2 {
        self.center
    }

    /// Radius of the arc.
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Start angle in degrees, in `[0, 360)`.
    pub fn start_angle(&self) -> f64 {
        self.start_angle
    }

    /// Signed span in degrees. Positive is counter-clockwise.
    pub fn span(&self) -> f64 {
        self.span
    }

    /// End angle in degrees, in `[0, 360)`.
    pub fn end_angle(&self) -> f64 {
        normalize_degrees(self.start_angle + self.span)
    }

    /// True if the arc sweeps counter-clockwise.
    pub fn is_ccw(&self) -> bool {
        self.span > 0.0
    }

    /// Unit vector from the center toward the start of the arc.
    pub fn start_angle_vector(&self) -> Vec2 {
        unit_at(self.start_angle)
    }

    /// Unit vector from the center toward the end of the arc.
    pub fn end_angle_vector(&self) -> Vec2 {
        unit_at(self.end_angle())
    }

    /// Point on the arc's circle at `angle` degrees.
    pub fn point_at_angle(&self, angle: f64) -> Point2 {
        self.center + unit_at(angle) * self.radius
    }

    /// Angle reached after sweeping `t` (0..=1) of the span.
    pub fn angle_at(&self, t: f64) -> f64 {
        self.start_angle + self.span * t
    }

    /// First point of the arc.
    pub fn start_point(&self) -> Point2 {
        self.point_at_angle(self.start_angle)
    }

    /// Last point of the arc.
    pub fn end_point(&self) -> Point2 {
        self.point_at_angle(self.end_angle())
    }

    /// Arc length.
    pub fn length(&self) -> f64 {
        self.radius * self.span.abs().to_radians()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_quarter_ccw() {
        let arc = Arc::from_vectors(Vec2::new(1.0, 0.0), Vec2::new(0.0, 1.0), 1.0, true).unwrap();
        assert_abs_diff_eq!(arc.start_angle(), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(arc.span(), 90.0, epsilon = 1e-12);
        assert!(arc.is_ccw());
    }

    #[test]
    fn test_quarter_points_cw_takes_long_way() {
        let arc = Arc::from_vectors(Vec2::new(1.0, 0.0), Vec2::new(0.0, 1.0), 1.0, false).unwrap();
        assert_abs_diff_eq!(arc.span(), -270.0, epsilon = 1e-12);
        assert!(!arc.is_ccw());
        assert_abs_diff_eq!(arc.end_angle(), 90.0, epsilon = 1e-9);
    }

    #[test]
    fn test_wraparound_ccw_short_hop() {
        // 350 degrees to 10 degrees
        let v1 = unit_at(350.0) * 3.0;
        let v2 = unit_at(10.0) * 3.0;
        let arc = Arc::from_vectors(v1, v2, 3.0, true).unwrap();
        assert_abs_diff_eq!(arc.span(), 20.0, epsilon = 1e-9);
        assert_abs_diff_eq!(arc.end_angle(), 10.0, epsilon = 1e-9);

        let cw = Arc::from_vectors(v1, v2, 3.0, false).unwrap();
        assert_abs_diff_eq!(cw.span(), -340.0, epsilon = 1e-9);
    }

    #[test]
    fn test_unnormalized_vectors() {
        let arc =
            Arc::from_vectors(Vec2::new(0.0, -5.0), Vec2::new(-0.25, 0.0), 5.0, true).unwrap();
        assert_abs_diff_eq!(arc.start_angle(), 270.0, epsilon = 1e-9);
        assert_abs_diff_eq!(arc.span(), 270.0, epsilon = 1e-9);
    }

    #[test]
    fn test_zero_vector_rejected() {
        let err = Arc::from_vectors(Vec2::zeros(), Vec2::new(1.0, 0.0), 1.0, true).unwrap_err();
        assert_eq!(err, GeomError::ZeroVector);
    }

    #[test]
    fn test_coincident_directions_rejected() {
        let result = Arc::from_vectors(Vec2::new(1.0, 1.0), Vec2::new(2.0, 2.0), 1.0, true);
        assert!(matches!(result, Err(GeomError::ZeroLengthArc(_))));
    }

    #[test]
    fn test_non_positive_radius_rejected() {
        let result = Arc::new(Point2::origin(), 0.0, 0.0, 90.0);
        assert!(matches!(result, Err(GeomError::NonPositiveRadius(_))));
        let result = Arc::from_vectors(Vec2::new(1.0, 0.0), Vec2::new(0.0, 1.0), -1.0, true);
        assert!(matches!(result, Err(GeomError::NonPositiveRadius(_))));
    }

    #[test]
    fn test_angle_vectors() {
        let arc = Arc::new(Point2::new(5.0, 5.0), 2.0, 180.0, -90.0).unwrap();
        let s = arc.start_angle_vector();
        let e = arc.end_angle_vector();
        assert_abs_diff_eq!(s.x, -1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(s.y, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(e.x, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(e.y, 1.0, epsilon = 1e-12);
        let end = arc.end_point();
        assert_abs_diff_eq!(end.x, 5.0, epsilon = 1e-12);
        assert_abs_diff_eq!(end.y, 7.0, epsilon = 1e-12);
    }

    #[test]
    fn test_angle_at_interpolates_span() {
        let arc = Arc::new(Point2::origin(), 1.0, 350.0, 40.0).unwrap();
        assert_abs_diff_eq!(arc.angle_at(0.0), 350.0);
        assert_abs_diff_eq!(arc.angle_at(0.25), 360.0);
        // not wrapped past 360
        assert_abs_diff_eq!(arc.angle_at(1.0), 390.0);
        let end = arc.point_at_angle(arc.angle_at(1.0));
        assert_abs_diff_eq!(end.x, arc.end_point().x, epsilon = 1e-12);
        assert_abs_diff_eq!(end.y, arc.end_point().y, epsilon = 1e-12);
    }

    #[test]
    fn test_span_within_angular_tolerance_is_zero() {
        let result = Arc::new(Point2::origin(), 1.0, 0.0, 5e-10);
        assert!(matches!(result, Err(GeomError::ZeroLengthArc(_))));
        assert!(Arc::new(Point2::origin(), 1.0, 0.0, 1e-6).is_ok());
    }

    #[test]
    fn test_with_center_and_length() {
        let arc = Arc::from_vectors(Vec2::new(0.0, -1.0), Vec2::new(1.0, 0.0), 2.0, true)
            .unwrap()
            .with_center(Point2::new(1.0, 2.0));
        assert_abs_diff_eq!(arc.length(), std::f64::consts::PI, epsilon = 1e-12);
        let start = arc.start_point();
        assert_abs_diff_eq!(start.x, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(start.y, 0.0, epsilon = 1e-12);
    }
}
