//! Profile model: an ordered chain of points and arcs in the `x >= 0` half-plane.

use machtool_math::{Point2, Tolerance};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Winding of an arc segment, seen in the profile plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArcDirection {
    /// Clockwise.
    #[serde(rename = "clw", alias = "cw")]
    Cw,
    /// Counter-clockwise.
    #[serde(rename = "cclw", alias = "ccw")]
    Ccw,
}

impl ArcDirection {
    /// True for counter-clockwise arcs.
    pub fn is_ccw(self) -> bool {
        matches!(self, ArcDirection::Ccw)
    }
}

/// One element of a profile chain.
///
/// Each element names the point where a segment ends. The segment starts
/// at the previous element's end point, so the first element of a profile
/// must be a [`ProfileElement::Point`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProfileElement {
    /// A point. After the first element this is a straight segment.
    Point(Point2),
    /// An arc ending at `end`, centered on `center`.
    ArcTo {
        /// End point of the arc.
        end: Point2,
        /// Center of the arc's circle.
        center: Point2,
        /// Winding from the previous end point to `end`.
        direction: ArcDirection,
    },
}

impl ProfileElement {
    /// The point this element ends at.
    pub fn end_point(&self) -> Point2 {
        match *self {
            ProfileElement::Point(p) => p,
            ProfileElement::ArcTo { end, .. } => end,
        }
    }

    fn scaled(self, factor: f64) -> Self {
        match self {
            ProfileElement::Point(p) => ProfileElement::Point(p * factor),
            ProfileElement::ArcTo {
                end,
                center,
                direction,
            } => ProfileElement::ArcTo {
                end: end * factor,
                center: center * factor,
                direction,
            },
        }
    }
}

/// Structural problems with a profile.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProfileError {
    /// No elements at all.
    #[error("profile is empty")]
    Empty,

    /// A profile needs a start point and at least one segment.
    #[error("profile needs at least 2 elements, got {0}")]
    TooShort(usize),

    /// The first element must be a point.
    #[error("profile must start with a point")]
    MissingStartPoint,

    /// A segment starts and ends at the same point.
    #[error("zero-length segment at element {0}")]
    ZeroLengthSegment(usize),

    /// An arc whose center coincides with one of its end points.
    #[error("zero-radius arc at element {0}")]
    ZeroRadiusArc(usize),

    /// An arc whose end point is not on the circle through its start point.
    #[error("arc at element {index} ends off its circle ({end_radius} vs {start_radius})")]
    ArcEndOffCircle {
        /// Offending element.
        index: usize,
        /// Distance from the center to the arc's start point.
        start_radius: f64,
        /// Distance from the center to the arc's end point.
        end_radius: f64,
    },

    /// A point lies on the wrong side of the axis.
    #[error("element {index} has negative radius {x}")]
    NegativeRadius {
        /// Offending element.
        index: usize,
        /// Its radial coordinate.
        x: f64,
    },
}

/// An ordered chain of profile elements.
///
/// Built either from a list of elements or with the chaining builder:
///
/// ```
/// use machtool_mesh::{ArcDirection, Profile};
///
/// let profile = Profile::start(0.0, 0.0)
///     .line_to(0.25, 0.0)
///     .arc_to(0.5, 0.25, 0.25, 0.25, ArcDirection::Ccw)
///     .line_to(0.5, 2.0)
///     .line_to(0.0, 2.0);
/// assert_eq!(profile.len(), 5);
/// assert!(profile.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Profile {
    elements: Vec<ProfileElement>,
}

impl Profile {
    /// Start a new profile at `(x, y)`.
    pub fn start(x: f64, y: f64) -> Self {
        Self {
            elements: vec![ProfileElement::Point(Point2::new(x, y))],
        }
    }

    /// Build a profile from elements, validating its structure.
    pub fn from_elements(elements: Vec<ProfileElement>) -> Result<Self, ProfileError> {
        let profile = Self { elements };
        profile.validate()?;
        Ok(profile)
    }

    /// Append a straight segment to `(x, y)`.
    pub fn line_to(mut self, x: f64, y: f64) -> Self {
        self.elements.push(ProfileElement::Point(Point2::new(x, y)));
        self
    }

    /// Append an arc to `(x, y)` around the center `(cx, cy)`.
    pub fn arc_to(mut self, x: f64, y: f64, cx: f64, cy: f64, direction: ArcDirection) -> Self {
        self.elements.push(ProfileElement::ArcTo {
            end: Point2::new(x, y),
            center: Point2::new(cx, cy),
            direction,
        });
        self
    }

    /// Append an element.
    pub fn push(&mut self, element: ProfileElement) {
        self.elements.push(element);
    }

    /// The elements in order.
    pub fn elements(&self) -> &[ProfileElement] {
        &self.elements
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// True if the profile has no elements.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// First and last end points, if any.
    pub fn end_points(&self) -> Option<(Point2, Point2)> {
        let first = self.elements.first()?.end_point();
        let last = self.elements.last()?.end_point();
        Some((first, last))
    }

    /// Uniformly scale every coordinate, e.g. `1.0 / 25.4` for mm to inches.
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            elements: self.elements.iter().map(|e| e.scaled(factor)).collect(),
        }
    }

    /// Check the structural invariants the tessellator relies on.
    ///
    /// An arc's end must lie on the circle through its start point, within
    /// the weld tolerance, so that the next segment starts where the arc
    /// really ends.
    pub fn validate(&self) -> Result<(), ProfileError> {
        let tol = Tolerance::DEFAULT;
        let first = self.elements.first().ok_or(ProfileError::Empty)?;
        if !matches!(first, ProfileElement::Point(_)) {
            return Err(ProfileError::MissingStartPoint);
        }
        if self.elements.len() < 2 {
            return Err(ProfileError::TooShort(self.elements.len()));
        }
        for (index, element) in self.elements.iter().enumerate() {
            let x = element.end_point().x;
            if x < -tol.axis {
                return Err(ProfileError::NegativeRadius { index, x });
            }
        }
        for (index, pair) in self.elements.windows(2).enumerate() {
            let index = index + 1;
            let start = pair[0].end_point();
            let end = pair[1].end_point();
            if tol.points2_equal(&start, &end) {
                return Err(ProfileError::ZeroLengthSegment(index));
            }
            if let ProfileElement::ArcTo { center, .. } = pair[1] {
                if tol.points2_equal(&start, &center) || tol.points2_equal(&end, &center) {
                    return Err(ProfileError::ZeroRadiusArc(index));
                }
                let start_radius = (start - center).norm();
                let end_radius = (end - center).norm();
                if (start_radius - end_radius).abs() > tol.weld {
                    return Err(ProfileError::ArcEndOffCircle {
                        index,
                        start_radius,
                        end_radius,
                    });
                }
            }
        }
        Ok(())
    }

    /// A copy with the open ends brought to the axis.
    ///
    /// If the first point is off the axis, `(0, y_first)` is prepended. If
    /// the last end point is off the axis, `(0, y_last)` is appended.
    pub fn closed(&self) -> Self {
        let tol = Tolerance::DEFAULT;
        let Some((first, last)) = self.end_points() else {
            return self.clone();
        };
        let mut elements = Vec::with_capacity(self.elements.len() + 2);
        if !tol.is_on_axis(first.x) {
            elements.push(ProfileElement::Point(Point2::new(0.0, first.y)));
        }
        elements.extend_from_slice(&self.elements);
        if !tol.is_on_axis(last.x) {
            elements.push(ProfileElement::Point(Point2::new(0.0, last.y)));
        }
        Self { elements }
    }
}

impl FromIterator<ProfileElement> for Profile {
    fn from_iter<I: IntoIterator<Item = ProfileElement>>(iter: I) -> Self {
        Self {
            elements: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pt(x: f64, y: f64) -> ProfileElement {
        ProfileElement::Point(Point2::new(x, y))
    }

    #[test]
    fn test_builder_matches_elements() {
        let built = Profile::start(0.0, 0.0)
            .line_to(1.0, 0.0)
            .arc_to(2.0, 1.0, 1.0, 1.0, ArcDirection::Ccw);
        let listed = Profile::from_elements(vec![
            pt(0.0, 0.0),
            pt(1.0, 0.0),
            ProfileElement::ArcTo {
                end: Point2::new(2.0, 1.0),
                center: Point2::new(1.0, 1.0),
                direction: ArcDirection::Ccw,
            },
        ])
        .unwrap();
        assert_eq!(built, listed);
    }

    #[test]
    fn test_empty_and_short_profiles() {
        assert_eq!(Profile::default().validate(), Err(ProfileError::Empty));
        assert_eq!(
            Profile::start(1.0, 0.0).validate(),
            Err(ProfileError::TooShort(1))
        );
    }

    #[test]
    fn test_must_start_with_point() {
        let profile: Profile = [
            ProfileElement::ArcTo {
                end: Point2::new(1.0, 1.0),
                center: Point2::new(0.0, 1.0),
                direction: ArcDirection::Ccw,
            },
            pt(1.0, 2.0),
        ]
        .into_iter()
        .collect();
        assert_eq!(profile.validate(), Err(ProfileError::MissingStartPoint));
    }

    #[test]
    fn test_zero_length_segment() {
        let profile = Profile::start(0.0, 0.0).line_to(1.0, 0.0).line_to(1.0, 0.0);
        assert_eq!(profile.validate(), Err(ProfileError::ZeroLengthSegment(2)));
    }

    #[test]
    fn test_zero_radius_arc() {
        let profile = Profile::start(0.0, 0.0)
            .line_to(1.0, 0.0)
            .arc_to(2.0, 1.0, 1.0, 0.0, ArcDirection::Ccw);
        assert_eq!(profile.validate(), Err(ProfileError::ZeroRadiusArc(2)));
    }

    #[test]
    fn test_arc_end_off_circle() {
        // radius 1 at the start, 0.25 at the end
        let profile = Profile::start(0.0, 0.0)
            .line_to(1.0, 0.0)
            .arc_to(0.5, 1.0, 0.5, 0.75, ArcDirection::Cw)
            .line_to(0.5, 3.0);
        match profile.validate() {
            Err(ProfileError::ArcEndOffCircle {
                index,
                start_radius,
                end_radius,
            }) => {
                assert_eq!(index, 2);
                assert!((start_radius - 0.5_f64.hypot(0.75)).abs() < 1e-12);
                assert!((end_radius - 0.25).abs() < 1e-12);
            }
            other => panic!("expected ArcEndOffCircle, got {other:?}"),
        }
    }

    #[test]
    fn test_arc_end_within_weld_tolerance() {
        let end = Point2::new(1.0, 1.0) + machtool_math::unit_at(-30.0) * (1.0 + 1e-10);
        let profile = Profile::start(1.0, 0.0).arc_to(end.x, end.y, 1.0, 1.0, ArcDirection::Ccw);
        assert_eq!(profile.validate(), Ok(()));
    }

    #[test]
    fn test_negative_radius() {
        let profile = Profile::start(0.0, 0.0).line_to(-1.0, 1.0);
        assert!(matches!(
            profile.validate(),
            Err(ProfileError::NegativeRadius { index: 1, .. })
        ));
    }

    #[test]
    fn test_closed_adds_axis_points() {
        let profile = Profile::start(0.5, 0.0).line_to(0.5, 2.0);
        let closed = profile.closed();
        assert_eq!(closed.len(), 4);
        assert_eq!(closed.elements()[0], pt(0.0, 0.0));
        assert_eq!(closed.elements()[3], pt(0.0, 2.0));
    }

    #[test]
    fn test_closed_uses_arc_end_height() {
        let profile = Profile::start(0.0, 0.0).arc_to(1.0, 1.0, 0.0, 1.0, ArcDirection::Ccw);
        let closed = profile.closed();
        assert_eq!(closed.len(), 3);
        assert_eq!(closed.elements()[2], pt(0.0, 1.0));
    }

    #[test]
    fn test_closed_is_noop_on_axis() {
        let profile = Profile::start(0.0, 0.0).line_to(1.0, 0.0).line_to(0.0, 1.0);
        assert_eq!(profile.closed(), profile);
    }

    #[test]
    fn test_direction_names() {
        let cw: ArcDirection = toml::Value::String("clw".into()).try_into().unwrap();
        assert_eq!(cw, ArcDirection::Cw);
        let ccw: ArcDirection = toml::Value::String("ccw".into()).try_into().unwrap();
        assert_eq!(ccw, ArcDirection::Ccw);
        assert!(ccw.is_ccw());
    }

    #[test]
    fn test_scaled() {
        let profile = Profile::start(0.0, 0.0)
            .line_to(25.4, 0.0)
            .arc_to(50.8, 25.4, 25.4, 25.4, ArcDirection::Ccw);
        let inches = profile.scaled(1.0 / 25.4);
        let (first, last) = inches.end_points().unwrap();
        assert_eq!(first, Point2::new(0.0, 0.0));
        assert!((last.x - 2.0).abs() < 1e-12);
        match inches.elements()[2] {
            ProfileElement::ArcTo { center, .. } => assert!((center.x - 1.0).abs() < 1e-12),
            _ => panic!("expected arc"),
        }
    }
}
