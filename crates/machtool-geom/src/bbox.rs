//! Axis-aligned bounding box used for camera framing.

use std::borrow::Borrow;
use std::fmt;

use machtool_math::{Point3, Vec3};

use crate::{GeomError, Result};

/// A coordinate axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// The X axis.
    X,
    /// The Y axis.
    Y,
    /// The Z axis.
    Z,
}

impl Axis {
    const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        };
        f.write_str(name)
    }
}

/// Axis-aligned bounding box with strictly positive extent on every axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    p1: Point3,
    p2: Point3,
}

impl BoundingBox {
    /// Create a box from its minimum corner `p1` and maximum corner `p2`.
    ///
    /// # Errors
    ///
    /// - `ZeroSize` if the corners are identical
    /// - `InvalidExtent` if `p1[i] >= p2[i]` on any axis
    pub fn new(p1: Point3, p2: Point3) -> Result<Self> {
        if p1 == p2 {
            return Err(GeomError::ZeroSize);
        }
        for axis in Axis::ALL {
            let i = axis.index();
            // written so that NaN coordinates are rejected too
            if !(p1[i] < p2[i]) {
                return Err(GeomError::InvalidExtent {
                    axis,
                    extent: p2[i] - p1[i],
                });
            }
        }
        Ok(Self { p1, p2 })
    }

    /// Create the tightest box around a set of points.
    ///
    /// # Errors
    ///
    /// - `EmptyPointSet` if no points are given
    /// - `ZeroSize` / `InvalidExtent` if the points are coplanar with an
    ///   axis plane (zero extent on some axis)
    pub fn from_vertices<I>(vertices: I) -> Result<Self>
    where
        I: IntoIterator,
        I::Item: Borrow<Point3>,
    {
        let mut iter = vertices.into_iter();
        let first = iter.next().ok_or(GeomError::EmptyPointSet)?;
        let first: &Point3 = first.borrow();
        let first = *first;
        let (min, max) = iter.fold((first, first), |(mut min, mut max), item| {
            let p: &Point3 = item.borrow();
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            min.z = min.z.min(p.z);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
            max.z = max.z.max(p.z);
            (min, max)
        });
        Self::new(min, max)
    }

    /// Minimum corner.
    pub fn min(&self) -> Point3 {
        self.p1
    }

    /// Maximum corner.
    pub fn max(&self) -> Point3 {
        self.p2
    }

    /// Center of the box.
    pub fn center(&self) -> Point3 {
        Point3::from((self.p1.coords + self.p2.coords) * 0.5)
    }

    /// Extent along each axis.
    pub fn size(&self) -> Vec3 {
        self.p2 - self.p1
    }

    /// Length of the diagonal.
    pub fn diagonal(&self) -> f64 {
        self.size().norm()
    }

    /// The eight corners. The first four lie on the minimum Z face.
    pub fn vertices(&self) -> [Point3; 8] {
        let (a, b) = (self.p1, self.p2);
        [
            Point3::new(a.x, a.y, a.z),
            Point3::new(b.x, a.y, a.z),
            Point3::new(b.x, b.y, a.z),
            Point3::new(a.x, b.y, a.z),
            Point3::new(a.x, a.y, b.z),
            Point3::new(b.x, a.y, b.z),
            Point3::new(b.x, b.y, b.z),
            Point3::new(a.x, b.y, b.z),
        ]
    }

    /// True if the point lies inside or on the box.
    pub fn contains(&self, p: &Point3) -> bool {
        (self.p1.x..=self.p2.x).contains(&p.x)
            && (self.p1.y..=self.p2.y).contains(&p.y)
            && (self.p1.z..=self.p2.z).contains(&p.z)
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[({}, {}, {}), ({}, {}, {})]",
            self.p1.x, self.p1.y, self.p1.z, self.p2.x, self.p2.y, self.p2.z
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn unit_box() -> BoundingBox {
        BoundingBox::new(Point3::new(-1.0, 0.0, -1.0), Point3::new(1.0, 3.0, 1.0)).unwrap()
    }

    #[test]
    fn test_center_and_size() {
        let bbox = unit_box();
        let c = bbox.center();
        assert_abs_diff_eq!(c.x, 0.0);
        assert_abs_diff_eq!(c.y, 1.5);
        assert_abs_diff_eq!(c.z, 0.0);
        let s = bbox.size();
        assert_abs_diff_eq!(s.x, 2.0);
        assert_abs_diff_eq!(s.y, 3.0);
        assert_abs_diff_eq!(s.z, 2.0);
        assert_abs_diff_eq!(bbox.diagonal(), 17.0_f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_corners() {
        let corners = unit_box().vertices();
        assert_eq!(corners[0], Point3::new(-1.0, 0.0, -1.0));
        assert_eq!(corners[6], Point3::new(1.0, 3.0, 1.0));
        for (i, a) in corners.iter().enumerate() {
            for b in &corners[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_from_vertices() {
        let pts = vec![
            Point3::new(0.5, 0.0, 0.0),
            Point3::new(-0.5, 2.0, 0.25),
            Point3::new(0.0, 1.0, -0.5),
        ];
        let bbox = BoundingBox::from_vertices(&pts).unwrap();
        assert_eq!(bbox.min(), Point3::new(-0.5, 0.0, -0.5));
        assert_eq!(bbox.max(), Point3::new(0.5, 2.0, 0.25));
        assert!(pts.iter().all(|p| bbox.contains(p)));
    }

    #[test]
    fn test_zero_size_rejected() {
        let p = Point3::new(1.0, 1.0, 1.0);
        assert_eq!(BoundingBox::new(p, p), Err(GeomError::ZeroSize));
    }

    #[test]
    fn test_flat_box_rejected() {
        let result = BoundingBox::new(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 0.0, 1.0));
        assert!(matches!(
            result,
            Err(GeomError::InvalidExtent { axis: Axis::Y, .. })
        ));
    }

    #[test]
    fn test_inverted_box_rejected() {
        let result = BoundingBox::new(Point3::new(2.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0));
        match result {
            Err(GeomError::InvalidExtent { axis, extent }) => {
                assert_eq!(axis, Axis::X);
                assert_abs_diff_eq!(extent, -1.0);
            }
            other => panic!("expected InvalidExtent, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_point_set() {
        let pts: Vec<Point3> = Vec::new();
        assert_eq!(
            BoundingBox::from_vertices(&pts),
            Err(GeomError::EmptyPointSet)
        );
    }

    #[test]
    fn test_display() {
        let bbox =
            BoundingBox::new(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 2.0, 3.0)).unwrap();
        assert_eq!(bbox.to_string(), "[(0, 0, 0), (1, 2, 3)]");
    }
}
