#![warn(missing_docs)]

//! 2D arc and 3D bounding box types for the machtool geometry engine.
//!
//! # Example
//!
//! ```
//! use machtool_geom::{Arc, BoundingBox};
//! use machtool_math::{Point2, Point3, Vec2};
//!
//! // Quarter circle from +X to +Y
//! let arc = Arc::from_vectors(Vec2::new(2.0, 0.0), Vec2::new(0.0, 2.0), 2.0, true).unwrap();
//! assert!((arc.span() - 90.0).abs() < 1e-9);
//!
//! let bbox = BoundingBox::from_vertices([
//!     Point3::new(-1.0, 0.0, -1.0),
//!     Point3::new(1.0, 3.0, 1.0),
//! ])
//! .unwrap();
//! assert_eq!(bbox.vertices().len(), 8);
//! ```

mod arc;
mod bbox;

pub use arc::Arc;
pub use bbox::{Axis, BoundingBox};

use thiserror::Error;

/// Errors from arc and bounding box construction.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeomError {
    /// Arc radius is zero or negative.
    #[error("arc radius must be positive, got {0}")]
    NonPositiveRadius(f64),

    /// A direction vector used to build an arc has zero length.
    #[error("arc direction vector has zero length")]
    ZeroVector,

    /// Start and end directions coincide, so the arc has no length.
    #[error("arc start and end directions coincide at {0:.6} degrees")]
    ZeroLengthArc(f64),

    /// Bounding box corners are identical.
    #[error("bounding box has zero size")]
    ZeroSize,

    /// Bounding box has zero or negative extent along an axis.
    #[error("invalid {axis} extent {extent}")]
    InvalidExtent {
        /// The offending axis.
        axis: Axis,
        /// `max - min` along that axis.
        extent: f64,
    },

    /// No points were supplied.
    #[error("cannot bound an empty point set")]
    EmptyPointSet,
}

/// Result type for geometry construction.
pub type Result<T> = std::result::Result<T, GeomError>;
