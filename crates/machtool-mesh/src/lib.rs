#![warn(missing_docs)]

//! Revolved-profile tessellation for machtool.
//!
//! A [`Profile`] is an ordered list of points and arcs in the half-plane
//! `x >= 0`, `x` being the distance from the axis of revolution and `y`
//! the height along it. [`build_revolved_mesh`] sweeps every segment of
//! the profile a full turn around the Y axis and produces a [`Mesh`]:
//! indexed triangles grouped into one [`Patch`] per segment, with vertex
//! welding so that tangent segments shade smoothly while sharp corners
//! keep a crease.
//!
//! ```
//! use machtool_mesh::{build_revolved_mesh, ArcDirection, MeshOptions, Profile};
//!
//! // flat-bottomed drill blank with a rounded shoulder
//! let profile = Profile::start(0.0, 0.0)
//!     .line_to(0.5, 0.0)
//!     .arc_to(0.5, 1.0, 1.0, 0.5, ArcDirection::Cw)
//!     .line_to(0.5, 3.0)
//!     .line_to(0.0, 3.0);
//! let mesh = build_revolved_mesh(&profile, &MeshOptions::default()).unwrap();
//! assert_eq!(mesh.triangle_count(), 640);
//! let bbox = mesh.bounding_box().unwrap();
//! assert!((bbox.size().y - 3.0).abs() < 1e-9);
//! ```

use std::path::PathBuf;

use machtool_geom::GeomError;
use thiserror::Error;

pub mod export;
mod mesh;
mod options;
mod patch;
mod profile;
mod revolve;
mod sincos;

pub use mesh::{Mesh, RenderBuffers, VertexIndex, VertexKind, WeldWindow};
pub use options::{MeshOptions, Rgba, DEFAULT_COLOR, DEFAULT_RESOLUTION};
pub use patch::{Patch, ShadingMode, MIN_ARC_SEGMENTS};
pub use profile::{ArcDirection, Profile, ProfileElement, ProfileError};
pub use revolve::{
    build_revolved_mesh, is_arc_tangent_to_arc, is_line_tangent_to_arc, RevolvedMeshBuilder,
};
pub use sincos::{RingSample, SinCosCache, MIN_RESOLUTION};

/// Errors from profile validation, tessellation, configuration and export.
#[derive(Debug, Error)]
pub enum MeshError {
    /// The profile is structurally invalid.
    #[error("invalid profile: {0}")]
    Profile(#[from] ProfileError),

    /// A geometric primitive could not be constructed.
    #[error(transparent)]
    Geom(#[from] GeomError),

    /// Angular resolution below the minimum of three samples.
    #[error("resolution must be at least 3, got {0}")]
    InvalidResolution(u32),

    /// The options ask for a different resolution than the builder's ring.
    #[error("builder ring has {ring} samples, options ask for {requested}")]
    ResolutionMismatch {
        /// Samples in the builder's ring.
        ring: u32,
        /// Samples requested by the options.
        requested: u32,
    },

    /// Mesh options could not be parsed.
    #[error("invalid mesh options: {0}")]
    Config(#[from] toml::de::Error),

    /// A file could not be read or written.
    #[error("io error on {path}: {source}")]
    Io {
        /// The file involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Writing an STL stream failed.
    #[error("stl export failed: {0}")]
    Stl(#[source] std::io::Error),
}

/// Result type for mesh operations.
pub type Result<T> = std::result::Result<T, MeshError>;
