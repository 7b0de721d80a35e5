#![warn(missing_docs)]

//! Cutting tool definitions for machtool.
//!
//! A [`ToolDef`] describes a drill or mill by a handful of catalog
//! dimensions. From those it produces the right half of the tool's
//! silhouette as a [`machtool_mesh::Profile`], ready to be revolved into a
//! mesh. Tools are kept in a [`ToolLibrary`] stored as JSON.
//!
//! ```
//! use machtool_tooldef::{ToolDef, ToolKind};
//!
//! let bull = ToolDef::new(
//!     "1/2 X 1/8R BULL MILL",
//!     3.0,
//!     ToolKind::BullMill {
//!         shank_dia: 0.5,
//!         dia: 0.5,
//!         flute_length: 1.0,
//!         radius: 0.125,
//!     },
//! );
//! bull.check_specs().unwrap();
//! bull.check_geometry().unwrap();
//! assert_eq!(bull.profile().len(), 5);
//! ```

use std::path::PathBuf;

use machtool_mesh::MeshError;
use thiserror::Error;

mod library;
mod tool;

pub use library::ToolLibrary;
pub use tool::{ToolDef, ToolKind, MM_PER_INCH};

/// Errors from tool definitions and libraries.
#[derive(Debug, Error)]
pub enum ToolDefError {
    /// The tool has an empty name.
    #[error("tool name may not be empty")]
    EmptyName,

    /// A dimension that must be positive is not.
    #[error("{field} must be positive, got {value}")]
    NotPositive {
        /// Name of the dimension.
        field: &'static str,
        /// Offending value.
        value: f64,
    },

    /// An angle outside its allowed range.
    #[error("{field} must be in {range}, got {value}")]
    OutOfRange {
        /// Name of the dimension.
        field: &'static str,
        /// Offending value.
        value: f64,
        /// Human-readable allowed range.
        range: &'static str,
    },

    /// The dimensions do not describe a buildable tool.
    #[error("invalid geometry for {name}: {reason}")]
    Geometry {
        /// Tool name.
        name: String,
        /// What is wrong.
        reason: &'static str,
    },

    /// A tool with this name is already in the library.
    #[error("duplicate tool name {0:?}")]
    DuplicateName(String),

    /// No tool with this name.
    #[error("no tool named {0:?}")]
    NotFound(String),

    /// Library JSON could not be parsed or written.
    #[error("tool library json: {0}")]
    Json(#[from] serde_json::Error),

    /// A library file could not be read or written.
    #[error("io error on {path}: {source}")]
    Io {
        /// The file involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The tool's profile could not be meshed.
    #[error(transparent)]
    Mesh(#[from] MeshError),
}

/// Result type for tool definition operations.
pub type Result<T> = std::result::Result<T, ToolDefError>;
