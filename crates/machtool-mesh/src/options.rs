//! Mesh build options, loadable from TOML.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::patch::ShadingMode;
use crate::sincos::MIN_RESOLUTION;
use crate::{MeshError, Result};

/// RGBA color, components in `0.0..=1.0`.
pub type Rgba = [f32; 4];

/// Default patch color: a muted blue.
pub const DEFAULT_COLOR: Rgba = [0.1, 0.1, 0.7, 1.0];

/// Default number of samples around the axis.
pub const DEFAULT_RESOLUTION: u32 = 32;

/// Options controlling how a profile is turned into a mesh.
///
/// ```
/// use machtool_mesh::{MeshOptions, ShadingMode};
///
/// let opts = MeshOptions::from_toml_str("resolution = 64\nshading = \"flat\"").unwrap();
/// assert_eq!(opts.resolution, 64);
/// assert_eq!(opts.shading, ShadingMode::Flat);
/// assert!(!opts.close_ends);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MeshOptions {
    /// Color given to every patch.
    pub color: Rgba,
    /// Bring open profile ends to the axis before sweeping.
    pub close_ends: bool,
    /// Samples per full turn.
    pub resolution: u32,
    /// Shading mode given to every patch.
    pub shading: ShadingMode,
}

impl Default for MeshOptions {
    fn default() -> Self {
        Self {
            color: DEFAULT_COLOR,
            close_ends: false,
            resolution: DEFAULT_RESOLUTION,
            shading: ShadingMode::Smooth,
        }
    }
}

impl MeshOptions {
    /// Parse options from TOML. Missing keys take their defaults.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let opts: Self = toml::from_str(s)?;
        opts.validate()?;
        Ok(opts)
    }

    /// Read options from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| MeshError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("loading mesh options from {}", path.display());
        Self::from_toml_str(&text)
    }

    /// Check values serde cannot.
    pub fn validate(&self) -> Result<()> {
        if self.resolution < MIN_RESOLUTION {
            return Err(MeshError::InvalidResolution(self.resolution));
        }
        Ok(())
    }
}
