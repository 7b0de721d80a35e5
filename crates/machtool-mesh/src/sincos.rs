//! Precomputed sine/cosine ring used to sweep profile points around the axis.

use crate::{MeshError, Result};

/// Smallest usable angular resolution.
pub const MIN_RESOLUTION: u32 = 3;

/// Sine and cosine of one sample angle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RingSample {
    /// `sin(angle)`.
    pub sin: f64,
    /// `cos(angle)`.
    pub cos: f64,
}

impl RingSample {
    fn at(radians: f64) -> Self {
        let (sin, cos) = radians.sin_cos();
        Self { sin, cos }
    }
}

/// Consecutive sample pairs around one full turn.
///
/// Pair `i` holds the samples at `i * step` and `(i + 1) * step`, with
/// `step = 360 / resolution` degrees. The last pair closes the ring: its
/// second sample is the very same value as the first sample of pair 0, so
/// the seam welds exactly.
///
/// The cache is immutable once built; share it behind an `Arc` between
/// builders using the same resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct SinCosCache {
    resolution: u32,
    samples: Vec<RingSample>,
}

impl SinCosCache {
    /// Build the ring for `resolution` samples per turn.
    pub fn new(resolution: u32) -> Result<Self> {
        if resolution < MIN_RESOLUTION {
            return Err(MeshError::InvalidResolution(resolution));
        }
        let step = std::f64::consts::TAU / f64::from(resolution);
        let samples = (0..resolution)
            .map(|i| RingSample::at(step * f64::from(i)))
            .collect();
        log::trace!("built sin/cos ring with {resolution} samples");
        Ok(Self {
            resolution,
            samples,
        })
    }

    /// Samples per turn.
    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    /// Angular step between samples, in degrees.
    pub fn angle_step(&self) -> f64 {
        360.0 / f64::from(self.resolution)
    }

    /// The individual samples, starting at angle 0.
    pub fn samples(&self) -> &[RingSample] {
        &self.samples
    }

    /// Iterate over consecutive `(current, next)` pairs, wrapping at the end.
    pub fn pairs(&self) -> impl ExactSizeIterator<Item = (RingSample, RingSample)> + '_ {
        let n = self.samples.len();
        (0..n).map(move |i| (self.samples[i], self.samples[(i + 1) % n]))
    }
}
