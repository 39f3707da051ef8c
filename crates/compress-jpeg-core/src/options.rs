//! Run configuration.

use crate::types::CompressionError;
use serde::{Deserialize, Serialize};

/// Quality used when none is given (the host UI's initial slider position).
pub const DEFAULT_QUALITY: f64 = 30.0;

/// Blocks processed between two suspension points.
pub const DEFAULT_YIELD_INTERVAL: u32 = 10;

/// Lowest accepted quality.
pub const MIN_QUALITY: f64 = 1.0;

/// Highest accepted quality.
pub const MAX_QUALITY: f64 = 100.0;

/// Options for one compression run.
///
/// Deserializes from `{ "quality": 30, "yieldInterval": 10 }`; missing fields
/// take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CompressionOptions {
    /// Compression quality (1-100, lower = more artifacts)
    pub quality: f64,
    /// Suspend after every this many blocks (at least 1)
    pub yield_interval: u32,
}

impl Default for CompressionOptions {
    fn default() -> Self {
        Self {
            quality: DEFAULT_QUALITY,
            yield_interval: DEFAULT_YIELD_INTERVAL,
        }
    }
}

impl CompressionOptions {
    /// Options with the given quality and the default yield interval.
    pub fn with_quality(quality: f64) -> Self {
        Self {
            quality,
            ..Self::default()
        }
    }

    /// Reject out-of-range values. Quality is never clamped.
    pub fn validate(&self) -> Result<(), CompressionError> {
        if !self.quality.is_finite() || !(MIN_QUALITY..=MAX_QUALITY).contains(&self.quality) {
            return Err(CompressionError::InvalidQuality(self.quality));
        }
        if self.yield_interval == 0 {
            return Err(CompressionError::InvalidYieldInterval);
        }
        Ok(())
    }
}
