//! Engine configuration.
//!
//! The constants the detector was tuned with are exposed as named,
//! overridable parameters. They are calibration values for a particular
//! sensor rate, not physical law: a device sampling much faster or slower
//! than ~50Hz needs its own `window_size` and `slope_scale`.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Parameters for the windowed-slope state machine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Samples per classification window, including the window start.
    /// Windows do not overlap.
    pub window_size: usize,

    /// Consecutive zero-slope windows tolerated while Rising or Falling
    /// before the trend falls back to Flat.
    pub flat_limit: u32,

    /// Multiplier applied to magnitude-per-timestamp-unit before the slope
    /// is truncated to an integer. With nanosecond timestamps this folds
    /// the unit conversion and the sensitivity into one factor.
    pub slope_scale: f64,

    /// Divisor converting sensor timestamps to milliseconds for events.
    pub timestamp_divisor: u64,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            window_size: 15,                // ~300ms at 50Hz
            flat_limit: 10,                 // ~3s of flatness at 50Hz
            slope_scale: 3e9,               // ns → s, times 3
            timestamp_divisor: 1_000_000,   // ns → ms
        }
    }
}

impl DetectorConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        // A single-sample window starts and ends on the same timestamp.
        if self.window_size < 2 {
            return Err(ConfigError::WindowTooSmall(self.window_size));
        }
        if self.flat_limit == 0 {
            return Err(ConfigError::ZeroFlatLimit);
        }
        if !self.slope_scale.is_finite() || self.slope_scale == 0.0 {
            return Err(ConfigError::InvalidSlopeScale(self.slope_scale));
        }
        if self.timestamp_divisor == 0 {
            return Err(ConfigError::ZeroTimestampDivisor);
        }
        Ok(())
    }
}

/// Parameters for the signal conditioner preceding the detector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConditionerConfig {
    /// Number of raw vectors averaged by the buffering filter.
    pub buffer_len: usize,

    /// Exponential smoothing weight of the newest sample, in (0, 1].
    /// 1.0 passes the buffered signal through unchanged.
    pub smoothing_alpha: f64,
}

impl Default for ConditionerConfig {
    fn default() -> Self {
        Self {
            buffer_len: 3,
            smoothing_alpha: 1.0,
        }
    }
}

impl ConditionerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.buffer_len == 0 {
            return Err(ConfigError::ZeroBufferLen);
        }
        if !(self.smoothing_alpha > 0.0 && self.smoothing_alpha <= 1.0) {
            return Err(ConfigError::InvalidSmoothingAlpha(self.smoothing_alpha));
        }
        Ok(())
    }
}

/// Configuration for the complete step detection pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub detector: DetectorConfig,
    pub conditioner: ConditionerConfig,
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.detector.validate()?;
        self.conditioner.validate()
    }

    /// Parse and validate a JSON document. Missing fields take defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }
}
