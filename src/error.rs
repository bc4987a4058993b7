//! Error types.
//!
//! The detector itself performs no I/O, so the taxonomy is narrow:
//! configuration is rejected at construction time and listener failures
//! propagate to whoever fed the sample.

use thiserror::Error;

/// A configuration value the engine refuses to run with.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("window_size must be at least 2 samples, got {0}")]
    WindowTooSmall(usize),
    #[error("flat_limit must be positive")]
    ZeroFlatLimit,
    #[error("slope_scale must be finite and non-zero, got {0}")]
    InvalidSlopeScale(f64),
    #[error("timestamp_divisor must be positive")]
    ZeroTimestampDivisor,
    #[error("buffer_len must be positive")]
    ZeroBufferLen,
    #[error("smoothing_alpha must lie in (0, 1], got {0}")]
    InvalidSmoothingAlpha(f64),
    #[error("failed to parse engine config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to read engine config: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure raised by a step listener during notification.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("listener failed: {0}")]
pub struct ListenerError(pub String);

impl ListenerError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Top-level error for the step detection pipeline.
#[derive(Debug, Error)]
pub enum StepError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Listener(#[from] ListenerError),
}

pub type Result<T, E = StepError> = std::result::Result<T, E>;
