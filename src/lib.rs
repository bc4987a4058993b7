//! Stride Sense Step Detection Library
//!
//! Converts a continuous stream of tri-axis accelerometer samples into
//! discrete "step detected" events in real time.
//!
//! # Design Philosophy
//!
//! - **Windowed slope, not peak picking**: the conditioned magnitude is cut
//!   into fixed windows, each window is classified Rising/Falling/Flat, and
//!   a Falling → Rising reversal marks a step.
//! - **Hysteresis over noise**: sustained zero-slope windows push the
//!   detector back to a neutral state instead of letting it fire on jitter.
//! - **Battery awareness**: O(1) processing per sample with fixed memory
//!   footprint and no allocation on the hot path.
//! - **Synchronous observers**: listeners are notified on the caller's
//!   thread, after the detector state is fully updated.
//!
//! # Example
//!
//! ```
//! use std::rc::Rc;
//! use stride_sense::{AccelSample, StepDetector, StepLog};
//!
//! let mut detector = StepDetector::default();
//! let log = Rc::new(StepLog::new());
//! detector.register_listener(log.clone());
//!
//! let sample = AccelSample::new(20_000_000, [0.1, 0.2, 9.81]);
//! let step = detector.process_sample(&sample).unwrap();
//! assert!(step.is_none());
//! ```

pub mod config;
pub mod error;
pub mod listeners;
pub mod pipeline;
pub mod signal;
pub mod step_detection;
pub mod types;

#[cfg(test)]
mod integration_tests;

// Re-export commonly used types
pub use config::{ConditionerConfig, DetectorConfig, EngineConfig};
pub use error::{ConfigError, ListenerError, StepError};
pub use listeners::{ListenerId, ListenerRegistry, StepListener, StepLog};
pub use pipeline::StepDetector;
pub use signal::{ExponentialSmoother, Filter, MovingAverageFilter, SignalConditioner};
pub use step_detection::{DetectorState, StepStateMachine};
pub use types::{AccelSample, ConditionedSample, StepEvent, Trend};
