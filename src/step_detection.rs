//! Step Detection State Machine.
//!
//! Detects steps from the conditioned acceleration magnitude using
//! windowed slope classification:
//! - The signal is cut into non-overlapping windows of `window_size` samples
//! - Each window yields one integer slope between its first and last sample
//! - The slope sign drives a three-state trend machine (Flat/Rising/Falling)
//! - A Falling → Rising reversal (a local minimum of the magnitude) is a step
//!
//! A run of zero-slope windows while Rising or Falling is tolerated up to
//! `flat_limit`, after which the trend falls back to Flat. This keeps a
//! device at rest from sitting in a half-finished gait cycle forever.
//!
//! Per-sample cost is constant and the hot path never allocates.

use log::{debug, info, warn};

use crate::config::DetectorConfig;
use crate::error::ConfigError;
use crate::types::{ConditionedSample, StepEvent, Trend};

/// What a classified window does to the flat run counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlatRun {
    Reset,
    Increment,
    Keep,
}

/// Outcome of one window classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub next: Trend,
    pub flat_run: FlatRun,
    pub step: bool,
}

/// The trend transition table.
///
/// `trend` is the state before the window, `sign` the classification of
/// the window just completed.
pub fn transition(trend: Trend, sign: Trend) -> Transition {
    match (trend, sign) {
        (Trend::Flat, Trend::Flat) => Transition {
            next: Trend::Flat,
            flat_run: FlatRun::Keep,
            step: false,
        },
        // Hold the trend through a flat window and count it
        (current, Trend::Flat) => Transition {
            next: current,
            flat_run: FlatRun::Increment,
            step: false,
        },
        (Trend::Falling, Trend::Rising) => Transition {
            next: Trend::Rising,
            flat_run: FlatRun::Reset,
            step: true,
        },
        (_, sign) => Transition {
            next: sign,
            flat_run: FlatRun::Reset,
            step: false,
        },
    }
}

/// Integer slope between the first and last sample of a window.
///
/// Returns None for a degenerate window: a non-positive time delta or a
/// slope that is not finite. Truncation is toward zero.
pub fn window_slope(
    start: WindowStart,
    end_timestamp: u64,
    end_magnitude: f64,
    scale: f64,
) -> Option<i64> {
    if end_timestamp <= start.timestamp {
        return None;
    }
    let dt = (end_timestamp - start.timestamp) as f64;
    let slope = (end_magnitude - start.magnitude) / dt * scale;
    if !slope.is_finite() {
        return None;
    }
    Some(slope as i64)
}

/// The (timestamp, magnitude) pair recorded at the start of a window.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WindowStart {
    pub timestamp: u64,
    pub magnitude: f64,
}

/// Mutable state of the machine between updates.
///
/// Invariants: `window_sample_count < window_size`,
/// `flat_run_count <= flat_limit`, `step_count` never decreases.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetectorState {
    /// Classified trend of the most recent window.
    pub trend: Trend,
    /// Start of the window being accumulated.
    pub window_start: WindowStart,
    /// Samples accumulated in the current window.
    pub window_sample_count: usize,
    /// Consecutive flat windows seen while Rising or Falling.
    pub flat_run_count: u32,
    /// Steps detected since construction (or the last full reset).
    pub step_count: u64,
    /// Slope of the last classified window, if any.
    pub last_slope: Option<i64>,
}

/// Windowed slope step detector.
#[derive(Debug, Clone)]
pub struct StepStateMachine {
    config: DetectorConfig,
    state: DetectorState,
    last_timestamp: Option<u64>,
}

impl StepStateMachine {
    /// Create a new state machine, rejecting unusable configuration.
    pub fn new(config: DetectorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            state: DetectorState::default(),
            last_timestamp: None,
        })
    }

    /// Feed one conditioned sample.
    ///
    /// Returns a StepEvent if this sample completes a window that reverses
    /// a Falling trend into a Rising one. Timestamps must be
    /// non-decreasing; a regression trips a debug assertion and otherwise
    /// degrades to a skipped window.
    pub fn update(&mut self, sample: &ConditionedSample) -> Option<StepEvent> {
        if let Some(last) = self.last_timestamp {
            debug_assert!(
                sample.timestamp >= last,
                "timestamp regressed: {} after {}",
                sample.timestamp,
                last
            );
        }
        self.last_timestamp = Some(sample.timestamp);

        if self.state.window_sample_count == 0 {
            self.state.window_start = WindowStart {
                timestamp: sample.timestamp,
                magnitude: sample.magnitude,
            };
        }

        if self.state.window_sample_count + 1 < self.config.window_size {
            self.state.window_sample_count += 1;
            return None;
        }

        // Window complete
        self.state.window_sample_count = 0;

        let slope = match window_slope(
            self.state.window_start,
            sample.timestamp,
            sample.magnitude,
            self.config.slope_scale,
        ) {
            Some(slope) => slope,
            None => {
                warn!(
                    "skipping degenerate window: start={} end={} magnitude={}",
                    self.state.window_start.timestamp, sample.timestamp, sample.magnitude
                );
                return None;
            }
        };

        self.classify(slope, sample)
    }

    fn classify(&mut self, slope: i64, sample: &ConditionedSample) -> Option<StepEvent> {
        let sign = Trend::from_slope(slope);
        let outcome = transition(self.state.trend, sign);

        debug!(
            "window at {}: slope={} {} -> {}",
            sample.timestamp,
            slope,
            self.state.trend.as_str(),
            outcome.next.as_str()
        );

        self.state.last_slope = Some(slope);
        self.state.trend = outcome.next;
        match outcome.flat_run {
            FlatRun::Reset => self.state.flat_run_count = 0,
            FlatRun::Increment => self.state.flat_run_count += 1,
            FlatRun::Keep => {}
        }

        if self.state.flat_run_count >= self.config.flat_limit {
            debug!(
                "{} flat windows while {}, falling back to flat",
                self.state.flat_run_count,
                self.state.trend.as_str()
            );
            self.state.trend = Trend::Flat;
            self.state.flat_run_count = 0;
            self.state.window_sample_count = 0;
        }

        if !outcome.step {
            return None;
        }

        self.state.step_count += 1;
        let event = StepEvent::new(sample.timestamp / self.config.timestamp_divisor, sample.raw);
        info!(
            "step {} detected at {}ms",
            self.state.step_count, event.timestamp_ms
        );
        Some(event)
    }

    /// Steps detected so far.
    pub fn step_count(&self) -> u64 {
        self.state.step_count
    }

    pub fn trend(&self) -> Trend {
        self.state.trend
    }

    pub fn state(&self) -> &DetectorState {
        &self.state
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Return to the initial trend and window state, keeping the step count.
    pub fn reset(&mut self) {
        let step_count = self.state.step_count;
        self.state = DetectorState {
            step_count,
            ..DetectorState::default()
        };
        self.last_timestamp = None;
    }

    /// Reset everything including the step count.
    pub fn reset_all(&mut self) {
        self.state = DetectorState::default();
        self.last_timestamp = None;
    }
}

impl Default for StepStateMachine {
    fn default() -> Self {
        Self {
            config: DetectorConfig::default(),
            state: DetectorState::default(),
            last_timestamp: None,
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
