//! Signal conditioning ahead of the step detector.
//!
//! This module turns raw accelerometer vectors into the scalar magnitude
//! the state machine consumes:
//! - A buffering low-pass filter averaging the last few vectors
//! - A secondary exponential smoothing stage
//! - Euclidean magnitude of the smoothed vector
//!
//! Design note: All filters use incremental updates with storage allocated
//! once at construction. No allocations in the hot path.
//!
//! The conditioner is replaceable. Anything implementing [`Filter`] can be
//! slotted into either stage.

use crate::config::ConditionerConfig;
use crate::types::{AccelSample, ConditionedSample};

/// A per-sample vector filter.
pub trait Filter {
    /// Feed one vector and return the filtered output.
    fn apply(&mut self, values: [f64; 3]) -> [f64; 3];

    /// Drop all history.
    fn reset(&mut self);
}

/// Euclidean norm of a 3-axis vector.
pub fn magnitude(values: [f64; 3]) -> f64 {
    let x2 = values[0] * values[0];
    let y2 = values[1] * values[1];
    let z2 = values[2] * values[2];
    (x2 + y2 + z2).sqrt()
}

/// Windowed averaging filter over the last `len` vectors.
///
/// Until the buffer has filled, the mean is taken over the samples seen so
/// far, so the first output equals the first input.
#[derive(Debug, Clone)]
pub struct MovingAverageFilter {
    buffer: Vec<[f64; 3]>,
    len: usize,
    next: usize,
    filled: usize,
}

impl MovingAverageFilter {
    /// Create a filter averaging `len` vectors. `len` is clamped to 1.
    pub fn new(len: usize) -> Self {
        let len = len.max(1);
        Self {
            buffer: vec![[0.0; 3]; len],
            len,
            next: 0,
            filled: 0,
        }
    }

    /// Number of vectors currently held.
    pub fn filled(&self) -> usize {
        self.filled
    }
}

impl Filter for MovingAverageFilter {
    fn apply(&mut self, values: [f64; 3]) -> [f64; 3] {
        self.buffer[self.next] = values;
        self.next = (self.next + 1) % self.len;
        self.filled = (self.filled + 1).min(self.len);

        let mut sum = [0.0; 3];
        for v in &self.buffer[..self.filled] {
            sum[0] += v[0];
            sum[1] += v[1];
            sum[2] += v[2];
        }
        let n = self.filled as f64;
        [sum[0] / n, sum[1] / n, sum[2] / n]
    }

    fn reset(&mut self) {
        self.buffer.fill([0.0; 3]);
        self.next = 0;
        self.filled = 0;
    }
}

/// Exponential smoother: y = α*x + (1-α)*y_prev, seeded by the first input.
#[derive(Debug, Clone)]
pub struct ExponentialSmoother {
    alpha: f64,
    state: Option<[f64; 3]>,
}

impl ExponentialSmoother {
    pub fn new(alpha: f64) -> Self {
        Self { alpha, state: None }
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }
}

impl Filter for ExponentialSmoother {
    fn apply(&mut self, values: [f64; 3]) -> [f64; 3] {
        let alpha = self.alpha;
        let next = match self.state {
            None => values,
            Some(prev) => [
                alpha * values[0] + (1.0 - alpha) * prev[0],
                alpha * values[1] + (1.0 - alpha) * prev[1],
                alpha * values[2] + (1.0 - alpha) * prev[2],
            ],
        };
        self.state = Some(next);
        next
    }

    fn reset(&mut self) {
        self.state = None;
    }
}

/// Buffering filter, then smoothing filter, then magnitude.
pub struct SignalConditioner {
    buffering: Box<dyn Filter>,
    smoothing: Box<dyn Filter>,
}

impl SignalConditioner {
    /// Create the default conditioner described by `config`.
    pub fn new(config: &ConditionerConfig) -> Self {
        Self::with_filters(
            Box::new(MovingAverageFilter::new(config.buffer_len)),
            Box::new(ExponentialSmoother::new(config.smoothing_alpha)),
        )
    }

    /// Create a conditioner from custom filter stages.
    pub fn with_filters(buffering: Box<dyn Filter>, smoothing: Box<dyn Filter>) -> Self {
        Self {
            buffering,
            smoothing,
        }
    }

    /// Condition one raw reading.
    pub fn condition(&mut self, sample: &AccelSample) -> ConditionedSample {
        let buffered = self.buffering.apply(sample.values_f64());
        let smoothed = self.smoothing.apply(buffered);
        ConditionedSample::new(sample.timestamp, magnitude(smoothed), sample.values)
    }

    pub fn reset(&mut self) {
        self.buffering.reset();
        self.smoothing.reset();
    }
}

impl Default for SignalConditioner {
    fn default() -> Self {
        Self::new(&ConditionerConfig::default())
    }
}
