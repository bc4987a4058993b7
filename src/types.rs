//! Core data types for the step detection engine.
//!
//! This module defines the values that flow through the detector: raw
//! accelerometer readings, the conditioned scalar samples derived from
//! them, the classified trend of the signal and the step events handed
//! to listeners.
//!
//! Design principle: if a concept exists, it gets a type. Raw tuples do not
//! cross module boundaries.

use serde::{Deserialize, Serialize};

/// A single raw accelerometer reading.
///
/// This is the minimal input contract: a three-axis acceleration vector and
/// a monotonic timestamp in sensor-clock units (nanoseconds on most mobile
/// platforms). The vector is never interpreted here, only preserved.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AccelSample {
    /// Monotonic sensor timestamp. Required for temporal ordering.
    pub timestamp: u64,

    /// Accelerometer reading [x, y, z] in m/s².
    pub values: [f32; 3],
}

impl AccelSample {
    /// Creates a new accelerometer sample.
    ///
    /// Assumptions:
    /// - timestamp must be non-decreasing within a stream
    pub fn new(timestamp: u64, values: [f32; 3]) -> Self {
        Self { timestamp, values }
    }

    /// Widen the reading to f64 for filtering.
    pub fn values_f64(&self) -> [f64; 3] {
        [
            self.values[0] as f64,
            self.values[1] as f64,
            self.values[2] as f64,
        ]
    }
}

/// A filtered scalar magnitude derived from one raw reading.
///
/// Produced once per incoming sample by the signal conditioner and consumed
/// by the state machine. The raw vector rides along unmodified so a step
/// event can report what the sensor actually saw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConditionedSample {
    /// Timestamp of the raw reading this sample was derived from.
    pub timestamp: u64,
    /// Acceleration magnitude after buffering and smoothing.
    pub magnitude: f64,
    /// Untouched raw vector for the event payload.
    pub raw: [f32; 3],
}

impl ConditionedSample {
    pub fn new(timestamp: u64, magnitude: f64, raw: [f32; 3]) -> Self {
        Self {
            timestamp,
            magnitude,
            raw,
        }
    }
}

// ============================================================================
// TREND CLASSIFICATION
// ============================================================================

/// Classified direction of the magnitude signal over one window.
///
/// The same enumeration is used for the machine's current trend and for the
/// sign of a freshly computed slope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Trend {
    /// No usable direction. Initial state, and the fallback after a
    /// sustained run of zero-slope windows.
    #[default]
    Flat,
    /// Magnitude increased across the window.
    Rising,
    /// Magnitude decreased across the window.
    Falling,
}

impl Trend {
    /// Classify an integer slope by its sign.
    pub fn from_slope(slope: i64) -> Self {
        match slope.signum() {
            1 => Trend::Rising,
            -1 => Trend::Falling,
            _ => Trend::Flat,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Trend::Flat => "flat",
            Trend::Rising => "rising",
            Trend::Falling => "falling",
        }
    }
}

// ============================================================================
// STEP EVENTS
// ============================================================================

/// A detected step.
///
/// Transient notification payload: the detector never stores it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepEvent {
    /// Detection time in milliseconds (sensor clock divided by the
    /// configured timestamp divisor).
    pub timestamp_ms: u64,
    /// Raw accelerometer vector observed at detection.
    pub values: [f32; 3],
}

impl StepEvent {
    pub fn new(timestamp_ms: u64, values: [f32; 3]) -> Self {
        Self {
            timestamp_ms,
            values,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trend_from_slope() {
        assert_eq!(Trend::from_slope(5), Trend::Rising);
        assert_eq!(Trend::from_slope(-3), Trend::Falling);
        assert_eq!(Trend::from_slope(0), Trend::Flat);
        assert_eq!(Trend::from_slope(i64::MIN), Trend::Falling);
    }

    #[test]
    fn test_trend_default_is_flat() {
        assert_eq!(Trend::default(), Trend::Flat);
        assert_eq!(Trend::Rising.as_str(), "rising");
    }

    #[test]
    fn test_accel_sample_widening() {
        let sample = AccelSample::new(10, [1.5, -2.0, 9.75]);
        assert_eq!(sample.values_f64(), [1.5, -2.0, 9.75]);
    }

    #[test]
    fn test_step_event_serializes() {
        let event = StepEvent::new(1234, [0.0, 1.0, 9.5]);
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(json, r#"{"timestamp_ms":1234,"values":[0.0,1.0,9.5]}"#);
    }
}
