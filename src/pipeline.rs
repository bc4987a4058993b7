/// Complete step detection pipeline.
///
/// This module wires the stages together for each raw accelerometer reading:
/// 1. **Conditioning**: buffering filter, then smoothing filter
/// 2. **Magnitude**: collapse the smoothed vector to a scalar
/// 3. **State Machine**: windowed slope classification and reversal detection
/// 4. **Notification**: synchronous delivery to registered listeners
///
/// The state machine is fully updated before any listener runs, so a failing
/// listener never leaves the detector inconsistent.

use std::rc::Rc;

use crate::config::{DetectorConfig, EngineConfig};
use crate::error::Result;
use crate::listeners::{ListenerId, ListenerRegistry, StepListener};
use crate::signal::SignalConditioner;
use crate::step_detection::StepStateMachine;
use crate::types::{AccelSample, StepEvent, Trend};

/// Step detector fed with raw accelerometer samples.
pub struct StepDetector {
    conditioner: SignalConditioner,
    machine: StepStateMachine,
    listeners: ListenerRegistry,
}

impl StepDetector {
    /// Creates a detector with the given configuration.
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            conditioner: SignalConditioner::new(&config.conditioner),
            machine: StepStateMachine::new(config.detector)?,
            listeners: ListenerRegistry::new(),
        })
    }

    /// Creates a detector around a custom conditioner.
    pub fn with_conditioner(config: DetectorConfig, conditioner: SignalConditioner) -> Result<Self> {
        Ok(Self {
            conditioner,
            machine: StepStateMachine::new(config)?,
            listeners: ListenerRegistry::new(),
        })
    }

    /// Processes a single raw sample through the entire pipeline.
    ///
    /// Returns the step event if this sample completed a step. Listener
    /// failures are returned as errors after the detector state has been
    /// updated.
    pub fn process_sample(&mut self, sample: &AccelSample) -> Result<Option<StepEvent>> {
        let conditioned = self.conditioner.condition(sample);

        let Some(event) = self.machine.update(&conditioned) else {
            return Ok(None);
        };

        self.listeners.notify(&event, self.machine.step_count())?;
        Ok(Some(event))
    }

    /// Processes a batch of samples and returns all detected steps.
    pub fn process_batch(&mut self, samples: &[AccelSample]) -> Result<Vec<StepEvent>> {
        let mut steps = Vec::new();
        for sample in samples {
            if let Some(step) = self.process_sample(sample)? {
                steps.push(step);
            }
        }
        Ok(steps)
    }

    pub fn register_listener(&self, listener: Rc<dyn StepListener>) -> ListenerId {
        self.listeners.register(listener)
    }

    pub fn unregister_listener(&self, id: ListenerId) -> bool {
        self.listeners.unregister(id)
    }

    pub fn unregister_all_listeners(&self) {
        self.listeners.unregister_all()
    }

    /// Handle to the listener registry, e.g. for listeners that manage
    /// their own subscription.
    pub fn listeners(&self) -> ListenerRegistry {
        self.listeners.clone()
    }

    pub fn step_count(&self) -> u64 {
        self.machine.step_count()
    }

    pub fn trend(&self) -> Trend {
        self.machine.trend()
    }

    pub fn state_machine(&self) -> &StepStateMachine {
        &self.machine
    }

    /// Resets filters and the state machine, keeping the step count and
    /// listeners.
    pub fn reset(&mut self) {
        self.conditioner.reset();
        self.machine.reset();
    }

    /// Resets everything except listener registrations.
    pub fn reset_all(&mut self) {
        self.conditioner.reset();
        self.machine.reset_all();
    }
}

impl Default for StepDetector {
    fn default() -> Self {
        Self {
            conditioner: SignalConditioner::default(),
            machine: StepStateMachine::default(),
            listeners: ListenerRegistry::new(),
        }
    }
}
