/// Listener example: subscribe to step events and running counts
use std::cell::Cell;
use std::rc::Rc;

use stride_sense::{
    AccelSample, EngineConfig, ListenerError, StepDetector, StepEvent, StepListener, StepLog,
};

/// Prints a progress line every `every` steps.
struct Milestones {
    every: u64,
    reached: Cell<u64>,
}

impl StepListener for Milestones {
    fn on_step_detected(&self, _event: &StepEvent) -> Result<(), ListenerError> {
        Ok(())
    }

    fn on_step_count_updated(&self, step_count: u64) -> Result<(), ListenerError> {
        if step_count % self.every == 0 {
            self.reached.set(step_count);
            println!("  milestone: {} steps", step_count);
        }
        Ok(())
    }
}

fn main() -> anyhow::Result<()> {
    println!("=== Stride Sense: Listener Example ===\n");

    let config = EngineConfig::from_json_str(
        r#"{ "detector": { "window_size": 15, "flat_limit": 10 },
             "conditioner": { "buffer_len": 3, "smoothing_alpha": 0.8 } }"#,
    )?;
    let mut detector = StepDetector::new(config)?;

    let log = Rc::new(StepLog::new());
    let milestones = Rc::new(Milestones {
        every: 10,
        reached: Cell::new(0),
    });
    detector.register_listener(log.clone());
    let milestone_id = detector.register_listener(milestones.clone());

    // 30 seconds of walking at 1.2 Hz, sampled at 50Hz
    for i in 0..1500u64 {
        let t = i as f32 * 0.02;
        let z = 9.81 + 1.8 * (std::f32::consts::TAU * 1.2 * t).sin();
        detector.process_sample(&AccelSample::new(i * 20_000_000, [0.1, 0.3, z]))?;

        // Stop hearing milestones halfway through
        if i == 750 {
            detector.unregister_listener(milestone_id);
            println!("  (milestone listener unregistered)");
        }
    }

    println!("\n=== Summary ===");
    println!("Steps recorded by log: {}", log.events().len());
    println!("Last count seen by log: {}", log.last_count());
    println!("Last milestone: {}", milestones.reached.get());
    Ok(())
}
