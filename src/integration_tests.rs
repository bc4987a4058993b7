/// Integration tests for the complete step detection pipeline
/// Tests realistic gait scenarios to validate end-to-end behavior from raw
/// accelerometer samples through conditioning, classification and listener
/// notification.

#[cfg(test)]
mod integration_tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use crate::error::ListenerError;
    use crate::listeners::{StepListener, StepLog};
    use crate::pipeline::*;
    use crate::types::*;

    const NS_PER_MS: u64 = 1_000_000;

    /// Helper: Create a sample from a millisecond timestamp
    fn sample_at(timestamp_ms: u64, values: [f32; 3]) -> AccelSample {
        AccelSample::new(timestamp_ms * NS_PER_MS, values)
    }

    /// Helper: Phone lying still, gravity on Z
    fn still_profile(start_ms: u64, duration_ms: u64, sample_rate_hz: u32) -> Vec<AccelSample> {
        let interval_ms = 1000 / sample_rate_hz as u64;
        let num_samples = (duration_ms / interval_ms) as usize;

        (0..num_samples)
            .map(|i| sample_at(start_ms + i as u64 * interval_ms, [0.0, 0.0, 9.81]))
            .collect()
    }

    /// Helper: Walking gait as a vertical sinusoid riding on gravity
    fn walking_profile(
        start_ms: u64,
        duration_ms: u64,
        sample_rate_hz: u32,
        cadence_hz: f32,
        amplitude: f32,
    ) -> Vec<AccelSample> {
        let interval_ms = 1000 / sample_rate_hz as u64;
        let num_samples = (duration_ms / interval_ms) as usize;

        (0..num_samples)
            .map(|i| {
                let t = (i as u64 * interval_ms) as f32 / 1000.0;
                let bounce = amplitude * (std::f32::consts::TAU * cadence_hz * t).sin();
                sample_at(
                    start_ms + i as u64 * interval_ms,
                    [0.3, 0.2, 9.81 + bounce],
                )
            })
            .collect()
    }

    /// Helper: Device at rest with sensor jitter well below step amplitude
    fn jitter_profile(start_ms: u64, duration_ms: u64, sample_rate_hz: u32) -> Vec<AccelSample> {
        let interval_ms = 1000 / sample_rate_hz as u64;
        let num_samples = (duration_ms / interval_ms) as usize;

        (0..num_samples)
            .map(|i| {
                let jitter = [0.004, -0.006, 0.002, 0.0, -0.003][i % 5];
                sample_at(
                    start_ms + i as u64 * interval_ms,
                    [jitter, -jitter, 9.81 + jitter],
                )
            })
            .collect()
    }

    /// Helper: Run detector on a profile and collect all steps
    fn run_detector_on_profile(detector: &mut StepDetector, samples: &[AccelSample]) -> Vec<StepEvent> {
        detector
            .process_batch(samples)
            .expect("no listener should fail")
    }

    #[test]
    fn test_still_phone_detects_nothing() {
        let mut detector = StepDetector::default();

        let steps = run_detector_on_profile(&mut detector, &still_profile(0, 10_000, 50));

        assert!(steps.is_empty(), "Still phone must not produce steps");
        assert_eq!(detector.trend(), Trend::Flat);
    }

    #[test]
    fn test_sensor_jitter_detects_nothing() {
        let mut detector = StepDetector::default();

        let steps = run_detector_on_profile(&mut detector, &jitter_profile(0, 10_000, 50));

        // Jitter slopes truncate to zero
        assert!(steps.is_empty(), "Jitter produced {} steps", steps.len());
    }

    #[test]
    fn test_walking_one_step_per_cycle() {
        let mut detector = StepDetector::default();

        // 10 seconds at 1 Hz
        let steps = run_detector_on_profile(
            &mut detector,
            &walking_profile(0, 10_000, 50, 1.0, 2.0),
        );

        assert!(
            (9..=11).contains(&steps.len()),
            "Expected ~10 steps, got {}",
            steps.len()
        );
        assert_eq!(detector.step_count(), steps.len() as u64);
    }

    #[test]
    fn test_slow_walk() {
        let mut detector = StepDetector::default();

        // 20 seconds at 0.5 Hz
        let steps = run_detector_on_profile(
            &mut detector,
            &walking_profile(0, 20_000, 50, 0.5, 1.5),
        );

        assert!(
            (9..=11).contains(&steps.len()),
            "Expected ~10 steps, got {}",
            steps.len()
        );
    }

    #[test]
    fn test_step_timestamps_are_ordered_and_spaced() {
        let mut detector = StepDetector::default();

        let steps = run_detector_on_profile(
            &mut detector,
            &walking_profile(5_000, 10_000, 50, 1.0, 2.0),
        );

        assert!(steps.len() >= 2);
        for pair in steps.windows(2) {
            let gap = pair[1].timestamp_ms - pair[0].timestamp_ms;
            // One step per second, quantised to 300ms windows
            assert!(
                (600..=1500).contains(&gap),
                "Step gap {}ms outside gait range",
                gap
            );
        }
        assert!(steps[0].timestamp_ms >= 5_000);
    }

    #[test]
    fn test_walk_stop_walk() {
        let mut detector = StepDetector::default();

        let first_walk = walking_profile(0, 5_000, 50, 1.0, 2.0);
        let pause = still_profile(5_000, 5_000, 50);
        let second_walk = walking_profile(10_000, 5_000, 50, 1.0, 2.0);

        let mut steps = run_detector_on_profile(&mut detector, &first_walk);

        // Let the window straddling the stop drain
        steps.extend(run_detector_on_profile(&mut detector, &pause[..50]));
        let count_after_stop = detector.step_count();
        steps.extend(run_detector_on_profile(&mut detector, &pause[50..]));

        assert_eq!(
            detector.step_count(),
            count_after_stop,
            "A pause must not produce steps"
        );
        assert_eq!(
            detector.trend(),
            Trend::Flat,
            "A long pause must fall back to flat"
        );

        steps.extend(run_detector_on_profile(&mut detector, &second_walk));

        assert!(
            (7..=11).contains(&steps.len()),
            "Expected ~10 steps over two walks, got {}",
            steps.len()
        );
    }

    /// Records the order of callbacks across listeners.
    struct Journal {
        name: &'static str,
        entries: Rc<RefCell<Vec<String>>>,
    }

    impl StepListener for Journal {
        fn on_step_detected(&self, event: &StepEvent) -> Result<(), ListenerError> {
            self.entries
                .borrow_mut()
                .push(format!("{} step@{}", self.name, event.timestamp_ms));
            Ok(())
        }

        fn on_step_count_updated(&self, step_count: u64) -> Result<(), ListenerError> {
            self.entries
                .borrow_mut()
                .push(format!("{} count={}", self.name, step_count));
            Ok(())
        }
    }

    #[test]
    fn test_listener_fidelity() {
        let mut detector = StepDetector::default();
        let entries = Rc::new(RefCell::new(Vec::new()));

        let l1 = detector.register_listener(Rc::new(Journal {
            name: "L1",
            entries: Rc::clone(&entries),
        }));
        detector.register_listener(Rc::new(Journal {
            name: "L2",
            entries: Rc::clone(&entries),
        }));
        detector.unregister_listener(l1);

        let steps = run_detector_on_profile(
            &mut detector,
            &walking_profile(0, 3_000, 50, 1.0, 2.0),
        );
        assert!(!steps.is_empty());

        let expected: Vec<String> = steps
            .iter()
            .enumerate()
            .flat_map(|(i, step)| {
                vec![
                    format!("L2 step@{}", step.timestamp_ms),
                    format!("L2 count={}", i + 1),
                ]
            })
            .collect();
        assert_eq!(*entries.borrow(), expected);
    }

    #[test]
    fn test_reset_replay_matches() {
        let mut detector = StepDetector::default();
        let log = Rc::new(StepLog::new());
        detector.register_listener(log.clone());
        let walk = walking_profile(0, 6_000, 50, 1.0, 2.0);

        let first = run_detector_on_profile(&mut detector, &walk);
        detector.reset();
        let second = run_detector_on_profile(&mut detector, &walk);

        assert_eq!(first, second);
        assert_eq!(detector.step_count(), 2 * first.len() as u64);
        assert_eq!(log.events().len(), 2 * first.len());
        assert_eq!(log.last_count(), detector.step_count());
    }

    #[test]
    fn test_orientation_does_not_matter() {
        // Same gait with gravity on X instead of Z
        let walk_z = walking_profile(0, 10_000, 50, 1.0, 2.0);
        let walk_x: Vec<AccelSample> = walk_z
            .iter()
            .map(|s| AccelSample::new(s.timestamp, [s.values[2], s.values[1], s.values[0]]))
            .collect();

        let steps_z = run_detector_on_profile(&mut StepDetector::default(), &walk_z);
        let steps_x = run_detector_on_profile(&mut StepDetector::default(), &walk_x);

        assert_eq!(steps_z.len(), steps_x.len());
    }
}
