/// Basic usage example: Feed accelerometer samples, get step events
use stride_sense::{AccelSample, StepDetector};

fn main() {
    println!("=== Stride Sense: Basic Example ===\n");

    // Default config: 15-sample windows, tuned for ~50Hz nanosecond clocks
    let mut detector = StepDetector::default();

    // Simulate a stream: 4 seconds still, 6 seconds walking at ~1 step/s,
    // 4 seconds still again
    let interval_ns: u64 = 20_000_000;
    let mut samples = Vec::new();
    for i in 0..700u64 {
        let t = i as f32 * 0.02;
        let z = if (200..500).contains(&i) {
            9.81 + 2.0 * (std::f32::consts::TAU * (t - 4.0)).sin()
        } else {
            9.81
        };
        samples.push(AccelSample::new(i * interval_ns, [0.2, 0.1, z]));
    }

    println!("Processing {} samples...\n", samples.len());

    for sample in &samples {
        match detector.process_sample(sample) {
            Ok(Some(step)) => println!(
                "Step {:>2} at {:>5}ms  raw=[{:.2}, {:.2}, {:.2}]",
                detector.step_count(),
                step.timestamp_ms,
                step.values[0],
                step.values[1],
                step.values[2]
            ),
            Ok(None) => {}
            Err(err) => {
                eprintln!("listener failed: {}", err);
                break;
            }
        }
    }

    println!("\n=== Summary ===");
    println!("Total steps: {}", detector.step_count());
    println!("Final trend: {:?}", detector.trend());
}
