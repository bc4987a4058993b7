//! Stride Sense replay tool.
//!
//! Reads accelerometer records as CSV lines `timestamp_ns,x,y,z` from a file
//! or stdin, runs them through the step detector and prints one JSON line
//! per detected step.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use stride_sense::{AccelSample, EngineConfig, StepDetector};

/// Replay accelerometer CSV through the step detector
#[derive(Parser)]
#[command(name = "stride-sense")]
#[command(version)]
#[command(about = "Replay timestamp_ns,x,y,z accelerometer CSV and print detected steps as JSON")]
struct Args {
    /// Engine config as JSON; missing fields take defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Input CSV file (stdin when omitted)
    input: Option<PathBuf>,
}

/// Parse one CSV record. Returns None for blank lines and `#` comments.
fn parse_line(line: &str) -> Result<Option<AccelSample>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    if fields.len() != 4 {
        bail!("expected 4 fields, found {}", fields.len());
    }

    let timestamp = fields[0]
        .parse::<u64>()
        .with_context(|| format!("bad timestamp {:?}", fields[0]))?;
    let mut values = [0.0f32; 3];
    for (value, field) in values.iter_mut().zip(&fields[1..]) {
        *value = field
            .parse::<f32>()
            .with_context(|| format!("bad axis value {:?}", field))?;
    }
    Ok(Some(AccelSample::new(timestamp, values)))
}

/// Feed every record from `reader` through `detector`, writing one JSON
/// line per step to `out`. Returns the number of samples processed.
///
/// Records whose timestamp goes backwards are dropped with a warning.
fn replay(reader: impl BufRead, mut out: impl Write, detector: &mut StepDetector) -> Result<u64> {
    let mut samples = 0u64;
    let mut last_timestamp = 0u64;

    for (index, line) in reader.lines().enumerate() {
        let line_no = index + 1;
        let line = line.with_context(|| format!("Failed to read line {}", line_no))?;
        let Some(sample) = parse_line(&line).with_context(|| format!("line {}", line_no))? else {
            continue;
        };
        if sample.timestamp < last_timestamp {
            log::warn!(
                "line {}: timestamp {} precedes {}, dropping",
                line_no,
                sample.timestamp,
                last_timestamp
            );
            continue;
        }
        last_timestamp = sample.timestamp;
        samples += 1;

        if let Some(step) = detector.process_sample(&sample)? {
            writeln!(out, "{}", serde_json::to_string(&step)?)?;
        }
    }

    Ok(samples)
}

fn main() -> Result<()> {
    // RUST_LOG overrides the Info default
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => EngineConfig::default(),
    };
    let mut detector = StepDetector::new(config)?;

    let reader: Box<dyn BufRead> = match &args.input {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("Failed to open {}", path.display()))?,
        )),
        None => Box::new(BufReader::new(io::stdin())),
    };

    let stdout = io::stdout();
    let samples = replay(reader, stdout.lock(), &mut detector)?;

    log::info!(
        "processed {} samples, detected {} steps",
        samples,
        detector.step_count()
    );
    Ok(())
}
