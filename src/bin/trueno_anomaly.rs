//! trueno-anomaly - streaming z-score anomaly detector.
//!
//! Runs a synthetic seasonal stream through the sliding-window detector and
//! reports every flagged observation on stdout.
//!
//! Run: `trueno-anomaly --seed 42 --threshold 3`

use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use trueno_anomaly::prelude::*;

/// trueno-anomaly: sliding-window z-score anomaly detection
#[derive(Parser, Debug)]
#[command(name = "trueno-anomaly")]
#[command(author = "PAIML Team")]
#[command(version)]
#[command(about = "Flag outliers in a streaming signal", long_about = None)]
struct Cli {
    /// Config file path (defaults to <config_dir>/trueno-anomaly/config.yaml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of recent observations used as the baseline
    #[arg(short, long)]
    window_size: Option<usize>,

    /// Z-score threshold
    #[arg(short, long)]
    threshold: Option<f64>,

    /// Number of observations to generate
    #[arg(short, long)]
    length: Option<usize>,

    /// Period of the seasonal component, in steps
    #[arg(long)]
    period: Option<f64>,

    /// Probability of an injected spike per step
    #[arg(long)]
    anomaly_prob: Option<f64>,

    /// RNG seed for a reproducible stream
    #[arg(long)]
    seed: Option<u64>,

    /// Only print the summary line
    #[arg(short, long)]
    quiet: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    /// Loads the config file and applies CLI overrides on top.
    fn resolve_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)
                .with_context(|| format!("failed to load config {}", path.display()))?,
            None => Config::default_path()
                .map(Config::load_or_default)
                .unwrap_or_default(),
        };

        if let Some(window_size) = self.window_size {
            config.detection.window_size = window_size;
        }
        if let Some(threshold) = self.threshold {
            config.detection.threshold = threshold;
        }
        if let Some(length) = self.length {
            config.stream.length = length;
        }
        if let Some(period) = self.period {
            config.stream.period = period;
        }
        if let Some(anomaly_prob) = self.anomaly_prob {
            config.stream.anomaly_prob = anomaly_prob;
        }
        if self.seed.is_some() {
            config.stream.seed = self.seed;
        }

        config.validate().context("invalid configuration")?;
        Ok(config)
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = cli.resolve_config()?;
    let detection = config.detection()?;
    tracing::info!(
        window_size = detection.window_size(),
        threshold = detection.threshold(),
        length = config.stream.length,
        seed = ?config.stream.seed,
        "starting stream"
    );

    let mut stream = SyntheticStream::new(&config.stream)?;
    let mut monitor = StreamMonitor::new(detection);

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    let summary = if cli.quiet {
        monitor.run(stream.by_ref(), sink_fn(|_: &Observation| Ok(())))?
    } else {
        monitor
            .run(stream.by_ref(), AnomalyLog::new(&mut out))
            .context("writing report")?
    };

    writeln!(
        out,
        "{} observations, {} evaluated, {} anomalies flagged, {} spikes injected",
        summary.observations,
        summary.evaluated,
        summary.anomalies.len(),
        stream.injected_spikes().len()
    )?;
    out.flush()?;

    Ok(())
}
