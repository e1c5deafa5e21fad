//! CLI argument definitions for flowwatch.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `simulate` | Generate synthetic flow records and price bars |
//! | `train` | Train the outlier scorer and save the model artifact |
//! | `detect` | Score and classify a flow table against a saved model |
//! | `signals` | Compute technical signals from price bars |
//! | `recommend` | Score a recommendation from price bars |
//! | `analyze` | Anomalies, signals, recommendation and alerts in one pass |
//!
//! # Examples
//!
//! ```bash
//! flowwatch simulate --days 365 --bars 60 > sample.json
//! flowwatch train --input sample.json
//! flowwatch analyze --flows sample.json --bars sample.json --pretty
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Trading-flow anomaly detection and technical signal scoring.
#[derive(Debug, Parser)]
#[command(
    name = "flowwatch",
    author,
    version,
    about = "Trading-flow anomaly detection and technical recommendations"
)]
pub struct Cli {
    /// Output format for results.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Treat warnings as failures (exit code 5).
    #[arg(long, global = true, default_value_t = false)]
    pub strict: bool,

    /// JSON engine configuration; defaults apply to any missing key.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Single JSON object output.
    Json,
    /// Human-readable summary followed by the data payload.
    Table,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate seeded synthetic flow records (and optionally price bars).
    Simulate(SimulateArgs),

    /// Train the outlier scorer on one or more flow tables.
    ///
    ///   flowwatch train --input bbca.json --input bbri.json
    ///   flowwatch train --simulate 365
    Train(TrainArgs),

    /// Score and classify a flow table with a trained model.
    Detect(DetectArgs),

    /// Compute RSI, moving-average and volume signals.
    Signals(BarsArgs),

    /// Score a BUY/HOLD/SELL recommendation from price bars.
    Recommend(BarsArgs),

    /// Run anomaly detection and signal scoring together and emit alerts.
    Analyze(AnalyzeArgs),
}

#[derive(Debug, Args)]
pub struct SimulateArgs {
    /// Number of daily flow records to generate.
    #[arg(long, default_value_t = 365)]
    pub days: usize,

    /// First trading date (YYYY-MM-DD).
    #[arg(long, default_value = "2024-01-01")]
    pub start: String,

    /// Random seed; the same seed reproduces the same data.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Probability that a day carries an injected flow pattern.
    #[arg(long)]
    pub anomaly_rate: Option<f64>,

    /// Also generate this many price bars.
    #[arg(long, default_value_t = 0)]
    pub bars: usize,

    /// Opening price of the generated bar series.
    #[arg(long, default_value_t = 5_000.0)]
    pub start_price: f64,
}

#[derive(Debug, Args)]
pub struct TrainArgs {
    /// Flow table files (JSON); each one is a separate dataset.
    #[arg(long = "input")]
    pub inputs: Vec<PathBuf>,

    /// Add a simulated dataset of this many days per seed.
    #[arg(long)]
    pub simulate: Option<usize>,

    /// Seeds for simulated datasets.
    #[arg(long = "seed", default_values_t = [42u64])]
    pub seeds: Vec<u64>,

    /// Model artifact path; defaults to `$FLOWWATCH_HOME/models/anomaly_detector.json`.
    #[arg(long)]
    pub model: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct DetectArgs {
    /// Flow table file (JSON).
    #[arg(long)]
    pub input: PathBuf,

    #[arg(long)]
    pub model: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct BarsArgs {
    /// Price bar file (JSON), oldest bar first.
    #[arg(long)]
    pub bars: PathBuf,
}

#[derive(Debug, Args)]
pub struct AnalyzeArgs {
    #[arg(long)]
    pub flows: PathBuf,

    #[arg(long)]
    pub bars: PathBuf,

    #[arg(long)]
    pub model: Option<PathBuf>,
}
