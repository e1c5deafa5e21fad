mod analyze;
mod detect;
mod signals;
mod simulate;
mod train;

use std::fs;
use std::path::{Path, PathBuf};

use flowwatch_core::{default_model_path, EngineConfig, PriceBar, TradingFlowRecord};
use flowwatch_ml::OutlierScorer;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use crate::cli::{Cli, Command};
use crate::error::CliError;
use crate::output::{Envelope, EnvelopeMeta};

pub struct CommandResult {
    pub data: Value,
    pub warnings: Vec<String>,
}

impl CommandResult {
    pub fn ok(data: Value) -> Self {
        Self {
            data,
            warnings: Vec::new(),
        }
    }

    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }

    pub fn with_warnings(mut self, warnings: Vec<String>) -> Self {
        self.warnings.extend(warnings);
        self
    }
}

pub fn run(cli: &Cli) -> Result<Envelope<Value>, CliError> {
    let config = load_config(cli.config.as_deref())?;

    let CommandResult { data, warnings } = match &cli.command {
        Command::Simulate(args) => simulate::run(args)?,
        Command::Train(args) => train::run(args, &config)?,
        Command::Detect(args) => detect::run(args, &config)?,
        Command::Signals(args) => signals::run_signals(args, &config)?,
        Command::Recommend(args) => signals::run_recommend(args, &config)?,
        Command::Analyze(args) => analyze::run(args, &config)?,
    };

    let mut meta = EnvelopeMeta::new(Uuid::new_v4().to_string());
    for warning in warnings {
        meta.push_warning(warning);
    }

    Ok(Envelope { meta, data })
}

fn load_config(path: Option<&Path>) -> Result<EngineConfig, CliError> {
    match path {
        Some(path) => {
            let config = EngineConfig::load(path)?;
            debug!(path = %path.display(), "loaded engine config");
            Ok(config)
        }
        None => Ok(EngineConfig::default()),
    }
}

fn model_path(explicit: Option<&Path>) -> PathBuf {
    explicit.map_or_else(default_model_path, Path::to_path_buf)
}

/// A missing artifact means nothing has been trained yet.
fn load_scorer(path: &Path) -> Result<OutlierScorer, CliError> {
    if !path.exists() {
        return Err(CliError::NotTrained);
    }
    Ok(OutlierScorer::load(path)?)
}

pub(crate) fn read_flows(path: &Path) -> Result<Vec<TradingFlowRecord>, CliError> {
    let records: Vec<TradingFlowRecord> = read_table(path, "flows")?;
    for record in &records {
        record.validate()?;
    }
    Ok(records)
}

pub(crate) fn read_bars(path: &Path) -> Result<Vec<PriceBar>, CliError> {
    let bars: Vec<PriceBar> = read_table(path, "bars")?;
    for bar in &bars {
        bar.validate()?;
    }
    Ok(bars)
}

/// Reads a JSON array of rows. The array may also sit under `key`, either at
/// the top level or inside an envelope's `data`, so `simulate` output can be
/// fed straight back in.
fn read_table<T: DeserializeOwned>(path: &Path, key: &str) -> Result<Vec<T>, CliError> {
    let raw = fs::read_to_string(path)?;
    let value: Value = serde_json::from_str(&raw)?;
    let rows = extract_rows(value, key).ok_or_else(|| {
        CliError::Command(format!(
            "{} does not contain a JSON array or a '{key}' array",
            path.display()
        ))
    })?;
    Ok(serde_json::from_value(rows)?)
}

fn extract_rows(value: Value, key: &str) -> Option<Value> {
    match value {
        Value::Array(_) => Some(value),
        Value::Object(mut object) => match object.remove(key) {
            Some(rows @ Value::Array(_)) => Some(rows),
            _ => object.remove("data").and_then(|data| extract_rows(data, key)),
        },
        _ => None,
    }
}
