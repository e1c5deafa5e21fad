use flowwatch_core::{EngineConfig, TechnicalSignalBundle};
use flowwatch_signals::{recommend, SignalComputer};
use serde_json::json;

use crate::cli::BarsArgs;
use crate::error::CliError;

use super::{read_bars, CommandResult};

pub fn run_signals(args: &BarsArgs, config: &EngineConfig) -> Result<CommandResult, CliError> {
    let (signals, warnings) = compute(args, config)?;
    Ok(CommandResult::ok(serde_json::to_value(&signals)?).with_warnings(warnings))
}

pub fn run_recommend(args: &BarsArgs, config: &EngineConfig) -> Result<CommandResult, CliError> {
    let (signals, warnings) = compute(args, config)?;
    let recommendation = recommend(&signals);

    let data = json!({
        "recommendation": recommendation,
        "signals": signals,
    });
    Ok(CommandResult::ok(data).with_warnings(warnings))
}

fn compute(
    args: &BarsArgs,
    config: &EngineConfig,
) -> Result<(TechnicalSignalBundle, Vec<String>), CliError> {
    let bars = read_bars(&args.bars)?;
    let signals = SignalComputer::new(config.indicators).compute(&bars);
    let warnings = history_warnings(&signals, bars.len(), config);
    Ok((signals, warnings))
}

pub(super) fn history_warnings(
    signals: &TechnicalSignalBundle,
    bars: usize,
    config: &EngineConfig,
) -> Vec<String> {
    if signals.insufficient_history {
        vec![format!(
            "fewer than {} price bars; indicators are neutral defaults",
            config.indicators.rsi_period
        )]
    } else if bars < config.indicators.ma_period {
        vec![format!(
            "fewer than {} price bars; moving-average signal reads as bearish",
            config.indicators.ma_period
        )]
    } else {
        Vec::new()
    }
}
