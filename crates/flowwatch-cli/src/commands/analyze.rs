use flowwatch_core::EngineConfig;
use flowwatch_ml::{derive_features, AnomalyClassifier};
use flowwatch_signals::{recommend, AlertMapper, SignalComputer};
use serde_json::json;
use tracing::info;

use crate::cli::AnalyzeArgs;
use crate::error::CliError;

use super::signals::history_warnings;
use super::{load_scorer, model_path, read_bars, read_flows, CommandResult};

pub fn run(args: &AnalyzeArgs, config: &EngineConfig) -> Result<CommandResult, CliError> {
    let scorer = load_scorer(&model_path(args.model.as_deref()))?;
    let features = derive_features(&read_flows(&args.flows)?);
    let bars = read_bars(&args.bars)?;

    let batch = scorer.detect(&features)?;
    let anomalies = AnomalyClassifier::new(config.classifier).classify(&batch);

    let signals = SignalComputer::new(config.indicators).compute(&bars);
    let recommendation = recommend(&signals);
    let alerts =
        AlertMapper::new(config.alerts).generate(&signals, Some(anomalies.as_slice()));

    info!(
        anomalies = anomalies.len(),
        alerts = alerts.len(),
        tier = %recommendation.tier,
        "analysis complete"
    );

    let warnings = history_warnings(&signals, bars.len(), config);
    let data = json!({
        "anomalies": anomalies,
        "signals": signals,
        "recommendation": recommendation,
        "alerts": alerts,
    });
    Ok(CommandResult::ok(data).with_warnings(warnings))
}
