use flowwatch_core::{EngineConfig, TradeDate};
use flowwatch_ml::{derive_features, FeatureTable, FlowSimulator, OutlierScorer, TrainOutcome};
use serde_json::json;
use tracing::info;

use crate::cli::TrainArgs;
use crate::error::CliError;

use super::{model_path, read_flows, CommandResult};

const SIMULATION_START: &str = "2024-01-01";

pub fn run(args: &TrainArgs, config: &EngineConfig) -> Result<CommandResult, CliError> {
    let mut datasets: Vec<FeatureTable> = Vec::new();
    for path in &args.inputs {
        let records = read_flows(path)?;
        info!(path = %path.display(), rows = records.len(), "loaded training dataset");
        datasets.push(derive_features(&records));
    }

    if let Some(days) = args.simulate {
        let start = TradeDate::parse(SIMULATION_START)?;
        for &seed in &args.seeds {
            datasets.push(derive_features(
                &FlowSimulator::new(seed).daily_flows(start, days),
            ));
        }
    }

    let path = model_path(args.model.as_deref());
    let mut scorer = OutlierScorer::new(config.scorer);
    let outcome = scorer.train(&datasets)?;

    match outcome {
        TrainOutcome::Trained { .. } => {
            scorer.save(&path)?;
            Ok(CommandResult::ok(json!({
                "outcome": outcome,
                "datasets": datasets.len(),
                "model_path": path.display().to_string(),
            })))
        }
        TrainOutcome::Skipped => Ok(CommandResult::ok(json!({
            "outcome": outcome,
            "datasets": datasets.len(),
        }))
        .with_warning("no training rows supplied; model artifact not written")),
    }
}
