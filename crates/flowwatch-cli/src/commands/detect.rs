use flowwatch_core::EngineConfig;
use flowwatch_ml::{derive_features, AnomalyClassifier};
use serde_json::json;

use crate::cli::DetectArgs;
use crate::error::CliError;

use super::{load_scorer, model_path, read_flows, CommandResult};

pub fn run(args: &DetectArgs, config: &EngineConfig) -> Result<CommandResult, CliError> {
    let scorer = load_scorer(&model_path(args.model.as_deref()))?;
    let features = derive_features(&read_flows(&args.input)?);

    let batch = scorer.detect(&features)?;
    let anomalies = AnomalyClassifier::new(config.classifier).classify(&batch);

    let data = json!({
        "rows": batch.len(),
        "model_outliers": batch.rows.iter().filter(|row| row.model_outlier).count(),
        "anomaly_count": anomalies.len(),
        "anomalies": anomalies,
    });

    Ok(CommandResult::ok(data))
}
