//! Trainable outlier scorer: standard scaler + isolation forest.
//!
//! Lifecycle is load-then-freeze. A scorer starts untrained, is trained by a
//! single batch [`OutlierScorer::train`] call, and is read-only afterwards.
//! Retraining builds a brand-new [`TrainedModel`] and replaces the old one
//! wholesale; see [`crate::ScorerHandle`] for sharing across threads.

use std::fs;
use std::path::Path;

use flowwatch_core::{ScorerConfig, TradeDate};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::features::{FeatureTable, FeatureVector, FEATURE_COLUMNS};
use crate::isolation_forest::IsolationForest;
use crate::scaler::StandardScaler;
use crate::ScorerError;

const ARTIFACT_VERSION: u32 = 1;

/// Maps `|score|` into `(0, 0.5]`: `1 - 1 / (1 + e^-|score|)`.
pub fn anomaly_confidence(score: f64) -> f64 {
    1.0 - 1.0 / (1.0 + (-score.abs()).exp())
}

/// Frozen scaler and forest produced by one training run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainedModel {
    feature_columns: Vec<String>,
    scaler: StandardScaler,
    forest: IsolationForest,
    training_rows: usize,
}

impl TrainedModel {
    /// Fits a model over the union of all non-empty tables. Returns
    /// `Ok(None)` when there is nothing to train on.
    pub fn fit(
        config: &ScorerConfig,
        datasets: &[FeatureTable],
    ) -> Result<Option<Self>, ScorerError> {
        let combined = FeatureTable::concat(datasets);
        if combined.is_empty() {
            return Ok(None);
        }

        let matrix = combined.to_matrix();
        let scaler = StandardScaler::fit(matrix.view());
        let scaled = scaler.transform(matrix.view())?;
        let Some(forest) = IsolationForest::fit(
            scaled.view(),
            config.n_estimators,
            config.max_samples,
            config.contamination,
            config.seed,
        ) else {
            return Ok(None);
        };

        Ok(Some(Self {
            feature_columns: FEATURE_COLUMNS.iter().map(|name| (*name).to_owned()).collect(),
            scaler,
            forest,
            training_rows: combined.len(),
        }))
    }

    pub fn training_rows(&self) -> usize {
        self.training_rows
    }

    pub fn feature_columns(&self) -> &[String] {
        &self.feature_columns
    }

    pub fn forest(&self) -> &IsolationForest {
        &self.forest
    }

    pub fn scaler(&self) -> &StandardScaler {
        &self.scaler
    }

    fn decision_scores(&self, features: &FeatureTable) -> Result<Vec<f64>, ScorerError> {
        let matrix = features.to_matrix();
        let scaled = self.scaler.transform(matrix.view())?;
        Ok(self.forest.decision_function(scaled.view()))
    }
}

/// Result of a training request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TrainOutcome {
    Trained { rows: usize },
    /// No non-empty dataset was supplied; the scorer state is unchanged.
    Skipped,
}

/// One input row with its ensemble decision score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredRow {
    pub date: Option<TradeDate>,
    pub features: FeatureVector,
    /// Higher is more normal; negative rows fall outside the training
    /// contamination boundary.
    pub anomaly_score: f64,
    pub anomaly_confidence: f64,
    /// The forest's own contamination-based verdict (`anomaly_score < 0`).
    pub model_outlier: bool,
}

/// Scores for one detection batch, in input row order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoredBatch {
    pub rows: Vec<ScoredRow>,
}

impl ScoredBatch {
    pub fn scores(&self) -> Vec<f64> {
        self.rows.iter().map(|row| row.anomaly_score).collect()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct ModelArtifact {
    version: u32,
    config: ScorerConfig,
    model: TrainedModel,
}

/// Outlier scorer service object. Construct explicitly and pass it (or a
/// [`crate::ScorerHandle`]) to whatever needs detection.
#[derive(Debug, Clone, Default)]
pub struct OutlierScorer {
    config: ScorerConfig,
    model: Option<TrainedModel>,
}

impl OutlierScorer {
    pub fn new(config: ScorerConfig) -> Self {
        Self {
            config,
            model: None,
        }
    }

    pub fn config(&self) -> &ScorerConfig {
        &self.config
    }

    pub fn is_trained(&self) -> bool {
        self.model.is_some()
    }

    pub fn model(&self) -> Option<&TrainedModel> {
        self.model.as_ref()
    }

    /// Trains on the concatenation of `datasets`. Empty input is a no-op that
    /// leaves the current state untouched; check the outcome or
    /// [`Self::is_trained`] afterwards. A failed fit also leaves it untouched.
    pub fn train(&mut self, datasets: &[FeatureTable]) -> Result<TrainOutcome, ScorerError> {
        match TrainedModel::fit(&self.config, datasets)? {
            Some(model) => {
                let rows = model.training_rows();
                info!(
                    rows,
                    datasets = datasets.len(),
                    offset = model.forest().offset(),
                    "outlier scorer trained"
                );
                self.model = Some(model);
                Ok(TrainOutcome::Trained { rows })
            }
            None => {
                warn!(
                    datasets = datasets.len(),
                    "no training rows supplied, scorer state unchanged"
                );
                Ok(TrainOutcome::Skipped)
            }
        }
    }

    /// Scores each row with the frozen scaler and forest. Does not threshold.
    pub fn detect(&self, features: &FeatureTable) -> Result<ScoredBatch, ScorerError> {
        let model = self.model.as_ref().ok_or(ScorerError::NotTrained)?;
        if features.is_empty() {
            return Ok(ScoredBatch::default());
        }

        let scores = model.decision_scores(features)?;
        let rows: Vec<ScoredRow> = features
            .rows()
            .iter()
            .zip(scores)
            .map(|(row, score)| ScoredRow {
                date: row.date,
                features: row.features,
                anomaly_score: score,
                anomaly_confidence: anomaly_confidence(score),
                model_outlier: score < 0.0,
            })
            .collect();

        debug!(
            rows = rows.len(),
            model_outliers = rows.iter().filter(|row| row.model_outlier).count(),
            "scored detection batch"
        );
        Ok(ScoredBatch { rows })
    }

    /// Serializes the trained state into an opaque blob.
    pub fn to_bytes(&self) -> Result<Vec<u8>, ScorerError> {
        let model = self.model.clone().ok_or(ScorerError::NotTrained)?;
        let artifact = ModelArtifact {
            version: ARTIFACT_VERSION,
            config: self.config,
            model,
        };
        Ok(serde_json::to_vec(&artifact)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ScorerError> {
        let artifact: ModelArtifact = serde_json::from_slice(bytes)?;
        if artifact.version != ARTIFACT_VERSION {
            return Err(ScorerError::IncompatibleArtifact(format!(
                "unsupported artifact version {}",
                artifact.version
            )));
        }
        if artifact.model.feature_columns != FEATURE_COLUMNS {
            return Err(ScorerError::IncompatibleArtifact(format!(
                "feature columns {:?} do not match {:?}",
                artifact.model.feature_columns, FEATURE_COLUMNS
            )));
        }
        if artifact.model.scaler.width() != FEATURE_COLUMNS.len() {
            return Err(ScorerError::FeatureWidthMismatch {
                expected: FEATURE_COLUMNS.len(),
                got: artifact.model.scaler.width(),
            });
        }

        Ok(Self {
            config: artifact.config,
            model: Some(artifact.model),
        })
    }

    /// Writes the artifact to `path`, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), ScorerError> {
        let bytes = self.to_bytes()?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, bytes)?;
        info!(path = %path.display(), "model artifact saved");
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self, ScorerError> {
        let bytes = fs::read(path)?;
        let scorer = Self::from_bytes(&bytes)?;
        info!(
            path = %path.display(),
            training_rows = scorer.model().map(TrainedModel::training_rows).unwrap_or(0),
            "model artifact loaded"
        );
        Ok(scorer)
    }
}
