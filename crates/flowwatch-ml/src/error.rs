use thiserror::Error;

/// Failures surfaced by the outlier scorer.
#[derive(Debug, Error)]
pub enum ScorerError {
    #[error("scorer is not trained: call train() or load a model artifact before detect()")]
    NotTrained,

    #[error("feature width mismatch: model expects {expected} columns, got {got}")]
    FeatureWidthMismatch { expected: usize, got: usize },

    #[error("incompatible model artifact: {0}")]
    IncompatibleArtifact(String),

    #[error("model serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("model io error: {0}")]
    Io(#[from] std::io::Error),
}
