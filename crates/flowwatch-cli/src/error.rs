use flowwatch_ml::ScorerError;
use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Validation(#[from] flowwatch_core::ValidationError),

    #[error("model is not trained; run `flowwatch train` first")]
    NotTrained,

    #[error("model error: {0}")]
    Model(ScorerError),

    #[error("command error: {0}")]
    Command(String),

    #[error("strict mode failed: warnings={warning_count}")]
    StrictModeViolation { warning_count: usize },

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Validation(_) => 2,
            Self::NotTrained => 3,
            Self::StrictModeViolation { .. } => 5,
            Self::Model(_) | Self::Command(_) | Self::Serialization(_) | Self::Io(_) => 10,
        }
    }
}

impl From<ScorerError> for CliError {
    fn from(error: ScorerError) -> Self {
        match error {
            ScorerError::NotTrained => Self::NotTrained,
            other => Self::Model(other),
        }
    }
}

impl From<flowwatch_core::CoreError> for CliError {
    fn from(error: flowwatch_core::CoreError) -> Self {
        match error {
            flowwatch_core::CoreError::Validation(error) => Self::Validation(error),
            flowwatch_core::CoreError::Serialization(error) => Self::Serialization(error),
            flowwatch_core::CoreError::Io(error) => Self::Io(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_trained_maps_to_its_own_exit_code() {
        let error = CliError::from(ScorerError::NotTrained);
        assert!(matches!(error, CliError::NotTrained));
        assert_eq!(error.exit_code(), 3);
    }

    #[test]
    fn config_validation_maps_to_validation_exit_code() {
        let error = CliError::from(flowwatch_core::CoreError::Validation(
            flowwatch_core::ValidationError::InvalidConfig {
                field: "scorer.contamination",
                reason: String::from("must be in (0, 0.5]"),
            },
        ));
        assert_eq!(error.exit_code(), 2);
    }
}
