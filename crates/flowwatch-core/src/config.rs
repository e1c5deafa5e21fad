//! Tunable constants for every stage of the pipeline.
//!
//! All structs carry the production defaults via `Default` and can be
//! overridden from a JSON file with [`EngineConfig::load`]. Missing keys in
//! the file fall back to their defaults.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{CoreError, ValidationError};

/// Isolation-forest training parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScorerConfig {
    /// Prior fraction of training rows expected to be outliers.
    pub contamination: f64,
    pub n_estimators: usize,
    /// Sub-sample size per tree, capped by the number of training rows.
    pub max_samples: usize,
    pub seed: u64,
}

impl Default for ScorerConfig {
    fn default() -> Self {
        Self {
            contamination: 0.15,
            n_estimators: 100,
            max_samples: 256,
            seed: 42,
        }
    }
}

/// How a batch of scores is split into normal and anomalous rows.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "value", rename_all = "snake_case")]
pub enum ThresholdMode {
    /// Rows scoring below this percentile of the current batch are flagged.
    BatchPercentile(f64),
    /// Rows scoring below this absolute decision score are flagged.
    Absolute(f64),
}

impl Default for ThresholdMode {
    fn default() -> Self {
        Self::BatchPercentile(20.0)
    }
}

/// Absolute flow magnitudes that trigger explanation rules.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplanationThresholds {
    pub foreign_net: f64,
    pub local_net: f64,
    pub buying_pressure: f64,
    pub selling_pressure: f64,
}

impl Default for ExplanationThresholds {
    fn default() -> Self {
        Self {
            foreign_net: 30_000.0,
            local_net: 50_000.0,
            buying_pressure: 1.8,
            selling_pressure: 0.6,
        }
    }
}

/// Anomaly flagging and severity cut-offs (percentiles of the batch).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    pub threshold: ThresholdMode,
    pub critical_percentile: f64,
    pub high_percentile: f64,
    pub medium_percentile: f64,
    pub explanation: ExplanationThresholds,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            threshold: ThresholdMode::default(),
            critical_percentile: 5.0,
            high_percentile: 10.0,
            medium_percentile: 15.0,
            explanation: ExplanationThresholds::default(),
        }
    }
}

/// Technical indicator windows and zone boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorConfig {
    pub rsi_period: usize,
    pub ma_period: usize,
    pub volume_window: usize,
    pub rsi_overbought: f64,
    pub rsi_oversold: f64,
    pub volume_very_high: f64,
    pub volume_high: f64,
    pub volume_low: f64,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            rsi_period: 14,
            ma_period: 20,
            volume_window: 20,
            rsi_overbought: 70.0,
            rsi_oversold: 30.0,
            volume_very_high: 2.0,
            volume_high: 1.5,
            volume_low: 0.5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertConfig {
    /// Anomalies with confidence strictly above this raise an alert.
    pub anomaly_confidence_threshold: f64,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            anomaly_confidence_threshold: 0.8,
        }
    }
}

/// Aggregate configuration for a full evaluation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub scorer: ScorerConfig,
    pub classifier: ClassifierConfig,
    pub indicators: IndicatorConfig,
    pub alerts: AlertConfig,
}

impl EngineConfig {
    /// Reads and validates a JSON config file.
    pub fn load(path: &Path) -> Result<Self, CoreError> {
        let raw = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let scorer = &self.scorer;
        if !(scorer.contamination > 0.0 && scorer.contamination <= 0.5) {
            return Err(invalid("scorer.contamination", "must be in (0, 0.5]"));
        }
        if scorer.n_estimators == 0 {
            return Err(invalid("scorer.n_estimators", "must be greater than zero"));
        }
        if scorer.max_samples < 2 {
            return Err(invalid("scorer.max_samples", "must be at least 2"));
        }

        let classifier = &self.classifier;
        if let ThresholdMode::BatchPercentile(percentile) = classifier.threshold {
            validate_percentile("classifier.threshold", percentile)?;
        }
        validate_percentile("classifier.critical_percentile", classifier.critical_percentile)?;
        validate_percentile("classifier.high_percentile", classifier.high_percentile)?;
        validate_percentile("classifier.medium_percentile", classifier.medium_percentile)?;
        if !(classifier.critical_percentile <= classifier.high_percentile
            && classifier.high_percentile <= classifier.medium_percentile)
        {
            return Err(invalid(
                "classifier",
                "severity percentiles must satisfy critical <= high <= medium",
            ));
        }

        let indicators = &self.indicators;
        if indicators.rsi_period < 2 {
            return Err(invalid("indicators.rsi_period", "must be at least 2"));
        }
        if indicators.ma_period == 0 || indicators.volume_window == 0 {
            return Err(invalid("indicators", "windows must be greater than zero"));
        }
        if indicators.rsi_oversold >= indicators.rsi_overbought {
            return Err(invalid(
                "indicators",
                "rsi_oversold must be below rsi_overbought",
            ));
        }

        Ok(())
    }
}

fn validate_percentile(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !(0.0..=100.0).contains(&value) {
        return Err(invalid(field, "percentile must be within 0..=100"));
    }
    Ok(())
}

fn invalid(field: &'static str, reason: &str) -> ValidationError {
    ValidationError::InvalidConfig {
        field,
        reason: reason.to_owned(),
    }
}

/// Root directory for flowwatch state (`$FLOWWATCH_HOME`, then `~/.flowwatch`).
pub fn resolve_flowwatch_home() -> PathBuf {
    if let Some(path) = env::var_os("FLOWWATCH_HOME") {
        let path = PathBuf::from(path);
        if !path.as_os_str().is_empty() {
            return path;
        }
    }

    if let Some(home) = env::var_os("HOME") {
        return PathBuf::from(home).join(".flowwatch");
    }

    PathBuf::from(".flowwatch")
}

/// Default location of the trained scorer artifact.
pub fn default_model_path() -> PathBuf {
    resolve_flowwatch_home()
        .join("models")
        .join("anomaly_detector.json")
}
