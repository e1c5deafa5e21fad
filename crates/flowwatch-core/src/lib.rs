//! # Flowwatch Core
//!
//! Domain contracts shared by the flowwatch crates.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`config`] | Scorer, classifier, indicator and alert settings |
//! | [`domain`] | Flow records, price bars, anomalies, signals, recommendations, alerts |
//! | [`error`] | Validation and core errors |
//! | [`format`] | Number formatting for explanation text |
//!
//! ## Pipeline
//!
//! ```text
//! TradingFlowRecord[] ──▶ features ──▶ OutlierScorer ──▶ AnomalyClassifier ──▶ AnomalyRecord[]
//!                                                                                 │
//! PriceBar[] ──▶ TechnicalSignalBundle ──┬──▶ Recommendation                       │
//!                                        └──▶ Alert[] ◀──────────────────────────┘
//! ```

pub mod config;
pub mod domain;
pub mod error;
pub mod format;

pub use config::{
    default_model_path, resolve_flowwatch_home, AlertConfig, ClassifierConfig, EngineConfig,
    ExplanationThresholds, IndicatorConfig, ScorerConfig, ThresholdMode,
};
pub use domain::{
    Alert, AlertAction, AlertKind, AlertSeverity, AnomalyRecord, PriceBar, Recommendation,
    RecommendationTier, RsiSignal, Severity, TechnicalSignalBundle, TradeDate, TradingFlowRecord,
    TrendSignal, UtcDateTime, VolumeSignal,
};
pub use error::{CoreError, ValidationError};
pub use format::format_thousands;
