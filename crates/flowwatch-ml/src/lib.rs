//! # Flowwatch ML
//!
//! Statistical core of flowwatch: turns trading-flow tables into scored,
//! classified and explained anomalies.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`features`] | Feature derivation and missing-value policy |
//! | [`scaler`] | Per-column standardization |
//! | [`isolation_forest`] | Isolation Forest ensemble |
//! | [`scorer`] | Trainable outlier scorer and model artifact persistence |
//! | [`handle`] | Shared scorer snapshot with atomic retrain swap |
//! | [`classifier`] | Percentile thresholds, severity tiers, explanations |
//! | [`simulation`] | Seeded synthetic flow and price data |
//!
//! ## Quick Start
//!
//! ```rust
//! use flowwatch_core::{ClassifierConfig, ScorerConfig, TradeDate};
//! use flowwatch_ml::{derive_features, AnomalyClassifier, FlowSimulator, OutlierScorer};
//!
//! let start = TradeDate::parse("2024-01-01").unwrap();
//! let history = derive_features(&FlowSimulator::new(42).daily_flows(start, 180));
//!
//! let mut scorer = OutlierScorer::new(ScorerConfig::default());
//! scorer.train(&[history.clone()]).unwrap();
//!
//! let batch = scorer.detect(&history).unwrap();
//! let anomalies = AnomalyClassifier::new(ClassifierConfig::default()).classify(&batch);
//! assert!(!anomalies.is_empty());
//! ```

pub mod classifier;
pub mod error;
pub mod features;
pub mod handle;
pub mod isolation_forest;
pub mod scaler;
pub mod scorer;
pub mod simulation;
pub mod stats;

pub use classifier::{explain, AnomalyClassifier};
pub use error::ScorerError;
pub use features::{
    derive_features, FeatureRow, FeatureTable, FeatureVector, FEATURE_COLUMNS, FEATURE_COUNT,
};
pub use handle::ScorerHandle;
pub use isolation_forest::IsolationForest;
pub use scaler::StandardScaler;
pub use scorer::{anomaly_confidence, OutlierScorer, ScoredBatch, ScoredRow, TrainOutcome, TrainedModel};
pub use simulation::{FlowSimulator, InjectedPattern};
