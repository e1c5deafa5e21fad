//! # Domain Models
//!
//! Canonical types flowing through the flowwatch pipeline.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`TradingFlowRecord`] | Foreign/domestic buy-sell flow for one period |
//! | [`PriceBar`] | OHLCV bar |
//! | [`AnomalyRecord`] | Flagged trading day with severity and explanation |
//! | [`TechnicalSignalBundle`] | RSI, moving-average and volume states |
//! | [`Recommendation`] | Tiered trading stance with confidence |
//! | [`Alert`] | Ephemeral alert event |
//! | [`TradeDate`] | `YYYY-MM-DD` calendar day |
//! | [`UtcDateTime`] | RFC3339 UTC timestamp |
//!
//! Constructors validate their invariants. Deserialized flow rows and bars
//! skip the constructors; call `validate` on them at ingestion.

mod alert;
mod anomaly;
mod bar;
mod calendar;
mod flow;
mod recommendation;
mod signal;

pub use alert::{Alert, AlertAction, AlertKind, AlertSeverity};
pub use anomaly::{AnomalyRecord, Severity};
pub use bar::PriceBar;
pub use calendar::{TradeDate, UtcDateTime};
pub use flow::TradingFlowRecord;
pub use recommendation::{Recommendation, RecommendationTier};
pub use signal::{RsiSignal, TechnicalSignalBundle, TrendSignal, VolumeSignal};

use crate::ValidationError;

/// Monetary amounts and prices must be finite and non-negative.
fn ensure_magnitude(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        Err(ValidationError::NonFiniteValue { field })
    } else if value < 0.0 {
        Err(ValidationError::NegativeValue { field })
    } else {
        Ok(())
    }
}
