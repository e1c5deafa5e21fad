use serde::{Deserialize, Serialize};

use super::ensure_magnitude;
use crate::{UtcDateTime, ValidationError};

/// OHLCV price bar for one period (daily or intraday).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ts: Option<UtcDateTime>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(default)]
    pub volume: u64,
}

impl PriceBar {
    pub fn new(
        ts: Option<UtcDateTime>,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: u64,
    ) -> Result<Self, ValidationError> {
        let bar = Self {
            ts,
            open,
            high,
            low,
            close,
            volume,
        };
        bar.validate()?;
        Ok(bar)
    }

    /// Re-checks the OHLC invariants, e.g. after deserialization.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (field, value) in [
            ("open", self.open),
            ("high", self.high),
            ("low", self.low),
            ("close", self.close),
        ] {
            ensure_magnitude(field, value)?;
        }

        if self.high < self.low {
            return Err(ValidationError::InvalidBarRange);
        }
        let range = self.low..=self.high;
        if !range.contains(&self.open) || !range.contains(&self.close) {
            return Err(ValidationError::InvalidBarBounds);
        }
        Ok(())
    }

    /// Single-price bar, as produced by a last-trade snapshot.
    pub fn flat(ts: Option<UtcDateTime>, price: f64, volume: u64) -> Result<Self, ValidationError> {
        Self::new(ts, price, price, price, price, volume)
    }
}
