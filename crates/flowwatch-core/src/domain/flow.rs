use serde::{Deserialize, Serialize};

use super::ensure_magnitude;
use crate::{TradeDate, ValidationError};

/// One period of buy/sell flow for a security, split by investor class.
///
/// The four raw magnitudes are optional so that partially populated feeds
/// can be ingested as-is; missing values are normalized to zero once, by the
/// feature deriver. Derived columns are optional overrides: when present they
/// are used verbatim instead of being recomputed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TradingFlowRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<TradeDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foreign_buy: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foreign_sell: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_buy: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_sell: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub net_foreign: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub net_local: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buy_sell_ratio: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foreign_ratio: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume_ratio: Option<f64>,
}

impl TradingFlowRecord {
    /// Builds a fully populated raw record. Derived columns are left for the
    /// feature deriver to compute.
    pub fn new(
        date: Option<TradeDate>,
        foreign_buy: f64,
        foreign_sell: f64,
        local_buy: f64,
        local_sell: f64,
    ) -> Result<Self, ValidationError> {
        ensure_magnitude("foreign_buy", foreign_buy)?;
        ensure_magnitude("foreign_sell", foreign_sell)?;
        ensure_magnitude("local_buy", local_buy)?;
        ensure_magnitude("local_sell", local_sell)?;

        Ok(Self {
            date,
            foreign_buy: Some(foreign_buy),
            foreign_sell: Some(foreign_sell),
            local_buy: Some(local_buy),
            local_sell: Some(local_sell),
            ..Self::default()
        })
    }

    /// Checks the raw magnitudes of a deserialized row. Absent values pass;
    /// derived overrides are only required to be finite.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let raw = [
            ("foreign_buy", self.foreign_buy),
            ("foreign_sell", self.foreign_sell),
            ("local_buy", self.local_buy),
            ("local_sell", self.local_sell),
        ];
        for (field, value) in raw {
            if let Some(value) = value {
                ensure_magnitude(field, value)?;
            }
        }

        let derived = [
            ("net_foreign", self.net_foreign),
            ("net_local", self.net_local),
            ("buy_sell_ratio", self.buy_sell_ratio),
            ("foreign_ratio", self.foreign_ratio),
            ("volume_ratio", self.volume_ratio),
        ];
        for (field, value) in derived {
            if value.is_some_and(|value| !value.is_finite()) {
                return Err(ValidationError::NonFiniteValue { field });
            }
        }

        Ok(())
    }

    pub fn with_net_foreign(mut self, value: f64) -> Self {
        self.net_foreign = Some(value);
        self
    }

    pub fn with_net_local(mut self, value: f64) -> Self {
        self.net_local = Some(value);
        self
    }

    pub fn with_buy_sell_ratio(mut self, value: f64) -> Self {
        self.buy_sell_ratio = Some(value);
        self
    }

    pub fn with_foreign_ratio(mut self, value: f64) -> Self {
        self.foreign_ratio = Some(value);
        self
    }

    pub fn with_volume_ratio(mut self, value: f64) -> Self {
        self.volume_ratio = Some(value);
        self
    }
}
