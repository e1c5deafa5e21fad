use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::TradeDate;

/// Coarse bucket assigned to a flagged anomaly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

impl Display for Severity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A trading day flagged as anomalous, with all raw and derived flow fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyRecord {
    pub date: Option<TradeDate>,
    pub foreign_buy: f64,
    pub foreign_sell: f64,
    pub local_buy: f64,
    pub local_sell: f64,
    pub net_foreign: f64,
    pub net_local: f64,
    pub buy_sell_ratio: f64,
    pub foreign_ratio: f64,
    pub volume_ratio: f64,
    /// Ensemble decision score; higher is more normal.
    pub anomaly_score: f64,
    /// Saturating transform of `|anomaly_score|` into `(0, 0.5]`.
    pub anomaly_confidence: f64,
    pub severity: Severity,
    pub explanation: String,
    pub is_anomaly: bool,
}
