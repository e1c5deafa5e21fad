use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// Discretized trading stance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecommendationTier {
    StrongBuy,
    Buy,
    Hold,
    Sell,
    StrongSell,
}

impl RecommendationTier {
    /// Ordinal position, from `StrongSell` (-2) to `StrongBuy` (2).
    pub const fn rank(self) -> i8 {
        match self {
            Self::StrongSell => -2,
            Self::Sell => -1,
            Self::Hold => 0,
            Self::Buy => 1,
            Self::StrongBuy => 2,
        }
    }

    /// Upper bound applied to the accumulated confidence.
    pub const fn confidence_cap(self) -> i32 {
        match self {
            Self::StrongBuy | Self::StrongSell => 95,
            Self::Buy | Self::Sell => 75,
            Self::Hold => 95,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::StrongBuy => "STRONG BUY",
            Self::Buy => "BUY",
            Self::Hold => "HOLD",
            Self::Sell => "SELL",
            Self::StrongSell => "STRONG SELL",
        }
    }

    pub const fn color(self) -> &'static str {
        match self {
            Self::StrongBuy | Self::Buy => "success",
            Self::Hold => "warning",
            Self::Sell | Self::StrongSell => "danger",
        }
    }

    pub const fn icon(self) -> &'static str {
        match self {
            Self::StrongBuy => "fa-arrow-trend-up",
            Self::Buy => "fa-arrow-up",
            Self::Hold => "fa-hand",
            Self::Sell => "fa-arrow-down",
            Self::StrongSell => "fa-arrow-trend-down",
        }
    }

    pub const fn summary(self) -> &'static str {
        match self {
            Self::StrongBuy => "Very strong buying opportunity",
            Self::Buy => "Buy signal detected",
            Self::Hold => "No clear signal yet, wait for confirmation",
            Self::Sell => "Sell signal detected",
            Self::StrongSell => "Very strong sell signal",
        }
    }
}

impl Display for RecommendationTier {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Composite recommendation with its supporting reasons.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub tier: RecommendationTier,
    pub score: i32,
    pub confidence: u8,
    /// Reasons in rule-evaluation order.
    pub reasons: Vec<String>,
    pub color: String,
    pub icon: String,
    pub summary: String,
}

impl Recommendation {
    pub fn new(tier: RecommendationTier, score: i32, confidence: u8, reasons: Vec<String>) -> Self {
        Self {
            tier,
            score,
            confidence,
            reasons,
            color: tier.color().to_owned(),
            icon: tier.icon().to_owned(),
            summary: tier.summary().to_owned(),
        }
    }
}
