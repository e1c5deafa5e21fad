use serde::{Deserialize, Serialize};

/// RSI zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RsiSignal {
    Oversold,
    Overbought,
    Neutral,
}

/// Directional state shared by the moving-average and MACD signals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrendSignal {
    Bullish,
    Bearish,
    Neutral,
}

/// Latest volume relative to its trailing average.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VolumeSignal {
    VeryHigh,
    High,
    Normal,
    Low,
}

impl VolumeSignal {
    pub const fn is_elevated(self) -> bool {
        matches!(self, Self::High | Self::VeryHigh)
    }
}

/// Technical indicator states derived from one price/volume series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechnicalSignalBundle {
    pub rsi: f64,
    pub rsi_signal: RsiSignal,
    pub ma_signal: TrendSignal,
    /// No MACD computation exists yet; always `Neutral`.
    pub macd_signal: TrendSignal,
    pub volume_signal: VolumeSignal,
    pub volume_description: String,
    pub avg_volume: f64,
    pub volume: u64,
    pub current_price: f64,
    /// Latest close minus the preceding close.
    pub price_change: f64,
    /// `price_change` as a percentage of the preceding close.
    pub price_change_pct: f64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    /// Set when the series was too short for the indicators; every indicator
    /// field then holds its neutral default rather than a computed value.
    pub insufficient_history: bool,
}
