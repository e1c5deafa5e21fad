//! Technical signal computation over an OHLCV series.

use flowwatch_core::{
    format_thousands, IndicatorConfig, PriceBar, RsiSignal, TechnicalSignalBundle, TrendSignal,
    VolumeSignal,
};
use tracing::{debug, warn};

use crate::indicators::{rsi, trailing_mean};

/// RSI reported when the series is shorter than the RSI window.
pub const NEUTRAL_RSI: f64 = 50.0;

const NORMAL_VOLUME_DESCRIPTION: &str = "Volume within normal range";

/// Stateless signal computer; holds only its window and zone settings.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SignalComputer {
    config: IndicatorConfig,
}

impl SignalComputer {
    pub fn new(config: IndicatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &IndicatorConfig {
        &self.config
    }

    /// Computes the signal bundle for `bars` (oldest first).
    ///
    /// With fewer bars than the RSI window every indicator falls back to its
    /// neutral default and `insufficient_history` is set; price fields are
    /// still taken from the latest bar.
    pub fn compute(&self, bars: &[PriceBar]) -> TechnicalSignalBundle {
        let closes: Vec<f64> = bars.iter().map(|bar| bar.close).collect();
        let (price_change, price_change_pct) = price_change(&closes);

        let latest = bars.last();
        let mut bundle = TechnicalSignalBundle {
            rsi: NEUTRAL_RSI,
            rsi_signal: RsiSignal::Neutral,
            ma_signal: TrendSignal::Neutral,
            macd_signal: TrendSignal::Neutral,
            volume_signal: VolumeSignal::Normal,
            volume_description: String::from(NORMAL_VOLUME_DESCRIPTION),
            avg_volume: 0.0,
            volume: latest.map_or(0, |bar| bar.volume),
            current_price: latest.map_or(0.0, |bar| bar.close),
            price_change,
            price_change_pct,
            open: latest.map_or(0.0, |bar| bar.open),
            high: latest.map_or(0.0, |bar| bar.high),
            low: latest.map_or(0.0, |bar| bar.low),
            insufficient_history: true,
        };

        let Some(rsi_value) = rsi(&closes, self.config.rsi_period) else {
            warn!(
                bars = bars.len(),
                required = self.config.rsi_period,
                "insufficient price history, returning neutral signals"
            );
            return bundle;
        };

        bundle.insufficient_history = false;
        bundle.rsi = round2(rsi_value);
        bundle.rsi_signal = self.rsi_signal(rsi_value);
        bundle.ma_signal = self.ma_signal(&closes);

        let volumes: Vec<f64> = bars.iter().map(|bar| bar.volume as f64).collect();
        let avg_volume = trailing_mean(&volumes, self.config.volume_window).unwrap_or(0.0);
        let (volume_signal, volume_description) = self.volume_signal(bundle.volume, avg_volume);
        bundle.avg_volume = avg_volume;
        bundle.volume_signal = volume_signal;
        bundle.volume_description = volume_description;

        debug!(
            rsi = bundle.rsi,
            ma = ?bundle.ma_signal,
            volume = ?bundle.volume_signal,
            "computed technical signals"
        );
        bundle
    }

    pub fn rsi_signal(&self, rsi: f64) -> RsiSignal {
        if rsi > self.config.rsi_overbought {
            RsiSignal::Overbought
        } else if rsi < self.config.rsi_oversold {
            RsiSignal::Oversold
        } else {
            RsiSignal::Neutral
        }
    }

    /// Latest close against its simple moving average; a tie is bearish.
    ///
    /// The average needs a full `ma_period` window. A shorter series has no
    /// average to clear, so it reads as bearish.
    pub fn ma_signal(&self, closes: &[f64]) -> TrendSignal {
        if !closes.is_empty() && closes.len() < self.config.ma_period {
            return TrendSignal::Bearish;
        }
        match (closes.last(), trailing_mean(closes, self.config.ma_period)) {
            (Some(&close), Some(mean)) if close > mean => TrendSignal::Bullish,
            (Some(_), Some(_)) => TrendSignal::Bearish,
            _ => TrendSignal::Neutral,
        }
    }

    pub fn volume_signal(&self, volume: u64, avg_volume: f64) -> (VolumeSignal, String) {
        let current = volume as f64;
        let shown = format_thousands(current);

        if current > avg_volume * self.config.volume_very_high {
            (
                VolumeSignal::VeryHigh,
                format!(
                    "Volume {shown} very high (>{})",
                    format_thousands((avg_volume * self.config.volume_very_high).trunc())
                ),
            )
        } else if current > avg_volume * self.config.volume_high {
            (
                VolumeSignal::High,
                format!(
                    "Volume {shown} high (>{})",
                    format_thousands((avg_volume * self.config.volume_high).trunc())
                ),
            )
        } else if current < avg_volume * self.config.volume_low {
            (
                VolumeSignal::Low,
                format!(
                    "Volume {shown} low (<{})",
                    format_thousands((avg_volume * self.config.volume_low).trunc())
                ),
            )
        } else {
            (
                VolumeSignal::Normal,
                format!("Volume {shown} within normal range"),
            )
        }
    }
}

/// Absolute and percentage change between the last two closes.
fn price_change(closes: &[f64]) -> (f64, f64) {
    match closes {
        [.., previous, latest] => {
            let change = latest - previous;
            let pct = if *previous != 0.0 {
                change / previous * 100.0
            } else {
                0.0
            };
            (change, round2(pct))
        }
        _ => (0.0, 0.0),
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
