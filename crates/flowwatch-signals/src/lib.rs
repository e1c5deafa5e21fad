//! # Flowwatch Signals
//!
//! Price-series side of flowwatch: technical indicators, the weighted
//! recommendation score, and the alert rule table.
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`indicators`] | Trailing mean and simple-average RSI |
//! | [`technical`] | RSI zone, moving-average cross and volume deviation |
//! | [`recommendation`] | Score, tier and confidence from a signal bundle |
//! | [`alerts`] | Signal and anomaly alerts |
//!
//! ```rust
//! use flowwatch_core::{IndicatorConfig, PriceBar};
//! use flowwatch_signals::{recommend, SignalComputer};
//!
//! let bars: Vec<PriceBar> = (0..30)
//!     .map(|i| PriceBar::flat(None, 1_000.0 + f64::from(i), 20_000).unwrap())
//!     .collect();
//! let signals = SignalComputer::new(IndicatorConfig::default()).compute(&bars);
//! let recommendation = recommend(&signals);
//! assert_eq!(recommendation.score, -1);
//! ```

pub mod alerts;
pub mod indicators;
pub mod recommendation;
pub mod technical;

pub use alerts::AlertMapper;
pub use indicators::{rsi, trailing_mean};
pub use recommendation::{recommend, tier_for_score};
pub use technical::{SignalComputer, NEUTRAL_RSI};
