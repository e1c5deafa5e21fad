//! Seeded synthetic market data.
//!
//! Produces daily trading-flow records with a seasonal trend and injected
//! accumulation/distribution/panic-sell days, plus a random-walk OHLCV series.
//! Used to bootstrap a model when no real flow feed is wired in, and by tests.

use std::f64::consts::PI;

use flowwatch_core::{PriceBar, TradeDate, TradingFlowRecord};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

/// Pattern injected into a simulated trading day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InjectedPattern {
    /// Foreign sell x2.5, local buy x1.8.
    Accumulation,
    /// Foreign buy x2.2, local sell x1.7.
    Distribution,
    /// Foreign sell x3, local sell x2.5.
    PanicSell,
}

const PATTERNS: [InjectedPattern; 3] = [
    InjectedPattern::Accumulation,
    InjectedPattern::Distribution,
    InjectedPattern::PanicSell,
];

#[derive(Debug, Clone)]
pub struct FlowSimulator {
    rng: StdRng,
    anomaly_rate: f64,
}

impl FlowSimulator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            anomaly_rate: 0.15,
        }
    }

    /// Probability that a simulated day carries an injected pattern.
    ///
    /// Clamped to `[0, 1]`; a NaN or infinite rate leaves the current one.
    pub fn with_anomaly_rate(mut self, rate: f64) -> Self {
        if rate.is_finite() {
            self.anomaly_rate = rate.clamp(0.0, 1.0);
        }
        self
    }

    /// `days` consecutive daily records starting at `start`.
    pub fn daily_flows(&mut self, start: TradeDate, days: usize) -> Vec<TradingFlowRecord> {
        let mut records = Vec::with_capacity(days);
        let mut date = Some(start);

        for _ in 0..days {
            let Some(current) = date else { break };
            records.push(self.flow_for(current));
            date = current.next_day();
        }

        records
    }

    fn flow_for(&mut self, date: TradeDate) -> TradingFlowRecord {
        let trend = (f64::from(date.ordinal()) / 365.0 * 2.0 * PI).sin() * 0.3 + 1.0;
        let volatility = self.rng.gen_range(0.8..1.2);
        let level = trend * volatility;

        let mut foreign_buy = self.normal(80_000.0 * level, 30_000.0).abs();
        let mut foreign_sell = self.normal(75_000.0 * level, 28_000.0).abs();
        let mut local_buy = self.normal(120_000.0 * level, 50_000.0).abs();
        let mut local_sell = self.normal(115_000.0 * level, 48_000.0).abs();

        if self.rng.gen_bool(self.anomaly_rate) {
            match PATTERNS[self.rng.gen_range(0..PATTERNS.len())] {
                InjectedPattern::Accumulation => {
                    foreign_sell *= 2.5;
                    local_buy *= 1.8;
                }
                InjectedPattern::Distribution => {
                    foreign_buy *= 2.2;
                    local_sell *= 1.7;
                }
                InjectedPattern::PanicSell => {
                    foreign_sell *= 3.0;
                    local_sell *= 2.5;
                }
            }
        }

        TradingFlowRecord {
            date: Some(date),
            foreign_buy: Some(foreign_buy),
            foreign_sell: Some(foreign_sell),
            local_buy: Some(local_buy),
            local_sell: Some(local_sell),
            ..TradingFlowRecord::default()
        }
    }

    /// Random-walk price bars around `start_price` (0.1% step volatility).
    pub fn price_series(&mut self, start_price: f64, bars: usize) -> Vec<PriceBar> {
        let mut price = start_price.max(1.0);
        (0..bars)
            .map(|_| {
                price *= 1.0 + self.normal(0.0, 0.001);
                let high = price * (1.0 + self.normal(0.0, 0.005).abs());
                let low = price * (1.0 - self.normal(0.0, 0.005).abs());
                PriceBar {
                    ts: None,
                    open: price,
                    high,
                    low,
                    close: price,
                    volume: self.rng.gen_range(10_000..100_000),
                }
            })
            .collect()
    }

    fn normal(&mut self, mean: f64, std_dev: f64) -> f64 {
        let z: f64 = self.rng.sample(StandardNormal);
        mean + std_dev * z
    }
}
