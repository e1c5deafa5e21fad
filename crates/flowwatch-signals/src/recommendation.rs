//! Weighted recommendation scoring over a technical signal bundle.

use flowwatch_core::{
    Recommendation, RecommendationTier, TechnicalSignalBundle, TrendSignal, VolumeSignal,
};
use tracing::debug;

const HOLD_CONFIDENCE_FLOOR: i32 = 30;
const MAX_CONFIDENCE: i32 = 95;

/// Running score, confidence and reasons while the rules are applied.
#[derive(Debug, Default)]
struct Tally {
    score: i32,
    confidence: i32,
    reasons: Vec<String>,
}

impl Tally {
    fn add(&mut self, score: i32, confidence: i32, reason: impl Into<String>) {
        self.score += score;
        self.confidence += confidence;
        self.reasons.push(reason.into());
    }
}

/// Fuses the signal bundle into a recommendation tier.
///
/// Rules run in a fixed order (RSI, moving average, MACD, volume) and each
/// one that fires appends its reason, so `reasons` is reproducible for the
/// same bundle. Volume only confirms an existing direction; a flat score
/// ignores elevated volume.
pub fn recommend(signals: &TechnicalSignalBundle) -> Recommendation {
    let mut tally = Tally::default();
    let rsi = signals.rsi;

    if rsi < 30.0 {
        tally.add(3, 25, format!("RSI {rsi:.2} oversold, strong upside reversal potential"));
    } else if rsi < 40.0 {
        tally.add(2, 15, format!("RSI {rsi:.2} approaching oversold, bullish momentum"));
    } else if rsi > 70.0 {
        tally.add(-3, 25, format!("RSI {rsi:.2} overbought, downside correction likely"));
    } else if rsi > 60.0 {
        tally.add(-2, 15, format!("RSI {rsi:.2} approaching overbought, watch for correction"));
    } else {
        tally.add(0, 0, format!("RSI {rsi:.2} in neutral zone"));
    }

    match signals.ma_signal {
        TrendSignal::Bullish => tally.add(2, 20, "Price above MA, uptrend confirmed"),
        TrendSignal::Bearish => tally.add(-2, 20, "Price below MA, downtrend active"),
        TrendSignal::Neutral => {}
    }

    match signals.macd_signal {
        TrendSignal::Bullish => tally.add(2, 20, "MACD bullish crossover, strong buying momentum"),
        TrendSignal::Bearish => tally.add(-2, 20, "MACD bearish crossover, strong selling momentum"),
        TrendSignal::Neutral => {}
    }

    if signals.volume_signal.is_elevated() {
        if tally.score > 0 {
            tally.add(1, 15, "High volume confirms accumulation");
        } else if tally.score < 0 {
            tally.add(-1, 15, "High volume confirms distribution");
        }
    } else if signals.volume_signal == VolumeSignal::Low {
        tally.add(0, -10, "Low volume, signal less reliable");
    }

    let tier = tier_for_score(tally.score);
    let confidence = bound_confidence(tier, tally.confidence);

    debug!(
        score = tally.score,
        confidence,
        tier = %tier,
        "scored recommendation"
    );
    Recommendation::new(tier, tally.score, confidence, tally.reasons)
}

/// Maps a signed score to its tier; the first matching band wins.
pub fn tier_for_score(score: i32) -> RecommendationTier {
    match score {
        s if s >= 3 => RecommendationTier::StrongBuy,
        s if s >= 1 => RecommendationTier::Buy,
        s if s <= -3 => RecommendationTier::StrongSell,
        s if s <= -1 => RecommendationTier::Sell,
        _ => RecommendationTier::Hold,
    }
}

fn bound_confidence(tier: RecommendationTier, confidence: i32) -> u8 {
    let bounded = match tier {
        RecommendationTier::Hold => confidence.max(HOLD_CONFIDENCE_FLOOR),
        _ => confidence.min(tier.confidence_cap()),
    };
    // Low volume can push the tally below zero.
    u8::try_from(bounded.clamp(0, MAX_CONFIDENCE)).unwrap_or(0)
}
