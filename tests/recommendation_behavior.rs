//! Behavior-driven tests for technical signals, recommendations and alerts
//!
//! These tests drive the price-series side end to end: bars in, signal
//! bundle, recommendation tier and alert list out.

use flowwatch_core::{
    AlertAction, AlertKind, IndicatorConfig, RecommendationTier, RsiSignal, TrendSignal,
    VolumeSignal,
};
use flowwatch_ml::{AnomalyClassifier, FlowSimulator};
use flowwatch_signals::{recommend, tier_for_score, AlertMapper, SignalComputer, NEUTRAL_RSI};
use flowwatch_tests::{bars_from_closes, simulated_table, trained_scorer};

// =============================================================================
// Technical signals
// =============================================================================

#[test]
fn when_fewer_than_fourteen_bars_rsi_is_exactly_neutral() {
    // Given: Wildly varying series of every length below the RSI window
    let computer = SignalComputer::new(IndicatorConfig::default());

    for len in 0..14 {
        let closes: Vec<f64> = (0..len)
            .map(|i| if i % 2 == 0 { 100.0 } else { 9_000.0 + f64::from(i) })
            .collect();

        // When: Signals are computed
        let signals = computer.compute(&bars_from_closes(&closes, 1_000));

        // Then: RSI is the neutral default and flagged as such
        assert_eq!(signals.rsi, NEUTRAL_RSI, "len = {len}");
        assert_eq!(signals.rsi_signal, RsiSignal::Neutral);
        assert!(signals.insufficient_history);
    }
}

#[test]
fn when_price_falls_steadily_rsi_is_oversold_and_trend_bearish() {
    // Given: Thirty bars of steady decline
    let closes: Vec<f64> = (0..30).map(|i| 10_000.0 - 50.0 * f64::from(i)).collect();

    // When: Signals are computed
    let signals = SignalComputer::default().compute(&bars_from_closes(&closes, 25_000));

    // Then: RSI bottoms out and price sits below its average
    assert_eq!(signals.rsi, 0.0);
    assert_eq!(signals.rsi_signal, RsiSignal::Oversold);
    assert_eq!(signals.ma_signal, TrendSignal::Bearish);
    assert_eq!(signals.price_change, -50.0);
    assert_eq!(signals.price_change_pct, -0.58);
}

#[test]
fn when_history_is_shorter_than_ma_window_trend_is_bearish() {
    // Given: Fifteen steadily rising bars, enough for RSI but not the MA
    let closes: Vec<f64> = (0..15).map(|i| 1_000.0 + f64::from(i)).collect();

    // When: Signals are computed
    let signals = SignalComputer::default().compute(&bars_from_closes(&closes, 1_000));

    // Then: RSI is live but the missing average never reads as bullish
    assert!(!signals.insufficient_history);
    assert_eq!(signals.rsi_signal, RsiSignal::Overbought);
    assert_eq!(signals.ma_signal, TrendSignal::Bearish);
    assert_eq!(recommend(&signals).score, -5);
}

// =============================================================================
// Recommendation
// =============================================================================

#[test]
fn when_oversold_bullish_and_high_volume_recommendation_is_strong_buy() {
    // Given: RSI 25, bullish MA, high volume, neutral MACD
    let mut signals = SignalComputer::default().compute(&[]);
    signals.rsi = 25.0;
    signals.ma_signal = TrendSignal::Bullish;
    signals.volume_signal = VolumeSignal::High;

    // When: A recommendation is scored
    let recommendation = recommend(&signals);

    // Then: 3 + 2 + 1 = 6, confidence 25 + 20 + 15
    assert_eq!(recommendation.score, 6);
    assert_eq!(recommendation.tier, RecommendationTier::StrongBuy);
    assert_eq!(recommendation.confidence, 60);
    assert_eq!(recommendation.reasons.len(), 3);
}

#[test]
fn when_score_rises_from_zero_tier_never_drops() {
    // Given: Scores from neutral upwards
    let tiers: Vec<RecommendationTier> = (0..10).map(tier_for_score).collect();

    // Then: Ranks are non-decreasing and end at StrongBuy
    assert!(tiers.windows(2).all(|pair| pair[0].rank() <= pair[1].rank()));
    assert_eq!(tiers[0], RecommendationTier::Hold);
    assert_eq!(tiers[9], RecommendationTier::StrongBuy);
}

#[test]
fn when_recommendations_are_scored_confidence_stays_within_tier_bounds() {
    // Given: Every combination of indicator states
    let rsis = [20.0, 35.0, 50.0, 65.0, 80.0];
    let trends = [TrendSignal::Bullish, TrendSignal::Bearish, TrendSignal::Neutral];
    let volumes = [
        VolumeSignal::VeryHigh,
        VolumeSignal::High,
        VolumeSignal::Normal,
        VolumeSignal::Low,
    ];
    let mut signals = SignalComputer::default().compute(&[]);

    for rsi in rsis {
        for ma in trends {
            for macd in trends {
                for volume in volumes {
                    signals.rsi = rsi;
                    signals.ma_signal = ma;
                    signals.macd_signal = macd;
                    signals.volume_signal = volume;

                    // When: The recommendation is scored
                    let rec = recommend(&signals);

                    // Then: Confidence respects the tier cap and the hold floor
                    let confidence = i32::from(rec.confidence);
                    assert!(confidence <= rec.tier.confidence_cap());
                    assert!(confidence <= 95);
                    if rec.tier == RecommendationTier::Hold {
                        assert!(confidence >= 30);
                    }
                    assert_eq!(rec.tier, tier_for_score(rec.score));
                }
            }
        }
    }
}

// =============================================================================
// Alerts
// =============================================================================

#[test]
fn when_signals_are_extreme_alerts_follow_the_rule_table() {
    // Given: An overbought, bearish, high-volume bundle
    let mut signals = SignalComputer::default().compute(&[]);
    signals.rsi = 82.0;
    signals.rsi_signal = RsiSignal::Overbought;
    signals.ma_signal = TrendSignal::Bearish;
    signals.volume_signal = VolumeSignal::High;

    // When: Alerts are generated without anomalies
    let alerts = AlertMapper::default().generate(&signals, None);

    // Then: One alert per firing rule, in rule order
    let summary: Vec<(AlertKind, AlertAction)> =
        alerts.iter().map(|alert| (alert.kind, alert.action)).collect();
    assert_eq!(
        summary,
        vec![
            (AlertKind::RsiOverbought, AlertAction::Sell),
            (AlertKind::MaBearish, AlertAction::Sell),
            (AlertKind::VolumeHigh, AlertAction::Monitor),
        ]
    );
}

#[test]
fn when_real_anomalies_are_mapped_default_threshold_raises_no_investigation() {
    // Given: Anomalies from a trained pipeline, whose confidence never exceeds 0.5
    let scorer = trained_scorer(61, 150);
    let batch = scorer.detect(&simulated_table(62, 80)).expect("detect");
    let anomalies = AnomalyClassifier::default().classify(&batch);
    assert!(!anomalies.is_empty());

    let bars = FlowSimulator::new(63).price_series(4_000.0, 40);
    let signals = SignalComputer::default().compute(&bars);

    // When: Alerts are generated with the default 0.8 confidence threshold
    let alerts = AlertMapper::default().generate(&signals, Some(anomalies.as_slice()));

    // Then: No anomaly alert is raised
    assert!(alerts
        .iter()
        .all(|alert| alert.kind != AlertKind::AnomalyDetected));
}

#[test]
fn when_alert_is_serialized_type_and_action_use_wire_names() {
    // Given: An oversold bundle
    let mut signals = SignalComputer::default().compute(&[]);
    signals.rsi_signal = RsiSignal::Oversold;

    // When: The alert is serialized
    let alerts = AlertMapper::default().generate(&signals, None);
    let json = serde_json::to_value(&alerts).expect("json");

    // Then: Enum values use upper snake case
    assert_eq!(json[0]["type"], "RSI_OVERSOLD");
    assert_eq!(json[0]["severity"], "HIGH");
    assert_eq!(json[0]["action"], "BUY");
    assert!(json[0]["timestamp"].as_str().is_some_and(|ts| ts.ends_with('Z')));
}
