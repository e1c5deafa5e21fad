//! Behavior-driven tests for anomaly detection
//!
//! These tests verify what a caller observes when scoring and classifying
//! trading-flow tables: finiteness, thresholds, severity tiers and
//! explanation text.

use flowwatch_core::{ClassifierConfig, Severity, ThresholdMode, TradingFlowRecord};
use flowwatch_ml::{derive_features, AnomalyClassifier, ScorerError};
use flowwatch_tests::{simulated_table, start_date, trained_scorer};

// =============================================================================
// Feature derivation
// =============================================================================

#[test]
fn when_flow_rows_have_gaps_derived_features_are_still_finite() {
    // Given: A table with missing raw columns and zero denominators
    let rows = vec![
        TradingFlowRecord::default(),
        TradingFlowRecord {
            foreign_buy: Some(120_000.0),
            local_sell: Some(0.0),
            ..TradingFlowRecord::default()
        },
        TradingFlowRecord::new(None, 0.0, 0.0, 0.0, 0.0).expect("valid record"),
        TradingFlowRecord {
            local_buy: Some(50_000.0),
            ..TradingFlowRecord::default()
        }
        .with_volume_ratio(f64::INFINITY),
    ];

    // When: Features are derived
    let table = derive_features(&rows);

    // Then: Every value reaching the scorer is finite
    assert_eq!(table.len(), 4);
    assert!(table.rows().iter().all(|row| row.features.is_finite()));
}

#[test]
fn when_caller_supplies_derived_columns_they_are_kept() {
    // Given: A row with a custom volume ratio override
    let record = TradingFlowRecord::new(None, 100.0, 50.0, 200.0, 100.0)
        .expect("valid record")
        .with_volume_ratio(3.25);

    // When: Features are derived
    let table = derive_features(&[record]);
    let features = table.rows()[0].features;

    // Then: The override wins and the rest is computed with the +1 denominators
    assert_eq!(features.volume_ratio, 3.25);
    assert_eq!(features.net_foreign, 50.0);
    assert_eq!(features.buy_sell_ratio, 300.0 / 151.0);
    assert_eq!(features.foreign_ratio, 100.0 / 301.0);
}

// =============================================================================
// Detection and classification
// =============================================================================

#[test]
fn when_batch_is_classified_about_a_fifth_of_rows_are_flagged() {
    // Given: A trained scorer and a fresh batch of 100 days
    let scorer = trained_scorer(7, 240);
    let batch = scorer
        .detect(&simulated_table(99, 100))
        .expect("detect should succeed");

    // When: The batch is classified with the default 20th-percentile rule
    let anomalies = AnomalyClassifier::new(ClassifierConfig::default()).classify(&batch);

    // Then: Roughly floor(0.2 * 100) rows are flagged, all explained
    assert!(
        (19..=21).contains(&anomalies.len()),
        "flagged {} rows",
        anomalies.len()
    );
    assert!(anomalies.iter().all(|a| a.is_anomaly && !a.explanation.is_empty()));
    assert!(anomalies
        .iter()
        .all(|a| a.anomaly_confidence > 0.0 && a.anomaly_confidence <= 0.5));
}

#[test]
fn when_anomalies_are_flagged_severity_tiers_partition_them() {
    // Given: A classified batch
    let scorer = trained_scorer(3, 200);
    let batch = scorer.detect(&simulated_table(4, 200)).expect("detect");
    let anomalies = AnomalyClassifier::default().classify(&batch);

    // When: Anomalies are grouped by severity
    let count = |severity: Severity| anomalies.iter().filter(|a| a.severity == severity).count();
    let critical = count(Severity::Critical);
    let high = count(Severity::High);
    let medium = count(Severity::Medium);
    let low = count(Severity::Low);

    // Then: Every flagged row lands in exactly one tier, worst scores first
    assert_eq!(critical + high + medium + low, anomalies.len());
    assert!((9..=11).contains(&critical), "critical = {critical}");

    let worst_low = anomalies
        .iter()
        .filter(|a| a.severity == Severity::Low)
        .map(|a| a.anomaly_score)
        .fold(f64::INFINITY, f64::min);
    let best_critical = anomalies
        .iter()
        .filter(|a| a.severity == Severity::Critical)
        .map(|a| a.anomaly_score)
        .fold(f64::NEG_INFINITY, f64::max);
    assert!(best_critical < worst_low);
}

#[test]
fn when_absolute_threshold_is_configured_only_scores_below_it_are_flagged() {
    // Given: A scorer and a classifier pinned to the model's own boundary
    let scorer = trained_scorer(5, 200);
    let batch = scorer.detect(&simulated_table(6, 150)).expect("detect");
    let classifier = AnomalyClassifier::new(ClassifierConfig {
        threshold: ThresholdMode::Absolute(0.0),
        ..ClassifierConfig::default()
    });

    // When: The batch is classified
    let anomalies = classifier.classify(&batch);

    // Then: The flagged rows are exactly the model's own outliers
    let model_outliers = batch.rows.iter().filter(|row| row.model_outlier).count();
    assert_eq!(anomalies.len(), model_outliers);
    assert!(anomalies.iter().all(|a| a.anomaly_score < 0.0));
}

#[test]
fn when_foreign_sells_into_domestic_buying_explanation_names_accumulation() {
    // Given: A day where asing sold 40,000 and domestic investors bought 60,000 net
    let record = TradingFlowRecord::new(Some(start_date()), 10_000.0, 50_000.0, 80_000.0, 20_000.0)
        .expect("valid record");
    let features = derive_features(&[record]).rows()[0].features;

    // When: The row is explained
    let explanation = AnomalyClassifier::default().explain(&features);

    // Then: Both the net-sell clause and the accumulation pattern appear
    assert!(explanation.contains("Asing net sell high: Rp 40,000M"), "{explanation}");
    assert!(explanation.contains("Domestic net buy high: Rp 60,000M"), "{explanation}");
    assert!(explanation.contains("bandar accumulation"), "{explanation}");
}

#[test]
fn when_no_rule_fires_explanation_falls_back_to_generic_text() {
    // Given: A quiet, balanced day
    let record = TradingFlowRecord::new(None, 1_000.0, 1_000.0, 1_000.0, 1_000.0).expect("record");
    let features = derive_features(&[record]).rows()[0].features;

    // When: The row is explained
    let explanation = AnomalyClassifier::default().explain(&features);

    // Then: The generic model explanation is returned
    assert_eq!(explanation, "Abnormal trading pattern detected by the model");
}

#[test]
fn when_detect_runs_before_training_it_fails_with_not_trained() {
    // Given: An untrained scorer
    let scorer = flowwatch_ml::OutlierScorer::default();

    // When: Detection is requested, even on an empty table
    let empty = scorer.detect(&derive_features(&[]));
    let full = scorer.detect(&simulated_table(1, 10));

    // Then: Both fail with NotTrained
    assert!(matches!(empty, Err(ScorerError::NotTrained)));
    assert!(matches!(full, Err(ScorerError::NotTrained)));
}
