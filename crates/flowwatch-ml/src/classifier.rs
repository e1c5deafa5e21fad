//! Anomaly classification and explanation.
//!
//! Thresholds are relative to the batch being classified: by default a row
//! is anomalous when its score is below the 20th percentile of the batch,
//! and severity is bucketed by the 5th/10th/15th percentiles of that same
//! batch. Re-running on a different batch therefore moves the absolute cut.
//! [`ThresholdMode::Absolute`] pins the flagging cut to a fixed score instead.

use flowwatch_core::{
    format_thousands, AnomalyRecord, ClassifierConfig, ExplanationThresholds, Severity,
    ThresholdMode,
};
use tracing::debug;

use crate::features::FeatureVector;
use crate::scorer::{ScoredBatch, ScoredRow};
use crate::stats::percentile_sorted;

const EXPLANATION_SEPARATOR: &str = " | ";
const FALLBACK_EXPLANATION: &str = "Abnormal trading pattern detected by the model";

#[derive(Debug, Clone, Copy, PartialEq)]
struct Cutoffs {
    flag: f64,
    critical: f64,
    high: f64,
    medium: f64,
}

impl Cutoffs {
    fn severity(&self, score: f64) -> Severity {
        if score < self.critical {
            Severity::Critical
        } else if score < self.high {
            Severity::High
        } else if score < self.medium {
            Severity::Medium
        } else {
            Severity::Low
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AnomalyClassifier {
    config: ClassifierConfig,
}

impl AnomalyClassifier {
    pub fn new(config: ClassifierConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Flags anomalous rows of one scored batch, in input order.
    pub fn classify(&self, batch: &ScoredBatch) -> Vec<AnomalyRecord> {
        let Some(cutoffs) = self.cutoffs(batch) else {
            return Vec::new();
        };

        let anomalies: Vec<AnomalyRecord> = batch
            .rows
            .iter()
            .filter(|row| row.anomaly_score < cutoffs.flag)
            .map(|row| self.to_record(row, cutoffs.severity(row.anomaly_score)))
            .collect();

        debug!(
            rows = batch.len(),
            anomalies = anomalies.len(),
            threshold = cutoffs.flag,
            "classified detection batch"
        );
        anomalies
    }

    /// Concatenates every explanation rule that fires for `features`.
    pub fn explain(&self, features: &FeatureVector) -> String {
        explain(features, &self.config.explanation)
    }

    fn cutoffs(&self, batch: &ScoredBatch) -> Option<Cutoffs> {
        let mut sorted = batch.scores();
        if sorted.is_empty() {
            return None;
        }
        sorted.sort_by(f64::total_cmp);

        let flag = match self.config.threshold {
            ThresholdMode::BatchPercentile(q) => percentile_sorted(&sorted, q),
            ThresholdMode::Absolute(score) => score,
        };

        Some(Cutoffs {
            flag,
            critical: percentile_sorted(&sorted, self.config.critical_percentile),
            high: percentile_sorted(&sorted, self.config.high_percentile),
            medium: percentile_sorted(&sorted, self.config.medium_percentile),
        })
    }

    fn to_record(&self, row: &ScoredRow, severity: Severity) -> AnomalyRecord {
        let features = &row.features;
        AnomalyRecord {
            date: row.date,
            foreign_buy: features.foreign_buy,
            foreign_sell: features.foreign_sell,
            local_buy: features.local_buy,
            local_sell: features.local_sell,
            net_foreign: features.net_foreign,
            net_local: features.net_local,
            buy_sell_ratio: features.buy_sell_ratio,
            foreign_ratio: features.foreign_ratio,
            volume_ratio: features.volume_ratio,
            anomaly_score: row.anomaly_score,
            anomaly_confidence: row.anomaly_confidence,
            severity,
            explanation: self.explain(features),
            is_anomaly: true,
        }
    }
}

/// Rule-based explanation of a flow row. Rules are evaluated in a fixed
/// order and every rule that fires contributes one clause.
///
/// "Asing" and "bandar" are the local market's terms for foreign investors
/// and for a large coordinated player.
pub fn explain(features: &FeatureVector, thresholds: &ExplanationThresholds) -> String {
    let net_foreign = features.net_foreign;
    let net_local = features.net_local;
    let volume_ratio = features.volume_ratio;
    let mut clauses = Vec::new();

    if net_foreign.abs() > thresholds.foreign_net {
        let side = if net_foreign > 0.0 { "buy" } else { "sell" };
        clauses.push(format!(
            "Asing net {side} high: Rp {}M",
            format_thousands(net_foreign.abs())
        ));
    }

    if net_local.abs() > thresholds.local_net {
        let side = if net_local > 0.0 { "buy" } else { "sell" };
        clauses.push(format!(
            "Domestic net {side} high: Rp {}M",
            format_thousands(net_local.abs())
        ));
    }

    if net_foreign < -thresholds.foreign_net && net_local > thresholds.local_net {
        clauses.push(String::from(
            "Potential bandar accumulation: asing selling, strong domestic buying",
        ));
    } else if net_foreign > thresholds.foreign_net && net_local < -thresholds.local_net {
        clauses.push(String::from(
            "Potential bandar distribution: asing buying, domestic selling",
        ));
    }

    if volume_ratio > thresholds.buying_pressure {
        clauses.push(format!("Excess buying pressure: {volume_ratio:.2}x"));
    } else if volume_ratio < thresholds.selling_pressure {
        clauses.push(format!("Excess selling pressure: {volume_ratio:.2}x"));
    }

    if clauses.is_empty() {
        return String::from(FALLBACK_EXPLANATION);
    }
    clauses.join(EXPLANATION_SEPARATOR)
}
