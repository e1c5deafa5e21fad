//! Feature derivation for trading-flow records.
//!
//! Turns raw [`TradingFlowRecord`]s into a fixed, ordered feature matrix.
//! The column order in [`FEATURE_COLUMNS`] is part of the model contract: the
//! scaler and forest are keyed by position, not by name.
//!
//! Normalization happens once, here:
//!
//! 1. Missing raw magnitudes become `0`.
//! 2. Missing derived columns are computed; supplied ones are kept verbatim.
//! 3. Non-finite values become missing, then each column is back-filled,
//!    forward-filled, and finally zero-filled.

use flowwatch_core::{TradeDate, TradingFlowRecord};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

pub const FEATURE_COUNT: usize = 9;

pub const FEATURE_COLUMNS: [&str; FEATURE_COUNT] = [
    "foreign_buy",
    "foreign_sell",
    "local_buy",
    "local_sell",
    "net_foreign",
    "net_local",
    "buy_sell_ratio",
    "foreign_ratio",
    "volume_ratio",
];

/// One row of model features, always finite after derivation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub foreign_buy: f64,
    pub foreign_sell: f64,
    pub local_buy: f64,
    pub local_sell: f64,
    pub net_foreign: f64,
    pub net_local: f64,
    pub buy_sell_ratio: f64,
    pub foreign_ratio: f64,
    pub volume_ratio: f64,
}

impl FeatureVector {
    pub fn to_array(&self) -> [f64; FEATURE_COUNT] {
        [
            self.foreign_buy,
            self.foreign_sell,
            self.local_buy,
            self.local_sell,
            self.net_foreign,
            self.net_local,
            self.buy_sell_ratio,
            self.foreign_ratio,
            self.volume_ratio,
        ]
    }

    pub fn from_array(values: [f64; FEATURE_COUNT]) -> Self {
        let [foreign_buy, foreign_sell, local_buy, local_sell, net_foreign, net_local, buy_sell_ratio, foreign_ratio, volume_ratio] =
            values;
        Self {
            foreign_buy,
            foreign_sell,
            local_buy,
            local_sell,
            net_foreign,
            net_local,
            buy_sell_ratio,
            foreign_ratio,
            volume_ratio,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.to_array().iter().all(|value| value.is_finite())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRow {
    pub date: Option<TradeDate>,
    pub features: FeatureVector,
}

/// Derived feature table for one dataset, in input row order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureTable {
    rows: Vec<FeatureRow>,
}

impl FeatureTable {
    pub fn from_records(records: &[TradingFlowRecord]) -> Self {
        derive_features(records)
    }

    pub fn rows(&self) -> &[FeatureRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Row-major `len x FEATURE_COUNT` matrix in [`FEATURE_COLUMNS`] order.
    pub fn to_matrix(&self) -> Array2<f64> {
        let mut matrix = Array2::zeros((self.rows.len(), FEATURE_COUNT));
        for (mut target, row) in matrix.rows_mut().into_iter().zip(&self.rows) {
            for (cell, value) in target.iter_mut().zip(row.features.to_array()) {
                *cell = value;
            }
        }
        matrix
    }

    /// Appends the rows of several tables, skipping empty ones.
    pub fn concat<'a>(tables: impl IntoIterator<Item = &'a FeatureTable>) -> Self {
        let rows = tables
            .into_iter()
            .filter(|table| !table.is_empty())
            .flat_map(|table| table.rows.iter().cloned())
            .collect();
        Self { rows }
    }
}

/// Normalizes flow records into a finite feature table. Does not modify
/// the input.
pub fn derive_features(records: &[TradingFlowRecord]) -> FeatureTable {
    let mut columns: Vec<[Option<f64>; FEATURE_COUNT]> =
        records.iter().map(candidate_values).collect();

    for column in 0..FEATURE_COUNT {
        fill_column(&mut columns, column);
    }

    let rows = records
        .iter()
        .zip(columns)
        .map(|(record, values)| FeatureRow {
            date: record.date,
            features: FeatureVector::from_array(values.map(|value| value.unwrap_or(0.0))),
        })
        .collect();

    FeatureTable { rows }
}

fn candidate_values(record: &TradingFlowRecord) -> [Option<f64>; FEATURE_COUNT] {
    let foreign_buy = record.foreign_buy.unwrap_or(0.0);
    let foreign_sell = record.foreign_sell.unwrap_or(0.0);
    let local_buy = record.local_buy.unwrap_or(0.0);
    let local_sell = record.local_sell.unwrap_or(0.0);

    let total_buy = foreign_buy + local_buy;
    let total_sell = foreign_sell + local_sell;

    let net_foreign = record.net_foreign.unwrap_or(foreign_buy - foreign_sell);
    let net_local = record.net_local.unwrap_or(local_buy - local_sell);
    // "+1" keeps both ratios finite when a side of the book is empty.
    let buy_sell_ratio = record
        .buy_sell_ratio
        .unwrap_or(total_buy / (total_sell + 1.0));
    let foreign_ratio = record
        .foreign_ratio
        .unwrap_or(foreign_buy / (total_buy + 1.0));
    let volume_ratio = record.volume_ratio.unwrap_or(buy_sell_ratio);

    [
        foreign_buy,
        foreign_sell,
        local_buy,
        local_sell,
        net_foreign,
        net_local,
        buy_sell_ratio,
        foreign_ratio,
        volume_ratio,
    ]
    .map(|value| value.is_finite().then_some(value))
}

fn fill_column(rows: &mut [[Option<f64>; FEATURE_COUNT]], column: usize) {
    let mut next_valid = None;
    for row in rows.iter_mut().rev() {
        match row[column] {
            Some(value) => next_valid = Some(value),
            None => row[column] = next_valid,
        }
    }

    let mut last_valid = None;
    for row in rows.iter_mut() {
        match row[column] {
            Some(value) => last_valid = Some(value),
            None => row[column] = last_valid,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(fb: f64, fs: f64, lb: f64, ls: f64) -> TradingFlowRecord {
        TradingFlowRecord::new(None, fb, fs, lb, ls).expect("valid record")
    }

    #[test]
    fn derives_net_flows_and_ratios() {
        let table = derive_features(&[record(50_000.0, 20_000.0, 80_000.0, 90_000.0)]);
        let features = table.rows()[0].features;

        assert_eq!(features.net_foreign, 30_000.0);
        assert_eq!(features.net_local, -10_000.0);
        assert_eq!(features.buy_sell_ratio, 130_000.0 / 110_001.0);
        assert_eq!(features.foreign_ratio, 50_000.0 / 130_001.0);
        assert_eq!(features.volume_ratio, features.buy_sell_ratio);
    }

    #[test]
    fn zero_book_keeps_ratios_finite() {
        let table = derive_features(&[TradingFlowRecord::default()]);
        let features = table.rows()[0].features;
        assert_eq!(features.buy_sell_ratio, 0.0);
        assert_eq!(features.foreign_ratio, 0.0);
        assert!(features.is_finite());
    }

    #[test]
    fn supplied_derived_values_are_not_overwritten() {
        let supplied = record(10.0, 5.0, 10.0, 5.0)
            .with_net_foreign(123.0)
            .with_volume_ratio(4.2);
        let features = derive_features(&[supplied]).rows()[0].features;

        assert_eq!(features.net_foreign, 123.0);
        assert_eq!(features.volume_ratio, 4.2);
        assert_eq!(features.net_local, 5.0);
    }

    #[test]
    fn non_finite_values_are_back_then_forward_filled() {
        let rows = vec![
            record(1.0, 1.0, 1.0, 1.0).with_buy_sell_ratio(f64::INFINITY),
            record(1.0, 1.0, 1.0, 1.0).with_buy_sell_ratio(2.5),
            record(1.0, 1.0, 1.0, 1.0).with_buy_sell_ratio(f64::NAN),
            record(1.0, 1.0, 1.0, 1.0).with_buy_sell_ratio(3.5),
            record(1.0, 1.0, 1.0, 1.0).with_buy_sell_ratio(f64::NEG_INFINITY),
        ];
        let ratios: Vec<f64> = derive_features(&rows)
            .rows()
            .iter()
            .map(|row| row.features.buy_sell_ratio)
            .collect();

        assert_eq!(ratios, vec![2.5, 2.5, 3.5, 3.5, 3.5]);
    }

    #[test]
    fn all_missing_column_is_zero_filled() {
        let rows = vec![
            record(1.0, 1.0, 1.0, 1.0).with_foreign_ratio(f64::NAN),
            record(1.0, 1.0, 1.0, 1.0).with_foreign_ratio(f64::NAN),
        ];
        let table = derive_features(&rows);
        assert!(table.rows().iter().all(|row| row.features.foreign_ratio == 0.0));
    }

    #[test]
    fn matrix_follows_column_order() {
        let table = derive_features(&[record(1.0, 2.0, 3.0, 4.0)]);
        let matrix = table.to_matrix();
        assert_eq!(matrix.dim(), (1, FEATURE_COUNT));
        assert_eq!(matrix[[0, 0]], 1.0);
        assert_eq!(matrix[[0, 3]], 4.0);
        assert_eq!(matrix[[0, 4]], -1.0);
    }

    #[test]
    fn concat_skips_empty_tables() {
        let a = derive_features(&[record(1.0, 1.0, 1.0, 1.0)]);
        let empty = FeatureTable::default();
        let b = derive_features(&[record(2.0, 2.0, 2.0, 2.0), record(3.0, 3.0, 3.0, 3.0)]);
        assert_eq!(FeatureTable::concat([&a, &empty, &b]).len(), 3);
    }
}
