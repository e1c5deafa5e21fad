//! Isolation Forest outlier ensemble.
//!
//! Anomalies are isolated by fewer random axis-aligned splits than normal
//! points, so their average path length across the ensemble is shorter.
//! Raw scores follow `-(2^(-E[h(x)] / c(psi)))`; the decision function
//! subtracts an offset fitted so that `contamination` of the training rows
//! fall below zero. Higher decision scores are more normal.

use ndarray::{ArrayView1, ArrayView2};
use rand::rngs::StdRng;
use rand::seq::index;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::stats::percentile;

const EULER_GAMMA: f64 = 0.577_215_664_901_532_9;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
enum IsolationNode {
    Split {
        feature: usize,
        threshold: f64,
        left: Box<IsolationNode>,
        right: Box<IsolationNode>,
    },
    Leaf {
        size: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct IsolationTree {
    root: IsolationNode,
}

impl IsolationTree {
    fn build(data: ArrayView2<'_, f64>, sample: Vec<usize>, max_depth: usize, rng: &mut StdRng) -> Self {
        Self {
            root: build_node(data, sample, 0, max_depth, rng),
        }
    }

    fn path_length(&self, row: ArrayView1<'_, f64>) -> f64 {
        let mut node = &self.root;
        let mut depth = 0usize;
        loop {
            match node {
                IsolationNode::Leaf { size } => return depth as f64 + average_path_length(*size),
                IsolationNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    node = if row[*feature] < *threshold { left } else { right };
                    depth += 1;
                }
            }
        }
    }
}

fn build_node(
    data: ArrayView2<'_, f64>,
    indices: Vec<usize>,
    depth: usize,
    max_depth: usize,
    rng: &mut StdRng,
) -> IsolationNode {
    if depth >= max_depth || indices.len() <= 1 {
        return IsolationNode::Leaf {
            size: indices.len(),
        };
    }

    // Visit features in random order and split on the first non-constant one.
    let n_features = data.ncols();
    let mut candidates: Vec<usize> = (0..n_features).collect();
    for remaining in (1..=n_features).rev() {
        let pick = rng.gen_range(0..remaining);
        let feature = candidates.swap_remove(pick);

        let (min, max) = indices.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &i| {
            let value = data[[i, feature]];
            (lo.min(value), hi.max(value))
        });
        if max - min <= f64::EPSILON * max.abs().max(1.0) {
            continue;
        }

        let size = indices.len();
        let threshold = rng.gen_range(min..max);
        let (left, right): (Vec<usize>, Vec<usize>) = indices
            .into_iter()
            .partition(|&i| data[[i, feature]] < threshold);
        if left.is_empty() || right.is_empty() {
            return IsolationNode::Leaf { size };
        }

        return IsolationNode::Split {
            feature,
            threshold,
            left: Box::new(build_node(data, left, depth + 1, max_depth, rng)),
            right: Box::new(build_node(data, right, depth + 1, max_depth, rng)),
        };
    }

    IsolationNode::Leaf {
        size: indices.len(),
    }
}

/// Average path length of an unsuccessful binary-search-tree lookup over
/// `n` points; normalizes path lengths across sample sizes.
pub fn average_path_length(n: usize) -> f64 {
    match n {
        0 | 1 => 0.0,
        2 => 1.0,
        _ => {
            let n = n as f64;
            2.0 * ((n - 1.0).ln() + EULER_GAMMA) - 2.0 * (n - 1.0) / n
        }
    }
}

/// Fitted isolation forest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IsolationForest {
    trees: Vec<IsolationTree>,
    sample_size: usize,
    offset: f64,
}

impl IsolationForest {
    /// Fits `n_estimators` trees on sub-samples of `max_samples` rows (capped
    /// at the row count) drawn without replacement. Deterministic for a given
    /// `seed`. Returns `None` when `data` has no rows or `n_estimators` is 0.
    pub fn fit(
        data: ArrayView2<'_, f64>,
        n_estimators: usize,
        max_samples: usize,
        contamination: f64,
        seed: u64,
    ) -> Option<Self> {
        let n_rows = data.nrows();
        if n_rows == 0 || n_estimators == 0 {
            return None;
        }

        let sample_size = max_samples.clamp(1, n_rows);
        let max_depth = (sample_size.max(2) as f64).log2().ceil() as usize;
        let mut rng = StdRng::seed_from_u64(seed);

        let trees = (0..n_estimators)
            .map(|_| {
                let sample = index::sample(&mut rng, n_rows, sample_size).into_vec();
                IsolationTree::build(data, sample, max_depth, &mut rng)
            })
            .collect();

        let mut forest = Self {
            trees,
            sample_size,
            offset: 0.0,
        };
        let training_scores = forest.score_samples(data);
        forest.offset = percentile(&training_scores, contamination * 100.0).unwrap_or(-0.5);
        Some(forest)
    }

    pub fn n_estimators(&self) -> usize {
        self.trees.len()
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Opposite of the classic anomaly score; lower is more anomalous.
    pub fn score_samples(&self, data: ArrayView2<'_, f64>) -> Vec<f64> {
        let normalizer = average_path_length(self.sample_size);
        data.rows()
            .into_iter()
            .map(|row| {
                let mean_path = self
                    .trees
                    .iter()
                    .map(|tree| tree.path_length(row))
                    .sum::<f64>()
                    / self.trees.len() as f64;
                if normalizer > 0.0 {
                    -(2.0_f64.powf(-mean_path / normalizer))
                } else {
                    -0.5
                }
            })
            .collect()
    }

    /// Offset-adjusted scores: negative for outliers, positive for inliers.
    pub fn decision_function(&self, data: ArrayView2<'_, f64>) -> Vec<f64> {
        self.score_samples(data)
            .into_iter()
            .map(|score| score - self.offset)
            .collect()
    }
}
