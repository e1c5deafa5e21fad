//! Per-column standardization fitted on training data.

use ndarray::{Array2, ArrayView2, Axis};
use serde::{Deserialize, Serialize};

use crate::stats::mean_std;
use crate::ScorerError;

/// Column-wise `(x - mean) / std` transform. Constant columns use a unit
/// scale so they map to zero instead of dividing by zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    mean: Vec<f64>,
    scale: Vec<f64>,
}

impl StandardScaler {
    pub fn fit(data: ArrayView2<'_, f64>) -> Self {
        let (mean, scale) = data
            .axis_iter(Axis(1))
            .map(|column| {
                let (mean, std) = mean_std(&column.to_vec());
                let scale = if std > f64::EPSILON { std } else { 1.0 };
                (mean, scale)
            })
            .unzip();

        Self { mean, scale }
    }

    pub fn width(&self) -> usize {
        self.mean.len()
    }

    pub fn mean(&self) -> &[f64] {
        &self.mean
    }

    pub fn scale(&self) -> &[f64] {
        &self.scale
    }

    pub fn transform(&self, data: ArrayView2<'_, f64>) -> Result<Array2<f64>, ScorerError> {
        if data.ncols() != self.width() {
            return Err(ScorerError::FeatureWidthMismatch {
                expected: self.width(),
                got: data.ncols(),
            });
        }

        let mut scaled = data.to_owned();
        for (mut column, (mean, scale)) in scaled
            .axis_iter_mut(Axis(1))
            .zip(self.mean.iter().zip(&self.scale))
        {
            column.mapv_inplace(|value| (value - mean) / scale);
        }
        Ok(scaled)
    }
}
