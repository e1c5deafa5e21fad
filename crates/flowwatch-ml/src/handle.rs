use std::sync::{Arc, RwLock};

use tracing::info;

use crate::features::FeatureTable;
use crate::scorer::{OutlierScorer, ScoredBatch, TrainOutcome};
use crate::ScorerError;

/// Cloneable, thread-safe handle to the current scorer snapshot.
///
/// Readers take an `Arc` snapshot and score against it without holding the
/// lock. Retraining fits a new scorer off to the side and swaps the pointer,
/// so a snapshot is never mutated while it is being read.
#[derive(Debug, Clone)]
pub struct ScorerHandle {
    current: Arc<RwLock<Arc<OutlierScorer>>>,
}

impl ScorerHandle {
    pub fn new(scorer: OutlierScorer) -> Self {
        Self {
            current: Arc::new(RwLock::new(Arc::new(scorer))),
        }
    }

    pub fn snapshot(&self) -> Arc<OutlierScorer> {
        let current = self
            .current
            .read()
            .expect("scorer handle lock is not poisoned");
        Arc::clone(&*current)
    }

    pub fn is_trained(&self) -> bool {
        self.snapshot().is_trained()
    }

    pub fn detect(&self, features: &FeatureTable) -> Result<ScoredBatch, ScorerError> {
        self.snapshot().detect(features)
    }

    /// Installs `scorer` as the current snapshot.
    pub fn replace(&self, scorer: OutlierScorer) {
        let mut current = self
            .current
            .write()
            .expect("scorer handle lock is not poisoned");
        *current = Arc::new(scorer);
    }

    /// Trains a fresh scorer with the current configuration and swaps it in.
    /// A skipped or failed training run leaves the current snapshot in place.
    pub fn retrain(&self, datasets: &[FeatureTable]) -> Result<TrainOutcome, ScorerError> {
        let config = *self.snapshot().config();
        let mut next = OutlierScorer::new(config);
        let outcome = next.train(datasets)?;
        if let TrainOutcome::Trained { rows } = outcome {
            self.replace(next);
            info!(rows, "scorer snapshot replaced");
        }
        Ok(outcome)
    }
}

impl Default for ScorerHandle {
    fn default() -> Self {
        Self::new(OutlierScorer::default())
    }
}
