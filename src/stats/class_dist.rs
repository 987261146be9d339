use std::sync::Arc;

use crate::core::{CatValue, Instance, InstanceCount, Schema};
use crate::stats::smoothing::{m_estimate, m_estimate_loocv};

/// Streaming class distribution: one count per class plus the total.
///
/// Invariant: the per-class counts always sum to `total`.
#[derive(Debug, Clone)]
pub struct ClassDist {
    counts: Vec<InstanceCount>,
    total: InstanceCount,
}

impl ClassDist {
    pub fn new(schema: &Schema) -> Self {
        Self {
            counts: vec![0; schema.num_classes()],
            total: 0,
        }
    }

    /// Resizes against a new schema and zeroes all counts.
    pub fn reset(&mut self, schema: &Arc<Schema>) {
        self.counts.clear();
        self.counts.resize(schema.num_classes(), 0);
        self.total = 0;
    }

    /// Zeroes all counts without resizing.
    pub fn clear(&mut self) {
        self.counts.fill(0);
        self.total = 0;
    }

    pub fn update(&mut self, inst: &Instance) {
        self.counts[inst.class()] += 1;
        self.total += 1;
    }

    /// P(Y = y), m-estimate smoothed.
    pub fn p(&self, y: CatValue) -> f64 {
        m_estimate(self.counts[y], self.total, self.counts.len())
    }

    /// Unsmoothed P(Y = y). NaN when no instance has been observed.
    pub fn raw_p(&self, y: CatValue) -> f64 {
        self.counts[y] as f64 / self.total as f64
    }

    /// Leave-one-out P(Y = y) with an instance of class `held_out` removed.
    pub fn p_loocv(&self, y: CatValue, held_out: CatValue) -> f64 {
        m_estimate_loocv(self.counts[y], self.total, self.counts.len(), y == held_out)
    }

    pub fn count(&self, y: CatValue) -> InstanceCount {
        self.counts[y]
    }

    pub fn total(&self) -> InstanceCount {
        self.total
    }

    pub fn num_classes(&self) -> usize {
        self.counts.len()
    }
}
