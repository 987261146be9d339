//! Aggregated prediction quality over a test stream.

use crate::core::{CatValue, InstanceCount};
use crate::stats::Crosstab;
use crate::stats::correlation::matthews_correlation;

/// Square (truth, prediction) count matrix with the summary measures the
/// drivers report: accuracy and multi-class Matthews correlation.
#[derive(Debug, Clone)]
pub struct ConfusionMatrix {
    counts: Crosstab<InstanceCount>,
    total: InstanceCount,
}

impl ConfusionMatrix {
    pub fn new(num_classes: usize) -> Self {
        Self {
            counts: Crosstab::new(num_classes),
            total: 0,
        }
    }

    pub fn clear(&mut self) {
        self.counts.fill(0);
        self.total = 0;
    }

    pub fn add(&mut self, truth: CatValue, predicted: CatValue) {
        self.counts.add(truth, predicted, 1);
        self.total += 1;
    }

    pub fn count(&self, truth: CatValue, predicted: CatValue) -> InstanceCount {
        self.counts.get(truth, predicted)
    }

    pub fn total(&self) -> InstanceCount {
        self.total
    }

    /// Fraction of predictions on the diagonal. NaN before any `add`.
    pub fn accuracy(&self) -> f64 {
        let correct: InstanceCount = (0..self.counts.dim())
            .map(|y| self.counts.get(y, y))
            .sum();
        correct as f64 / self.total as f64
    }

    /// Multi-class Matthews correlation coefficient, in [-1, 1].
    pub fn mcc(&self) -> f64 {
        matthews_correlation(&self.counts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accuracy_counts_diagonal() {
        let mut cm = ConfusionMatrix::new(2);
        cm.add(0, 0);
        cm.add(0, 0);
        cm.add(1, 1);
        cm.add(1, 0);
        assert_eq!(cm.total(), 4);
        assert_eq!(cm.count(1, 0), 1);
        assert!((cm.accuracy() - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_mcc_signs() {
        let mut perfect = ConfusionMatrix::new(2);
        for _ in 0..4 {
            perfect.add(0, 0);
            perfect.add(1, 1);
        }
        assert!((perfect.mcc() - 1.0).abs() < 1e-12);

        let mut inverted = ConfusionMatrix::new(2);
        for _ in 0..4 {
            inverted.add(0, 1);
            inverted.add(1, 0);
        }
        assert!((inverted.mcc() + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_clear_resets_counts() {
        let mut cm = ConfusionMatrix::new(3);
        cm.add(2, 1);
        cm.clear();
        assert_eq!(cm.total(), 0);
        assert_eq!(cm.count(2, 1), 0);
    }
}
