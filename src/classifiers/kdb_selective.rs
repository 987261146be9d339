use std::sync::Arc;

use crate::classifiers::kdb::Kdb;
use crate::classifiers::IncrementalLearner;
use crate::core::{AttributeIndex, Instance, Schema};
use crate::utils::math::normalise;

/// Selective KDB: a KDB model plus a third pass of leave-one-out
/// cross-validation that scores every prefix of the MI-ranked attribute
/// order (and, optionally, every effective k up to the trained one) by
/// root-mean-squared error, then deactivates the attributes outside the
/// best-scoring prefix.
///
/// LOOCV reuses the pass-2 counts directly: each training instance's own
/// contribution is discounted from the estimates instead of retraining,
/// so the third pass costs one tree walk per attribute per instance.
pub struct SelectiveKdb {
    base: Kdb,
    selective_k: bool,
    order: Vec<AttributeIndex>,
    active: Vec<bool>,
    best_k: usize,
    /// fold_loss[pos] accumulates squared error for the prefix ending at
    /// order[pos]; the final slot is the class-prior-only model.
    fold_loss: Vec<f64>,
    /// One row per candidate depth, laid out like `fold_loss`.
    fold_loss_by_k: Vec<Vec<f64>>,
}

impl SelectiveKdb {
    /// With `selective_k` set, the third pass also scores every effective
    /// depth `0..=k` and classification uses the best (depth, prefix) pair;
    /// otherwise only prefixes at the full depth are scored.
    pub fn new(k: usize, selective_k: bool) -> Self {
        Self {
            base: Kdb::new(k),
            selective_k,
            order: Vec::new(),
            active: Vec::new(),
            best_k: k,
            fold_loss: Vec::new(),
            fold_loss_by_k: Vec::new(),
        }
    }

    /// Per-attribute activation flags after selection.
    pub fn active(&self) -> &[bool] {
        &self.active
    }

    /// The effective depth chosen by selection (`k` unless `selective_k`).
    pub fn best_k(&self) -> usize {
        self.best_k
    }

    pub fn parents(&self) -> &[Vec<AttributeIndex>] {
        self.base.parents()
    }

    fn squared_error(posterior: &[f64], true_class: usize) -> f64 {
        let mut normalised = posterior.to_vec();
        normalise(&mut normalised);
        let err = 1.0 - normalised[true_class];
        err * err
    }

    /// Seeds a posterior with the leave-one-out class prior, pre-scaled
    /// against underflow.
    fn loocv_prior(&self, inst: &Instance) -> Vec<f64> {
        let class_dist = self
            .base
            .class_dist
            .as_ref()
            .expect("learner used before reset");
        (0..class_dist.num_classes())
            .map(|y| class_dist.p_loocv(y, inst.class()) * (f64::MAX / 2.0))
            .collect()
    }

    /// Pass-3 training: evaluates every attribute prefix on this instance
    /// with its own observations discounted.
    fn train_loocv(&mut self, inst: &Instance) {
        let num_attributes = self.order.len();
        let true_class = inst.class();

        if self.selective_k {
            let mut posteriors = vec![self.loocv_prior(inst); self.base.k + 1];
            let prior_error = Self::squared_error(&posteriors[0], true_class);
            for row in self.fold_loss_by_k.iter_mut() {
                row[num_attributes] += prior_error;
            }

            for (pos, &att) in self.order.iter().enumerate() {
                self.base.trees[att].update_class_distribution_loocv_by_depth(&mut posteriors, inst);
                for (depth, posterior) in posteriors.iter().enumerate() {
                    self.fold_loss_by_k[depth][pos] += Self::squared_error(posterior, true_class);
                }
            }
        } else {
            let mut posterior = self.loocv_prior(inst);
            self.fold_loss[num_attributes] += Self::squared_error(&posterior, true_class);

            for (pos, &att) in self.order.iter().enumerate() {
                self.base.trees[att].update_class_distribution_loocv(&mut posterior, inst);
                self.fold_loss[pos] += Self::squared_error(&posterior, true_class);
            }
        }
    }

    /// Scans the prefix losses in ranking order and returns the RMSE and
    /// size of the best prefix. The full prefix is the default; a smaller
    /// prefix must beat it strictly, and among equal losses the smallest
    /// prefix encountered first wins.
    fn best_prefix(losses: &[f64], train_size: f64) -> (f64, usize) {
        let num_attributes = losses.len() - 1;
        let rmse = |loss: f64| (loss / train_size).sqrt();
        if num_attributes == 0 {
            return (rmse(losses[0]), 0);
        }

        let mut best_loss = rmse(losses[num_attributes - 1]);
        let mut best_size = num_attributes;
        // losses[num_attributes] is the class-prior-only model
        let class_only = rmse(losses[num_attributes]);
        if class_only < best_loss {
            best_loss = class_only;
            best_size = 0;
        }
        for (pos, &loss) in losses[..num_attributes].iter().enumerate() {
            let candidate = rmse(loss);
            if candidate < best_loss {
                best_loss = candidate;
                best_size = pos + 1;
            }
        }
        (best_loss, best_size)
    }

    /// Finalises pass 3: picks the best prefix (and depth, in `selective_k`
    /// mode) and deactivates everything outside it.
    fn select(&mut self) {
        let train_size = self
            .base
            .class_dist
            .as_ref()
            .expect("learner used before reset")
            .total() as f64;
        if train_size == 0.0 {
            return;
        }

        let best_size = if self.selective_k {
            self.best_k = 0;
            let (mut best_loss, mut size) = Self::best_prefix(&self.fold_loss_by_k[0], train_size);
            for depth in 1..self.fold_loss_by_k.len() {
                let (loss, candidate) = Self::best_prefix(&self.fold_loss_by_k[depth], train_size);
                if loss < best_loss {
                    best_loss = loss;
                    size = candidate;
                    self.best_k = depth;
                }
            }
            size
        } else {
            Self::best_prefix(&self.fold_loss, train_size).1
        };

        self.active.fill(false);
        for &att in &self.order[..best_size] {
            self.active[att] = true;
        }
    }
}

impl IncrementalLearner for SelectiveKdb {
    fn reset(&mut self, schema: Arc<Schema>) {
        let num_attributes = schema.num_attributes();
        self.base.reset_state(schema);

        self.order.clear();
        self.active.clear();
        self.active.resize(num_attributes, true);
        self.best_k = self.base.k;

        self.fold_loss.clear();
        self.fold_loss.resize(num_attributes + 1, 0.0);
        self.fold_loss_by_k.clear();
        self.fold_loss_by_k
            .resize(self.base.k + 1, vec![0.0; num_attributes + 1]);
    }

    fn train(&mut self, inst: &Instance) {
        match self.base.pass {
            1 => self.base.train_pass_one(inst),
            2 => self.base.train_pass_two(inst),
            3 => self.train_loocv(inst),
            _ => unreachable!("training already finished"),
        }
    }

    fn finalise_pass(&mut self) {
        match self.base.pass {
            1 => self.order = self.base.learn_structure(),
            2 => {}
            3 => self.select(),
            _ => unreachable!("training already finished"),
        }
        self.base.pass += 1;
    }

    fn training_is_finished(&self) -> bool {
        self.base.pass > 3
    }

    fn classify(&self, inst: &Instance) -> Vec<f64> {
        let class_dist = self
            .base
            .class_dist
            .as_ref()
            .expect("learner used before reset");
        let mut posterior: Vec<f64> = (0..class_dist.num_classes())
            .map(|y| class_dist.p(y) * (f64::MAX / 2.0))
            .collect();

        for tree in &self.base.trees {
            if !self.active[tree.target()] {
                continue;
            }
            if self.selective_k {
                tree.update_class_distribution_for_k(&mut posterior, inst, self.best_k);
            } else {
                tree.update_class_distribution(&mut posterior, inst);
            }
        }

        normalise(&mut posterior);
        posterior
    }

    fn name(&self) -> &str {
        "kdb-selective"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::dummies::three_attribute_schema;
    use crate::utils::math::sum;

    /// a0 copies the class; a1 and a2 are balanced noise.
    fn noisy_rows() -> Vec<Instance> {
        (0..16)
            .map(|i| Instance::new(vec![i % 2, (i / 2) % 2, (i / 4) % 2], i % 2))
            .collect()
    }

    fn trained(k: usize, selective_k: bool, rows: &[Instance]) -> SelectiveKdb {
        let mut learner = SelectiveKdb::new(k, selective_k);
        learner.reset(Arc::new(three_attribute_schema()));
        while !learner.training_is_finished() {
            for inst in rows {
                learner.train(inst);
            }
            learner.finalise_pass();
        }
        learner
    }

    #[test]
    fn test_three_passes_required() {
        let mut learner = SelectiveKdb::new(1, false);
        learner.reset(Arc::new(three_attribute_schema()));
        for _ in 0..3 {
            assert!(!learner.training_is_finished());
            learner.finalise_pass();
        }
        assert!(learner.training_is_finished());
    }

    #[test]
    fn test_noise_attributes_deactivated() {
        let learner = trained(1, false, &noisy_rows());
        assert!(learner.active()[0], "the predictive attribute must survive");
        assert!(
            !learner.active()[1] && !learner.active()[2],
            "leave-one-out scoring must prune the noise attributes: {:?}",
            learner.active()
        );
    }

    #[test]
    fn test_selection_preserves_classification() {
        let rows = noisy_rows();
        let learner = trained(1, false, &rows);
        for inst in &rows {
            let dist = learner.classify(inst);
            assert!((sum(&dist) - 1.0).abs() < 1e-9);
            assert!(
                dist[inst.class()] > 0.5,
                "class is a copy of a0, so prediction must be confident"
            );
        }
    }

    #[test]
    fn test_selective_k_picks_a_valid_depth() {
        let learner = trained(2, true, &noisy_rows());
        assert!(learner.best_k() <= 2);
        for inst in noisy_rows() {
            let dist = learner.classify(&inst);
            assert!((sum(&dist) - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_best_prefix_defaults_to_full_set() {
        // flat losses: nothing strictly beats the full prefix
        let losses = vec![4.0, 4.0, 4.0, 4.0];
        let (_, size) = SelectiveKdb::best_prefix(&losses, 16.0);
        assert_eq!(size, 3);

        // the class-only model strictly wins
        let losses = vec![4.0, 4.0, 4.0, 1.0];
        let (_, size) = SelectiveKdb::best_prefix(&losses, 16.0);
        assert_eq!(size, 0);

        // ties below the minimum resolve to the shortest prefix
        let losses = vec![2.0, 2.0, 3.0, 4.0];
        let (_, size) = SelectiveKdb::best_prefix(&losses, 16.0);
        assert_eq!(size, 1);
    }
}
