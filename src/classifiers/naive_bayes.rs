use std::sync::Arc;

use crate::classifiers::IncrementalLearner;
use crate::core::{Instance, Schema};
use crate::stats::AttrClassDist;
use crate::utils::math::normalise;

/// Naive Bayes: a single pass accumulating first-order (attribute, class)
/// counts, classification by P(y) * prod_a P(a = v | y) with m-estimate
/// smoothing.
pub struct NaiveBayes {
    dist: Option<AttrClassDist>,
    training_finished: bool,
}

impl NaiveBayes {
    pub fn new() -> Self {
        Self {
            dist: None,
            training_finished: false,
        }
    }

    fn dist(&self) -> &AttrClassDist {
        self.dist.as_ref().expect("learner used before reset")
    }
}

impl Default for NaiveBayes {
    fn default() -> Self {
        Self::new()
    }
}

impl IncrementalLearner for NaiveBayes {
    fn reset(&mut self, schema: Arc<Schema>) {
        self.dist = Some(AttrClassDist::new(schema));
        self.training_finished = false;
    }

    fn train(&mut self, inst: &Instance) {
        self.dist
            .as_mut()
            .expect("learner used before reset")
            .update(inst);
    }

    fn finalise_pass(&mut self) {
        self.training_finished = true;
    }

    fn training_is_finished(&self) -> bool {
        self.training_finished
    }

    fn classify(&self, inst: &Instance) -> Vec<f64> {
        let dist = self.dist();
        let mut class_dist = vec![0.0; dist.num_classes()];

        for (y, slot) in class_dist.iter_mut().enumerate() {
            let mut p = dist.p_class(y);
            for a in 0..dist.num_attributes() {
                p *= dist.p(a, inst.value(a), y);
            }
            *slot = p;
        }

        normalise(&mut class_dist);
        class_dist
    }

    fn name(&self) -> &str {
        "nb"
    }
}
