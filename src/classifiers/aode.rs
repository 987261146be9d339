use std::sync::Arc;

use crate::classifiers::IncrementalLearner;
use crate::core::{Instance, Schema};
use crate::stats::smoothing::m_estimate;
use crate::stats::{AttrClassDist, PairClassDist};
use crate::utils::math::normalise;

/// Averaged one-dependence estimators: a single pass accumulating pairwise
/// counts, then an inference-time ensemble of SPODEs, one per attribute
/// acting as super-parent, averaged over the parents whose value for the
/// instance was observed in training.
///
/// Each SPODE seeds with P(y) * P(parent = v | y), so a single-attribute
/// ensemble collapses to exactly the naive Bayes posterior. If no parent
/// value was ever observed, inference falls back to naive Bayes outright.
pub struct Aode {
    dist: Option<PairClassDist>,
    training_finished: bool,
}

impl Aode {
    pub fn new() -> Self {
        Self {
            dist: None,
            training_finished: false,
        }
    }

    fn dist(&self) -> &PairClassDist {
        self.dist.as_ref().expect("learner used before reset")
    }

    fn nb_classify(xy: &AttrClassDist, inst: &Instance) -> Vec<f64> {
        let mut class_dist = vec![0.0; xy.num_classes()];
        for (y, slot) in class_dist.iter_mut().enumerate() {
            let mut p = xy.p_class(y) * (f64::MAX / 2.0);
            for a in 0..xy.num_attributes() {
                p *= xy.p(a, inst.value(a), y);
            }
            *slot = p;
        }
        normalise(&mut class_dist);
        class_dist
    }
}

impl Default for Aode {
    fn default() -> Self {
        Self::new()
    }
}

impl IncrementalLearner for Aode {
    fn reset(&mut self, schema: Arc<Schema>) {
        self.dist = Some(PairClassDist::new(schema));
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
        let xy = dist.attr_counts();
        let schema = dist.schema();
        let num_attributes = dist.num_attributes();
        let num_classes = dist.num_classes();

        // one scale share per SPODE so the summed ensemble cannot overflow
        let scale = f64::MAX / num_attributes as f64;

        let mut spode_probs = vec![vec![0.0; num_classes]; num_attributes];
        let mut active = vec![false; num_attributes];
        let mut delta = 0;

        for parent in 0..num_attributes {
            let pv = inst.value(parent);
            if xy.value_count(parent, pv) > 0 {
                delta += 1;
                active[parent] = true;
                for (y, slot) in spode_probs[parent].iter_mut().enumerate() {
                    *slot = xy.p_class(y) * scale * xy.p(parent, pv, y);
                }
            }
        }

        if delta == 0 {
            return Self::nb_classify(xy, inst);
        }

        for x1 in 1..num_attributes {
            let v1 = inst.value(x1);
            for x2 in 0..x1 {
                let v2 = inst.value(x2);
                for y in 0..num_classes {
                    let pair_count = dist.count(x1, v1, x2, v2, y);
                    spode_probs[x1][y] *=
                        m_estimate(pair_count, xy.count(x1, v1, y), schema.num_values(x2));
                    spode_probs[x2][y] *=
                        m_estimate(pair_count, xy.count(x2, v2, y), schema.num_values(x1));
                }
            }
        }

        let mut class_dist = vec![0.0; num_classes];
        for (parent, probs) in spode_probs.iter().enumerate() {
            if active[parent] {
                for (y, slot) in class_dist.iter_mut().enumerate() {
                    *slot += probs[y];
                }
            }
        }

        normalise(&mut class_dist);
        class_dist
    }

    fn name(&self) -> &str {
        "aode"
    }
}
