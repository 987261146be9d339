use std::collections::BTreeSet;
use std::sync::Arc;

use crate::classifiers::IncrementalLearner;
use crate::core::{AttributeIndex, Instance, Schema};
use crate::stats::correlation::conditional_mutual_information;
use crate::stats::{Crosstab, PairClassDist};
use crate::utils::math::normalise;

/// Tree-augmented naive Bayes: a single pass accumulating pairwise
/// (value, value, class) counts, then a Chow-Liu maximum spanning tree
/// over class-conditional mutual information so every attribute gets at
/// most one attribute parent besides the class.
pub struct Tan {
    dist: Option<PairClassDist>,
    parents: Vec<Option<AttributeIndex>>,
    training_finished: bool,
}

impl Tan {
    pub fn new() -> Self {
        Self {
            dist: None,
            parents: Vec::new(),
            training_finished: false,
        }
    }

    /// The learned parent map: `None` for the root (class-only parent).
    pub fn parents(&self) -> &[Option<AttributeIndex>] {
        &self.parents
    }

    fn dist(&self) -> &PairClassDist {
        self.dist.as_ref().expect("learner used before reset")
    }

    /// Prim-style maximum spanning tree rooted at attribute 0. Ties are
    /// broken towards the lowest-indexed candidate, which is the first one
    /// encountered in the ascending scan.
    fn maximum_spanning_tree(cmi: &Crosstab<f64>, parents: &mut [Option<AttributeIndex>]) {
        let num_attributes = parents.len();
        if num_attributes == 0 {
            return;
        }

        parents[0] = None;

        let mut max_weight = vec![f64::NEG_INFINITY; num_attributes];
        let mut best_so_far = vec![0; num_attributes];
        let mut available = BTreeSet::new();
        let mut top_candidate = 0;

        for a in 1..num_attributes {
            max_weight[a] = cmi.get(0, a);
            if cmi.get(0, a) > max_weight[top_candidate] {
                top_candidate = a;
            }
            best_so_far[a] = 0;
            available.insert(a);
        }

        while !available.is_empty() {
            let current = top_candidate;
            parents[current] = Some(best_so_far[current]);
            available.remove(&current);

            if let Some(&first) = available.first() {
                top_candidate = first;
                for &a in &available {
                    if max_weight[a] < cmi.get(current, a) {
                        max_weight[a] = cmi.get(current, a);
                        best_so_far[a] = current;
                    }
                    if max_weight[a] > max_weight[top_candidate] {
                        top_candidate = a;
                    }
                }
            }
        }
    }
}

impl Default for Tan {
    fn default() -> Self {
        Self::new()
    }
}

impl IncrementalLearner for Tan {
    fn reset(&mut self, schema: Arc<Schema>) {
        self.parents.clear();
        self.parents.resize(schema.num_attributes(), None);
        self.dist = Some(PairClassDist::new(schema));
        self.training_finished = false;
    }

    fn initialise_pass(&mut self) {
        debug_assert!(!self.training_finished);
    }

    fn train(&mut self, inst: &Instance) {
        self.dist
            .as_mut()
            .expect("learner used before reset")
            .update(inst);
    }

    fn finalise_pass(&mut self) {
        let cmi = conditional_mutual_information(self.dist());
        Self::maximum_spanning_tree(&cmi, &mut self.parents);
        self.training_finished = true;
    }

    fn training_is_finished(&self) -> bool {
        self.training_finished
    }

    fn classify(&self, inst: &Instance) -> Vec<f64> {
        let dist = self.dist();
        let xy = dist.attr_counts();
        let mut class_dist = vec![0.0; dist.num_classes()];

        // pre-scale to keep the running product away from underflow;
        // normalisation cancels the constant
        for (y, slot) in class_dist.iter_mut().enumerate() {
            *slot = xy.p_class(y) * (f64::MAX / 2.0);
        }

        for (x1, parent) in self.parents.iter().enumerate() {
            match parent {
                None => {
                    for (y, slot) in class_dist.iter_mut().enumerate() {
                        *slot *= xy.p(x1, inst.value(x1), y);
                    }
                }
                Some(p) => {
                    for (y, slot) in class_dist.iter_mut().enumerate() {
                        *slot *= dist.p(x1, inst.value(x1), *p, inst.value(*p), y);
                    }
                }
            }
        }

        normalise(&mut class_dist);
        class_dist
    }

    fn name(&self) -> &str {
        "tan"
    }
}
