use std::sync::Arc;

use crate::classifiers::{DistributionTree, IncrementalLearner};
use crate::core::{AttributeIndex, Instance, Schema};
use crate::stats::correlation::{conditional_mutual_information, mutual_information};
use crate::stats::{ClassDist, Crosstab, PairClassDist};
use crate::utils::math::normalise;

/// Attributes sorted descending by mutual information with the class.
/// Stable, so ties keep ascending attribute order.
pub(crate) fn mi_descending_order(mi: &[f64]) -> Vec<AttributeIndex> {
    let mut order: Vec<AttributeIndex> = (0..mi.len()).collect();
    order.sort_by(|&a, &b| mi[b].partial_cmp(&mi[a]).expect("mutual information is finite"));
    order
}

/// Greedy KDB parent assignment: every attribute other than the top-ranked
/// receives up to `k` parents, chosen among the higher-ranked attributes
/// by descending conditional mutual information with it.
///
/// Each candidate is inserted into the attribute's parent list in sorted
/// position; once the list holds `k` parents, a later candidate with
/// strictly higher CMI displaces the weakest one.
pub(crate) fn assign_parents(
    order: &[AttributeIndex],
    cmi: &Crosstab<f64>,
    k: usize,
    parents: &mut [Vec<AttributeIndex>],
) {
    for list in parents.iter_mut() {
        list.clear();
    }
    if k == 0 || order.is_empty() {
        return;
    }

    for (pos, &att) in order.iter().enumerate().skip(1) {
        let list = &mut parents[att];
        list.push(order[0]);

        for &candidate in &order[1..pos] {
            if list.len() < k {
                // reserve a slot; overwritten below if a weaker parent
                // should yield its position
                list.push(candidate);
            }
            for i in 0..list.len() {
                if cmi.get(candidate, att) > cmi.get(list[i], att) {
                    for j in (i + 1..list.len()).rev() {
                        list[j] = list[j - 1];
                    }
                    list[i] = candidate;
                    break;
                }
            }
        }
    }
}

/// Sahami's k-dependence Bayesian classifier.
///
/// Two passes: the first accumulates pairwise statistics and, on
/// finalisation, fixes the attribute order and parent chains from mutual
/// information with the class and pairwise conditional mutual
/// information; the second populates one distribution tree per attribute
/// along the now-fixed chains, plus the class prior.
pub struct Kdb {
    pub(crate) k: usize,
    pub(crate) pass: usize,
    pub(crate) dist: Option<PairClassDist>,
    pub(crate) class_dist: Option<ClassDist>,
    pub(crate) trees: Vec<DistributionTree>,
    pub(crate) parents: Vec<Vec<AttributeIndex>>,
}

impl Kdb {
    /// `k` is the maximum number of attribute parents per attribute; it is
    /// clamped to the schema's attribute count minus one at reset.
    pub fn new(k: usize) -> Self {
        Self {
            k,
            pass: 1,
            dist: None,
            class_dist: None,
            trees: Vec::new(),
            parents: Vec::new(),
        }
    }

    pub fn parents(&self) -> &[Vec<AttributeIndex>] {
        &self.parents
    }

    pub(crate) fn reset_state(&mut self, schema: Arc<Schema>) {
        let num_attributes = schema.num_attributes();
        self.k = self.k.min(num_attributes.saturating_sub(1));

        self.trees.clear();
        self.trees
            .extend((0..num_attributes).map(|a| DistributionTree::new(schema.clone(), a)));
        self.parents.clear();
        self.parents.resize(num_attributes, Vec::new());

        self.class_dist = Some(ClassDist::new(&schema));
        self.dist = Some(PairClassDist::new(schema));
        self.pass = 1;
    }

    /// Pass-1 training: pairwise statistics.
    pub(crate) fn train_pass_one(&mut self, inst: &Instance) {
        self.dist
            .as_mut()
            .expect("learner used before reset")
            .update(inst);
    }

    /// Pass-2 training: populate the trees along the fixed chains.
    pub(crate) fn train_pass_two(&mut self, inst: &Instance) {
        for (a, tree) in self.trees.iter_mut().enumerate() {
            tree.update(inst, &self.parents[a]);
        }
        self.class_dist
            .as_mut()
            .expect("learner used before reset")
            .update(inst);
    }

    /// Finalises pass 1: learns the structure and releases the pairwise
    /// statistics. Returns the MI-descending attribute order.
    pub(crate) fn learn_structure(&mut self) -> Vec<AttributeIndex> {
        let dist = self.dist.as_mut().expect("learner used before reset");
        let mi = mutual_information(dist.attr_counts());
        let cmi = conditional_mutual_information(dist);
        dist.clear();

        let order = mi_descending_order(&mi);
        assign_parents(&order, &cmi, self.k, &mut self.parents);
        order
    }

    pub(crate) fn posterior_from_trees(&self, inst: &Instance, k_bound: Option<usize>) -> Vec<f64> {
        let class_dist = self.class_dist.as_ref().expect("learner used before reset");
        let mut posterior = vec![0.0; class_dist.num_classes()];

        // pre-scale to keep the running product away from underflow;
        // normalisation cancels the constant
        for (y, slot) in posterior.iter_mut().enumerate() {
            *slot = class_dist.p(y) * (f64::MAX / 2.0);
        }

        for tree in &self.trees {
            match k_bound {
                Some(k) => tree.update_class_distribution_for_k(&mut posterior, inst, k),
                None => tree.update_class_distribution(&mut posterior, inst),
            }
        }

        normalise(&mut posterior);
        posterior
    }
}

impl IncrementalLearner for Kdb {
    fn reset(&mut self, schema: Arc<Schema>) {
        self.reset_state(schema);
    }

    fn train(&mut self, inst: &Instance) {
        match self.pass {
            1 => self.train_pass_one(inst),
            2 => self.train_pass_two(inst),
            _ => unreachable!("training already finished"),
        }
    }

    fn finalise_pass(&mut self) {
        if self.pass == 1 {
            self.learn_structure();
        }
        self.pass += 1;
    }

    fn training_is_finished(&self) -> bool {
        self.pass > 2
    }

    fn classify(&self, inst: &Instance) -> Vec<f64> {
        self.posterior_from_trees(inst, None)
    }

    fn name(&self) -> &str {
        "kdb"
    }
}
