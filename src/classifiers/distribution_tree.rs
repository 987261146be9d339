use std::sync::Arc;

use crate::core::{AttributeIndex, CatValue, Instance, InstanceCount, Schema};
use crate::stats::smoothing::{m_estimate, m_estimate_loocv};

/// One node of a distribution tree: a flat (target value, class) count
/// table plus lazily allocated children indexed by the value of the
/// node's splitting attribute.
///
/// A node starts leaf-like (`split_on == None`). It is specialized into an
/// internal node the first time an update walks past it with another
/// parent left in the chain; from then on its splitting attribute is
/// fixed. An absent child is `None` — never a placeholder node.
#[derive(Debug, Clone)]
struct DtNode {
    /// counts[v * num_classes + y]
    counts: Vec<InstanceCount>,
    split_on: Option<AttributeIndex>,
    children: Vec<Option<Box<DtNode>>>,
}

impl DtNode {
    fn new(num_target_values: usize, num_classes: usize) -> Self {
        Self {
            counts: vec![0; num_target_values * num_classes],
            split_on: None,
            children: Vec::new(),
        }
    }

    #[inline]
    fn count(&self, v: CatValue, y: CatValue, num_classes: usize) -> InstanceCount {
        self.counts[v * num_classes + y]
    }

    #[inline]
    fn add(&mut self, v: CatValue, y: CatValue, num_classes: usize) {
        self.counts[v * num_classes + y] += 1;
    }

    /// count[parents-so-far, Y = y], summed over the target's values.
    fn class_total(&self, y: CatValue, num_classes: usize) -> InstanceCount {
        self.counts[y..].iter().step_by(num_classes).sum()
    }

    fn clear(&mut self) {
        self.counts.fill(0);
        self.children.clear();
        self.split_on = None;
    }
}

/// Recursive tree of conditional (target value, class) counts for one
/// attribute, keyed by the attribute's fixed parent chain.
///
/// The tree is trained by [`update`](Self::update) walks that lazily
/// allocate one child per observed parent value, and queried at
/// classification time by walks that degrade gracefully to the deepest
/// node the training data actually populated.
#[derive(Debug, Clone)]
pub struct DistributionTree {
    schema: Arc<Schema>,
    target: AttributeIndex,
    root: DtNode,
}

impl DistributionTree {
    pub fn new(schema: Arc<Schema>, target: AttributeIndex) -> Self {
        let root = DtNode::new(schema.num_values(target), schema.num_classes());
        Self {
            schema,
            target,
            root,
        }
    }

    pub fn target(&self) -> AttributeIndex {
        self.target
    }

    /// Zeroes all counts and discards the learned structure.
    pub fn clear(&mut self) {
        self.root.clear();
    }

    /// Counts the instance at the root and along its parent-chain path,
    /// allocating nodes on first visit.
    ///
    /// `parents` must be the same chain on every update of this tree;
    /// asserting otherwise indicates a bug in the structure learner.
    pub fn update(&mut self, inst: &Instance, parents: &[AttributeIndex]) {
        let y = inst.class();
        let v = inst.value(self.target);
        let num_classes = self.schema.num_classes();
        let num_target_values = self.schema.num_values(self.target);

        self.root.add(v, y, num_classes);

        let mut node = &mut self.root;
        for &p in parents {
            if node.split_on.is_none() || node.children.is_empty() {
                node.split_on = Some(p);
                node.children = (0..self.schema.num_values(p)).map(|_| None).collect();
            }
            assert_eq!(
                node.split_on,
                Some(p),
                "distribution tree for attribute {} split on a different parent",
                self.target
            );

            let child = node.children[inst.value(p)]
                .get_or_insert_with(|| Box::new(DtNode::new(num_target_values, num_classes)));
            child.add(v, y, num_classes);
            node = child;
        }
    }

    /// Multiplies `class_dist[y]` by P(target = v | parents-so-far, y) for
    /// every class, using the deepest node populated along the instance's
    /// parent-value path.
    pub fn update_class_distribution(&self, class_dist: &mut [f64], inst: &Instance) {
        let mut node = &self.root;
        while let Some(att) = node.split_on {
            match node.children[inst.value(att)].as_deref() {
                Some(next) => node = next,
                None => break,
            }
        }
        self.multiply_estimates(class_dist, node, inst);
    }

    /// As [`update_class_distribution`](Self::update_class_distribution)
    /// but descending at most `k` levels, for scoring a smaller effective
    /// k than the tree was trained with.
    pub fn update_class_distribution_for_k(
        &self,
        class_dist: &mut [f64],
        inst: &Instance,
        k: usize,
    ) {
        let mut node = &self.root;
        let mut depth = 0;
        while let Some(att) = node.split_on {
            if depth >= k {
                break;
            }
            match node.children[inst.value(att)].as_deref() {
                Some(next) => {
                    node = next;
                    depth += 1;
                }
                None => break,
            }
        }
        self.multiply_estimates(class_dist, node, inst);
    }

    /// Leave-one-out variant: the instance's own observation is discounted
    /// from the estimate, and the walk refuses to descend into a child
    /// that would retain fewer than one other observation of the
    /// instance's target value.
    pub fn update_class_distribution_loocv(&self, class_dist: &mut [f64], inst: &Instance) {
        let num_classes = self.schema.num_classes();
        let v = inst.value(self.target);

        let mut node = &self.root;
        while let Some(att) = node.split_on {
            let Some(next) = node.children[inst.value(att)].as_deref() else {
                break;
            };
            let remaining: InstanceCount =
                (0..num_classes).map(|y| next.count(v, y, num_classes)).sum();
            if remaining < 2 {
                break;
            }
            node = next;
        }
        self.multiply_loocv_estimates(class_dist, node, inst);
    }

    /// Leave-one-out query over every candidate depth in a single walk:
    /// `class_dists[d]` receives the estimate from the node at depth
    /// `min(d, deepest usable depth)`, so all of k = 0..=k_max can be
    /// scored from one traversal.
    pub fn update_class_distribution_loocv_by_depth(
        &self,
        class_dists: &mut [Vec<f64>],
        inst: &Instance,
    ) {
        debug_assert!(!class_dists.is_empty());
        let k_max = class_dists.len() - 1;
        let num_classes = self.schema.num_classes();
        let v = inst.value(self.target);

        let mut node = &self.root;
        let mut depth = 0;
        loop {
            self.multiply_loocv_estimates(&mut class_dists[depth], node, inst);
            if depth == k_max {
                return;
            }
            let Some(att) = node.split_on else { break };
            let Some(next) = node.children[inst.value(att)].as_deref() else {
                break;
            };
            let remaining: InstanceCount =
                (0..num_classes).map(|y| next.count(v, y, num_classes)).sum();
            if remaining < 2 {
                break;
            }
            node = next;
            depth += 1;
        }

        // deeper candidate depths fall back to the stopping node
        for d in depth + 1..=k_max {
            self.multiply_loocv_estimates(&mut class_dists[d], node, inst);
        }
    }

    fn multiply_estimates(&self, class_dist: &mut [f64], node: &DtNode, inst: &Instance) {
        let num_classes = self.schema.num_classes();
        let num_values = self.schema.num_values(self.target);
        let v = inst.value(self.target);

        for (y, slot) in class_dist.iter_mut().enumerate() {
            let total = node.class_total(y, num_classes);
            *slot *= m_estimate(node.count(v, y, num_classes), total, num_values);
        }
    }

    fn multiply_loocv_estimates(&self, class_dist: &mut [f64], node: &DtNode, inst: &Instance) {
        let num_classes = self.schema.num_classes();
        let num_values = self.schema.num_values(self.target);
        let v = inst.value(self.target);
        let true_class = inst.class();

        for (y, slot) in class_dist.iter_mut().enumerate() {
            let total = node.class_total(y, num_classes);
            *slot *= m_estimate_loocv(
                node.count(v, y, num_classes),
                total,
                num_values,
                y == true_class,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::smoothing::m_estimate;
    use crate::testing::dummies::three_attribute_schema;

    fn schema() -> Arc<Schema> {
        Arc::new(three_attribute_schema())
    }

    fn rows() -> Vec<Instance> {
        vec![
            Instance::new(vec![0, 0, 0], 0),
            Instance::new(vec![0, 0, 1], 0),
            Instance::new(vec![1, 0, 0], 1),
            Instance::new(vec![1, 1, 1], 1),
            Instance::new(vec![0, 1, 1], 0),
        ]
    }

    fn trained(parents: &[AttributeIndex]) -> DistributionTree {
        let mut tree = DistributionTree::new(schema(), 0);
        for inst in rows() {
            tree.update(&inst, parents);
        }
        tree
    }

    #[test]
    fn test_root_counts_marginal_over_parents() {
        let tree = trained(&[1, 2]);
        let num_classes = 2;
        // root holds plain (value, class) counts regardless of the chain
        assert_eq!(tree.root.count(0, 0, num_classes), 3);
        assert_eq!(tree.root.count(1, 1, num_classes), 2);
        assert_eq!(tree.root.class_total(0, num_classes), 3);
    }

    #[test]
    fn test_update_fixes_split_attribute() {
        let tree = trained(&[1, 2]);
        assert_eq!(tree.root.split_on, Some(1));
        let child = tree.root.children[0].as_deref().unwrap();
        assert_eq!(child.split_on, Some(2));
    }

    #[test]
    #[should_panic(expected = "split on a different parent")]
    fn test_conflicting_parent_chain_panics() {
        let mut tree = trained(&[1, 2]);
        tree.update(&Instance::new(vec![0, 0, 0], 0), &[2, 1]);
    }

    #[test]
    fn test_query_degrades_to_deepest_populated_node() {
        let mut tree = DistributionTree::new(schema(), 0);
        // only parent value 0 ever observed, so children[1] is absent
        tree.update(&Instance::new(vec![0, 0, 0], 0), &[1]);
        tree.update(&Instance::new(vec![1, 0, 0], 1), &[1]);

        let mut seen_parent = vec![1.0, 1.0];
        tree.update_class_distribution(&mut seen_parent, &Instance::new(vec![0, 0, 0], 0));

        let mut unseen_parent = vec![1.0, 1.0];
        tree.update_class_distribution(&mut unseen_parent, &Instance::new(vec![0, 1, 0], 0));

        // the unseen path must fall back to the root's unconditioned counts
        assert!((unseen_parent[0] - m_estimate(1, 1, 2)).abs() < 1e-12);
        assert!((seen_parent[0] - unseen_parent[0]).abs() < 1e-12);
    }

    #[test]
    fn test_depth_bounded_query_ignores_deeper_levels() {
        let tree = trained(&[1, 2]);
        let inst = Instance::new(vec![0, 0, 0], 0);

        let mut at_root = vec![1.0, 1.0];
        tree.update_class_distribution_for_k(&mut at_root, &inst, 0);

        // k = 0 must equal a query against an unsplit tree with the same root counts
        let mut root_only = DistributionTree::new(schema(), 0);
        for row in rows() {
            root_only.update(&row, &[]);
        }
        let mut unbounded_root = vec![1.0, 1.0];
        root_only.update_class_distribution(&mut unbounded_root, &inst);
        assert_eq!(at_root, unbounded_root);

        let mut full = vec![1.0, 1.0];
        tree.update_class_distribution(&mut full, &inst);
        let mut k2 = vec![1.0, 1.0];
        tree.update_class_distribution_for_k(&mut k2, &inst, 2);
        assert_eq!(full, k2);
    }

    #[test]
    fn test_loocv_discounts_own_observation() {
        let mut tree = DistributionTree::new(schema(), 0);
        for row in rows() {
            tree.update(&row, &[]);
        }
        let inst = Instance::new(vec![0, 0, 0], 0);

        let mut loocv = vec![1.0, 1.0];
        tree.update_class_distribution_loocv(&mut loocv, &inst);

        // class 0: one (v=0, y=0) observation removed from counts 3/3
        assert!((loocv[0] - m_estimate(2, 2, 2)).abs() < 1e-12);
        // class 1: counts untouched, total discounted
        assert!((loocv[1] - m_estimate(0, 1, 2)).abs() < 1e-12);
    }

    #[test]
    fn test_loocv_by_depth_matches_single_queries_at_each_depth() {
        let tree = trained(&[1, 2]);
        let inst = Instance::new(vec![0, 0, 0], 0);

        let mut by_depth = vec![vec![1.0, 1.0]; 3];
        tree.update_class_distribution_loocv_by_depth(&mut by_depth, &inst);

        // depth 0 must agree with a LOOCV query against an unsplit tree
        let mut root_only = DistributionTree::new(schema(), 0);
        for row in rows() {
            root_only.update(&row, &[]);
        }
        let mut at_root = vec![1.0, 1.0];
        root_only.update_class_distribution_loocv(&mut at_root, &inst);
        for y in 0..2 {
            assert!((by_depth[0][y] - at_root[y]).abs() < 1e-12);
        }

        // every depth's result is a valid finite probability factor
        for dist in &by_depth {
            for &p in dist {
                assert!(p.is_finite() && p > 0.0);
            }
        }
    }
}
