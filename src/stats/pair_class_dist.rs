use std::sync::Arc;

use crate::core::{AttributeIndex, CatValue, Instance, InstanceCount, Schema};
use crate::stats::AttrClassDist;
use crate::stats::smoothing::{M, m_estimate};

/// Streaming joint counts over (value, value, class) for every unordered
/// pair of categorical attributes, with the first-order [`AttrClassDist`]
/// embedded.
///
/// Storage keeps one copy per pair, owned by the higher-indexed attribute:
/// `counts[x1][v1 * x1 + x2][v2 * num_classes + y]` with `x1 > x2`.
/// Accessors canonicalize the argument order, so lookups are symmetric.
#[derive(Debug, Clone)]
pub struct PairClassDist {
    schema: Arc<Schema>,
    attr_counts: AttrClassDist,
    counts: Vec<Vec<Vec<InstanceCount>>>,
}

impl PairClassDist {
    pub fn new(schema: Arc<Schema>) -> Self {
        let mut dist = Self {
            attr_counts: AttrClassDist::new(schema.clone()),
            counts: Vec::new(),
            schema,
        };
        let schema = dist.schema.clone();
        dist.reset(&schema);
        dist
    }

    pub fn reset(&mut self, schema: &Arc<Schema>) {
        self.schema = schema.clone();
        self.attr_counts.reset(schema);

        let num_classes = schema.num_classes();
        self.counts.clear();
        self.counts.resize(schema.num_attributes(), Vec::new());

        for x1 in 1..schema.num_attributes() {
            let mut planes = vec![Vec::new(); schema.num_values(x1) * x1];
            for v1 in 0..schema.num_values(x1) {
                for x2 in 0..x1 {
                    planes[v1 * x1 + x2] = vec![0; schema.num_values(x2) * num_classes];
                }
            }
            self.counts[x1] = planes;
        }
    }

    pub fn clear(&mut self) {
        self.attr_counts.clear();
        for planes in &mut self.counts {
            for plane in planes {
                plane.fill(0);
            }
        }
    }

    pub fn update(&mut self, inst: &Instance) {
        self.attr_counts.update(inst);

        let y = inst.class();
        let num_classes = self.schema.num_classes();

        for x1 in 1..self.counts.len() {
            let v1 = inst.value(x1);
            for x2 in 0..x1 {
                let v2 = inst.value(x2);
                self.counts[x1][v1 * x1 + x2][v2 * num_classes + y] += 1;
            }
        }
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// The embedded first-order (attribute, class) statistics.
    pub fn attr_counts(&self) -> &AttrClassDist {
        &self.attr_counts
    }

    pub fn num_attributes(&self) -> usize {
        self.counts.len()
    }

    pub fn num_classes(&self) -> usize {
        self.schema.num_classes()
    }

    /// count[X1 = v1, X2 = v2, Y = y], in either argument order.
    #[inline]
    pub fn count(
        &self,
        x1: AttributeIndex,
        v1: CatValue,
        x2: AttributeIndex,
        v2: CatValue,
        y: CatValue,
    ) -> InstanceCount {
        debug_assert_ne!(x1, x2, "pair counts are only kept for distinct attributes");
        let (x1, v1, x2, v2) = if x2 > x1 { (x2, v2, x1, v1) } else { (x1, v1, x2, v2) };
        self.counts[x1][v1 * x1 + x2][v2 * self.schema.num_classes() + y]
    }

    /// count[X1 = v1, X2 = v2], summed over classes.
    pub fn pair_count(
        &self,
        x1: AttributeIndex,
        v1: CatValue,
        x2: AttributeIndex,
        v2: CatValue,
    ) -> InstanceCount {
        (0..self.schema.num_classes())
            .map(|y| self.count(x1, v1, x2, v2, y))
            .sum()
    }

    /// P(X1 = v1 | X2 = v2, Y = y), m-estimate smoothed.
    pub fn p(
        &self,
        x1: AttributeIndex,
        v1: CatValue,
        x2: AttributeIndex,
        v2: CatValue,
        y: CatValue,
    ) -> f64 {
        m_estimate(
            self.count(x1, v1, x2, v2, y),
            self.attr_counts.count(x2, v2, y),
            self.schema.num_values(x1),
        )
    }

    /// Unsmoothed P(X1 = v1, X2 = v2, Y = y).
    pub fn raw_joint_p(
        &self,
        x1: AttributeIndex,
        v1: CatValue,
        x2: AttributeIndex,
        v2: CatValue,
        y: CatValue,
    ) -> f64 {
        self.count(x1, v1, x2, v2, y) as f64 / self.attr_counts.total() as f64
    }

    /// P(X1 = v1, X2 = v2, Y = y), m-estimate smoothed.
    pub fn joint_p(
        &self,
        x1: AttributeIndex,
        v1: CatValue,
        x2: AttributeIndex,
        v2: CatValue,
        y: CatValue,
    ) -> f64 {
        let cells = (self.schema.num_values(x1)
            * self.schema.num_values(x2)
            * self.schema.num_classes()) as f64;
        (self.count(x1, v1, x2, v2, y) as f64 + M / cells)
            / (self.attr_counts.total() as f64 + M)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::dummies::{scenario_instances, three_attribute_schema};

    fn trained() -> PairClassDist {
        // widen the scenario data to three attributes: the third mirrors
        // the first so pair counts stay easy to check by hand
        let schema = Arc::new(three_attribute_schema());
        let mut dist = PairClassDist::new(schema);
        for inst in scenario_instances() {
            let widened = Instance::new(
                vec![inst.value(0), inst.value(1), inst.value(0)],
                inst.class(),
            );
            dist.update(&widened);
        }
        dist
    }

    #[test]
    fn test_lookup_is_symmetric() {
        let dist = trained();
        for v1 in 0..2 {
            for v2 in 0..2 {
                for y in 0..2 {
                    assert_eq!(dist.count(2, v1, 0, v2, y), dist.count(0, v2, 2, v1, y));
                    assert_eq!(dist.count(1, v1, 0, v2, y), dist.count(0, v2, 1, v1, y));
                }
            }
        }
    }

    #[test]
    fn test_pair_marginal_matches_attr_counts() {
        let dist = trained();
        let xy = dist.attr_counts();
        for x1 in 1..dist.num_attributes() {
            for x2 in 0..x1 {
                for v1 in 0..dist.schema().num_values(x1) {
                    for y in 0..dist.num_classes() {
                        let sum: InstanceCount = (0..dist.schema().num_values(x2))
                            .map(|v2| dist.count(x1, v1, x2, v2, y))
                            .sum();
                        assert_eq!(sum, xy.count(x1, v1, y), "pair ({x1},{x2}) v1={v1} y={y}");
                    }
                }
            }
        }
    }

    #[test]
    fn test_duplicated_attribute_pairs_concentrate_counts() {
        let dist = trained();
        // attributes 0 and 2 are identical, so off-diagonal pair counts are zero
        for v in 0..2 {
            for y in 0..2 {
                assert_eq!(dist.count(2, v, 0, 1 - v, y), 0);
                assert_eq!(dist.count(2, v, 0, v, y), dist.attr_counts().count(0, v, y));
            }
        }
    }

    #[test]
    fn test_clear_then_reupdate_round_trip() {
        let mut dist = trained();
        let before = dist.count(1, 0, 0, 0, 0);
        dist.clear();
        assert_eq!(dist.attr_counts().total(), 0);
        assert_eq!(dist.count(1, 0, 0, 0, 0), 0);
        for inst in scenario_instances() {
            let widened = Instance::new(
                vec![inst.value(0), inst.value(1), inst.value(0)],
                inst.class(),
            );
            dist.update(&widened);
        }
        assert_eq!(dist.count(1, 0, 0, 0, 0), before);
    }
}
