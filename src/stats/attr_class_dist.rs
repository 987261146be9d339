use std::sync::Arc;

use crate::core::{AttributeIndex, CatValue, Instance, InstanceCount, Schema};
use crate::stats::smoothing::{M, m_estimate};

/// Streaming joint counts over (attribute value, class) for every
/// categorical attribute, plus the class counts and grand total.
///
/// Per attribute the (value, class) plane is kept flattened row-major by
/// value then class, the layout the classifiers iterate in.
#[derive(Debug, Clone)]
pub struct AttrClassDist {
    schema: Arc<Schema>,
    /// counts[a][v * num_classes + y]
    counts: Vec<Vec<InstanceCount>>,
    class_counts: Vec<InstanceCount>,
    total: InstanceCount,
}

impl AttrClassDist {
    pub fn new(schema: Arc<Schema>) -> Self {
        let mut dist = Self {
            counts: Vec::new(),
            class_counts: Vec::new(),
            total: 0,
            schema,
        };
        let schema = dist.schema.clone();
        dist.reset(&schema);
        dist
    }

    pub fn reset(&mut self, schema: &Arc<Schema>) {
        self.schema = schema.clone();
        let num_classes = schema.num_classes();
        self.counts.clear();
        self.counts.extend(
            (0..schema.num_attributes()).map(|a| vec![0; schema.num_values(a) * num_classes]),
        );
        self.class_counts.clear();
        self.class_counts.resize(num_classes, 0);
        self.total = 0;
    }

    pub fn clear(&mut self) {
        for plane in &mut self.counts {
            plane.fill(0);
        }
        self.class_counts.fill(0);
        self.total = 0;
    }

    pub fn update(&mut self, inst: &Instance) {
        let y = inst.class();
        let num_classes = self.class_counts.len();
        self.total += 1;
        self.class_counts[y] += 1;
        for (a, plane) in self.counts.iter_mut().enumerate() {
            plane[inst.value(a) * num_classes + y] += 1;
        }
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    pub fn num_attributes(&self) -> usize {
        self.counts.len()
    }

    pub fn num_classes(&self) -> usize {
        self.class_counts.len()
    }

    /// count[A = v, Y = y]
    #[inline]
    pub fn count(&self, a: AttributeIndex, v: CatValue, y: CatValue) -> InstanceCount {
        self.counts[a][v * self.class_counts.len() + y]
    }

    /// count[A = v], summed over classes.
    pub fn value_count(&self, a: AttributeIndex, v: CatValue) -> InstanceCount {
        self.class_row(a, v).iter().sum()
    }

    /// count[Y = y]
    #[inline]
    pub fn class_count(&self, y: CatValue) -> InstanceCount {
        self.class_counts[y]
    }

    pub fn total(&self) -> InstanceCount {
        self.total
    }

    /// The per-class counts for A = v, one entry per class.
    #[inline]
    pub fn class_row(&self, a: AttributeIndex, v: CatValue) -> &[InstanceCount] {
        let num_classes = self.class_counts.len();
        &self.counts[a][v * num_classes..(v + 1) * num_classes]
    }

    /// P(A = v | Y = y), m-estimate smoothed.
    pub fn p(&self, a: AttributeIndex, v: CatValue, y: CatValue) -> f64 {
        m_estimate(self.count(a, v, y), self.class_counts[y], self.schema.num_values(a))
    }

    /// P(A = v, Y = y), m-estimate smoothed.
    pub fn joint_p(&self, a: AttributeIndex, v: CatValue, y: CatValue) -> f64 {
        let cells = (self.schema.num_values(a) * self.schema.num_classes()) as f64;
        (self.count(a, v, y) as f64 + M / cells) / (self.total as f64 + M)
    }

    /// P(A = v), m-estimate smoothed.
    pub fn p_value(&self, a: AttributeIndex, v: CatValue) -> f64 {
        m_estimate(self.value_count(a, v), self.total, self.schema.num_values(a))
    }

    /// P(Y = y), m-estimate smoothed.
    pub fn p_class(&self, y: CatValue) -> f64 {
        m_estimate(self.class_counts[y], self.total, self.schema.num_classes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::dummies::{binary_pair_schema, scenario_instances};

    fn trained() -> AttrClassDist {
        let schema = Arc::new(binary_pair_schema());
        let mut dist = AttrClassDist::new(schema);
        for inst in scenario_instances() {
            dist.update(&inst);
        }
        dist
    }

    #[test]
    fn test_value_counts_sum_to_class_counts() {
        let dist = trained();
        for a in 0..dist.num_attributes() {
            for y in 0..dist.num_classes() {
                let sum: InstanceCount = (0..dist.schema().num_values(a))
                    .map(|v| dist.count(a, v, y))
                    .sum();
                assert_eq!(sum, dist.class_count(y), "attribute {a}, class {y}");
            }
        }
    }

    #[test]
    fn test_total_tracks_updates() {
        let dist = trained();
        assert_eq!(dist.total(), 8);
        assert_eq!(dist.class_count(0), 5);
        assert_eq!(dist.class_count(1), 3);
    }

    #[test]
    fn test_class_row_matches_count() {
        let dist = trained();
        let row = dist.class_row(0, 0);
        assert_eq!(row.len(), 2);
        assert_eq!(row[0], dist.count(0, 0, 0));
        assert_eq!(row[1], dist.count(0, 0, 1));
    }

    #[test]
    fn test_clear_then_reupdate_round_trip() {
        let mut dist = trained();
        let before = dist.count(1, 0, 1);
        dist.clear();
        assert_eq!(dist.total(), 0);
        assert_eq!(dist.count(1, 0, 1), 0);
        for inst in scenario_instances() {
            dist.update(&inst);
        }
        assert_eq!(dist.count(1, 0, 1), before);
        assert_eq!(dist.total(), 8);
    }
}
