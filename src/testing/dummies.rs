//! Schemas and fixture datasets shared between unit tests.

use crate::core::{CategoricalAttribute, Instance, Schema};

/// Two binary attributes, two classes.
pub fn binary_pair_schema() -> Schema {
    Schema::new(
        "binary-pair",
        vec![
            CategoricalAttribute::with_arity("a0", 2),
            CategoricalAttribute::with_arity("a1", 2),
        ],
        vec!["c0".into(), "c1".into()],
    )
    .unwrap()
}

/// Three binary attributes, two classes.
pub fn three_attribute_schema() -> Schema {
    Schema::new(
        "binary-triple",
        vec![
            CategoricalAttribute::with_arity("a0", 2),
            CategoricalAttribute::with_arity("a1", 2),
            CategoricalAttribute::with_arity("a2", 2),
        ],
        vec!["c0".into(), "c1".into()],
    )
    .unwrap()
}

/// One binary attribute, two classes.
pub fn single_attribute_schema() -> Schema {
    Schema::new(
        "single",
        vec![CategoricalAttribute::with_arity("a0", 2)],
        vec!["c0".into(), "c1".into()],
    )
    .unwrap()
}

/// The 8-instance end-to-end dataset over [`binary_pair_schema`]:
/// {(0,0)->0 x3, (0,1)->1 x1, (1,0)->1 x2, (1,1)->0 x2}.
pub fn scenario_instances() -> Vec<Instance> {
    let mut rows = Vec::new();
    for _ in 0..3 {
        rows.push(Instance::new(vec![0, 0], 0));
    }
    rows.push(Instance::new(vec![0, 1], 1));
    for _ in 0..2 {
        rows.push(Instance::new(vec![1, 0], 1));
    }
    for _ in 0..2 {
        rows.push(Instance::new(vec![1, 1], 0));
    }
    rows
}
