mod instance;
mod schema;

pub use instance::Instance;
pub use schema::{CategoricalAttribute, Schema, SchemaError};

/// Index of a categorical attribute within a schema.
pub type AttributeIndex = usize;

/// A categorical value or class label, in `0..num_values` for its attribute.
pub type CatValue = usize;

/// Counter type for all sufficient statistics.
pub type InstanceCount = u64;
