use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("schema must declare at least one class")]
    NoClasses,

    #[error("attribute `{0}` must declare at least one value")]
    EmptyAttribute(String),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// A named categorical attribute and its value labels.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoricalAttribute {
    name: String,
    values: Vec<String>,
}

impl CategoricalAttribute {
    pub fn new(name: impl Into<String>, values: Vec<String>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    /// Attribute with values named `v0..v{n-1}`, for synthetic data.
    pub fn with_arity(name: impl Into<String>, num_values: usize) -> Self {
        Self {
            name: name.into(),
            values: (0..num_values).map(|v| format!("v{v}")).collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn num_values(&self) -> usize {
        self.values.len()
    }

    pub fn value_name(&self, v: usize) -> &str {
        &self.values[v]
    }
}

/// Immutable description of a categorical dataset: the attributes, their
/// value labels and the class labels.
///
/// A schema is built once, validated, and then shared (typically as an
/// `Arc<Schema>`) between the stream, the count tables and the trained
/// model. Every count structure in the crate is sized against it at reset
/// time; it must not change for the lifetime of a trained model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Schema {
    relation_name: String,
    attributes: Vec<CategoricalAttribute>,
    classes: Vec<String>,
}

impl Schema {
    pub fn new(
        relation_name: impl Into<String>,
        attributes: Vec<CategoricalAttribute>,
        classes: Vec<String>,
    ) -> Result<Self, SchemaError> {
        if classes.is_empty() {
            return Err(SchemaError::NoClasses);
        }
        for attribute in &attributes {
            if attribute.num_values() == 0 {
                return Err(SchemaError::EmptyAttribute(attribute.name.clone()));
            }
        }
        Ok(Self {
            relation_name: relation_name.into(),
            attributes,
            classes,
        })
    }

    pub fn relation_name(&self) -> &str {
        &self.relation_name
    }

    pub fn num_attributes(&self) -> usize {
        self.attributes.len()
    }

    /// Number of values of attribute `a`. Panics if `a` is out of range.
    pub fn num_values(&self, a: usize) -> usize {
        self.attributes[a].num_values()
    }

    pub fn num_classes(&self) -> usize {
        self.classes.len()
    }

    pub fn attribute(&self, a: usize) -> &CategoricalAttribute {
        &self.attributes[a]
    }

    pub fn attribute_name(&self, a: usize) -> &str {
        self.attributes[a].name()
    }

    pub fn class_name(&self, y: usize) -> &str {
        &self.classes[y]
    }

    pub fn index_of_attribute(&self, name: &str) -> Option<usize> {
        self.attributes.iter().position(|a| a.name() == name)
    }

    pub fn to_json(&self) -> Result<String, SchemaError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, SchemaError> {
        let schema: Schema = serde_json::from_str(json)?;
        if schema.classes.is_empty() {
            return Err(SchemaError::NoClasses);
        }
        for attribute in &schema.attributes {
            if attribute.num_values() == 0 {
                return Err(SchemaError::EmptyAttribute(attribute.name.clone()));
            }
        }
        Ok(schema)
    }
}
