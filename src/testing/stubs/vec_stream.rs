use std::io::Error;
use std::sync::Arc;

use crate::core::{CatValue, Instance, Schema};
use crate::streams::InstanceStream;
use crate::testing::dummies::binary_pair_schema;

/// In-memory instance stream over a fixed vector, for tests.
pub struct VecStream {
    schema: Arc<Schema>,
    rows: Vec<Instance>,
    idx: usize,
}

impl VecStream {
    pub fn new(schema: Arc<Schema>, rows: Vec<Instance>) -> Self {
        Self {
            schema,
            rows,
            idx: 0,
        }
    }

    /// Rows of `(values, class)` over the binary-pair dummy schema.
    pub fn with_rows(rows: Vec<(Vec<CatValue>, CatValue)>) -> Self {
        Self::new(
            Arc::new(binary_pair_schema()),
            rows.into_iter()
                .map(|(values, class)| Instance::new(values, class))
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl InstanceStream for VecStream {
    fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    fn restart(&mut self) -> Result<(), Error> {
        self.idx = 0;
        Ok(())
    }

    fn has_more_instances(&self) -> bool {
        self.idx < self.rows.len()
    }

    fn advance(&mut self, inst: &mut Instance) -> bool {
        if !self.has_more_instances() {
            return false;
        }
        *inst = self.rows[self.idx].clone();
        self.idx += 1;
        true
    }
}
