use std::io::{Error, ErrorKind};
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::core::{CategoricalAttribute, Instance, Schema};
use crate::streams::InstanceStream;

/// Finite seeded generator of categorical instances.
///
/// Attribute values are drawn uniformly; the class copies the value of
/// attribute 0 (modulo the class count) and is then flipped to a uniform
/// random class with probability `noise_percentage`. Attribute 0 is
/// therefore predictive and the remaining attributes are pure noise, which
/// makes generated streams convenient for structure-learning tests.
pub struct RandomCategoricalGenerator {
    schema: Arc<Schema>,
    rng: StdRng,
    seed: u64,
    noise_percentage: u32,
    max_instances: usize,
    produced: usize,
}

impl RandomCategoricalGenerator {
    pub fn new(
        num_attributes: usize,
        num_values: usize,
        num_classes: usize,
        noise_percentage: u32,
        max_instances: usize,
        seed: u64,
    ) -> Result<Self, Error> {
        if num_attributes == 0 {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                "generator needs at least one attribute",
            ));
        }
        if noise_percentage > 100 {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                "noise percentage must be in [0, 100]",
            ));
        }

        let attributes = (0..num_attributes)
            .map(|a| CategoricalAttribute::with_arity(format!("att{a}"), num_values))
            .collect();
        let classes = (0..num_classes).map(|y| format!("c{y}")).collect();
        let schema = Schema::new("random-categorical", attributes, classes)
            .map_err(|e| Error::new(ErrorKind::InvalidInput, e))?;

        Ok(Self {
            schema: Arc::new(schema),
            rng: StdRng::seed_from_u64(seed),
            seed,
            noise_percentage,
            max_instances,
            produced: 0,
        })
    }
}

impl InstanceStream for RandomCategoricalGenerator {
    fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    fn restart(&mut self) -> Result<(), Error> {
        self.rng = StdRng::seed_from_u64(self.seed);
        self.produced = 0;
        Ok(())
    }

    fn has_more_instances(&self) -> bool {
        self.produced < self.max_instances
    }

    fn advance(&mut self, inst: &mut Instance) -> bool {
        if !self.has_more_instances() {
            return false;
        }

        for a in 0..self.schema.num_attributes() {
            inst.set_value(a, self.rng.random_range(0..self.schema.num_values(a)));
        }

        let mut class = inst.value(0) % self.schema.num_classes();
        if self.rng.random_range(0..100) < self.noise_percentage {
            class = self.rng.random_range(0..self.schema.num_classes());
        }
        inst.set_class(class);

        self.produced += 1;
        true
    }
}
