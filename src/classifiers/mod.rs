mod aode;
mod distribution_tree;
mod kdb;
mod kdb_selective;
mod naive_bayes;
mod tan;

pub use aode::Aode;
pub use distribution_tree::DistributionTree;
pub use kdb::Kdb;
pub use kdb_selective::SelectiveKdb;
pub use naive_bayes::NaiveBayes;
pub use tan::Tan;

use std::io::Error;
use std::str::FromStr;
use std::sync::Arc;

use strum_macros::{Display, EnumIter, EnumString};
use thiserror::Error as ThisError;

use crate::core::{Instance, Schema};
use crate::streams::InstanceStream;

/// A classifier trained incrementally over one or more sequential passes
/// of an instance stream.
///
/// The driver protocol is: `reset(schema)`, then repeat
/// { `initialise_pass`, feed every instance to `train`, `finalise_pass` }
/// until `training_is_finished`, then call `classify` freely.
/// Passes are strictly ordered; pass n+1 depends on state finalised at
/// the end of pass n.
pub trait IncrementalLearner {
    /// Prepares the learner for training against a new schema, discarding
    /// any previous model.
    fn reset(&mut self, schema: Arc<Schema>);

    /// Called before each pass over the stream.
    fn initialise_pass(&mut self) {}

    /// Trains from a single instance of the current pass.
    fn train(&mut self, inst: &Instance);

    /// Called after each full pass over the stream.
    fn finalise_pass(&mut self);

    /// True iff no more passes are required. Updated by `finalise_pass`.
    fn training_is_finished(&self) -> bool;

    /// Class-posterior distribution for `inst`, normalized to sum to 1.
    fn classify(&self, inst: &Instance) -> Vec<f64>;

    fn name(&self) -> &str;
}

/// Drives a learner through as many passes over `stream` as it requires.
pub fn train_from_stream(
    learner: &mut dyn IncrementalLearner,
    stream: &mut dyn InstanceStream,
) -> Result<(), Error> {
    learner.reset(stream.schema().clone());

    let mut inst = Instance::for_schema(stream.schema());
    while !learner.training_is_finished() {
        learner.initialise_pass();
        stream.restart()?;
        while stream.advance(&mut inst) {
            learner.train(&inst);
        }
        learner.finalise_pass();
    }
    Ok(())
}

/// The learner families this crate provides, keyed by their registry
/// names (`nb`, `tan`, `kdb`, `kdb-selective`, `aode`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter, EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum LearnerKind {
    Nb,
    Tan,
    Kdb,
    KdbSelective,
    Aode,
}

#[derive(Debug, ThisError)]
pub enum BuildError {
    #[error("unknown learner `{0}`")]
    UnknownLearner(String),
}

/// Creates a learner by kind with its default parameters (k = 1 for the
/// KDB family, as in the original system).
pub fn create_learner(kind: LearnerKind) -> Box<dyn IncrementalLearner> {
    match kind {
        LearnerKind::Nb => Box::new(NaiveBayes::new()),
        LearnerKind::Tan => Box::new(Tan::new()),
        LearnerKind::Kdb => Box::new(Kdb::new(1)),
        LearnerKind::KdbSelective => Box::new(SelectiveKdb::new(1, false)),
        LearnerKind::Aode => Box::new(Aode::new()),
    }
}

/// Creates a learner by registry name.
pub fn create_learner_by_name(name: &str) -> Result<Box<dyn IncrementalLearner>, BuildError> {
    let kind =
        LearnerKind::from_str(name).map_err(|_| BuildError::UnknownLearner(name.to_string()))?;
    Ok(create_learner(kind))
}
