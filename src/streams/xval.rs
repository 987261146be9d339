use std::io::{Error, ErrorKind};
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::core::{Instance, Schema};
use crate::streams::InstanceStream;

/// Cross-validation wrapper around an instance stream.
///
/// Each source instance is assigned to a fold by a seeded RNG draw made in
/// stream order. The RNG is reseeded on every restart, so an instance
/// lands in the same fold on every pass over the same source — multi-pass
/// learners see a stable training set for the current fold.
///
/// In training mode the stream yields instances outside the current fold;
/// in testing mode it yields the current fold only.
pub struct XValStream<S: InstanceStream> {
    source: S,
    rng: StdRng,
    seed: u64,
    num_folds: usize,
    fold: usize,
    training: bool,
    count: u64,
}

impl<S: InstanceStream> XValStream<S> {
    pub fn new(source: S, num_folds: usize, seed: u64) -> Result<Self, Error> {
        if num_folds < 2 {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                "cross-validation requires at least 2 folds",
            ));
        }
        let mut stream = Self {
            source,
            rng: StdRng::seed_from_u64(seed),
            seed,
            num_folds,
            fold: 0,
            training: true,
            count: 0,
        };
        stream.start_substream(0, true)?;
        Ok(stream)
    }

    /// Switches to the training or testing side of `fold` and rewinds.
    pub fn start_substream(&mut self, fold: usize, training: bool) -> Result<(), Error> {
        assert!(fold < self.num_folds, "fold index out of range");
        self.fold = fold;
        self.training = training;
        self.restart()
    }

    pub fn num_folds(&self) -> usize {
        self.num_folds
    }

    /// Instances yielded since the last restart.
    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn into_inner(self) -> S {
        self.source
    }
}

impl<S: InstanceStream> InstanceStream for XValStream<S> {
    fn schema(&self) -> &Arc<Schema> {
        self.source.schema()
    }

    fn restart(&mut self) -> Result<(), Error> {
        self.source.restart()?;
        self.rng = StdRng::seed_from_u64(self.seed);
        self.count = 0;
        Ok(())
    }

    fn has_more_instances(&self) -> bool {
        self.source.has_more_instances()
    }

    fn advance(&mut self, inst: &mut Instance) -> bool {
        while self.source.advance(inst) {
            let in_current_fold = self.rng.random_range(0..self.num_folds) == self.fold;
            if in_current_fold != self.training {
                self.count += 1;
                return true;
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::stubs::VecStream;

    fn labelled_source(n: usize) -> VecStream {
        // class encodes the position so instances are distinguishable
        VecStream::with_rows((0..n).map(|i| (vec![i % 2, 0], i % 2)).collect())
    }

    fn collect(stream: &mut XValStream<VecStream>) -> Vec<Instance> {
        let mut inst = Instance::for_schema(stream.schema());
        let mut out = Vec::new();
        while stream.advance(&mut inst) {
            out.push(inst.clone());
        }
        out
    }

    #[test]
    fn test_rejects_single_fold() {
        assert!(XValStream::new(labelled_source(4), 1, 0).is_err());
    }

    #[test]
    fn test_folds_partition_the_source() {
        let n = 50;
        let mut stream = XValStream::new(labelled_source(n), 5, 17).unwrap();
        let mut total_test = 0;
        for fold in 0..5 {
            stream.start_substream(fold, true).unwrap();
            let train = collect(&mut stream).len();
            stream.start_substream(fold, false).unwrap();
            let test = collect(&mut stream).len();
            assert_eq!(train + test, n, "fold {fold} must partition the source");
            total_test += test;
        }
        assert_eq!(total_test, n, "every instance belongs to exactly one test fold");
    }

    #[test]
    fn test_fold_membership_stable_across_restarts() {
        let mut stream = XValStream::new(labelled_source(30), 3, 42).unwrap();
        stream.start_substream(1, true).unwrap();
        let first = collect(&mut stream);
        stream.restart().unwrap();
        let second = collect(&mut stream);
        assert_eq!(first, second);
    }
}
