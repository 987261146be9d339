pub mod classifiers;
pub mod core;
pub mod evaluation;
pub mod stats;
pub mod streams;
pub mod utils;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;
