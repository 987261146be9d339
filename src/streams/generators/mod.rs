mod random_categorical;

pub use random_categorical::RandomCategoricalGenerator;
