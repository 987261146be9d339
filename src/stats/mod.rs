mod attr_class_dist;
mod class_dist;
mod crosstab;
mod pair_class_dist;

pub mod correlation;
pub mod smoothing;

pub use attr_class_dist::AttrClassDist;
pub use class_dist::ClassDist;
pub use crosstab::Crosstab;
pub use pair_class_dist::PairClassDist;
