mod stream;
mod xval;

pub mod generators;

pub use stream::InstanceStream;
pub use xval::XValStream;
