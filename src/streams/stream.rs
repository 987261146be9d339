use std::io::Error;
use std::sync::Arc;

use crate::core::{Instance, Schema};

/// Pull-based interface for sequential sources of categorical instances.
///
/// Implementations may represent finite datasets or bounded generators.
/// Every instance produced must conform to the same, immutable [`Schema`]
/// for the lifetime of the stream. The read cursor is the only mutable
/// state; between training passes it is owned exclusively by the driver,
/// which restarts the stream before each pass.
pub trait InstanceStream {
    /// The schema all produced instances conform to. Must not change.
    fn schema(&self) -> &Arc<Schema>;

    /// Returns the cursor to the first instance.
    ///
    /// Returns an error if the underlying source cannot be reopened or
    /// sought.
    fn restart(&mut self) -> Result<(), Error>;

    /// Indicates whether the stream *may* produce more instances.
    ///
    /// Cheap and side-effect free. Once it returns `false`, a subsequent
    /// [`advance`](Self::advance) must return `false` too.
    fn has_more_instances(&self) -> bool;

    /// Fills `inst` with the next instance and returns `true`, or returns
    /// `false` at end of stream leaving `inst` unspecified.
    fn advance(&mut self, inst: &mut Instance) -> bool;
}
