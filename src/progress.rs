//! Progress reporting hook for long sequential loops.
//!
//! The library only calls this trait; the binary supplies an `indicatif`
//! implementation.

/// Receives loop progress. All methods default to no-ops.
pub trait Progress: Send + Sync {
    /// A loop of `total` steps is starting.
    fn start(&self, _total: u64, _label: &str) {}

    /// One step finished; `message` describes it.
    fn advance(&self, _message: &str) {}

    /// The loop is done.
    fn finish(&self) {}
}

/// Progress sink that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl Progress for NoProgress {}
