//! Injected observability sink.
//!
//! The original tool relies on a process-wide logger. We re-architect that
//! as a small trait passed into the decoder and `safe_decode`, so callers
//! can swap in a test double without touching global state.

/// Minimal logging surface the decoder and safe-decode need.
pub trait Sink {
    fn warn(&self, msg: &str);
    fn info(&self, msg: &str);
}

/// Forwards to the `tracing` crate. The default sink for real runs.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl Sink for TracingSink {
    fn warn(&self, msg: &str) {
        tracing::warn!("{msg}");
    }

    fn info(&self, msg: &str) {
        tracing::info!("{msg}");
    }
}

/// Discards everything. Used in unit tests that don't want log noise.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl Sink for NullSink {
    fn warn(&self, _msg: &str) {}
    fn info(&self, _msg: &str) {}
}
