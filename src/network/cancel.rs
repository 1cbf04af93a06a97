//! Cancellation
//!
//! A cloneable flag checked between read slices and partial writes.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Aborts in-flight I/O on the connection it was issued for
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation; takes effect within one poll interval
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    /// Clear a previous cancellation when a new connection is bound
    pub(crate) fn reset(&self) {
        self.cancelled.store(false, Ordering::Release);
    }
}
