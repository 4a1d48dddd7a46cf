//! Cooperative cancellation for long exports

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Flag checked by the worksheet writer between rows
///
/// Clones share the same flag, so a token can be handed to another thread
/// that decides to abort. A cancelled export returns
/// [`ExportError::Cancelled`](crate::error::ExportError::Cancelled) and its
/// output must be discarded.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}
