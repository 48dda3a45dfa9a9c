//! Cooperative cancellation for export and thumbnail work.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::{ExportError, ExportResult};

/// Shared flag checked after each await point.
///
/// Clones observe the same flag. Cancelling never interrupts work in
/// progress; the next check reports the operation as stale.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    /// `Err(Stale)` once cancelled.
    pub fn check(&self) -> ExportResult<()> {
        if self.is_cancelled() {
            Err(ExportError::Stale)
        } else {
            Ok(())
        }
    }
}
