//! Debounced background persistence of the working draft
//!
//! Every report mutation schedules a save of the current snapshot after a
//! quiet period; a newer mutation aborts the pending task and reschedules.
//! Trailing-edge debounce: only the latest state within the window is
//! written, and saves never run concurrently for the working report.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

use super::model::InspectionReport;
use crate::store::ReportStore;

/// Quiet period before a mutated draft is written out
pub const AUTOSAVE_DELAY: Duration = Duration::from_secs(2);

/// Cancellable scheduler for the draft auto-save
pub struct AutosaveScheduler {
    delay: Duration,
    pending: Option<JoinHandle<()>>,
}

impl Default for AutosaveScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl AutosaveScheduler {
    pub fn new() -> Self {
        Self::with_delay(AUTOSAVE_DELAY)
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Schedule a save of the given snapshot, superseding any pending one.
    ///
    /// Failures are logged only; the user is never interrupted mid-edit.
    pub fn schedule(&mut self, store: Arc<dyn ReportStore>, report: InspectionReport) {
        self.cancel();
        let delay = self.delay;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            match store.save(&report).await {
                Ok(()) => tracing::debug!(id = %report.id, "Draft auto-saved"),
                Err(e) => tracing::warn!(id = %report.id, error = %e, "Auto-save failed"),
            }
        }));
    }

    /// Abort the pending save, if any
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

impl Drop for AutosaveScheduler {
    fn drop(&mut self) {
        self.cancel();
    }
}
