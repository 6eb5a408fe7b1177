//! Quiet-interval scheduling for re-checks.
//!
//! Each edit schedules a check to run after a fixed quiet interval; the
//! next edit pre-empts the pending one. At most one task is ever pending,
//! so a new request replaces the stale one rather than queueing behind it.

use std::future::Future;
use std::time::Duration;

use tokio::task::AbortHandle;
use tracing::trace;

/// Cancellable single-slot timer: runs a task once the caller has been
/// quiet for the configured interval.
#[derive(Debug)]
pub struct Debouncer {
    quiet: Duration,
    pending: Option<AbortHandle>,
}

impl Debouncer {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            pending: None,
        }
    }

    pub fn quiet(&self) -> Duration {
        self.quiet
    }

    /// Schedule `task` to run after the quiet interval, aborting any
    /// previously scheduled task that has not fired yet.
    pub fn schedule<F>(&mut self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();
        let quiet = self.quiet;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(quiet).await;
            trace!(?quiet, "debounce interval elapsed, running task");
            task.await;
        });
        self.pending = Some(handle.abort_handle());
    }

    /// Abort the pending task, if any.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
