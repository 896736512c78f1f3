/// Cancellable one-shot callbacks

use std::time::Duration;

use tokio::task::JoinHandle;

/// A callback scheduled on the tokio runtime.
///
/// Dropping or cancelling the handle before the delay elapses guarantees the
/// callback never runs.
#[derive(Debug)]
pub struct Scheduled {
    handle: JoinHandle<()>,
}

impl Scheduled {
    /// Run `f` once after `delay`. Must be called within a tokio runtime.
    pub fn after<F>(delay: Duration, f: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            f();
        });
        Self { handle }
    }

    pub fn cancel(self) {
        // Drop aborts the task
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for Scheduled {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
