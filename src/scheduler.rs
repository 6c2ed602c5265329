//! Cancellable deferred scheduling for auto-play.

use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::debug;

/// Holds at most one pending deferred callback.
///
/// Scheduling replaces any previous callback; cancelling aborts the pending
/// task so a stale callback can never fire against a superseded game state.
/// Dropping the scheduler cancels whatever is pending.
#[derive(Debug, Default)]
pub struct AutoPlayScheduler {
    handle: Option<JoinHandle<()>>,
}

impl AutoPlayScheduler {
    /// Creates an idle scheduler.
    pub fn new() -> Self {
        Self { handle: None }
    }

    /// Runs `callback` after `delay`, replacing any pending callback.
    pub fn schedule<F>(&mut self, delay: Duration, callback: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();
        debug!(?delay, "Scheduling deferred callback");
        self.handle = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            callback.await;
        }));
    }

    /// Aborts the pending callback, if any.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            debug!("Cancelling scheduled callback");
            handle.abort();
        }
    }

    /// Whether a callback is pending or still running.
    pub fn is_scheduled(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for AutoPlayScheduler {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn scheduled_callback_fires_after_delay() {
        let fired = Arc::new(AtomicUsize::new(0));
        let mut scheduler = AutoPlayScheduler::new();
        let counter = fired.clone();
        scheduler.schedule(Duration::from_millis(10), async move {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        assert!(scheduler.is_scheduled());
        tokio::time::sleep(Duration::from_millis(60)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert!(!scheduler.is_scheduled());
    }

    #[tokio::test]
    async fn cancel_prevents_callback() {
        let fired = Arc::new(AtomicUsize::new(0));
        let mut scheduler = AutoPlayScheduler::new();
        let counter = fired.clone();
        scheduler.schedule(Duration::from_millis(20), async move {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        scheduler.cancel();
        tokio::time::sleep(Duration::from_millis(80)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn rescheduling_replaces_pending_callback() {
        let fired = Arc::new(AtomicUsize::new(0));
        let mut scheduler = AutoPlayScheduler::new();
        for _ in 0..3 {
            let counter = fired.clone();
            scheduler.schedule(Duration::from_millis(20), async move {
                counter.fetch_add(1, Ordering::SeqCst);
            });
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }
}
