//! Debounced refresh signalling
//!
//! Descriptor edits arrive one keystroke at a time. Each invalidation restarts
//! a short timer and only the last one in a burst reaches the client.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Receiver of "catalog data changed, recompute hints" signals
#[async_trait]
pub trait RefreshSink: Send + Sync {
    async fn refresh(&self);
}

/// Schedules a refresh after a quiet period, cancelling any pending one
pub struct RefreshScheduler {
    sink: Arc<dyn RefreshSink>,
    delay: Duration,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl RefreshScheduler {
    pub fn new(sink: Arc<dyn RefreshSink>, delay: Duration) -> Self {
        Self {
            sink,
            delay,
            pending: Mutex::new(None),
        }
    }

    /// Start (or restart) the timer. Must be called within a tokio runtime.
    pub fn schedule(&self) {
        let sink = Arc::clone(&self.sink);
        let delay = self.delay;
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            sink.refresh().await;
        });

        if let Some(previous) = self.pending.lock().replace(task) {
            previous.abort();
        }
    }

    /// Drop a pending refresh without firing it
    pub fn cancel(&self) {
        if let Some(task) = self.pending.lock().take() {
            task.abort();
        }
    }
}

impl Drop for RefreshScheduler {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingSink {
        count: AtomicUsize,
    }

    #[async_trait]
    impl RefreshSink for CountingSink {
        async fn refresh(&self) {
            self.count.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_fires_once() {
        let sink = Arc::new(CountingSink::default());
        let scheduler = RefreshScheduler::new(sink.clone(), Duration::from_millis(300));

        scheduler.schedule();
        tokio::time::sleep(Duration::from_millis(100)).await;
        scheduler.schedule();
        tokio::time::sleep(Duration::from_millis(100)).await;
        scheduler.schedule();
        assert_eq!(sink.count.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_millis(301)).await;
        assert_eq!(sink.count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_separate_edits_fire_separately() {
        let sink = Arc::new(CountingSink::default());
        let scheduler = RefreshScheduler::new(sink.clone(), Duration::from_millis(300));

        scheduler.schedule();
        tokio::time::sleep(Duration::from_millis(400)).await;
        scheduler.schedule();
        tokio::time::sleep(Duration::from_millis(400)).await;
        assert_eq!(sink.count.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_drops_pending_refresh() {
        let sink = Arc::new(CountingSink::default());
        let scheduler = RefreshScheduler::new(sink.clone(), Duration::from_millis(300));

        scheduler.schedule();
        scheduler.cancel();
        tokio::time::sleep(Duration::from_millis(400)).await;
        assert_eq!(sink.count.load(Ordering::SeqCst), 0);
    }
}
