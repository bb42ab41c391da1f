// ABOUTME: Cancellable one-shot timers with identity, backed by tokio tasks
// A fired callback compares its id with the live slot so stale timers never act

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::debug;

static NEXT_TIMER_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

/// A deferred callback armed on the tokio runtime.
#[derive(Debug)]
pub struct ScheduledTask {
    id: TimerId,
    label: &'static str,
    handle: JoinHandle<()>,
}

impl ScheduledTask {
    /// Run `callback(id)` once after `delay`. Must be called inside a tokio runtime.
    pub fn spawn<F, Fut>(label: &'static str, delay: Duration, callback: F) -> Self
    where
        F: FnOnce(TimerId) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let id = TimerId(NEXT_TIMER_ID.fetch_add(1, Ordering::Relaxed));
        debug!("Arming {} timer {:?} for {:?}", label, id, delay);
        let deadline = Instant::now() + delay;
        let handle = tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            callback(id).await;
        });
        Self { id, label, handle }
    }

    pub fn id(&self) -> TimerId {
        self.id
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    /// Abort the timer. A callback that already started is aborted at its next await.
    pub fn cancel(self) {
        debug!("Cancelling {} timer {:?}", self.label, self.id);
        self.handle.abort();
    }

    /// Drop the slot without aborting; used by the callback itself once it fired.
    pub fn release(self) {
        debug!("{} timer {:?} fired", self.label, self.id);
    }
}
