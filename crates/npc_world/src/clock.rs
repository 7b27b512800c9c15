//! A cancellable, no-catch-up 1 Hz clock.
//!
//! A tick every 1000ms until cancelled; if a tick takes longer than the
//! budget, the next one fires immediately but the cadence does not try to
//! make up lost ticks — `MissedTickBehavior::Delay` is exactly this
//! policy.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Notify;
use tokio::time::MissedTickBehavior;

/// A cloneable cooperative-cancellation signal.
///
/// Only one primitive is needed here (notify-once, check-anywhere), so this
/// wraps a single [`Notify`] rather than pulling in `tokio-util` for its
/// full `CancellationToken`.
#[derive(Clone)]
pub struct CancellationToken {
    notify: Arc<Notify>,
    cancelled: Arc<std::sync::atomic::AtomicBool>,
}

impl CancellationToken {
    #[must_use]
    pub fn new() -> Self {
        Self {
            notify: Arc::new(Notify::new()),
            cancelled: Arc::new(std::sync::atomic::AtomicBool::new(false)),
        }
    }

    /// Signal cancellation. Idempotent.
    pub fn cancel(&self) {
        self.cancelled
            .store(true, std::sync::atomic::Ordering::Release);
        self.notify.notify_waiters();
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(std::sync::atomic::Ordering::Acquire)
    }

    /// Resolves once `cancel()` has been called (or immediately, if it
    /// already has been).
    pub async fn cancelled(&self) {
        if self.is_cancelled() {
            return;
        }
        self.notify.notified().await;
    }
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::new()
    }
}

/// Produces a tick every `period` until `cancel` fires. No catch-up: a
/// late tick does not cause a burst of immediate follow-up ticks.
pub struct Clock {
    period: Duration,
}

impl Clock {
    #[must_use]
    pub fn new(period: Duration) -> Self {
        Self { period }
    }

    #[must_use]
    pub fn at_one_hertz() -> Self {
        Self::new(Duration::from_secs(1))
    }

    /// Run `on_tick` once per period until `cancel` fires. Returns once
    /// cancelled.
    pub async fn run(&self, cancel: &CancellationToken, mut on_tick: impl FnMut()) {
        let mut interval = tokio::time::interval(self.period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => return,
                _ = interval.tick() => {
                    if cancel.is_cancelled() {
                        return;
                    }
                    on_tick();
                }
            }
        }
    }
}
