//! Tick Scheduler — the O(1) controller registry driven by the [`Clock`](crate::clock::Clock).
//!
//! Concurrent `register`/`unregister`/`lookup`/`size`, and a `run` loop
//! that calls `tick()` on every registered controller once per clock
//! pulse. A panicking controller is caught and logged; iteration
//! continues.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use dashmap::DashMap;

use npc_ai::AiController;
use npc_model::ObjectId;

use crate::clock::{CancellationToken, Clock};

/// Concurrent map of registered AI controllers, with an O(1) `size()`.
pub struct TickScheduler {
    controllers: DashMap<ObjectId, Arc<dyn AiController>>,
    size: AtomicUsize,
}

impl Default for TickScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl TickScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self {
            controllers: DashMap::new(),
            size: AtomicUsize::new(0),
        }
    }

    /// Register a controller and start it. Replaces (and stops) any
    /// existing controller registered under the same id.
    pub fn register(&self, id: ObjectId, controller: Arc<dyn AiController>) {
        controller.start();
        if let Some(previous) = self.controllers.insert(id, controller) {
            previous.stop();
        } else {
            self.size.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Unregister and stop the controller for `id`, if present.
    pub fn unregister(&self, id: ObjectId) {
        if let Some((_, controller)) = self.controllers.remove(&id) {
            controller.stop();
            self.size.fetch_sub(1, Ordering::Relaxed);
        }
    }

    #[must_use]
    pub fn lookup(&self, id: ObjectId) -> Option<Arc<dyn AiController>> {
        self.controllers.get(&id).map(|entry| entry.value().clone())
    }

    /// O(1): backed by an atomic counter, not map enumeration.
    #[must_use]
    pub fn size(&self) -> usize {
        self.size.load(Ordering::Relaxed)
    }

    /// Call `tick()` on every currently registered controller. A panic
    /// inside one controller is caught and logged; the rest still tick.
    pub fn tick_all(&self) {
        let snapshot: Vec<Arc<dyn AiController>> = self
            .controllers
            .iter()
            .map(|entry| entry.value().clone())
            .collect();

        for controller in snapshot {
            let id = controller.object_id();
            let result = catch_unwind(AssertUnwindSafe(|| controller.tick()));
            if let Err(panic) = result {
                let message = panic
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| panic.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "non-string panic payload".to_string());
                tracing::error!(object_id = %id, panic = %message, "AI controller panicked during tick");
            }
        }
    }

    /// Drive `tick_all` once per `clock` pulse until `cancel` fires.
    pub async fn run(&self, clock: &Clock, cancel: &CancellationToken) {
        clock.run(cancel, || self.tick_all()).await;
    }
}
