//! Respawn Scheduler — tracks due respawn tasks and drains them once per
//! tick without holding its lock across the spawn call.
//!
//! Due tasks are collected under the lock, the lock is released, and only
//! then is [`SpawnManager::do_spawn`] invoked for each — so a slow or
//! panicking spawn never blocks `schedule_respawn`/`cancel_respawn`
//! callers on another thread.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use npc_model::SpawnDefinition;

use crate::manager::{NpcKind, SpawnManager};

/// One pending respawn: the spawn to refill, the kind of AI to register,
/// and the tick count at which it becomes due.
struct PendingRespawn {
    spawn: Arc<SpawnDefinition>,
    kind: NpcKind,
    due_at_tick: u64,
}

/// Schedules and drains respawns. `due_at_tick` is expressed in scheduler
/// ticks (1 Hz) rather than wall-clock time so tests can drive it
/// deterministically without sleeping.
#[derive(Default)]
pub struct RespawnScheduler {
    pending: Mutex<HashMap<u64, PendingRespawn>>,
    current_tick: std::sync::atomic::AtomicU64,
}

impl RespawnScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `spawn` to be refilled with one NPC after `delay_ticks`
    /// ticks from now. Replaces any previously scheduled respawn for the
    /// same `spawn_id`.
    pub fn schedule_respawn(&self, spawn: Arc<SpawnDefinition>, kind: NpcKind, delay_ticks: u64) {
        let spawn_id = spawn.spawn_id;
        let due_at_tick = self.current_tick.load(std::sync::atomic::Ordering::Relaxed) + delay_ticks;
        self.pending.lock().unwrap().insert(
            spawn_id,
            PendingRespawn {
                spawn,
                kind,
                due_at_tick,
            },
        );
    }

    /// Cancel a previously scheduled respawn. Idempotent: a no-op if none
    /// was scheduled for `spawn_id`.
    pub fn cancel_respawn(&self, spawn_id: u64) {
        self.pending.lock().unwrap().remove(&spawn_id);
    }

    /// Number of respawns currently pending, O(1) (backed by the map's own
    /// length — acceptable here since, unlike the Tick Scheduler, this map
    /// is not read on every AI tick).
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.pending.lock().unwrap().len()
    }

    /// Advance the scheduler's notion of "now" by one tick and drain every
    /// task that became due. The lock is held only long enough to drain the
    /// matching entries into a `Vec`; `manager.do_spawn` runs after it is
    /// released.
    pub fn drain_due(&self, manager: &SpawnManager) {
        let now = self
            .current_tick
            .fetch_add(1, std::sync::atomic::Ordering::Relaxed)
            + 1;

        let due: Vec<PendingRespawn> = {
            let mut pending = self.pending.lock().unwrap();
            let due_ids: Vec<u64> = pending
                .iter()
                .filter(|(_, task)| task.due_at_tick <= now)
                .map(|(id, _)| *id)
                .collect();
            due_ids
                .into_iter()
                .filter_map(|id| pending.remove(&id))
                .collect()
        };

        for task in due {
            if task.spawn.has_room() {
                if let Err(err) = manager.do_spawn(&task.spawn, task.kind) {
                    tracing::warn!(spawn_id = task.spawn.spawn_id, cause = %err, "respawn attempt failed");
                }
            }
        }
    }
}
