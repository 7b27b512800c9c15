//! Basic (non-hostile) NPC AI controller.
//!
//! Toggles `IDLE`/`ACTIVE` every 5 ticks as a placeholder, not a real
//! behavior — folk NPCs (shopkeepers, quest givers) have no combat
//! behavior to simulate in this core.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;

use npc_model::{Actor, Intention, ObjectId};

use crate::controller::AiController;

const TOGGLE_EVERY_TICKS: u32 = 5;

/// Placeholder AI for non-combatant NPCs.
pub struct BasicNpcAi {
    actor: Arc<Actor>,
    is_running: AtomicBool,
    tick_count: AtomicU32,
}

impl BasicNpcAi {
    #[must_use]
    pub fn new(actor: Arc<Actor>) -> Self {
        Self {
            actor,
            is_running: AtomicBool::new(false),
            tick_count: AtomicU32::new(0),
        }
    }
}

impl AiController for BasicNpcAi {
    fn object_id(&self) -> ObjectId {
        self.actor.id
    }

    fn start(&self) {
        self.tick_count.store(0, Ordering::Relaxed);
        self.is_running.store(true, Ordering::Relaxed);
        self.actor.set_intention(Intention::Idle);
    }

    fn stop(&self) {
        self.is_running.store(false, Ordering::Relaxed);
        self.actor.set_intention(Intention::Idle);
    }

    fn tick(&self) {
        if !self.is_running.load(Ordering::Relaxed) {
            return;
        }
        if self.actor.is_dead() {
            return;
        }
        let count = self.tick_count.fetch_add(1, Ordering::Relaxed) + 1;
        if count % TOGGLE_EVERY_TICKS == 0 {
            let next = if self.actor.intention() == Intention::Idle {
                Intention::Active
            } else {
                Intention::Idle
            };
            self.actor.set_intention(next);
        }
    }

    fn is_running(&self) -> bool {
        self.is_running.load(Ordering::Relaxed)
    }
}
