//! Actor (NPC) state.
//!
//! An [`Actor`] is the runtime instance of an [`NpcTemplate`](crate::template::NpcTemplate):
//! identity, current HP/MP, position, intention, and (for monsters) an
//! aggro list. Mutable fields are grouped behind a single [`Mutex`] — one
//! lock keeps the invariant "readers never observe a torn (x,y,z) triple"
//! trivially true, and every critical section here is a handful of field
//! reads/writes, never blocking I/O.

use std::sync::{Arc, Mutex};

use npc_math::Position;
use serde::{Deserialize, Serialize};

use crate::aggro::AggroList;
use crate::object::ObjectId;
use crate::template::NpcTemplate;

/// High-level AI state label.
///
/// The rule that a dead actor's intention is forced back to `Idle` is
/// enforced by the AI controllers that own the transition, not by this
/// enum itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Intention {
    Idle,
    Active,
    Attack,
    Follow,
    Cast,
    MoveTo,
}

impl std::fmt::Display for Intention {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Intention::Idle => "IDLE",
            Intention::Active => "ACTIVE",
            Intention::Attack => "ATTACK",
            Intention::Follow => "FOLLOW",
            Intention::Cast => "CAST",
            Intention::MoveTo => "MOVE_TO",
        };
        f.write_str(s)
    }
}

/// The mutable fields of an actor, grouped behind one lock.
#[derive(Debug, Clone)]
pub struct ActorState {
    pub hp: i32,
    pub mp: i32,
    pub position: Position,
    pub intention: Intention,
    pub target: ObjectId,
    pub is_dead: bool,
}

/// A live NPC instance.
///
/// `template`, `id`, and `spawn_id` are immutable for the actor's lifetime;
/// everything that changes over the actor's life lives in `state`.
#[derive(Debug)]
pub struct Actor {
    pub id: ObjectId,
    pub template: Arc<NpcTemplate>,
    /// The spawn this actor was instantiated from, if any (back-reference
    /// for return-home and respawn bookkeeping, stored as a plain id rather
    /// than an owning cycle).
    pub spawn_id: Option<u64>,
    state: Mutex<ActorState>,
    /// Present for monsters; `None` for summons/basic folk that never
    /// accumulate hate from other attackers.
    pub aggro: Option<AggroList>,
}

impl Actor {
    /// Construct a new, fully-healed actor at `position`.
    #[must_use]
    pub fn new(
        id: ObjectId,
        template: Arc<NpcTemplate>,
        spawn_id: Option<u64>,
        position: Position,
        has_aggro_list: bool,
    ) -> Self {
        let max_hp = template.max_hp;
        let max_mp = template.max_mp;
        Self {
            id,
            template,
            spawn_id,
            state: Mutex::new(ActorState {
                hp: max_hp,
                mp: max_mp,
                position,
                intention: Intention::Idle,
                target: ObjectId::NONE,
                is_dead: false,
            }),
            aggro: if has_aggro_list {
                Some(AggroList::new())
            } else {
                None
            },
        }
    }

    /// Read a snapshot of the actor's mutable state.
    #[must_use]
    pub fn snapshot(&self) -> ActorState {
        self.state.lock().unwrap().clone()
    }

    /// Apply a mutation under the actor's lock.
    pub fn with_state_mut<R>(&self, f: impl FnOnce(&mut ActorState) -> R) -> R {
        let mut guard = self.state.lock().unwrap();
        f(&mut guard)
    }

    #[must_use]
    pub fn is_dead(&self) -> bool {
        self.state.lock().unwrap().is_dead
    }

    #[must_use]
    pub fn position(&self) -> Position {
        self.state.lock().unwrap().position
    }

    pub fn set_position(&self, position: Position) {
        self.state.lock().unwrap().position = position;
    }

    #[must_use]
    pub fn intention(&self) -> Intention {
        self.state.lock().unwrap().intention
    }

    pub fn set_intention(&self, intention: Intention) {
        self.state.lock().unwrap().intention = intention;
    }

    #[must_use]
    pub fn target(&self) -> ObjectId {
        self.state.lock().unwrap().target
    }

    pub fn set_target(&self, target: ObjectId) {
        self.state.lock().unwrap().target = target;
    }

    /// Apply damage, clamping HP to `[0, max_hp]`. Marks the actor dead and
    /// forces `Intention::Idle` if HP reaches zero.
    ///
    /// Returns `true` if this call killed the actor.
    pub fn apply_damage(&self, amount: i32) -> bool {
        let mut guard = self.state.lock().unwrap();
        if guard.is_dead {
            return false;
        }
        guard.hp = (guard.hp - amount).max(0);
        if guard.hp == 0 {
            guard.is_dead = true;
            guard.intention = Intention::Idle;
            guard.target = ObjectId::NONE;
            true
        } else {
            false
        }
    }

    /// Heal to full HP and MP (used by "return home").
    pub fn heal_to_full(&self) {
        let max_hp = self.template.max_hp;
        let max_mp = self.template.max_mp;
        let mut guard = self.state.lock().unwrap();
        guard.hp = max_hp;
        guard.mp = max_mp;
    }

    #[must_use]
    pub fn is_at_full_health(&self) -> bool {
        let guard = self.state.lock().unwrap();
        guard.hp >= self.template.max_hp && guard.mp >= self.template.max_mp
    }

    #[must_use]
    pub fn mp(&self) -> i32 {
        self.state.lock().unwrap().mp
    }

    pub fn spend_mp(&self, amount: i32) {
        let mut guard = self.state.lock().unwrap();
        guard.mp = (guard.mp - amount).max(0);
    }
}
