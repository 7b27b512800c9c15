//! The combat/movement collaborator.
//!
//! Attack, cast, and move are invoked from the AI controllers and are
//! expected to return quickly; if an implementation must block, it is
//! responsible for offloading the work itself. None of the three report
//! failure back to the core — a rejected attack or
//! an unreachable destination is the combat/movement subsystem's concern,
//! not the AI core's.

use std::sync::Arc;

use npc_model::{Actor, ObjectId};

/// Invoked by AI controllers to perform attacks, skill casts, and movement.
pub trait CombatController: Send + Sync {
    /// Perform a normal attack from `monster` against `target`.
    fn attack(&self, monster: &Arc<Actor>, target: ObjectId);

    /// Cast `skill_id`/`skill_level` from `monster` at `target`.
    fn cast(&self, monster: &Arc<Actor>, target: ObjectId, skill_id: u32, skill_level: u32);

    /// Move `actor` towards `(x, y, z)`.
    fn move_to(&self, actor: &Arc<Actor>, x: f32, y: f32, z: f32);
}
