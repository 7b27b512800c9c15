//! `InMemoryWorld` — a reference `WorldView`/`CombatController` over an
//! in-memory map of objects.
//!
//! **Not a production world.** The real world/combat/network layers are
//! explicitly out of scope for this workspace; this is the simplest
//! collaborator that satisfies the trait contracts, used by `npc_app` and
//! by cross-crate integration tests.

use std::sync::Arc;

use dashmap::DashMap;

use npc_interfaces::{CombatController, CoreError, ObjectRef, WorldView};
use npc_model::{Actor, ObjectId};

/// Squared radius `scan` treats as "visible". Arbitrary but generous —
/// this reference world has no real line-of-sight or cell model.
const VISIBILITY_RADIUS_SQ: f32 = 8000.0 * 8000.0;

#[derive(Default)]
pub struct InMemoryWorld {
    objects: DashMap<ObjectId, ObjectRef>,
}

impl InMemoryWorld {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Place a player-controlled object in the world. Players are outside
    /// this workspace's scope; this exists purely so demos/tests can
    /// populate something for monsters to aggro onto.
    pub fn insert_player(&self, id: ObjectId, x: f32, y: f32, is_dead: bool) {
        self.objects
            .insert(id, ObjectRef::Player { id, x, y, is_dead });
    }

    pub fn set_player_dead(&self, id: ObjectId, is_dead: bool) {
        if let Some(mut entry) = self.objects.get_mut(&id) {
            if let ObjectRef::Player { is_dead: d, .. } = entry.value_mut() {
                *d = is_dead;
            }
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl WorldView for InMemoryWorld {
    fn scan(&self, x: f32, y: f32, visit: &mut dyn FnMut(&ObjectRef) -> bool) {
        for entry in self.objects.iter() {
            let (ox, oy) = entry.value().position_2d();
            let dx = ox - x;
            let dy = oy - y;
            if dx * dx + dy * dy > VISIBILITY_RADIUS_SQ {
                continue;
            }
            if !visit(entry.value()) {
                break;
            }
        }
    }

    fn get_object(&self, id: ObjectId) -> Option<ObjectRef> {
        self.objects.get(&id).map(|e| e.value().clone())
    }

    fn add_object(&self, actor: &Arc<Actor>) -> Result<(), CoreError> {
        self.objects.insert(actor.id, ObjectRef::Npc(actor.clone()));
        Ok(())
    }

    fn remove_object(&self, id: ObjectId) {
        self.objects.remove(&id);
    }
}

impl CombatController for InMemoryWorld {
    fn attack(&self, monster: &Arc<Actor>, target: ObjectId) {
        tracing::debug!(attacker = %monster.id, target = %target, "attack");
    }

    fn cast(&self, monster: &Arc<Actor>, target: ObjectId, skill_id: u32, skill_level: u32) {
        tracing::debug!(caster = %monster.id, target = %target, skill_id, skill_level, "cast");
    }

    fn move_to(&self, actor: &Arc<Actor>, x: f32, y: f32, z: f32) {
        let heading = actor.position().heading;
        actor.set_position(npc_math::Position::new(x, y, z, heading));
    }
}
