//! Summon AI controller: a simpler three-state machine for owner-bound
//! pets/servitors.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use npc_interfaces::{CombatController, ObjectRef, WorldView};
use npc_model::{Actor, Intention, ObjectId};

use crate::controller::AiController;

/// Teleport-in range: beyond this the summon snaps directly to the owner.
const TELEPORT_RANGE_SQ: f32 = 2000.0 * 2000.0;
/// Catch-up range: beyond this (but within teleport range) the summon
/// snaps closer, simulating movement.
const CATCH_UP_RANGE_SQ: f32 = 100.0 * 100.0;
const ATTACK_RANGE: f32 = 100.0;

fn squared(x: f32) -> f32 {
    x * x
}

/// Owner-bound summon/servitor AI.
///
/// Movement is hardcoded "snap toward owner" offsets — a placeholder for
/// real path-based movement.
pub struct SummonAi {
    actor: Arc<Actor>,
    owner_id: ObjectId,
    world: Arc<dyn WorldView>,
    combat: Arc<dyn CombatController>,
    is_running: AtomicBool,
    follow: AtomicBool,
}

impl SummonAi {
    #[must_use]
    pub fn new(
        actor: Arc<Actor>,
        owner_id: ObjectId,
        world: Arc<dyn WorldView>,
        combat: Arc<dyn CombatController>,
    ) -> Self {
        Self {
            actor,
            owner_id,
            world,
            combat,
            is_running: AtomicBool::new(false),
            follow: AtomicBool::new(true),
        }
    }

    /// Owner command: attack `target`. No-op if not running or dead.
    pub fn order_attack(&self, target: ObjectId) {
        if !self.can_accept_orders() {
            return;
        }
        self.follow.store(false, Ordering::Relaxed);
        self.actor.set_target(target);
        self.actor.set_intention(Intention::Attack);
    }

    /// Owner command: resume following. No-op if not running or dead.
    pub fn order_follow(&self) {
        if !self.can_accept_orders() {
            return;
        }
        self.actor.set_target(ObjectId::NONE);
        self.follow.store(true, Ordering::Relaxed);
        self.actor.set_intention(Intention::Follow);
    }

    /// Owner command: stop entirely. No-op if not running or dead.
    pub fn order_stop(&self) {
        if !self.can_accept_orders() {
            return;
        }
        self.actor.set_target(ObjectId::NONE);
        self.follow.store(false, Ordering::Relaxed);
        self.actor.set_intention(Intention::Idle);
    }

    /// Retaliate against `attacker` iff the summon has no current target.
    pub fn notify_damage(&self, attacker: ObjectId) {
        if !self.can_accept_orders() {
            return;
        }
        if self.actor.target() != ObjectId::NONE {
            return;
        }
        self.actor.set_target(attacker);
        self.follow.store(false, Ordering::Relaxed);
        self.actor.set_intention(Intention::Attack);
    }

    fn can_accept_orders(&self) -> bool {
        self.is_running.load(Ordering::Relaxed) && !self.actor.is_dead()
    }

    fn return_to_follow(&self) {
        if self.follow.load(Ordering::Relaxed) {
            self.actor.set_intention(Intention::Follow);
        } else {
            self.actor.set_intention(Intention::Idle);
        }
    }

    fn think_follow(&self) {
        let Some(owner) = self.world.get_object(self.owner_id) else {
            return;
        };
        let pos = self.actor.position();
        let (ox, oy) = owner.position_2d();
        let dist_sq = squared(pos.x() - ox) + squared(pos.y() - oy);

        if dist_sq > TELEPORT_RANGE_SQ {
            self.combat.move_to(&self.actor, ox + 50.0, oy + 50.0, pos.z());
        } else if dist_sq > CATCH_UP_RANGE_SQ {
            self.combat.move_to(&self.actor, ox + 30.0, oy + 30.0, pos.z());
        }
    }

    fn think_attack(&self) {
        let target_id = self.actor.target();
        if target_id == ObjectId::NONE {
            self.return_to_follow();
            return;
        }

        let Some(target_obj) = self.world.get_object(target_id) else {
            self.actor.set_target(ObjectId::NONE);
            self.return_to_follow();
            return;
        };

        if target_obj.is_dead() {
            self.actor.set_target(ObjectId::NONE);
            self.return_to_follow();
            return;
        }

        let pos = self.actor.position();
        let (tx, ty) = target_obj.position_2d();
        let dist_sq = squared(pos.x() - tx) + squared(pos.y() - ty);
        if dist_sq > squared(ATTACK_RANGE) {
            // Out of range: remain in ATTACK, owner-level movement drives chase.
            return;
        }

        self.combat.attack(&self.actor, target_id);
    }

    fn think_idle(&self) {
        if self.follow.load(Ordering::Relaxed) {
            self.actor.set_intention(Intention::Follow);
        }
    }
}

impl AiController for SummonAi {
    fn object_id(&self) -> ObjectId {
        self.actor.id
    }

    fn start(&self) {
        self.follow.store(true, Ordering::Relaxed);
        self.is_running.store(true, Ordering::Relaxed);
        self.actor.set_intention(Intention::Follow);
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
        match self.actor.intention() {
            Intention::Follow => self.think_follow(),
            Intention::Attack => self.think_attack(),
            _ => self.think_idle(),
        }
    }

    fn is_running(&self) -> bool {
        self.is_running.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Mutex;

    use npc_interfaces::CoreError;
    use npc_math::Position;
    use npc_model::NpcTemplate;

    fn template() -> Arc<NpcTemplate> {
        Arc::new(NpcTemplate {
            template_id: 1,
            name: "Test Summon".to_string(),
            level: 10,
            max_hp: 500,
            max_mp: 100,
            p_atk: 50,
            p_def: 50,
            aggro_range: 0.0,
            run_speed: 150.0,
            atk_speed: 300,
            skills: Vec::new(),
            clans: HashSet::new(),
            ignore_clans: HashSet::new(),
        })
    }

    fn test_actor(id: ObjectId, position: Position) -> Arc<Actor> {
        Arc::new(Actor::new(id, template(), None, position, false))
    }

    #[derive(Default)]
    struct TestWorld {
        objects: Mutex<Vec<ObjectRef>>,
    }

    impl TestWorld {
        fn insert(&self, obj: ObjectRef) {
            self.objects.lock().unwrap().push(obj);
        }
    }

    impl WorldView for TestWorld {
        fn scan(&self, _x: f32, _y: f32, _visit: &mut dyn FnMut(&ObjectRef) -> bool) {}

        fn get_object(&self, id: ObjectId) -> Option<ObjectRef> {
            self.objects
                .lock()
                .unwrap()
                .iter()
                .find(|o| o.id() == id)
                .cloned()
        }

        fn add_object(&self, actor: &Arc<Actor>) -> Result<(), CoreError> {
            self.insert(ObjectRef::Npc(actor.clone()));
            Ok(())
        }

        fn remove_object(&self, id: ObjectId) {
            self.objects.lock().unwrap().retain(|o| o.id() != id);
        }
    }

    #[derive(Default)]
    struct TestCombat {
        moves: Mutex<Vec<(ObjectId, f32, f32, f32)>>,
        attacks: Mutex<Vec<(ObjectId, ObjectId)>>,
    }

    impl CombatController for TestCombat {
        fn attack(&self, monster: &Arc<Actor>, target: ObjectId) {
            self.attacks.lock().unwrap().push((monster.id, target));
        }
        fn cast(&self, _monster: &Arc<Actor>, _target: ObjectId, _skill_id: u32, _skill_level: u32) {}
        fn move_to(&self, actor: &Arc<Actor>, x: f32, y: f32, z: f32) {
            self.moves.lock().unwrap().push((actor.id, x, y, z));
        }
    }

    #[test]
    fn start_sets_follow_intention() {
        let summon = test_actor(ObjectId(1), Position::default());
        let world = Arc::new(TestWorld::default());
        let combat = Arc::new(TestCombat::default());
        let ai = SummonAi::new(summon.clone(), ObjectId(2), world, combat);
        ai.start();
        assert_eq!(summon.intention(), Intention::Follow);
    }

    #[test]
    fn follow_teleports_when_far_from_owner() {
        let summon = test_actor(ObjectId(1), Position::new(0.0, 0.0, 0.0, 0));
        let world = Arc::new(TestWorld::default());
        world.insert(ObjectRef::Player {
            id: ObjectId(2),
            x: 5000.0,
            y: 0.0,
            is_dead: false,
        });
        let combat = Arc::new(TestCombat::default());
        let ai = SummonAi::new(summon, ObjectId(2), world, combat.clone());
        ai.start();
        ai.tick();
        let moves = combat.moves.lock().unwrap();
        assert_eq!(moves.len(), 1);
        assert_eq!((moves[0].1, moves[0].2), (5050.0, 50.0));
    }

    #[test]
    fn follow_snaps_closer_within_teleport_range() {
        let summon = test_actor(ObjectId(1), Position::new(0.0, 0.0, 0.0, 0));
        let world = Arc::new(TestWorld::default());
        world.insert(ObjectRef::Player {
            id: ObjectId(2),
            x: 150.0,
            y: 0.0,
            is_dead: false,
        });
        let combat = Arc::new(TestCombat::default());
        let ai = SummonAi::new(summon, ObjectId(2), world, combat.clone());
        ai.start();
        ai.tick();
        let moves = combat.moves.lock().unwrap();
        assert_eq!(moves.len(), 1);
        assert_eq!((moves[0].1, moves[0].2), (180.0, 30.0));
    }

    #[test]
    fn order_attack_then_order_follow_round_trips() {
        let summon = test_actor(ObjectId(1), Position::default());
        let world = Arc::new(TestWorld::default());
        let combat = Arc::new(TestCombat::default());
        let ai = SummonAi::new(summon.clone(), ObjectId(2), world, combat);
        ai.start();

        ai.order_attack(ObjectId(99));
        assert_eq!(summon.intention(), Intention::Attack);
        assert_eq!(summon.target(), ObjectId(99));

        ai.order_follow();
        assert_eq!(summon.target(), ObjectId::NONE);
        assert_eq!(summon.intention(), Intention::Follow);
        assert!(ai.follow.load(Ordering::Relaxed));
    }

    #[test]
    fn notify_damage_retaliates_only_without_current_target() {
        let summon = test_actor(ObjectId(1), Position::default());
        let world = Arc::new(TestWorld::default());
        let combat = Arc::new(TestCombat::default());
        let ai = SummonAi::new(summon.clone(), ObjectId(2), world, combat);
        ai.start();

        ai.notify_damage(ObjectId(50));
        assert_eq!(summon.intention(), Intention::Attack);
        assert_eq!(summon.target(), ObjectId(50));

        // Already has a target: a second attacker does not steal aggro.
        ai.notify_damage(ObjectId(51));
        assert_eq!(summon.target(), ObjectId(50));
    }

    #[test]
    fn orders_are_noop_when_not_running() {
        let summon = test_actor(ObjectId(1), Position::default());
        let world = Arc::new(TestWorld::default());
        let combat = Arc::new(TestCombat::default());
        let ai = SummonAi::new(summon.clone(), ObjectId(2), world, combat);

        ai.order_attack(ObjectId(5));
        assert_eq!(summon.intention(), Intention::Idle);
        assert_eq!(summon.target(), ObjectId::NONE);
    }
}
