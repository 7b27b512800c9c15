//! Monster AI controller (`AttackableAi`).
//!
//! Implements the intention state machine, spawn immunity, scanning,
//! target servicing, chase leash, idle drift, random walk, faction call,
//! hate decay, and skill casting.

use std::sync::atomic::{AtomicBool, AtomicI32, AtomicI64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use rand::Rng;

use npc_interfaces::{CombatController, ObjectRef, TemplateRepository, WorldView};
use npc_math::Position;
use npc_model::{Actor, Intention, ObjectId};

use crate::controller::AiController;
use crate::time::now_ms;

const SPAWN_IMMUNITY_START: i32 = -10;
const CHASE_RANGE_NORMAL: f32 = 1500.0;
const MAX_DRIFT_RANGE: f32 = 300.0;
const ATTACK_RANGE: f32 = 100.0;
const RANDOM_WALK_NUM: u32 = 1;
const RANDOM_WALK_DEN: u32 = 30;
const HATE_DECAY_NUM: u32 = 1;
const HATE_DECAY_DEN: u32 = 500;
/// How long a monster will chase without landing damage or taking it
/// before giving up and returning home. Not specified numerically in the
/// source material; chosen as a generous multiple of one attack cycle.
const ATTACK_TIMEOUT_MS: i64 = 15_000;
/// Sentinel meaning "no timeout currently armed".
const NO_TIMEOUT: i64 = i64::MAX;

fn squared(x: f32) -> f32 {
    x * x
}

/// Hostile monster AI: scans for targets, services the current target,
/// and returns home when it strays too far or goes too long unengaged.
pub struct AttackableAi {
    actor: Arc<Actor>,
    world: Arc<dyn WorldView>,
    combat: Arc<dyn CombatController>,
    templates: Arc<dyn TemplateRepository>,
    spawn_anchor: Position,
    is_running: AtomicBool,
    global_aggro: AtomicI32,
    attack_timeout_ms: AtomicI64,
    last_cast_ms: DashMap<(u32, u32), i64>,
}

impl AttackableAi {
    #[must_use]
    pub fn new(
        actor: Arc<Actor>,
        world: Arc<dyn WorldView>,
        combat: Arc<dyn CombatController>,
        templates: Arc<dyn TemplateRepository>,
        spawn_anchor: Position,
    ) -> Self {
        Self {
            actor,
            world,
            combat,
            templates,
            spawn_anchor,
            is_running: AtomicBool::new(false),
            global_aggro: AtomicI32::new(SPAWN_IMMUNITY_START),
            attack_timeout_ms: AtomicI64::new(NO_TIMEOUT),
            last_cast_ms: DashMap::new(),
        }
    }

    /// External damage notification. Cancels spawn immunity, adds hate
    /// scaled from `damage`, and alerts nearby allied monsters.
    pub fn notify_damage(&self, attacker: ObjectId, damage: i64) {
        if !self.is_running.load(Ordering::Relaxed) || self.actor.is_dead() {
            return;
        }
        self.global_aggro.store(0, Ordering::Relaxed);
        let Some(aggro) = &self.actor.aggro else {
            return;
        };
        let hate = damage.clamp(1, i32::MAX as i64) as i32;
        aggro.add_hate(attacker, hate);
        aggro.add_damage(attacker, damage);
        self.actor.set_target(aggro.most_hated());
        self.transition(Intention::Attack, "notify_damage");
        self.attack_timeout_ms
            .store(now_ms() + ATTACK_TIMEOUT_MS, Ordering::Relaxed);
        self.faction_call(attacker, hate);
    }

    fn transition(&self, to: Intention, reason: &'static str) {
        let from = self.actor.intention();
        if from != to {
            npc_interfaces::gated_debug!(object_id = %self.actor.id, %from, %to, reason, "monster intention transition");
        }
        self.actor.set_intention(to);
    }

    fn roll(&self, numerator: u32, denominator: u32) -> bool {
        rand::rng().random_ratio(numerator, denominator)
    }

    fn maybe_decay_hate(&self) {
        if self.actor.is_at_full_health() && self.roll(HATE_DECAY_NUM, HATE_DECAY_DEN) {
            if let Some(aggro) = &self.actor.aggro {
                aggro.clear();
            }
            self.actor.set_target(ObjectId::NONE);
            self.transition(Intention::Active, "hate_decay");
        }
    }

    fn think_active(&self) {
        let current = self.global_aggro.load(Ordering::Relaxed);
        if current < 0 {
            self.global_aggro.store(current + 1, Ordering::Relaxed);
        } else {
            self.scan_for_targets();
        }
        if self.actor.intention() == Intention::Active {
            self.idle_drift();
            self.random_walk();
        }
    }

    fn scan_for_targets(&self) {
        let Some(aggro) = &self.actor.aggro else {
            return;
        };
        let pos = self.actor.position();
        let aggro_range_sq = squared(self.actor.template.aggro_range);
        let my_id = self.actor.id;
        self.world.scan(pos.x(), pos.y(), &mut |obj| {
            if let ObjectRef::Player { id, x, y, is_dead } = obj {
                if *id != my_id && !*is_dead {
                    let dx = pos.x() - x;
                    let dy = pos.y() - y;
                    if dx * dx + dy * dy <= aggro_range_sq {
                        aggro.add_hate(*id, 1);
                    }
                }
            }
            true
        });
        if !aggro.is_empty() {
            let target = aggro.most_hated();
            self.actor.set_target(target);
            self.transition(Intention::Attack, "scan_acquired_target");
        }
    }

    fn idle_drift(&self) {
        if self.actor.spawn_id.is_none() {
            return;
        }
        let pos = self.actor.position();
        if pos.distance_squared_2d(&self.spawn_anchor) > squared(MAX_DRIFT_RANGE) {
            self.combat.move_to(
                &self.actor,
                self.spawn_anchor.x(),
                self.spawn_anchor.y(),
                self.spawn_anchor.z(),
            );
        }
    }

    fn random_walk(&self) {
        if self.actor.spawn_id.is_none() {
            return;
        }
        if !self.roll(RANDOM_WALK_NUM, RANDOM_WALK_DEN) {
            return;
        }
        let mut rng = rand::rng();
        let dx = rng.random_range(-MAX_DRIFT_RANGE..=MAX_DRIFT_RANGE);
        let dy = rng.random_range(-MAX_DRIFT_RANGE..=MAX_DRIFT_RANGE);
        self.combat.move_to(
            &self.actor,
            self.spawn_anchor.x() + dx,
            self.spawn_anchor.y() + dy,
            self.spawn_anchor.z(),
        );
    }

    fn think_attack(&self) {
        let pos = self.actor.position();

        if pos.distance_squared_2d(&self.spawn_anchor) > squared(CHASE_RANGE_NORMAL) {
            self.return_home();
            return;
        }

        let timeout = self.attack_timeout_ms.load(Ordering::Relaxed);
        if timeout != NO_TIMEOUT && now_ms() > timeout {
            self.return_home();
            return;
        }

        let Some(aggro) = &self.actor.aggro else {
            self.actor.set_target(ObjectId::NONE);
            self.transition(Intention::Active, "no_aggro_list");
            return;
        };

        // Step 1.
        let target_id = aggro.most_hated();
        if target_id == ObjectId::NONE {
            self.actor.set_target(ObjectId::NONE);
            self.transition(Intention::Active, "hate_list_empty");
            return;
        }
        self.actor.set_target(target_id);

        // Step 2.
        let Some(target_obj) = self.world.get_object(target_id) else {
            aggro.remove(target_id);
            self.actor.set_target(ObjectId::NONE);
            self.transition(Intention::Active, "target_missing");
            return;
        };

        // Step 3.
        if target_obj.is_player() && target_obj.is_dead() {
            aggro.remove(target_id);
            self.actor.set_target(ObjectId::NONE);
            self.transition(Intention::Active, "target_dead");
            return;
        }

        // Step 4.
        if self.try_skill_cast(&target_obj) {
            return;
        }

        // Steps 5-6.
        let (tx, ty) = target_obj.position_2d();
        let dx = pos.x() - tx;
        let dy = pos.y() - ty;
        if dx * dx + dy * dy > squared(ATTACK_RANGE) {
            self.combat.move_to(&self.actor, tx, ty, pos.z());
            return;
        }

        self.combat.attack(&self.actor, target_id);
        self.attack_timeout_ms
            .store(now_ms() + ATTACK_TIMEOUT_MS, Ordering::Relaxed);
    }

    fn try_skill_cast(&self, target_obj: &ObjectRef) -> bool {
        let pos = self.actor.position();
        let (tx, ty) = target_obj.position_2d();
        let dist_sq = squared(pos.x() - tx) + squared(pos.y() - ty);
        let now = now_ms();

        for skill_ref in &self.actor.template.skills {
            let Some(skill) = self
                .templates
                .load_skill_template(skill_ref.skill_id, skill_ref.skill_level)
            else {
                continue;
            };
            let key = (skill_ref.skill_id, skill_ref.skill_level);
            if let Some(last) = self.last_cast_ms.get(&key) {
                if *last + skill.reuse_delay_ms >= now {
                    continue;
                }
            }
            if skill.mp_cost > self.actor.mp() {
                continue;
            }
            if dist_sq > squared(skill.cast_range) {
                continue;
            }
            self.combat.cast(
                &self.actor,
                target_obj.id(),
                skill_ref.skill_id,
                skill_ref.skill_level,
            );
            self.actor.spend_mp(skill.mp_cost);
            self.last_cast_ms.insert(key, now);
            return true;
        }
        false
    }

    fn return_home(&self) {
        self.actor.heal_to_full();
        self.actor.set_target(ObjectId::NONE);
        if let Some(aggro) = &self.actor.aggro {
            aggro.clear();
        }
        self.attack_timeout_ms.store(NO_TIMEOUT, Ordering::Relaxed);
        self.transition(Intention::Active, "return_home");
        self.combat.move_to(
            &self.actor,
            self.spawn_anchor.x(),
            self.spawn_anchor.y(),
            self.spawn_anchor.z(),
        );
    }

    fn faction_call(&self, attacker: ObjectId, hate: i32) {
        let pos = self.actor.position();
        let my_template = &self.actor.template;
        let my_id = self.actor.id;
        self.world.scan(pos.x(), pos.y(), &mut |obj| {
            if let ObjectRef::Npc(other) = obj {
                if other.id != my_id && my_template.is_clan_allied_with(&other.template) {
                    if let Some(other_aggro) = &other.aggro {
                        other_aggro.add_hate(attacker, hate.max(1));
                    }
                }
            }
            true
        });
    }
}

impl AiController for AttackableAi {
    fn object_id(&self) -> ObjectId {
        self.actor.id
    }

    fn start(&self) {
        self.global_aggro
            .store(SPAWN_IMMUNITY_START, Ordering::Relaxed);
        self.attack_timeout_ms.store(NO_TIMEOUT, Ordering::Relaxed);
        self.is_running.store(true, Ordering::Relaxed);
        self.transition(Intention::Active, "start");
    }

    fn stop(&self) {
        self.is_running.store(false, Ordering::Relaxed);
        self.actor.set_target(ObjectId::NONE);
        if let Some(aggro) = &self.actor.aggro {
            aggro.clear();
        }
        self.transition(Intention::Idle, "stop");
    }

    fn tick(&self) {
        if !self.is_running.load(Ordering::Relaxed) {
            return;
        }
        if self.actor.is_dead() {
            return;
        }
        self.maybe_decay_hate();
        match self.actor.intention() {
            Intention::Attack => self.think_attack(),
            _ => self.think_active(),
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
    use npc_model::{NpcTemplate, SkillRef, SkillTemplate};

    fn template(aggro_range: f32) -> Arc<NpcTemplate> {
        Arc::new(NpcTemplate {
            template_id: 1,
            name: "Test Monster".to_string(),
            level: 10,
            max_hp: 1000,
            max_mp: 500,
            p_atk: 50,
            p_def: 50,
            aggro_range,
            run_speed: 120.0,
            atk_speed: 300,
            skills: Vec::new(),
            clans: HashSet::new(),
            ignore_clans: HashSet::new(),
        })
    }

    fn test_actor(id: ObjectId, position: Position, aggro_range: f32) -> Arc<Actor> {
        Arc::new(Actor::new(id, template(aggro_range), Some(1), position, true))
    }

    #[derive(Default)]
    struct TestWorld {
        objects: Mutex<Vec<ObjectRef>>,
    }

    impl TestWorld {
        fn new() -> Self {
            Self::default()
        }

        fn insert(&self, obj: ObjectRef) {
            self.objects.lock().unwrap().push(obj);
        }
    }

    impl WorldView for TestWorld {
        fn scan(&self, _x: f32, _y: f32, visit: &mut dyn FnMut(&ObjectRef) -> bool) {
            for obj in self.objects.lock().unwrap().iter() {
                if !visit(obj) {
                    break;
                }
            }
        }

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
        attacks: Mutex<Vec<(ObjectId, ObjectId)>>,
        casts: Mutex<Vec<(ObjectId, ObjectId, u32, u32)>>,
        moves: Mutex<Vec<(ObjectId, f32, f32, f32)>>,
    }

    impl CombatController for TestCombat {
        fn attack(&self, monster: &Arc<Actor>, target: ObjectId) {
            self.attacks.lock().unwrap().push((monster.id, target));
        }

        fn cast(&self, monster: &Arc<Actor>, target: ObjectId, skill_id: u32, skill_level: u32) {
            self.casts
                .lock()
                .unwrap()
                .push((monster.id, target, skill_id, skill_level));
        }

        fn move_to(&self, actor: &Arc<Actor>, x: f32, y: f32, z: f32) {
            self.moves.lock().unwrap().push((actor.id, x, y, z));
        }
    }

    #[derive(Default)]
    struct TestTemplateRepo {
        skill: Option<SkillTemplate>,
    }

    impl TemplateRepository for TestTemplateRepo {
        fn load_template(&self, _template_id: u32) -> Result<Arc<NpcTemplate>, CoreError> {
            unreachable!("not exercised by monster AI tests")
        }

        fn load_skill_template(&self, skill_id: u32, skill_level: u32) -> Option<SkillTemplate> {
            self.skill
                .filter(|s| s.skill_id == skill_id && s.skill_level == skill_level)
        }
    }

    fn no_skills_repo() -> Arc<TestTemplateRepo> {
        Arc::new(TestTemplateRepo::default())
    }

    #[test]
    fn scenario_a_spawn_immunity() {
        let anchor = Position::new(17000.0, 170000.0, -3500.0, 0);
        let monster = test_actor(ObjectId(1), anchor, 300.0);
        let world = Arc::new(TestWorld::new());
        let player = ObjectId(2);
        world.insert(ObjectRef::Player {
            id: player,
            x: 17050.0,
            y: 170050.0,
            is_dead: false,
        });
        let combat = Arc::new(TestCombat::default());
        let ai = AttackableAi::new(monster.clone(), world, combat.clone(), no_skills_repo(), anchor);
        ai.start();

        for _ in 0..9 {
            ai.tick();
            assert_ne!(monster.intention(), Intention::Attack);
        }
        assert!(combat.attacks.lock().unwrap().is_empty());

        ai.tick(); // 10th tick
        ai.tick(); // 11th tick
        assert_eq!(monster.intention(), Intention::Attack);

        ai.tick(); // 12th tick
        let attacks = combat.attacks.lock().unwrap();
        assert_eq!(attacks.len(), 1);
        assert_eq!(attacks[0], (ObjectId(1), player));
    }

    #[test]
    fn scenario_b_damage_cancels_immunity() {
        let anchor = Position::new(0.0, 0.0, 0.0, 0);
        let monster = test_actor(ObjectId(1), anchor, 300.0);
        let world = Arc::new(TestWorld::new());
        let player = ObjectId(2);
        world.insert(ObjectRef::Player {
            id: player,
            x: 0.0,
            y: 0.0,
            is_dead: false,
        });
        let combat = Arc::new(TestCombat::default());
        let ai = AttackableAi::new(monster.clone(), world, combat.clone(), no_skills_repo(), anchor);
        ai.start();

        ai.tick(); // tick 1, still immune
        ai.notify_damage(player, 100);
        assert_eq!(monster.intention(), Intention::Attack);
        let entry = monster.aggro.as_ref().unwrap().get(player).unwrap();
        assert!(entry.hate >= 1);

        ai.tick();
        assert_eq!(combat.attacks.lock().unwrap().len(), 1);
    }

    #[test]
    fn scenario_c_most_hated_arbitration() {
        let anchor = Position::new(0.0, 0.0, 0.0, 0);
        let monster = test_actor(ObjectId(1), anchor, 300.0);
        let world = Arc::new(TestWorld::new());
        let a = ObjectId(2);
        let b = ObjectId(3);
        world.insert(ObjectRef::Player { id: a, x: 0.0, y: 0.0, is_dead: false });
        world.insert(ObjectRef::Player { id: b, x: 0.0, y: 0.0, is_dead: false });
        let combat = Arc::new(TestCombat::default());
        let ai = AttackableAi::new(monster.clone(), world, combat.clone(), no_skills_repo(), anchor);
        ai.start();

        ai.notify_damage(a, 50);
        ai.notify_damage(b, 200);
        ai.tick();

        let attacks = combat.attacks.lock().unwrap();
        assert_eq!(attacks.last().unwrap().1, b);
    }

    #[test]
    fn scenario_d_skill_cast_gating() {
        let anchor = Position::new(0.0, 0.0, 0.0, 0);
        let mut tmpl = (*template(300.0)).clone();
        tmpl.skills = vec![SkillRef { skill_id: 1, skill_level: 1 }];
        let monster = Arc::new(Actor::new(ObjectId(1), Arc::new(tmpl), Some(1), anchor, true));

        let world = Arc::new(TestWorld::new());
        let target = ObjectId(2);
        world.insert(ObjectRef::Player { id: target, x: 70.0, y: 0.0, is_dead: false });
        let combat = Arc::new(TestCombat::default());
        let templates = Arc::new(TestTemplateRepo {
            skill: Some(SkillTemplate {
                skill_id: 1,
                skill_level: 1,
                cast_range: 500.0,
                mp_cost: 100,
                reuse_delay_ms: 60_000,
                hit_time_ms: 500,
                power: 10.0,
            }),
        });
        let ai = AttackableAi::new(monster.clone(), world, combat.clone(), templates, anchor);
        ai.start();
        ai.notify_damage(target, 1);

        ai.tick();
        assert_eq!(combat.casts.lock().unwrap().len(), 1);

        ai.tick();
        assert_eq!(combat.casts.lock().unwrap().len(), 1, "cooldown should block immediate re-cast");
    }

    #[test]
    fn scenario_e_return_home_on_timeout() {
        let anchor = Position::new(17000.0, 170000.0, -3500.0, 0);
        let monster = test_actor(ObjectId(1), Position::new(18000.0, 171000.0, -3500.0, 0), 300.0);
        monster.apply_damage(500);
        let world = Arc::new(TestWorld::new());
        let attacker = ObjectId(2);
        world.insert(ObjectRef::Player { id: attacker, x: 18000.0, y: 171000.0, is_dead: false });
        let combat = Arc::new(TestCombat::default());
        let ai = AttackableAi::new(monster.clone(), world, combat.clone(), no_skills_repo(), anchor);
        ai.start();
        ai.notify_damage(attacker, 10);
        ai.attack_timeout_ms.store(now_ms() - 1000, Ordering::Relaxed);

        ai.tick();

        assert_eq!(monster.snapshot().hp, monster.template.max_hp);
        assert_eq!(monster.intention(), Intention::Active);
        assert!(!combat.moves.lock().unwrap().is_empty());
    }

    #[test]
    fn scenario_f_faction_call_different_clans() {
        let anchor = Position::new(0.0, 0.0, 0.0, 0);
        let mut tmpl1 = (*template(300.0)).clone();
        tmpl1.clans = ["orc_clan".to_string()].into_iter().collect();
        let monster1 = Arc::new(Actor::new(ObjectId(1), Arc::new(tmpl1), Some(1), anchor, true));

        let mut tmpl2 = (*template(300.0)).clone();
        tmpl2.clans = ["kobold_clan".to_string()].into_iter().collect();
        let monster2 = Arc::new(Actor::new(ObjectId(2), Arc::new(tmpl2), Some(2), anchor, true));

        let world = Arc::new(TestWorld::new());
        world.insert(ObjectRef::Npc(monster2.clone()));
        let attacker = ObjectId(3);
        world.insert(ObjectRef::Player { id: attacker, x: 0.0, y: 0.0, is_dead: false });

        let combat = Arc::new(TestCombat::default());
        let ai = AttackableAi::new(monster1.clone(), world, combat, no_skills_repo(), anchor);
        ai.start();
        ai.notify_damage(attacker, 100);

        assert!(monster2.aggro.as_ref().unwrap().is_empty());
    }

    #[test]
    fn tick_before_start_is_noop() {
        let anchor = Position::new(0.0, 0.0, 0.0, 0);
        let monster = test_actor(ObjectId(1), anchor, 300.0);
        let world = Arc::new(TestWorld::new());
        let combat = Arc::new(TestCombat::default());
        let ai = AttackableAi::new(monster.clone(), world, combat.clone(), no_skills_repo(), anchor);

        ai.tick();
        assert!(!ai.is_running());
        assert_eq!(monster.intention(), Intention::Idle);
    }

    #[test]
    fn dead_monster_tick_invokes_no_callbacks() {
        let anchor = Position::new(0.0, 0.0, 0.0, 0);
        let monster = test_actor(ObjectId(1), anchor, 300.0);
        let world = Arc::new(TestWorld::new());
        world.insert(ObjectRef::Player { id: ObjectId(2), x: 0.0, y: 0.0, is_dead: false });
        let combat = Arc::new(TestCombat::default());
        let ai = AttackableAi::new(monster.clone(), world, combat.clone(), no_skills_repo(), anchor);
        ai.start();
        monster.apply_damage(10_000);

        ai.tick();

        assert!(combat.attacks.lock().unwrap().is_empty());
        assert!(combat.moves.lock().unwrap().is_empty());
        assert!(combat.casts.lock().unwrap().is_empty());
    }

    #[test]
    fn stop_clears_aggro_and_target() {
        let anchor = Position::new(0.0, 0.0, 0.0, 0);
        let monster = test_actor(ObjectId(1), anchor, 300.0);
        let world = Arc::new(TestWorld::new());
        let combat = Arc::new(TestCombat::default());
        let ai = AttackableAi::new(monster.clone(), world, combat, no_skills_repo(), anchor);
        ai.start();
        ai.notify_damage(ObjectId(9), 50);

        ai.stop();

        assert!(!ai.is_running());
        assert_eq!(monster.intention(), Intention::Idle);
        assert_eq!(monster.target(), ObjectId::NONE);
        assert!(monster.aggro.as_ref().unwrap().is_empty());
    }
}
