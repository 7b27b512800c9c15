//! Spawn Manager — instantiates actors from spawn definitions, tracks
//! per-spawn occupancy, and registers their AI controllers.
//!
//! Implements the seven-step `do_spawn` protocol, idempotent `despawn_npc`,
//! `spawn_all`, and an O(1) `spawn_count`.

use std::sync::Arc;

use npc_ai::{AiController, AttackableAi, BasicNpcAi};
use npc_interfaces::{CombatController, CoreError, TemplateRepository, WorldView};
use npc_model::{ObjectId, ObjectIdAllocator, SpawnDefinition};
use npc_world::TickScheduler;

use rand::SeedableRng;
use rand::rngs::SmallRng;
use std::sync::Mutex;

/// What kind of AI controller a spawned actor should run. The template
/// repository only hands back stat data; kind selection is a property of
/// the spawn definition's intended population, not of the template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NpcKind {
    Attackable,
    Basic,
}

/// Creates, tracks, and removes actors on behalf of every loaded spawn.
pub struct SpawnManager {
    allocator: ObjectIdAllocator,
    spawns: Vec<Arc<SpawnDefinition>>,
    templates: Arc<dyn TemplateRepository>,
    world: Arc<dyn WorldView>,
    combat: Arc<dyn CombatController>,
    scheduler: Arc<TickScheduler>,
    rng: Mutex<SmallRng>,
}

impl SpawnManager {
    #[must_use]
    pub fn new(
        templates: Arc<dyn TemplateRepository>,
        world: Arc<dyn WorldView>,
        combat: Arc<dyn CombatController>,
        scheduler: Arc<TickScheduler>,
    ) -> Self {
        Self {
            allocator: ObjectIdAllocator::new(),
            spawns: Vec::new(),
            templates,
            world,
            combat,
            scheduler,
            rng: Mutex::new(SmallRng::from_os_rng()),
        }
    }

    /// Load all spawn definitions from the injected repository. Replaces
    /// any previously loaded set.
    pub fn load_spawns(&mut self, repository: &dyn npc_interfaces::SpawnRepository) {
        self.spawns = repository.load_all().into_iter().map(Arc::new).collect();
    }

    /// Total number of loaded spawn definitions, O(1).
    #[must_use]
    pub fn spawn_count(&self) -> usize {
        self.spawns.len()
    }

    #[must_use]
    pub fn spawn(&self, spawn_id: u64) -> Option<&Arc<SpawnDefinition>> {
        self.spawns.iter().find(|s| s.spawn_id == spawn_id)
    }

    /// Instantiate one NPC from `spawn`, publish it into the world, and
    /// register its AI controller.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::SpawnFull`] if the spawn is already at
    /// capacity, [`CoreError::TemplateNotFound`] if its template is
    /// unknown, or [`CoreError::WorldRejected`] if the world refuses the
    /// new actor (in which case all prior effects are rolled back).
    pub fn do_spawn(&self, spawn: &Arc<SpawnDefinition>, kind: NpcKind) -> Result<ObjectId, CoreError> {
        // Step 1.
        if !spawn.has_room() {
            tracing::warn!(spawn_id = spawn.spawn_id, "spawn at capacity");
            return Err(CoreError::SpawnFull {
                spawn_id: spawn.spawn_id,
            });
        }

        // Step 2.
        let template = self.templates.load_template(spawn.template_id).map_err(|e| {
            tracing::warn!(spawn_id = spawn.spawn_id, template_id = spawn.template_id, cause = %e, "template lookup failed");
            e
        })?;

        // Step 3.
        let object_id = self.allocator.allocate();

        // Step 4.
        let position = {
            let mut rng = self.rng.lock().unwrap();
            spawn.territory.sample(&mut *rng)
        };
        let has_aggro_list = matches!(kind, NpcKind::Attackable);
        let actor = Arc::new(npc_model::Actor::new(
            object_id,
            template,
            Some(spawn.spawn_id),
            position,
            has_aggro_list,
        ));

        // Step 5.
        spawn.add_live(object_id);

        // Step 6.
        if let Err(err) = self.world.add_object(&actor) {
            spawn.remove_live(object_id);
            tracing::warn!(
                object_id = object_id.0,
                spawn_id = spawn.spawn_id,
                template_id = actor.template.template_id,
                cause = %err,
                "world rejected newly spawned actor"
            );
            return Err(err);
        }

        // Step 7.
        let controller: Arc<dyn AiController> = match kind {
            NpcKind::Attackable => Arc::new(AttackableAi::new(
                actor.clone(),
                self.world.clone(),
                self.combat.clone(),
                self.templates.clone(),
                position,
            )),
            NpcKind::Basic => Arc::new(BasicNpcAi::new(actor.clone())),
        };
        self.scheduler.register(object_id, controller);

        Ok(object_id)
    }

    /// Remove one NPC: unregister its controller, withdraw it from the
    /// world, and drop it from its spawn's live list. Idempotent — a
    /// despawn of an already-removed actor is a no-op.
    pub fn despawn_npc(&self, spawn: &Arc<SpawnDefinition>, object_id: ObjectId) {
        self.scheduler.unregister(object_id);
        self.world.remove_object(object_id);
        if !spawn.remove_live(object_id) {
            tracing::warn!(
                object_id = object_id.0,
                spawn_id = spawn.spawn_id,
                "despawn of an actor not tracked by this spawn"
            );
        }
    }

    /// Attempt to fill every loaded spawn to its `maximum_count`.
    /// Individual failures (spawn full, template missing, world
    /// rejection) are logged and skipped; `spawn_all` never aborts early.
    pub fn spawn_all(&self, kind_for: impl Fn(u32) -> NpcKind) {
        for spawn in &self.spawns {
            while spawn.has_room() {
                let kind = kind_for(spawn.template_id);
                if self.do_spawn(spawn, kind).is_err() {
                    break;
                }
            }
        }
    }
}
