//! Hardcoded demo population: a couple of monster templates and their
//! spawn definitions. Static template/spawn ingestion is explicitly out of
//! scope for the core; this is just enough data to watch the tick
//! scheduler and AI controllers actually run.

use std::collections::HashSet;
use std::sync::Arc;

use npc_interfaces::{CoreError, SpawnRepository, TemplateRepository};
use npc_math::Position;
use npc_model::{NpcTemplate, SkillTemplate, SpawnDefinition, Territory};
use npc_spawn::NpcKind;

const ORC_ARCHER: u32 = 1;
const ORC_WARRIOR: u32 = 2;
const TOWN_FOLK: u32 = 3;

pub struct DemoTemplateRepository {
    templates: Vec<Arc<NpcTemplate>>,
}

impl DemoTemplateRepository {
    #[must_use]
    pub fn new() -> Self {
        let orc_clan: HashSet<String> = ["orc_clan".to_string()].into_iter().collect();

        let orc_archer = NpcTemplate {
            template_id: ORC_ARCHER,
            name: "Orc Archer".to_string(),
            level: 12,
            max_hp: 400,
            max_mp: 50,
            p_atk: 40,
            p_def: 20,
            aggro_range: 400.0,
            run_speed: 120.0,
            atk_speed: 300,
            skills: vec![npc_model::SkillRef {
                skill_id: 101,
                skill_level: 1,
            }],
            clans: orc_clan.clone(),
            ignore_clans: HashSet::new(),
        };

        let orc_warrior = NpcTemplate {
            template_id: ORC_WARRIOR,
            name: "Orc Warrior".to_string(),
            level: 14,
            max_hp: 800,
            max_mp: 30,
            p_atk: 60,
            p_def: 35,
            aggro_range: 350.0,
            run_speed: 110.0,
            atk_speed: 350,
            skills: Vec::new(),
            clans: orc_clan,
            ignore_clans: HashSet::new(),
        };

        let town_folk = NpcTemplate {
            template_id: TOWN_FOLK,
            name: "Town Folk".to_string(),
            level: 1,
            max_hp: 100,
            max_mp: 0,
            p_atk: 0,
            p_def: 0,
            aggro_range: 0.0,
            run_speed: 80.0,
            atk_speed: 300,
            skills: Vec::new(),
            clans: HashSet::new(),
            ignore_clans: HashSet::new(),
        };

        Self {
            templates: vec![
                Arc::new(orc_archer),
                Arc::new(orc_warrior),
                Arc::new(town_folk),
            ],
        }
    }
}

impl Default for DemoTemplateRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateRepository for DemoTemplateRepository {
    fn load_template(&self, template_id: u32) -> Result<Arc<NpcTemplate>, CoreError> {
        self.templates
            .iter()
            .find(|t| t.template_id == template_id)
            .cloned()
            .ok_or(CoreError::TemplateNotFound { template_id })
    }

    fn load_skill_template(&self, skill_id: u32, skill_level: u32) -> Option<SkillTemplate> {
        if skill_id == 101 && skill_level == 1 {
            Some(SkillTemplate {
                skill_id,
                skill_level,
                cast_range: 500.0,
                mp_cost: 10,
                reuse_delay_ms: 6_000,
                hit_time_ms: 1_200,
                power: 25.0,
            })
        } else {
            None
        }
    }
}

pub struct DemoSpawnRepository;

impl DemoSpawnRepository {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for DemoSpawnRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl SpawnRepository for DemoSpawnRepository {
    fn load_all(&self) -> Vec<SpawnDefinition> {
        vec![
            SpawnDefinition::new(
                1,
                ORC_ARCHER,
                Territory::Point(Position::new(1000.0, 1000.0, 0.0, 0)),
                3,
                30,
                60,
                true,
            ),
            SpawnDefinition::new(
                2,
                ORC_WARRIOR,
                Territory::Polygon {
                    vertices: vec![(2000.0, 2000.0), (2400.0, 2000.0), (2400.0, 2400.0), (2000.0, 2400.0)],
                    z: 0.0,
                    heading: 0,
                },
                2,
                45,
                90,
                true,
            ),
            SpawnDefinition::new(3, TOWN_FOLK, Territory::Point(Position::new(0.0, 0.0, 0.0, 0)), 1, 30, 30, false),
        ]
    }
}

/// Map a template id to the kind of AI controller it spawns with.
/// `TOWN_FOLK` is a placeholder, non-combatant population (`BasicNpcAi`'s
/// toggling idle/active is itself a placeholder); everything else is a
/// monster.
#[must_use]
pub fn kind_for_template(template_id: u32) -> NpcKind {
    if template_id == TOWN_FOLK {
        NpcKind::Basic
    } else {
        NpcKind::Attackable
    }
}
