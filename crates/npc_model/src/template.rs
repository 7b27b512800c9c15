//! Immutable NPC and skill templates.
//!
//! Templates are loaded once at boot (via the injected
//! `TemplateRepository`, see `npc_interfaces`) and shared read-only across
//! every actor instantiated from them — read-only after load, freely
//! shared without synchronization.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// A reference to a skill a template knows, at a specific level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SkillRef {
    pub skill_id: u32,
    pub skill_level: u32,
}

/// Immutable data shared across all actors instantiated from the same
/// template ID.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NpcTemplate {
    pub template_id: u32,
    pub name: String,
    pub level: u32,
    pub max_hp: i32,
    pub max_mp: i32,
    pub p_atk: i32,
    pub p_def: i32,
    /// Radius (world units) within which the monster will acquire a player
    /// target on scan. Compared squared against planar distance.
    pub aggro_range: f32,
    pub run_speed: f32,
    pub atk_speed: i32,
    pub skills: Vec<SkillRef>,
    /// Clan tags this template belongs to (e.g. `"orc_clan"`), used by
    /// faction call to decide which nearby NPCs join a fight.
    pub clans: HashSet<String>,
    /// Clans this template will *not* faction-call or be faction-called for,
    /// even if it otherwise shares a clan tag with the caller.
    pub ignore_clans: HashSet<String>,
}

impl NpcTemplate {
    /// Returns `true` if this template shares at least one clan tag with
    /// `other`, and neither ignores the other's clans.
    #[must_use]
    pub fn is_clan_allied_with(&self, other: &NpcTemplate) -> bool {
        let shares_clan = self.clans.intersection(&other.clans).next().is_some();
        if !shares_clan {
            return false;
        }
        let i_ignore_them = self.ignore_clans.intersection(&other.clans).next().is_some();
        let they_ignore_me = other.ignore_clans.intersection(&self.clans).next().is_some();
        !i_ignore_them && !they_ignore_me
    }
}

/// Immutable skill data, keyed by `(skill_id, skill_level)` in the
/// `TemplateRepository`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SkillTemplate {
    pub skill_id: u32,
    pub skill_level: u32,
    /// Maximum cast range. Compared squared against planar distance.
    pub cast_range: f32,
    pub mp_cost: i32,
    /// Minimum time between casts, in milliseconds.
    pub reuse_delay_ms: i64,
    pub hit_time_ms: i64,
    pub power: f32,
}
