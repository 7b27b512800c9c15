//! Read-only repository collaborators.
//!
//! Template and spawn definitions are loaded from collaborators the core
//! does not implement — static template/XML ingestion is explicitly out of
//! scope.

use std::sync::Arc;

use npc_model::{NpcTemplate, SkillTemplate, SpawnDefinition};

use crate::error::CoreError;

/// Looks up immutable template data. Called once per spawn by the Spawn
/// Manager.
pub trait TemplateRepository: Send + Sync {
    /// # Errors
    ///
    /// Returns [`CoreError::TemplateNotFound`] if `template_id` is unknown.
    fn load_template(&self, template_id: u32) -> Result<Arc<NpcTemplate>, CoreError>;

    /// Looks up a skill template by `(skill_id, skill_level)`. Returns
    /// `None` if unknown — the skill casting policy simply skips a skill it
    /// cannot resolve.
    fn load_skill_template(&self, skill_id: u32, skill_level: u32) -> Option<SkillTemplate>;
}

/// Loads all spawn definitions once at boot.
pub trait SpawnRepository: Send + Sync {
    fn load_all(&self) -> Vec<SpawnDefinition>;
}
