//! # npc_model
//!
//! Core data model for the NPC simulation core: object identity, immutable
//! templates, actor runtime state, aggro lists, and spawn definitions.

pub mod actor;
pub mod aggro;
pub mod object;
pub mod spawn;
pub mod template;

pub use actor::{Actor, ActorState, Intention};
pub use aggro::{AggroEntry, AggroList};
pub use object::{ObjectId, ObjectIdAllocator};
pub use spawn::{SpawnDefinition, Territory};
pub use template::{NpcTemplate, SkillRef, SkillTemplate};
