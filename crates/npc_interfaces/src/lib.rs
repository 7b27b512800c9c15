//! # npc_interfaces
//!
//! The narrow injected collaborators the NPC simulation core depends on but
//! does not implement: world visibility/admission, combat/movement, and the
//! read-only template and spawn repositories. Also home to [`CoreError`],
//! the shared error type the core's own components return.

pub mod combat;
pub mod debug;
pub mod error;
pub mod repository;
pub mod world;

pub use combat::CombatController;
pub use debug::{is_debug_enabled, set_debug_enabled};
pub use error::CoreError;
pub use repository::{SpawnRepository, TemplateRepository};
pub use world::{ObjectRef, WorldView};
