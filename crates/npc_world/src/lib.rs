//! # npc_world
//!
//! The clock, tick scheduler, and the in-memory reference world
//! collaborator the NPC simulation core runs against. The debug gate
//! lives in `npc_interfaces` so the AI crate can reach it without a
//! circular dependency on this crate.

pub mod clock;
pub mod memory_world;
pub mod scheduler;

pub use clock::{CancellationToken, Clock};
pub use memory_world::InMemoryWorld;
pub use scheduler::TickScheduler;
