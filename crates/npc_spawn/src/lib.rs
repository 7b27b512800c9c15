//! # npc_spawn
//!
//! Spawn Manager and Respawn Scheduler: instantiating NPCs from spawn
//! definitions, tracking per-spawn occupancy, and refilling dead spawns on
//! a delay.

pub mod manager;
pub mod respawn;

pub use manager::{NpcKind, SpawnManager};
pub use respawn::RespawnScheduler;
