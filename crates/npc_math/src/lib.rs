//! # npc_math
//!
//! Spatial types shared across the NPC simulation core: world position,
//! heading, and squared-distance helpers. Re-exports [`glam`] for the
//! handful of call sites that need raw vector math.

pub mod position;

pub use glam::Vec3;
pub use position::Position;
