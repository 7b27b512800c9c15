//! Core error type.
//!
//! Capacity exceeded, not found, and world-rejection are the only error
//! kinds the core itself produces; everything else (precondition
//! violations, dangling targets) is a normal, silent signal handled in the
//! AI control flow rather than surfaced as an error.

use thiserror::Error;

/// Errors surfaced by the spawn/respawn machinery. AI control flow never
/// returns these — a missing target or dead actor is a normal transition,
/// not a failure.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("spawn {spawn_id} is already at capacity")]
    SpawnFull { spawn_id: u64 },

    #[error("no template registered for id {template_id}")]
    TemplateNotFound { template_id: u32 },

    #[error("no object registered for id {object_id}")]
    ObjectNotFound { object_id: u32 },

    #[error("world rejected object {object_id}: {reason}")]
    WorldRejected { object_id: u32, reason: String },
}
