//! The world-admission and object-visibility collaborator.
//!
//! The AI core never owns the world; it reaches it only through this trait
//! so the world/combat/AI triangle never has to agree on a shared concrete
//! type.

use std::sync::Arc;

use npc_model::{Actor, ObjectId};

use crate::error::CoreError;

/// The minimal read-only projection of a world object the AI core needs.
///
/// Players are outside this workspace's scope, so a scanned player is just
/// an id/position/liveness triple. A scanned NPC, by
/// contrast, *is* one of our own [`Actor`]s — handing back the `Arc<Actor>`
/// directly (rather than re-deriving a read-only snapshot) is what lets
/// faction call touch another monster's aggro list without the core needing
/// a fourth collaborator just for that.
#[derive(Debug, Clone)]
pub enum ObjectRef {
    Player {
        id: ObjectId,
        x: f32,
        y: f32,
        is_dead: bool,
    },
    Npc(Arc<Actor>),
}

impl ObjectRef {
    #[must_use]
    pub fn id(&self) -> ObjectId {
        match self {
            ObjectRef::Player { id, .. } => *id,
            ObjectRef::Npc(actor) => actor.id,
        }
    }

    #[must_use]
    pub fn position_2d(&self) -> (f32, f32) {
        match self {
            ObjectRef::Player { x, y, .. } => (*x, *y),
            ObjectRef::Npc(actor) => {
                let p = actor.position();
                (p.x(), p.y())
            }
        }
    }

    #[must_use]
    pub fn is_dead(&self) -> bool {
        match self {
            ObjectRef::Player { is_dead, .. } => *is_dead,
            ObjectRef::Npc(actor) => actor.is_dead(),
        }
    }

    #[must_use]
    pub fn is_player(&self) -> bool {
        matches!(self, ObjectRef::Player { .. })
    }

    #[must_use]
    pub fn is_npc(&self) -> bool {
        matches!(self, ObjectRef::Npc(_))
    }

    #[must_use]
    pub fn as_npc(&self) -> Option<&Arc<Actor>> {
        match self {
            ObjectRef::Npc(actor) => Some(actor),
            ObjectRef::Player { .. } => None,
        }
    }
}

/// World visibility and admission, injected into the AI core and the spawn
/// manager.
///
/// # Contracts
///
/// - `scan` invokes `visit` for each object within the implementation's
///   visibility region around `(x, y)`. If `visit` returns `false` the scan
///   aborts early. No ordering guarantee.
/// - `get_object` returns the live object with that ID, or `None`.
/// - `add_object`/`remove_object` publish/withdraw actors into the world;
///   `add_object` may reject (e.g. an occupied cell), in which case the
///   spawn manager rolls back its partial effects.
pub trait WorldView: Send + Sync {
    fn scan(&self, x: f32, y: f32, visit: &mut dyn FnMut(&ObjectRef) -> bool);

    fn get_object(&self, id: ObjectId) -> Option<ObjectRef>;

    /// Admit a newly spawned actor into the world.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::WorldRejected`] if the world refuses the object.
    fn add_object(&self, actor: &Arc<Actor>) -> Result<(), CoreError>;

    fn remove_object(&self, id: ObjectId);
}
