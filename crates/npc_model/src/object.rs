//! Object identifier and allocation.
//!
//! An [`ObjectId`] is a 32-bit identifier unique for the lifetime of the
//! process. All actor IDs are allocated by the spawn manager's
//! [`ObjectIdAllocator`], which starts above the player ID range so actor and
//! player identifiers never collide.

use std::sync::atomic::{AtomicU32, Ordering};

use serde::{Deserialize, Serialize};

/// A unique object identifier.
///
/// `0` is reserved as the "none" sentinel — a target ID of `0` means "no
/// target", never a valid object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectId(pub u32);

impl ObjectId {
    /// The sentinel value meaning "no object" / "no target".
    pub const NONE: ObjectId = ObjectId(0);

    /// Returns `true` if this is a real object reference (non-zero).
    #[must_use]
    pub const fn is_some(self) -> bool {
        self.0 != 0
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl Default for ObjectId {
    fn default() -> Self {
        Self::NONE
    }
}

/// Allocates monotonically increasing object IDs starting above the player
/// ID range, so NPC object IDs never collide with player object IDs.
///
/// Shared across the process as a single monotonic atomic counter.
#[derive(Debug)]
pub struct ObjectIdAllocator {
    next_id: AtomicU32,
}

impl ObjectIdAllocator {
    /// The default floor above which NPC object IDs are allocated.
    pub const DEFAULT_FLOOR: u32 = 100_000;

    /// Create a new allocator starting at [`Self::DEFAULT_FLOOR`].
    #[must_use]
    pub fn new() -> Self {
        Self::starting_at(Self::DEFAULT_FLOOR)
    }

    /// Create a new allocator starting at a specific floor.
    #[must_use]
    pub fn starting_at(floor: u32) -> Self {
        Self {
            next_id: AtomicU32::new(floor),
        }
    }

    /// Allocate a fresh object ID. Safe to call concurrently.
    pub fn allocate(&self) -> ObjectId {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        ObjectId(id)
    }
}

impl Default for ObjectIdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn none_is_not_some() {
        assert!(!ObjectId::NONE.is_some());
        assert!(ObjectId(1).is_some());
    }

    #[test]
    fn allocator_produces_unique_increasing_ids() {
        let alloc = ObjectIdAllocator::new();
        let a = alloc.allocate();
        let b = alloc.allocate();
        let c = alloc.allocate();
        assert_eq!(a.0, ObjectIdAllocator::DEFAULT_FLOOR);
        assert_eq!(b.0, a.0 + 1);
        assert_eq!(c.0, a.0 + 2);
    }

    #[test]
    fn allocator_starts_above_player_range() {
        let alloc = ObjectIdAllocator::new();
        let id = alloc.allocate();
        assert!(id.0 >= 100_000);
    }

    #[test]
    fn allocator_is_concurrency_safe() {
        use std::sync::Arc;
        use std::thread;

        let alloc = Arc::new(ObjectIdAllocator::starting_at(0));
        let mut handles = Vec::new();
        for _ in 0..8 {
            let alloc = Arc::clone(&alloc);
            handles.push(thread::spawn(move || {
                (0..100).map(|_| alloc.allocate().0).collect::<Vec<_>>()
            }));
        }
        let mut all_ids: Vec<u32> = handles.into_iter().flat_map(|h| h.join().unwrap()).collect();
        all_ids.sort_unstable();
        all_ids.dedup();
        assert_eq!(all_ids.len(), 800, "all allocated ids must be unique");
    }
}
