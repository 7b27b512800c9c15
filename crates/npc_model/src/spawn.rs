//! Spawn definitions and territory sampling.
//!
//! A [`SpawnDefinition`] describes "instantiate N copies of template T at
//! location L with respawn delay D". The live actor set and
//! `current_count` are guarded by a `Mutex` since both the Spawn Manager
//! and the Respawn Scheduler may touch them; the invariant `current_count
//! == len(live_actors) <= maximum_count` holds whenever observed outside an
//! in-flight spawn/despawn operation.

use std::sync::Mutex;

use rand::Rng;
use serde::{Deserialize, Serialize};

use npc_math::Position;

use crate::object::ObjectId;

/// Where a spawn places new actors: a fixed anchor point, or a uniformly
/// sampled point inside a polygonal territory.
///
/// A spawn's placement is either an anchor location or a polygonal
/// territory, sampled with rejection sampling against the polygon's
/// bounding box.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Territory {
    Point(Position),
    /// A simple (non-self-intersecting) polygon in the (x, y) plane, sampled
    /// at a fixed `z`/heading.
    Polygon {
        vertices: Vec<(f32, f32)>,
        z: f32,
        heading: i32,
    },
}

impl Territory {
    /// The anchor point used for leash/drift distance checks: the fixed
    /// point, or the polygon's centroid.
    #[must_use]
    pub fn anchor(&self) -> Position {
        match self {
            Territory::Point(p) => *p,
            Territory::Polygon {
                vertices,
                z,
                heading,
            } => {
                let (sx, sy) = vertices
                    .iter()
                    .fold((0.0f32, 0.0f32), |(ax, ay), (x, y)| (ax + x, ay + y));
                let n = vertices.len().max(1) as f32;
                Position::new(sx / n, sy / n, *z, *heading)
            }
        }
    }

    /// Sample a spawn point: the fixed anchor for [`Territory::Point`], or a
    /// uniform point inside the polygon via rejection sampling against its
    /// bounding box for [`Territory::Polygon`].
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Position {
        match self {
            Territory::Point(p) => *p,
            Territory::Polygon {
                vertices,
                z,
                heading,
            } => {
                if vertices.len() < 3 {
                    return self.anchor();
                }
                let (min_x, max_x, min_y, max_y) = bounding_box(vertices);
                for _ in 0..64 {
                    let x = rng.random_range(min_x..=max_x);
                    let y = rng.random_range(min_y..=max_y);
                    if point_in_polygon(vertices, x, y) {
                        return Position::new(x, y, *z, *heading);
                    }
                }
                // Degenerate polygon (e.g. near-zero area): fall back to
                // centroid rather than looping forever.
                self.anchor()
            }
        }
    }
}

fn bounding_box(vertices: &[(f32, f32)]) -> (f32, f32, f32, f32) {
    let mut min_x = f32::MAX;
    let mut max_x = f32::MIN;
    let mut min_y = f32::MAX;
    let mut max_y = f32::MIN;
    for &(x, y) in vertices {
        min_x = min_x.min(x);
        max_x = max_x.max(x);
        min_y = min_y.min(y);
        max_y = max_y.max(y);
    }
    (min_x, max_x, min_y, max_y)
}

/// Standard ray-casting point-in-polygon test.
fn point_in_polygon(vertices: &[(f32, f32)], x: f32, y: f32) -> bool {
    let mut inside = false;
    let n = vertices.len();
    let mut j = n - 1;
    for i in 0..n {
        let (xi, yi) = vertices[i];
        let (xj, yj) = vertices[j];
        if ((yi > y) != (yj > y)) && (x < (xj - xi) * (y - yi) / (yj - yi) + xi) {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// A spawn definition: instantiate up to `maximum_count` copies of
/// `template_id` within `territory`, respawning after death with a delay
/// sampled from `[respawn_min, respawn_max]` seconds.
#[derive(Debug)]
pub struct SpawnDefinition {
    pub spawn_id: u64,
    pub template_id: u32,
    pub territory: Territory,
    pub maximum_count: u32,
    pub respawn_min_secs: u32,
    pub respawn_max_secs: u32,
    /// Whether death should schedule a respawn at all.
    pub respawn_enabled: bool,
    live: Mutex<Vec<ObjectId>>,
}

impl SpawnDefinition {
    #[must_use]
    pub fn new(
        spawn_id: u64,
        template_id: u32,
        territory: Territory,
        maximum_count: u32,
        respawn_min_secs: u32,
        respawn_max_secs: u32,
        respawn_enabled: bool,
    ) -> Self {
        Self {
            spawn_id,
            template_id,
            territory,
            maximum_count,
            respawn_min_secs,
            respawn_max_secs,
            respawn_enabled,
            live: Mutex::new(Vec::new()),
        }
    }

    /// Current occupancy: `len(liveActors)`.
    #[must_use]
    pub fn current_count(&self) -> u32 {
        self.live.lock().unwrap().len() as u32
    }

    /// Whether this spawn has room for one more actor.
    #[must_use]
    pub fn has_room(&self) -> bool {
        self.current_count() < self.maximum_count
    }

    /// Record a newly instantiated actor as occupying a slot.
    pub fn add_live(&self, id: ObjectId) {
        self.live.lock().unwrap().push(id);
    }

    /// Remove an actor from the live set. Idempotent: removing an ID not
    /// present is a no-op, returns `false`.
    pub fn remove_live(&self, id: ObjectId) -> bool {
        let mut live = self.live.lock().unwrap();
        if let Some(pos) = live.iter().position(|&x| x == id) {
            live.remove(pos);
            true
        } else {
            false
        }
    }

    /// Snapshot of currently live actor IDs.
    #[must_use]
    pub fn live_actors(&self) -> Vec<ObjectId> {
        self.live.lock().unwrap().clone()
    }

    /// Sample a uniform respawn delay in `[respawn_min_secs, respawn_max_secs]`.
    /// Constant when the two bounds are equal.
    pub fn sample_respawn_delay<R: Rng + ?Sized>(&self, rng: &mut R) -> u32 {
        if self.respawn_min_secs >= self.respawn_max_secs {
            self.respawn_min_secs
        } else {
            rng.random_range(self.respawn_min_secs..=self.respawn_max_secs)
        }
    }
}
