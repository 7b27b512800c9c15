//! World position and distance helpers.
//!
//! [`Position`] is the spatial state every actor carries: a world-space
//! `(x, y, z)` coordinate plus a heading. Distance comparisons throughout the
//! AI core (aggro range, attack range, chase leash, idle drift) are planar —
//! they compare `(x, y)` only, matching a scan region defined around a
//! point — so [`Position::distance_squared_2d`] is the primary
//! helper; [`Position::distance_squared_3d`] is provided for completeness.
//!
//! Squared distance is used everywhere a comparison against a squared range
//! is possible, to avoid a square root on every AI tick.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// A world-space position with heading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// World-space coordinates.
    pub point: Vec3,
    /// Facing direction, in the engine's native heading units.
    pub heading: i32,
}

impl Position {
    /// Construct a position from raw coordinates and heading.
    #[must_use]
    pub fn new(x: f32, y: f32, z: f32, heading: i32) -> Self {
        Self {
            point: Vec3::new(x, y, z),
            heading,
        }
    }

    /// The `x` coordinate.
    #[must_use]
    pub fn x(&self) -> f32 {
        self.point.x
    }

    /// The `y` coordinate.
    #[must_use]
    pub fn y(&self) -> f32 {
        self.point.y
    }

    /// The `z` coordinate.
    #[must_use]
    pub fn z(&self) -> f32 {
        self.point.z
    }

    /// Planar (x, y) squared distance to another position.
    #[must_use]
    pub fn distance_squared_2d(&self, other: &Position) -> f32 {
        let dx = self.point.x - other.point.x;
        let dy = self.point.y - other.point.y;
        dx * dx + dy * dy
    }

    /// Full 3D squared distance to another position.
    #[must_use]
    pub fn distance_squared_3d(&self, other: &Position) -> f32 {
        self.point.distance_squared(other.point)
    }

    /// Returns a new position translated by `(dx, dy, dz)`, heading unchanged.
    #[must_use]
    pub fn translated(&self, dx: f32, dy: f32, dz: f32) -> Self {
        Self {
            point: self.point + Vec3::new(dx, dy, dz),
            heading: self.heading,
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self {
            point: Vec3::ZERO,
            heading: 0,
        }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "({:.1}, {:.1}, {:.1})",
            self.point.x, self.point.y, self.point.z
        )
    }
}
