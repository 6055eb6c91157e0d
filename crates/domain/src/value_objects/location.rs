//! Positions in the host world
//!
//! `Location` is a precise, facing-aware position inside a named world.
//! `BlockPos` is the integer cell that contains it, used for block lookups.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A position in a named world, including facing.
///
/// Two locations are only comparable by distance when they share a world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub world: String,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    #[serde(default)]
    pub yaw: f32,
    #[serde(default)]
    pub pitch: f32,
}

impl Location {
    /// Create a location with neutral facing.
    pub fn new(world: impl Into<String>, x: f64, y: f64, z: f64) -> Self {
        Self {
            world: world.into(),
            x,
            y,
            z,
            yaw: 0.0,
            pitch: 0.0,
        }
    }

    /// Builder: set facing.
    pub fn with_facing(mut self, yaw: f32, pitch: f32) -> Self {
        self.yaw = yaw;
        self.pitch = pitch;
        self
    }

    /// Returns true if both locations are in the same world.
    pub fn same_world(&self, other: &Location) -> bool {
        self.world == other.world
    }

    /// Squared Euclidean distance, or `None` across worlds.
    pub fn distance_squared(&self, other: &Location) -> Option<f64> {
        if !self.same_world(other) {
            return None;
        }
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        Some(dx * dx + dy * dy + dz * dz)
    }

    /// Euclidean distance, or `None` across worlds.
    pub fn distance(&self, other: &Location) -> Option<f64> {
        self.distance_squared(other).map(f64::sqrt)
    }

    /// Returns true if `other` is in the same world and within `radius`.
    pub fn is_within(&self, other: &Location, radius: f64) -> bool {
        self.distance_squared(other)
            .is_some_and(|d2| d2 <= radius * radius)
    }

    /// Returns a copy shifted by whole blocks, keeping world and facing.
    pub fn offset(&self, dx: i32, dy: i32, dz: i32) -> Location {
        Location {
            world: self.world.clone(),
            x: self.x + f64::from(dx),
            y: self.y + f64::from(dy),
            z: self.z + f64::from(dz),
            yaw: self.yaw,
            pitch: self.pitch,
        }
    }

    /// The block cell containing this location.
    pub fn block(&self) -> BlockPos {
        BlockPos::new(
            self.x.floor() as i32,
            self.y.floor() as i32,
            self.z.floor() as i32,
        )
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({:.1}, {:.1}, {:.1})",
            self.world, self.x, self.y, self.z
        )
    }
}

/// Integer block coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockPos {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    pub const fn offset(self, dx: i32, dy: i32, dz: i32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.z + dz)
    }

    pub const fn up(self) -> Self {
        self.offset(0, 1, 0)
    }

    pub const fn down(self) -> Self {
        self.offset(0, -1, 0)
    }
}

impl fmt::Display for BlockPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}, {}]", self.x, self.y, self.z)
    }
}
