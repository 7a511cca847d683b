//! Fundamental identifiers and geometric types.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Player slot identifier as carried on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(pub u8);

/// Per-player shot identifier. Also the seed for teleporter link selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ShotId(pub u16);

/// Identifier of a world obstacle (box or teleporter face).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObstacleId(pub u32);

/// A ray through simulation space.
///
/// `direction` is the full velocity, not a unit vector, so `point_at(t)` is
/// the position after `t` seconds of flight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    pub fn point_at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// One quantum of travel: the ray flown between `start` and `end`
/// (simulation seconds).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TrajectorySegment {
    pub start: f64,
    pub end: f64,
    pub ray: Ray,
}

impl TrajectorySegment {
    pub fn new(start: f64, end: f64, ray: Ray) -> Self {
        Self { start, end, ray }
    }

    /// Flight time covered by this segment.
    pub fn duration(&self) -> f32 {
        (self.end - self.start) as f32
    }
}
