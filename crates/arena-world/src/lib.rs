//! Reference world collaborators for the arena simulation.
//!
//! Box obstacles, one-sided teleporter faces, a nearest-hit ray query
//! and a seeded teleporter link table. Games with their own world storage
//! implement the `arena_core::collab` traits directly instead.

pub use arena_core as core;

pub mod intersect;
pub mod links;
pub mod map;

// Re-export key types for convenience.
pub use intersect::{Aabb, Face};
pub use links::{LinkError, LinkRules, LinkTable};
pub use map::{ArenaMap, Obstacle, Shape};
