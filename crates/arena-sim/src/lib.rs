//! Guided missile flight, prediction and network resynchronization.
//!
//! `GuidedMissile` is the per-shot guidance engine, `step_kinematics` the
//! pure integration step it shares with prediction, and `ShotEngine` a hecs
//! world that owns in-flight missiles and drives them once per tick.
//! Collaborators are injected through `ShotContext`; nothing here reaches
//! for global state, so every peer can be simulated headless in tests.

pub mod collision;
pub mod context;
pub mod engine;
pub mod guidance;
pub mod history;
pub mod missile;
pub mod presentation;

pub use arena_core as core;
pub use context::ShotContext;
pub use engine::{ShotEngine, ShotKey};
pub use missile::GuidedMissile;
