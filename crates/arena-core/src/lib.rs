//! Core types and definitions for the arena guided-missile simulation.
//!
//! This crate defines the vocabulary shared across all other crates:
//! identifiers, rays, events, tunables, the GM update wire format, and the
//! narrow collaborator traits the guidance code talks to. It has no
//! dependency on any world, scene or transport implementation.

pub mod collab;
pub mod config;
pub mod constants;
pub mod enums;
pub mod error;
pub mod events;
pub mod firing;
pub mod types;
pub mod wire;
