//! Combat resolution core for SKIRMISH.
//!
//! Owns the hecs ECS world and runs one combat pass per tick: target
//! bookkeeping, per-archetype engagement strategies and the firing factory.
//! Projectiles and events are emitted into outboxes for downstream systems.

pub mod components;
pub mod context;
pub mod dispatcher;
pub mod engine;
pub mod firing;
pub mod gun_elevation;
pub mod helpers;
pub mod roster;
pub mod strategies;
pub mod targeting;
pub mod world_setup;

pub use engine::{Battlefield, SimConfig};
pub use skirmish_core as core;
