//! Core types and definitions for the SKIRMISH combat simulation.
//!
//! This crate defines the vocabulary shared across the other crates:
//! geometry, simulation time, archetype enums, stat tables, tuning,
//! events and projectile records. It has no dependency on the ECS.

pub mod commands;
pub mod config;
pub mod constants;
pub mod enums;
pub mod events;
pub mod projectile;
pub mod stats;
pub mod types;

#[cfg(test)]
mod tests;
