//! Terrain for SKIRMISH.
//!
//! Tile passability, the occupancy snapshot and the default
//! clear-shot check.

pub use skirmish_core as core;

pub mod grid;
pub mod los;

pub use grid::{Occupancy, TileGrid};
pub use los::has_clear_shot;
