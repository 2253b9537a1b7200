//! Fundamental geometric and simulation types.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::constants::{DT_MS, TILE_SIZE};

/// 2D position in world space (pixels, continuous).
/// x grows to the East, y grows to the South (screen convention).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// Integer tile coordinate on the map grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TilePos {
    pub x: i32,
    pub y: i32,
}

/// Axis-aligned tile rectangle (structure footprint).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

/// Simulation time tracking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SimTime {
    /// Current tick number (increments by 1 each tick).
    pub tick: u64,
    /// Elapsed simulation time in milliseconds.
    pub now_ms: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Center of the given tile in world space.
    pub fn from_tile(tile: TilePos) -> Self {
        Self {
            x: (tile.x as f64 + 0.5) * TILE_SIZE,
            y: (tile.y as f64 + 0.5) * TILE_SIZE,
        }
    }

    pub fn to_vec(self) -> DVec2 {
        DVec2::new(self.x, self.y)
    }

    pub fn from_vec(v: DVec2) -> Self {
        Self { x: v.x, y: v.y }
    }

    /// Euclidean distance in pixels.
    pub fn distance_to(&self, other: &Position) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Distance expressed in tiles.
    pub fn tiles_to(&self, other: &Position) -> f64 {
        self.distance_to(other) / TILE_SIZE
    }

    /// Bearing to another position in radians, `atan2(dy, dx)`, range (-PI, PI].
    pub fn bearing_to(&self, other: &Position) -> f64 {
        (other.y - self.y).atan2(other.x - self.x)
    }

    /// Tile containing this position.
    pub fn to_tile(self) -> TilePos {
        TilePos {
            x: (self.x / TILE_SIZE).floor() as i32,
            y: (self.y / TILE_SIZE).floor() as i32,
        }
    }
}

impl TilePos {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Chebyshev distance in tiles.
    pub fn chebyshev(&self, other: &TilePos) -> i32 {
        (self.x - other.x).abs().max((self.y - other.y).abs())
    }

    /// The eight surrounding tiles, row-major starting top-left.
    pub fn neighbors(&self) -> [TilePos; 8] {
        let (x, y) = (self.x, self.y);
        [
            TilePos::new(x - 1, y - 1),
            TilePos::new(x, y - 1),
            TilePos::new(x + 1, y - 1),
            TilePos::new(x - 1, y),
            TilePos::new(x + 1, y),
            TilePos::new(x - 1, y + 1),
            TilePos::new(x, y + 1),
            TilePos::new(x + 1, y + 1),
        ]
    }
}

impl TileRect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Geometric center of the rectangle in world space.
    pub fn center(&self) -> Position {
        Position {
            x: (self.x as f64 + self.width as f64 / 2.0) * TILE_SIZE,
            y: (self.y as f64 + self.height as f64 / 2.0) * TILE_SIZE,
        }
    }

    pub fn contains(&self, tile: TilePos) -> bool {
        tile.x >= self.x
            && tile.x < self.x + self.width
            && tile.y >= self.y
            && tile.y < self.y + self.height
    }

    /// Top-left tile of the footprint.
    pub fn origin(&self) -> TilePos {
        TilePos::new(self.x, self.y)
    }
}

impl SimTime {
    pub fn at(tick: u64, now_ms: f64) -> Self {
        Self { tick, now_ms }
    }

    /// Advance by one tick of the default length.
    pub fn advance(&mut self) {
        self.advance_by(DT_MS);
    }

    /// Advance by one tick of an explicit length.
    pub fn advance_by(&mut self, dt_ms: f64) {
        self.tick += 1;
        self.now_ms += dt_ms.max(0.0);
    }
}

/// Signed smallest difference `to - from`, normalized to [-PI, PI].
pub fn angle_diff(from: f64, to: f64) -> f64 {
    let tau = std::f64::consts::TAU;
    let d = (to - from).rem_euclid(tau);
    if d > std::f64::consts::PI {
        d - tau
    } else {
        d
    }
}

/// Rotate `current` toward `target` by at most `max_step` radians.
pub fn rotate_toward(current: f64, target: f64, max_step: f64) -> f64 {
    let diff = angle_diff(current, target);
    if diff.abs() <= max_step {
        target
    } else {
        current + max_step * diff.signum()
    }
}
