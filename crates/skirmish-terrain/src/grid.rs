//! TileGrid: map bounds and passability, plus the per-tick occupancy snapshot.

use std::collections::HashMap;

use skirmish_core::constants::TILE_SIZE;
use skirmish_core::types::{Position, TilePos};

/// Static tile map: dimensions and blocked (impassable, sight-blocking) tiles.
#[derive(Debug, Clone)]
pub struct TileGrid {
    width: i32,
    height: i32,
    /// Row-major, `true` = blocked.
    blocked: Vec<bool>,
}

impl TileGrid {
    /// Create an open grid of `width` x `height` tiles.
    pub fn new(width: i32, height: i32) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        Self {
            width,
            height,
            blocked: vec![false; (width * height) as usize],
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// Map extent in world pixels.
    pub fn world_size(&self) -> (f64, f64) {
        (self.width as f64 * TILE_SIZE, self.height as f64 * TILE_SIZE)
    }

    pub fn in_bounds(&self, tile: TilePos) -> bool {
        tile.x >= 0 && tile.y >= 0 && tile.x < self.width && tile.y < self.height
    }

    fn index(&self, tile: TilePos) -> Option<usize> {
        if self.in_bounds(tile) {
            Some((tile.y * self.width + tile.x) as usize)
        } else {
            None
        }
    }

    /// Mark a tile blocked or open. Out-of-bounds tiles are ignored.
    pub fn set_blocked(&mut self, tile: TilePos, blocked: bool) {
        if let Some(i) = self.index(tile) {
            self.blocked[i] = blocked;
        }
    }

    /// Out-of-bounds tiles count as blocked.
    pub fn is_blocked(&self, tile: TilePos) -> bool {
        self.index(tile).map(|i| self.blocked[i]).unwrap_or(true)
    }

    pub fn is_passable(&self, tile: TilePos) -> bool {
        !self.is_blocked(tile)
    }

    /// Clamp a world position into the map rectangle.
    pub fn clamp_position(&self, pos: Position) -> Position {
        let (w, h) = self.world_size();
        Position::new(pos.x.clamp(0.0, w - 1.0), pos.y.clamp(0.0, h - 1.0))
    }
}

/// Which tiles hold units this tick. Rebuilt by the engine, read-only to combat.
#[derive(Debug, Clone, Default)]
pub struct Occupancy {
    counts: HashMap<TilePos, u32>,
}

impl Occupancy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.counts.clear();
    }

    pub fn insert(&mut self, tile: TilePos) {
        *self.counts.entry(tile).or_insert(0) += 1;
    }

    pub fn count(&self, tile: TilePos) -> u32 {
        self.counts.get(&tile).copied().unwrap_or(0)
    }

    pub fn is_occupied(&self, tile: TilePos) -> bool {
        self.count(tile) > 0
    }
}

impl FromIterator<TilePos> for Occupancy {
    fn from_iter<I: IntoIterator<Item = TilePos>>(iter: I) -> Self {
        let mut occupancy = Occupancy::new();
        for tile in iter {
            occupancy.insert(tile);
        }
        occupancy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_bounds_is_blocked() {
        let grid = TileGrid::new(4, 3);
        assert!(grid.is_passable(TilePos::new(3, 2)));
        assert!(grid.is_blocked(TilePos::new(4, 2)));
        assert!(grid.is_blocked(TilePos::new(-1, 0)));
    }

    #[test]
    fn test_set_blocked() {
        let mut grid = TileGrid::new(4, 4);
        grid.set_blocked(TilePos::new(1, 2), true);
        assert!(grid.is_blocked(TilePos::new(1, 2)));
        grid.set_blocked(TilePos::new(1, 2), false);
        assert!(grid.is_passable(TilePos::new(1, 2)));
        // Ignored, must not panic.
        grid.set_blocked(TilePos::new(40, 40), true);
    }

    #[test]
    fn test_clamp_position() {
        let grid = TileGrid::new(2, 2);
        let p = grid.clamp_position(Position::new(-5.0, 500.0));
        assert_eq!(p.x, 0.0);
        assert_eq!(p.y, 2.0 * TILE_SIZE - 1.0);
    }

    #[test]
    fn test_occupancy_counts() {
        let occ: Occupancy = [TilePos::new(1, 1), TilePos::new(1, 1), TilePos::new(2, 1)]
            .into_iter()
            .collect();
        assert_eq!(occ.count(TilePos::new(1, 1)), 2);
        assert!(occ.is_occupied(TilePos::new(2, 1)));
        assert!(!occ.is_occupied(TilePos::new(0, 0)));
    }
}
