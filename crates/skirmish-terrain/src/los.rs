//! Clear-shot check over blocked tiles.
//!
//! Uses stepped ray traversal; the shooter's and target's own tiles never
//! block.

use skirmish_core::constants::TILE_SIZE;
use skirmish_core::types::Position;

use crate::grid::TileGrid;

/// Sample spacing along the ray (pixels).
const LOS_SAMPLE_INTERVAL: f64 = TILE_SIZE / 4.0;

/// True if no blocked tile lies strictly between `from` and `to`.
pub fn has_clear_shot(grid: &TileGrid, from: &Position, to: &Position) -> bool {
    let dx = to.x - from.x;
    let dy = to.y - from.y;
    let dist = (dx * dx + dy * dy).sqrt();

    if dist < TILE_SIZE {
        return true;
    }

    let from_tile = from.to_tile();
    let to_tile = to.to_tile();
    let num_samples = ((dist / LOS_SAMPLE_INTERVAL).ceil() as usize).max(2);

    for i in 1..num_samples {
        let t = i as f64 / num_samples as f64;
        let tile = Position::new(from.x + dx * t, from.y + dy * t).to_tile();
        if tile == from_tile || tile == to_tile {
            continue;
        }
        if grid.is_blocked(tile) {
            return false;
        }
    }

    true
}
