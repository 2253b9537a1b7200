//! Per-pass context handed to every combat strategy, plus the collaborator
//! seams (path planning, visibility, line of sight).

use rand_chacha::ChaCha8Rng;

use skirmish_core::config::CombatTuning;
use skirmish_core::events::CombatEvent;
use skirmish_core::projectile::Projectile;
use skirmish_core::types::{Position, SimTime, TilePos};
use skirmish_terrain::{has_clear_shot, Occupancy, TileGrid};

/// Computes tile routes for ground units.
pub trait PathPlanner {
    /// Route from `origin` to `destination`, both inclusive. Fewer than two
    /// tiles means no usable path.
    fn compute_path(
        &self,
        origin: TilePos,
        destination: TilePos,
        grid: &TileGrid,
        occupancy: &Occupancy,
    ) -> Vec<TilePos>;
}

/// Fog-of-war query.
pub trait Visibility {
    fn is_visible(&self, party: u8, grid: &TileGrid, x: f64, y: f64) -> bool;
}

/// Whether terrain blocks a direct shot.
pub trait LineOfSight {
    fn clear_shot(&self, grid: &TileGrid, from: &Position, to: &Position) -> bool;
}

/// Straight two-tile route; refuses blocked or out-of-bounds destinations.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectPathPlanner;

impl PathPlanner for DirectPathPlanner {
    fn compute_path(
        &self,
        origin: TilePos,
        destination: TilePos,
        grid: &TileGrid,
        _occupancy: &Occupancy,
    ) -> Vec<TilePos> {
        if origin == destination || !grid.is_passable(destination) {
            return Vec::new();
        }
        vec![origin, destination]
    }
}

/// Everything is visible to everyone.
#[derive(Debug, Clone, Copy, Default)]
pub struct FullVisibility;

impl Visibility for FullVisibility {
    fn is_visible(&self, _party: u8, _grid: &TileGrid, _x: f64, _y: f64) -> bool {
        true
    }
}

/// Samples the tile grid along the shot line.
#[derive(Debug, Clone, Copy, Default)]
pub struct GridLineOfSight;

impl LineOfSight for GridLineOfSight {
    fn clear_shot(&self, grid: &TileGrid, from: &Position, to: &Position) -> bool {
        has_clear_shot(grid, from, to)
    }
}

/// Everything a strategy needs besides its own state and the roster.
pub struct CombatContext<'a> {
    pub time: SimTime,
    /// Length of this pass (ms); used for turret traverse.
    pub dt_ms: f64,
    pub tuning: &'a CombatTuning,
    pub fog_of_war: bool,
    /// Party whose notifications are surfaced.
    pub player_party: u8,
    pub grid: &'a TileGrid,
    pub occupancy: &'a Occupancy,
    pub pathing: &'a dyn PathPlanner,
    pub visibility: &'a dyn Visibility,
    pub line_of_sight: &'a dyn LineOfSight,
    pub rng: &'a mut ChaCha8Rng,
    pub projectiles: &'a mut Vec<Projectile>,
    pub events: &'a mut Vec<CombatEvent>,
}

impl CombatContext<'_> {
    pub fn now(&self) -> f64 {
        self.time.now_ms
    }

    /// Fog-of-war check; always true with fog disabled.
    pub fn is_visible(&self, party: u8, at: &Position) -> bool {
        !self.fog_of_war || self.visibility.is_visible(party, self.grid, at.x, at.y)
    }

    pub fn clear_shot(&self, from: &Position, to: &Position) -> bool {
        self.line_of_sight.clear_shot(self.grid, from, to)
    }

    /// Queue a notification. Only the player's party is notified.
    pub fn notify(&mut self, party: u8, message: &str, duration_ms: f64) {
        if party == self.player_party {
            self.events
                .push(CombatEvent::notify(party, message, duration_ms));
        }
    }

    /// Queue a positional sound cue, panned by map x position.
    pub fn play_sound(&mut self, name: &str, at: &Position, volume: f64, stackable: bool) {
        let (map_width, _) = self.grid.world_size();
        let pan = if map_width > 0.0 {
            (at.x / map_width * 2.0 - 1.0).clamp(-1.0, 1.0)
        } else {
            0.0
        };
        self.events.push(CombatEvent::Sound {
            name: name.to_string(),
            volume,
            pan,
            stackable,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direct_planner_refuses_blocked_goal() {
        let mut grid = TileGrid::new(8, 8);
        grid.set_blocked(TilePos::new(5, 5), true);
        let occ = Occupancy::new();
        let planner = DirectPathPlanner;

        assert!(planner
            .compute_path(TilePos::new(1, 1), TilePos::new(5, 5), &grid, &occ)
            .is_empty());
        assert!(planner
            .compute_path(TilePos::new(1, 1), TilePos::new(1, 1), &grid, &occ)
            .is_empty());
        assert_eq!(
            planner.compute_path(TilePos::new(1, 1), TilePos::new(4, 5), &grid, &occ),
            vec![TilePos::new(1, 1), TilePos::new(4, 5)]
        );
    }

    #[test]
    fn test_grid_line_of_sight_matches_terrain() {
        let mut grid = TileGrid::new(10, 3);
        for y in 0..3 {
            grid.set_blocked(TilePos::new(5, y), true);
        }
        let los = GridLineOfSight;
        let a = Position::from_tile(TilePos::new(1, 1));
        let b = Position::from_tile(TilePos::new(8, 1));
        assert!(!los.clear_shot(&grid, &a, &b));
        assert!(los.clear_shot(&grid, &a, &Position::from_tile(TilePos::new(3, 1))));
    }
}
