//! Combat dispatcher: one pass over every combatant in id order.

use hecs::World;
use tracing::trace;

use crate::components::Combatant;
use crate::context::CombatContext;
use crate::roster::{Roster, RosterEntry};
use crate::strategies;
use crate::targeting;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassSummary {
    pub combatants: usize,
    pub projectiles: usize,
}

/// Run every live combatant once. Each combatant's state is cloned out of
/// the world, updated against the roster and written back.
pub fn run(world: &mut World, roster: &Roster, ctx: &mut CombatContext<'_>) -> PassSummary {
    let mut summary = PassSummary::default();
    let emitted_before = ctx.projectiles.len();

    for entry in roster.iter() {
        if !entry.is_alive() {
            continue;
        }
        let Some(mut combatant) = world
            .get::<&Combatant>(entry.entity)
            .ok()
            .map(|c| (*c).clone())
        else {
            continue;
        };

        update_combatant(&mut combatant, entry, roster, ctx);

        if let Ok(mut slot) = world.get::<&mut Combatant>(entry.entity) {
            *slot = combatant;
        }
        summary.combatants += 1;
    }

    summary.projectiles = ctx.projectiles.len() - emitted_before;
    trace!(
        tick = ctx.time.tick,
        combatants = summary.combatants,
        projectiles = summary.projectiles,
        "combat pass"
    );
    summary
}

/// Status, targeting, then the archetype strategy.
pub fn update_combatant(
    c: &mut Combatant,
    shooter: &RosterEntry,
    roster: &Roster,
    ctx: &mut CombatContext<'_>,
) {
    let now = ctx.now();
    targeting::update_status(c, shooter, now);
    targeting::clear_dead_references(c, roster);
    // A returning gunship holds its target in the landing task; the queue
    // waits until it resumes.
    if !c.is_returning() {
        targeting::advance_queue(c, shooter, roster, ctx);
        targeting::guard_scan(c, shooter, roster, ctx);
    }

    match c.targeting.target.and_then(|t| roster.resolve(t)) {
        Some(target) => c
            .targeting
            .observe(target.target_ref(), target.center, now),
        None => c.targeting.forget_observations(),
    }

    strategies::run(c, shooter, roster, ctx);
}

#[cfg(test)]
mod tests {
    use super::*;
    use hecs::Entity;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use skirmish_core::config::CombatTuning;
    use skirmish_core::constants::DT_MS;
    use skirmish_core::enums::UnitKind;
    use skirmish_core::events::CombatEvent;
    use skirmish_core::projectile::Projectile;
    use skirmish_core::types::{SimTime, TilePos};
    use skirmish_terrain::{Occupancy, TileGrid};

    use crate::components::{Health, TargetRef};
    use crate::context::{DirectPathPlanner, FullVisibility, GridLineOfSight};
    use crate::world_setup;

    struct Harness {
        grid: TileGrid,
        occupancy: Occupancy,
        tuning: CombatTuning,
        rng: ChaCha8Rng,
        projectiles: Vec<Projectile>,
        events: Vec<CombatEvent>,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                grid: TileGrid::new(40, 40),
                occupancy: Occupancy::new(),
                tuning: CombatTuning::default(),
                rng: ChaCha8Rng::seed_from_u64(1),
                projectiles: Vec::new(),
                events: Vec::new(),
            }
        }

        fn pass(&mut self, world: &mut World, roster: &Roster) -> PassSummary {
            let mut ctx = CombatContext {
                time: SimTime::at(0, 0.0),
                dt_ms: DT_MS,
                tuning: &self.tuning,
                fog_of_war: false,
                player_party: 0,
                grid: &self.grid,
                occupancy: &self.occupancy,
                pathing: &DirectPathPlanner,
                visibility: &FullVisibility,
                line_of_sight: &GridLineOfSight,
                rng: &mut self.rng,
                projectiles: &mut self.projectiles,
                events: &mut self.events,
            };
            run(world, roster, &mut ctx)
        }
    }

    fn aim(world: &mut World, shooter: Entity, target: Entity) {
        let mut c = world.get::<&mut Combatant>(shooter).unwrap();
        c.targeting.target = Some(TargetRef::Unit(target));
    }

    #[test]
    fn test_pass_runs_in_id_order_not_spawn_order() {
        let mut world = World::new();
        let late = world_setup::spawn_unit(&mut world, 9, 0, UnitKind::Tank, TilePos::new(5, 5));
        let late_target =
            world_setup::spawn_unit(&mut world, 1, 1, UnitKind::Harvester, TilePos::new(10, 5));
        let early = world_setup::spawn_unit(&mut world, 2, 0, UnitKind::Tank, TilePos::new(5, 15));
        let early_target =
            world_setup::spawn_unit(&mut world, 3, 1, UnitKind::Harvester, TilePos::new(10, 15));
        aim(&mut world, late, late_target);
        aim(&mut world, early, early_target);

        let mut h = Harness::new();
        let roster = Roster::build(&world);
        let summary = h.pass(&mut world, &roster);

        assert_eq!(summary.combatants, 2);
        assert_eq!(summary.projectiles, 2);
        let shooters: Vec<u32> = h.projectiles.iter().map(|p| p.shooter_id).collect();
        assert_eq!(shooters, vec![2, 9]);
    }

    #[test]
    fn test_pass_reads_roster_snapshot() {
        let mut world = World::new();
        let tank = world_setup::spawn_unit(&mut world, 1, 0, UnitKind::Tank, TilePos::new(5, 5));
        let target =
            world_setup::spawn_unit(&mut world, 2, 1, UnitKind::Harvester, TilePos::new(10, 5));
        aim(&mut world, tank, target);

        let mut h = Harness::new();
        let roster = Roster::build(&world);
        world.get::<&mut Health>(target).unwrap().current = 0.0;

        // Death after the snapshot is not seen until the next build.
        assert_eq!(h.pass(&mut world, &roster).projectiles, 1);
        assert_eq!(
            world.get::<&Combatant>(tank).unwrap().targeting.target,
            Some(TargetRef::Unit(target))
        );

        let roster = Roster::build(&world);
        assert_eq!(h.pass(&mut world, &roster).projectiles, 0);
        assert!(world.get::<&Combatant>(tank).unwrap().targeting.target.is_none());
    }
}
