//! Howitzer: indirect fire gated by the barrel elevation controller.

use tracing::debug;

use skirmish_core::constants::REPOSITION_SEARCH_RADIUS;
use skirmish_core::enums::EngagementState;
use skirmish_core::types::{Position, TilePos};

use crate::components::Combatant;
use crate::context::CombatContext;
use crate::firing::{self, ShotRequest};
use crate::gun_elevation::{self, GunElevation};
use crate::helpers;
use crate::roster::{Roster, RosterEntry};

pub fn run(
    c: &mut Combatant,
    shooter: &RosterEntry,
    roster: &Roster,
    ctx: &mut CombatContext<'_>,
) {
    let range = helpers::effective_range(c);
    let target = c.targeting.target.and_then(|t| roster.resolve(t)).copied();

    let facing = c.facing.body;
    let gun = c.gun.get_or_insert_with(|| GunElevation::new(facing));
    gun_elevation::update(
        gun,
        &shooter.center,
        target.as_ref().map(|t| &t.center),
        range,
        ctx.now(),
    );
    let gun = *gun;

    let Some(target) = target else {
        c.state = EngagementState::NoTarget;
        return;
    };
    let distance = shooter.center.distance_to(&target.center);
    helpers::slew_toward(c, shooter.center.bearing_to(&target.center), ctx.dt_ms);

    // Too close to lob a shell at.
    if distance < helpers::min_range(c) {
        if c.ai_controlled && !gun.movement_lock {
            reposition(c, shooter, &target, ctx);
        }
        c.state = EngagementState::InRangeIdle;
        return;
    }

    if distance > range {
        if !gun.movement_lock {
            helpers::pursue(c, shooter, &target, ctx);
        }
        c.state = EngagementState::Approaching;
        return;
    }
    c.motion.halt();

    if !gun.ready || !ctx.is_visible(shooter.owner, &target.center) {
        c.state = EngagementState::InRangeIdle;
        return;
    }
    let outcome = firing::fire(
        c,
        shooter,
        roster,
        ShotRequest::single(target.target_ref()),
        ctx,
    );
    c.state = if outcome.fired() {
        EngagementState::InRangeFiring
    } else {
        EngagementState::InRangeIdle
    };
}

/// Pick a nearby passable tile farther from `threat`, preferring unoccupied
/// tiles and then the farthest one. Searches ring by ring outward.
pub fn retreat_tile(
    from: TilePos,
    threat: &Position,
    ctx: &CombatContext<'_>,
) -> Option<TilePos> {
    let here = Position::from_tile(from).distance_to(threat);
    for radius in 1..=REPOSITION_SEARCH_RADIUS {
        let mut best: Option<(TilePos, bool, f64)> = None;
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                if dx.abs().max(dy.abs()) != radius {
                    continue;
                }
                let tile = TilePos::new(from.x + dx, from.y + dy);
                if !ctx.grid.is_passable(tile) {
                    continue;
                }
                let distance = Position::from_tile(tile).distance_to(threat);
                if distance <= here {
                    continue;
                }
                let free = !ctx.occupancy.is_occupied(tile);
                let better = best.map_or(true, |(_, best_free, best_distance)| {
                    (free && !best_free) || (free == best_free && distance > best_distance)
                });
                if better {
                    best = Some((tile, free, distance));
                }
            }
        }
        if let Some((tile, _, _)) = best {
            return Some(tile);
        }
    }
    None
}

fn reposition(
    c: &mut Combatant,
    shooter: &RosterEntry,
    threat: &RosterEntry,
    ctx: &CombatContext<'_>,
) {
    let now = ctx.now();
    let throttled = c
        .motion
        .last_reposition_ms
        .is_some_and(|last| now - last < ctx.tuning.reposition_cooldown_ms);
    if throttled {
        return;
    }
    c.motion.last_reposition_ms = Some(now);

    let Some(tile) = retreat_tile(shooter.tile, &threat.center, ctx) else {
        return;
    };
    debug!(
        id = shooter.id,
        x = tile.x,
        y = tile.y,
        "howitzer backing away from close target"
    );
    helpers::request_path(c, shooter.tile, tile, Position::from_tile(tile), ctx);
}
