//! Gunship: hover at standoff, fire two-pod volleys, fly home to rearm.
//!
//! Rearm cycle:
//! 1. the last rocket leaves, `ammo_empty` latches and the current target
//!    is stored as the resume target
//! 2. the nearest free friendly helipad gets a landing flight plan; with no
//!    pad available the search is retried on a timer and the player is told
//!    (throttled)
//! 3. once ammunition is back and no landing is in progress the stored
//!    target is restored

use glam::DVec2;
use tracing::debug;

use skirmish_core::constants::*;
use skirmish_core::enums::{EngagementState, StructureKind, UnitKind};
use skirmish_core::types::Position;
use skirmish_terrain::TileGrid;

use crate::components::{Combatant, EngagementTask, FlightPlan, LandingReturn};
use crate::context::CombatContext;
use crate::firing::{self, SequenceStatus};
use crate::helpers;
use crate::roster::{EntryKind, Roster, RosterEntry};

pub fn run(
    c: &mut Combatant,
    shooter: &RosterEntry,
    roster: &Roster,
    ctx: &mut CombatContext<'_>,
) {
    if c.is_returning() {
        continue_return(c, shooter, roster, ctx);
        return;
    }

    if let Some(volley) = c.volley().copied() {
        let range = helpers::effective_range(c);
        let mut in_range = false;
        if let Some(target) = roster.resolve(volley.target).copied() {
            in_range = shooter.center.distance_to(&target.center) <= range;
            face_and_hover(c, shooter, &target, ctx);
        }
        let status = firing::advance_volley(c, shooter, roster, ctx);
        if out_of_rockets(c) {
            begin_return(c, shooter, roster, ctx);
            return;
        }
        c.state = match status {
            SequenceStatus::Abandoned | SequenceStatus::Idle => EngagementState::NoTarget,
            _ if in_range => EngagementState::InRangeFiring,
            _ => EngagementState::Approaching,
        };
        return;
    }

    if out_of_rockets(c) {
        begin_return(c, shooter, roster, ctx);
        return;
    }

    let Some(target) = c.targeting.target.and_then(|t| roster.resolve(t)).copied() else {
        c.state = EngagementState::NoTarget;
        return;
    };
    face_and_hover(c, shooter, &target, ctx);

    if shooter.center.distance_to(&target.center) > helpers::effective_range(c) {
        c.state = EngagementState::Approaching;
        return;
    }

    let outcome = firing::start_volley(c, shooter, roster, target.target_ref(), ctx);
    if out_of_rockets(c) {
        begin_return(c, shooter, roster, ctx);
        return;
    }
    c.state = if outcome.fired() {
        EngagementState::InRangeFiring
    } else {
        EngagementState::InRangeIdle
    };
}

fn out_of_rockets(c: &Combatant) -> bool {
    c.flight.is_some_and(|f| f.ammo_empty) || !c.ammo.can_fire()
}

/// Point to hover at: standoff distance along the approach vector, or a
/// strafing offset when the target is directly beneath.
pub fn hover_point(
    shooter: &Position,
    target: &Position,
    range: f64,
    facing: f64,
    grid: &TileGrid,
) -> Position {
    let offset = shooter.to_vec() - target.to_vec();
    let distance = offset.length();
    let point = if distance < GUNSHIP_OVERHEAD_RADIUS {
        target.to_vec() + DVec2::from_angle(facing).perp() * GUNSHIP_STRAFE_OFFSET
    } else {
        target.to_vec() + offset / distance * (range * GUNSHIP_STANDOFF_FACTOR)
    };
    grid.clamp_position(Position::from_vec(point))
}

fn face_and_hover(
    c: &mut Combatant,
    shooter: &RosterEntry,
    target: &RosterEntry,
    ctx: &CombatContext<'_>,
) {
    let bearing = shooter.center.bearing_to(&target.center);
    helpers::slew_toward(c, bearing, ctx.dt_ms);

    let destination = hover_point(
        &shooter.center,
        &target.center,
        helpers::effective_range(c),
        c.facing.body,
        ctx.grid,
    );
    let Some(flight) = &mut c.flight else {
        return;
    };
    let stale = flight.plan.map_or(true, |plan| {
        plan.landing || plan.destination.distance_to(&destination) > FLIGHT_PLAN_EPSILON
    });
    if stale {
        flight.plan = Some(FlightPlan {
            destination,
            landing: false,
            pad: None,
        });
    }
}

fn begin_return(
    c: &mut Combatant,
    shooter: &RosterEntry,
    roster: &Roster,
    ctx: &mut CombatContext<'_>,
) {
    let resume_target = c.targeting.target.take();
    if let Some(flight) = &mut c.flight {
        flight.ammo_empty = true;
        flight.plan = None;
    }
    c.task = Some(EngagementTask::LandingReturn(LandingReturn {
        pad: None,
        resume_target,
        next_retry_ms: ctx.now(),
        last_notice_ms: None,
    }));
    debug!(id = shooter.id, "out of rockets, returning to rearm");
    continue_return(c, shooter, roster, ctx);
}

/// A friendly, live helipad with no other grounded gunship on it.
fn pad_available(pad: &RosterEntry, shooter: &RosterEntry, roster: &Roster) -> bool {
    let EntryKind::Structure {
        kind: StructureKind::Helipad,
        footprint,
    } = pad.kind
    else {
        return false;
    };
    if !pad.is_alive() || pad.owner != shooter.owner {
        return false;
    }
    !roster.iter().any(|other| {
        other.entity != shooter.entity
            && other.is_alive()
            && other.unit_kind() == Some(UnitKind::Gunship)
            && !other.is_airborne()
            && footprint.contains(other.tile)
    })
}

fn nearest_helipad<'r>(shooter: &RosterEntry, roster: &'r Roster) -> Option<&'r RosterEntry> {
    let mut best: Option<(&RosterEntry, f64)> = None;
    for pad in roster.iter() {
        if !pad_available(pad, shooter, roster) {
            continue;
        }
        let distance = shooter.center.distance_to(&pad.center);
        if best.map_or(true, |(_, d)| distance < d) {
            best = Some((pad, distance));
        }
    }
    best.map(|(pad, _)| pad)
}

fn continue_return(
    c: &mut Combatant,
    shooter: &RosterEntry,
    roster: &Roster,
    ctx: &mut CombatContext<'_>,
) {
    let Some(EngagementTask::LandingReturn(mut ret)) = c.task else {
        return;
    };
    let now = ctx.now();

    let landing = c.flight.is_some_and(|f| f.landing_in_progress());
    if c.ammo.can_fire() && !landing {
        if let Some(flight) = &mut c.flight {
            flight.ammo_empty = false;
        }
        c.targeting.target = ret.resume_target.filter(|t| roster.is_alive(*t));
        c.task = None;
        c.state = if c.targeting.target.is_some() {
            EngagementState::Approaching
        } else {
            EngagementState::NoTarget
        };
        debug!(
            id = shooter.id,
            resumed = c.targeting.target.is_some(),
            "rearmed"
        );
        return;
    }

    if let Some(pad) = ret.pad {
        let usable = roster
            .get(pad)
            .is_some_and(|entry| pad_available(entry, shooter, roster));
        if !usable {
            ret.pad = None;
            ret.next_retry_ms = now;
            if let Some(flight) = &mut c.flight {
                flight.plan = None;
            }
        }
    }

    if ret.pad.is_none() && now >= ret.next_retry_ms {
        match nearest_helipad(shooter, roster) {
            Some(pad) => {
                ret.pad = Some(pad.entity);
                if let Some(flight) = &mut c.flight {
                    flight.plan = Some(FlightPlan {
                        destination: pad.center,
                        landing: true,
                        pad: Some(pad.entity),
                    });
                }
                debug!(id = shooter.id, pad = pad.id, "landing plan issued");
            }
            None => {
                ret.next_retry_ms = now + ctx.tuning.helipad_retry_ms;
                let throttle = ctx.tuning.helipad_notice_throttle_ms;
                if ret.last_notice_ms.map_or(true, |t| now - t >= throttle) {
                    ret.last_notice_ms = Some(now);
                    ctx.notify(
                        shooter.owner,
                        "No helipad available for rearming",
                        HELIPAD_NOTICE_MS,
                    );
                }
            }
        }
    }

    c.task = Some(EngagementTask::LandingReturn(ret));
    c.state = EngagementState::ReturningToRearm;
}
