//! Target bookkeeping: dead-reference cleanup, attack queue, guard scan
//! and status effects.

use tracing::debug;

use skirmish_core::constants::{DAMAGED_HEALTH_RATIO, DAMAGED_SPEED_FACTOR, STUN_SPEED_FACTOR};
use skirmish_core::enums::UnitKind;

use crate::components::{Combatant, EngagementTask, GuardAnchor, StatusEffects, TargetRef};
use crate::context::CombatContext;
use crate::helpers;
use crate::roster::{Roster, RosterEntry};

/// Drop every reference to a dead or missing entity.
pub fn clear_dead_references(c: &mut Combatant, roster: &Roster) {
    let alive = |t: &TargetRef| roster.is_alive(*t);

    if c.targeting.target.is_some_and(|t| !alive(&t)) {
        c.targeting.target = None;
    }
    c.targeting.queue.retain(|t| alive(t));

    let mut anchor_lost = false;
    if let Some(guard) = &mut c.targeting.guard {
        if guard.acquired.is_some_and(|t| !alive(&t)) {
            guard.acquired = None;
        }
        anchor_lost = matches!(guard.anchor, GuardAnchor::Target(anchor) if !alive(&anchor));
    }
    if anchor_lost {
        c.targeting.guard = None;
    }

    if let Some(EngagementTask::LandingReturn(ret)) = &mut c.task {
        if ret.resume_target.is_some_and(|t| !alive(&t)) {
            ret.resume_target = None;
        }
    }
}

/// Replace an absent or dead target with the queue head. Returns true when a
/// new target was taken from the queue.
pub fn advance_queue(
    c: &mut Combatant,
    shooter: &RosterEntry,
    roster: &Roster,
    ctx: &CombatContext<'_>,
) -> bool {
    if c.targeting.target.is_some_and(|t| roster.is_alive(t)) {
        return false;
    }
    c.targeting.target = None;

    while let Some(next) = c.targeting.queue.pop_front() {
        let Some(entry) = roster.resolve(next) else {
            continue;
        };
        c.targeting.target = Some(next);
        debug!(
            id = shooter.id,
            target = entry.id,
            queued = c.targeting.queue.len(),
            "advanced attack queue"
        );
        // Gunships fly; structures never move.
        if !c.is_structure() && c.unit_kind() != Some(UnitKind::Gunship) {
            helpers::request_path(c, shooter.tile, entry.tile, entry.center, ctx);
        }
        return true;
    }

    c.targeting.queue.clear();
    false
}

fn can_engage(
    c: &Combatant,
    shooter: &RosterEntry,
    candidate: &RosterEntry,
    ctx: &CombatContext<'_>,
) -> bool {
    if !candidate.is_alive() || candidate.owner == shooter.owner {
        return false;
    }
    if candidate.is_airborne() && !c.weapon.stats.anti_air {
        return false;
    }
    if c.unit_kind() == Some(UnitKind::Howitzer) {
        let distance = shooter.center.distance_to(&candidate.center);
        if distance < helpers::min_range(c)
            || !ctx.is_visible(shooter.owner, &candidate.center)
        {
            return false;
        }
    }
    true
}

/// Guard scan: acquire the nearest enemy in range when there is no live
/// target in range. Any target that left range is dropped; the rescan
/// happens on the next tick.
pub fn guard_scan(
    c: &mut Combatant,
    shooter: &RosterEntry,
    roster: &Roster,
    ctx: &CombatContext<'_>,
) {
    if c.targeting.guard.is_none() {
        return;
    }
    let range = helpers::effective_range(c);

    if let Some(current) = c.targeting.target.and_then(|t| roster.resolve(t)) {
        if shooter.center.distance_to(&current.center) <= range {
            return;
        }
        debug!(id = shooter.id, target = current.id, "guard target left range");
        c.targeting.target = None;
        if let Some(g) = &mut c.targeting.guard {
            g.acquired = None;
        }
        return;
    }

    let mut best: Option<(&RosterEntry, f64)> = None;
    for candidate in roster.iter() {
        if candidate.entity == shooter.entity || !can_engage(c, shooter, candidate, ctx) {
            continue;
        }
        let distance = shooter.center.distance_to(&candidate.center);
        if distance > range {
            continue;
        }
        if best.map_or(true, |(_, d)| distance < d) {
            best = Some((candidate, distance));
        }
    }

    if let Some((entry, _)) = best {
        let target = entry.target_ref();
        c.targeting.target = Some(target);
        if let Some(g) = &mut c.targeting.guard {
            g.acquired = Some(target);
        }
    }
}

fn recompute_speed(status: &mut StatusEffects, now_ms: f64) {
    let stun = if status.is_stunned(now_ms) {
        STUN_SPEED_FACTOR
    } else {
        1.0
    };
    status.speed_factor = stun * status.damage_factor;
}

/// Stun until `now + duration`; an existing longer stun is kept.
pub fn apply_stun(c: &mut Combatant, now_ms: f64, duration_ms: f64) {
    let until = now_ms + duration_ms.max(0.0);
    let until = c.status.stunned_until_ms.map_or(until, |u| u.max(until));
    c.status.stunned_until_ms = Some(until);
    recompute_speed(&mut c.status, now_ms);
}

/// Expire stuns and refresh the compound speed factor.
pub fn update_status(c: &mut Combatant, shooter: &RosterEntry, now_ms: f64) {
    c.status.damage_factor = if shooter.health_ratio() < DAMAGED_HEALTH_RATIO {
        DAMAGED_SPEED_FACTOR
    } else {
        1.0
    };
    if let Some(until) = c.status.stunned_until_ms {
        if now_ms >= until {
            c.status.stunned_until_ms = None;
            debug!(id = shooter.id, "stun expired");
        }
    }
    recompute_speed(&mut c.status, now_ms);
}
