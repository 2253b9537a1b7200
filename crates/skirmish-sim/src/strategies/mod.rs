//! Per-archetype engagement strategies.
//!
//! Each strategy runs once per tick against a checked-out copy of the
//! combatant and re-derives its [`EngagementState`].

pub mod gunship;
pub mod howitzer;
pub mod rocket_tank;
pub mod structure;
pub mod tank;

use skirmish_core::enums::{EngagementState, UnitKind};

use crate::components::{Combatant, CombatantKind};
use crate::context::CombatContext;
use crate::firing::{self, SequenceStatus, ShotRequest};
use crate::helpers;
use crate::roster::{Roster, RosterEntry};

/// Dispatch to the strategy for the combatant's archetype.
pub fn run(
    c: &mut Combatant,
    shooter: &RosterEntry,
    roster: &Roster,
    ctx: &mut CombatContext<'_>,
) {
    match c.kind {
        CombatantKind::Unit(kind) => match kind {
            UnitKind::Tank | UnitKind::BurstTank => tank::run(c, shooter, roster, ctx),
            UnitKind::RocketTank => rocket_tank::run(c, shooter, roster, ctx),
            UnitKind::Gunship => gunship::run(c, shooter, roster, ctx),
            UnitKind::Howitzer => howitzer::run(c, shooter, roster, ctx),
            UnitKind::Harvester => c.state = EngagementState::NoTarget,
        },
        CombatantKind::Structure(_) => structure::run(c, shooter, roster, ctx),
    }
}

/// How a direct-fire shooter opens fire once its gates are open.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Trigger {
    Single,
    Burst { shots: u32, delay_ms: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Mobility {
    Mobile,
    Fixed,
}

/// Direct-fire engagement shared by tanks and defensive structures.
pub(crate) fn engage_direct(
    c: &mut Combatant,
    shooter: &RosterEntry,
    roster: &Roster,
    trigger: Trigger,
    mobility: Mobility,
    ctx: &mut CombatContext<'_>,
) {
    // A running burst keeps the weapon on its own target.
    let aim_at = c
        .burst()
        .map(|b| b.target)
        .or(c.targeting.target)
        .and_then(|t| roster.resolve(t))
        .copied();
    if let Some(point) = aim_at {
        let bearing = shooter.center.bearing_to(&point.center);
        helpers::slew_toward(c, bearing, ctx.dt_ms);
    }

    match firing::advance_burst(c, shooter, roster, ctx) {
        SequenceStatus::Idle | SequenceStatus::Abandoned => {}
        SequenceStatus::Waiting | SequenceStatus::Fired | SequenceStatus::Finished => {
            c.state = EngagementState::InRangeFiring;
            return;
        }
    }

    let Some(target) = c.targeting.target.and_then(|t| roster.resolve(t)).copied() else {
        c.state = EngagementState::NoTarget;
        return;
    };
    let distance = shooter.center.distance_to(&target.center);
    let in_range = distance <= helpers::effective_range(c);

    if mobility == Mobility::Mobile && !c.targeting.alert_mode {
        helpers::pursue(c, shooter, &target, ctx);
    } else if in_range {
        c.motion.halt();
    }
    if !in_range {
        c.state = EngagementState::Approaching;
        return;
    }

    let outcome = match trigger {
        Trigger::Single => {
            let request = ShotRequest::single(target.target_ref());
            firing::fire(c, shooter, roster, request, ctx)
        }
        Trigger::Burst { shots, delay_ms } => {
            firing::start_burst(c, shooter, roster, target.target_ref(), shots, delay_ms, ctx)
        }
    };
    c.state = if outcome.fired() {
        EngagementState::InRangeFiring
    } else {
        EngagementState::InRangeIdle
    };
}
