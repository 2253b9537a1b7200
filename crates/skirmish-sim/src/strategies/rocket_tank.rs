use skirmish_core::constants::ROCKET_BURST_MAX;

use crate::components::Combatant;
use crate::context::CombatContext;
use crate::roster::{Roster, RosterEntry};

use super::{engage_direct, Mobility, Trigger};

/// Turn the hull onto the target and ripple off up to `ROCKET_BURST_MAX`
/// rockets, never more than the magazine holds.
pub fn run(
    c: &mut Combatant,
    shooter: &RosterEntry,
    roster: &Roster,
    ctx: &mut CombatContext<'_>,
) {
    let delay_ms = c.weapon.stats.burst.map_or(0.0, |b| b.delay_ms);
    let shots = c.ammo.affordable_shots().min(ROCKET_BURST_MAX);
    engage_direct(
        c,
        shooter,
        roster,
        Trigger::Burst { shots, delay_ms },
        Mobility::Mobile,
        ctx,
    );
}
