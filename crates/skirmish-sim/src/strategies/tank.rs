//! Standard, alert-mode and burst tanks.

use crate::components::Combatant;
use crate::context::CombatContext;
use crate::roster::{Roster, RosterEntry};

use super::{engage_direct, Mobility, Trigger};

/// Chase and fire on cooldown. Alert-mode tanks hold position; burst tanks
/// open a fixed burst whenever the cooldown expires.
pub fn run(
    c: &mut Combatant,
    shooter: &RosterEntry,
    roster: &Roster,
    ctx: &mut CombatContext<'_>,
) {
    let trigger = match c.weapon.stats.burst {
        Some(burst) => Trigger::Burst {
            shots: burst.shots,
            delay_ms: burst.delay_ms,
        },
        None => Trigger::Single,
    };
    engage_direct(c, shooter, roster, trigger, Mobility::Mobile, ctx);
}
