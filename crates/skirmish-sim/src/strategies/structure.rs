//! Defensive structures: gun turret, rocket turret, beam tower.
//!
//! Always in guard mode around their footprint and never move.

use crate::components::Combatant;
use crate::context::CombatContext;
use crate::roster::{Roster, RosterEntry};

use super::{engage_direct, Mobility, Trigger};

pub fn run(
    c: &mut Combatant,
    shooter: &RosterEntry,
    roster: &Roster,
    ctx: &mut CombatContext<'_>,
) {
    engage_direct(c, shooter, roster, Trigger::Single, Mobility::Fixed, ctx);
}
