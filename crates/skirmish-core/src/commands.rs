//! Orders issued to combatants from outside the simulation.
//!
//! Orders are queued and applied at the next tick boundary. Entities are
//! addressed by their stable numeric id; orders naming unknown or dead
//! entities are dropped.

use serde::{Deserialize, Serialize};

use crate::enums::CrewRole;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Order {
    // --- Targeting ---
    /// Attack `target` now, discarding the attack queue.
    Attack { unit: u32, target: u32 },
    /// Append `target` to the attack queue.
    QueueAttack { unit: u32, target: u32 },
    /// Guard a map position, engaging whatever comes into range.
    GuardPosition { unit: u32, x: f64, y: f64 },
    /// Guard another entity.
    GuardTarget { unit: u32, target: u32 },
    /// Scan passively from the current spot without chasing.
    SetAlert { unit: u32, enabled: bool },
    /// Drop target, queue, guard and any running sequence.
    Stop { unit: u32 },

    // --- Status ---
    Stun { unit: u32, duration_ms: f64 },
    Resupply { unit: u32, rounds: u32 },
    SetCrew {
        unit: u32,
        role: CrewRole,
        present: bool,
    },
}

impl Order {
    /// Id of the combatant the order is addressed to.
    pub fn unit(&self) -> u32 {
        match self {
            Order::Attack { unit, .. }
            | Order::QueueAttack { unit, .. }
            | Order::GuardPosition { unit, .. }
            | Order::GuardTarget { unit, .. }
            | Order::SetAlert { unit, .. }
            | Order::Stop { unit }
            | Order::Stun { unit, .. }
            | Order::Resupply { unit, .. }
            | Order::SetCrew { unit, .. } => *unit,
        }
    }
}
