//! Events emitted by the combat core for presentation layers.
//!
//! Both variants are fire-and-forget: the simulation never reads them back.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CombatEvent {
    /// User-facing message.
    Notify {
        /// Party the message is addressed to.
        party: u8,
        message: String,
        duration_ms: f64,
    },
    /// Positional sound cue.
    Sound {
        name: String,
        volume: f64,
        /// Stereo pan in [-1, 1], derived from map position.
        pan: f64,
        /// Whether overlapping plays of the same cue are allowed.
        stackable: bool,
    },
}

impl CombatEvent {
    pub fn notify(party: u8, message: impl Into<String>, duration_ms: f64) -> Self {
        CombatEvent::Notify {
            party,
            message: message.into(),
            duration_ms,
        }
    }

    pub fn is_notification(&self) -> bool {
        matches!(self, CombatEvent::Notify { .. })
    }
}
