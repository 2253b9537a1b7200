//! Runtime tuning for the combat core.
//!
//! Defaults come from [`crate::constants`]. Values can be overridden from a
//! JSON document; unspecified fields keep their defaults.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::*;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid tuning JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{field} must be a finite, non-negative number (got {value})")]
    Negative { field: &'static str, value: f64 },

    #[error("{field} must be greater than zero (got {value})")]
    NotPositive { field: &'static str, value: f64 },
}

/// Rate limits and throttles. Balance values, not correctness requirements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatTuning {
    pub path_request_cooldown_ms: f64,
    pub chase_multiplier: f64,
    pub reposition_cooldown_ms: f64,
    pub helipad_retry_ms: f64,
    pub helipad_notice_throttle_ms: f64,
    pub ammo_notice_ms: f64,
}

impl Default for CombatTuning {
    fn default() -> Self {
        Self {
            path_request_cooldown_ms: PATH_REQUEST_COOLDOWN_MS,
            chase_multiplier: CHASE_MULTIPLIER,
            reposition_cooldown_ms: REPOSITION_COOLDOWN_MS,
            helipad_retry_ms: HELIPAD_RETRY_MS,
            helipad_notice_throttle_ms: HELIPAD_NOTICE_THROTTLE_MS,
            ammo_notice_ms: AMMO_NOTICE_MS,
        }
    }
}

impl CombatTuning {
    /// Parse and validate tuning from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let tuning: CombatTuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let non_negative = [
            ("path_request_cooldown_ms", self.path_request_cooldown_ms),
            ("reposition_cooldown_ms", self.reposition_cooldown_ms),
            ("helipad_notice_throttle_ms", self.helipad_notice_throttle_ms),
            ("ammo_notice_ms", self.ammo_notice_ms),
        ];
        for (field, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Negative { field, value });
            }
        }

        // A zero retry interval would rescan helipads every tick.
        let positive = [
            ("chase_multiplier", self.chase_multiplier),
            ("helipad_retry_ms", self.helipad_retry_ms),
        ];
        for (field, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::NotPositive { field, value });
            }
        }
        Ok(())
    }
}
