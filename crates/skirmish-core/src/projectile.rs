//! Projectile records handed to the downstream projectile resolver.

use serde::{Deserialize, Serialize};

use crate::enums::{Kinematics, PodSide, ProjectileKind};
use crate::types::Position;

/// Ballistic/rocket flight parameters stamped at launch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArcParams {
    /// Apex height above the straight line (pixels, 0 for flat rockets).
    pub apex_height: f64,
    /// Expected flight duration (ms).
    pub flight_ms: f64,
}

/// A projectile emitted by the firing factory. Immutable once emitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub kind: ProjectileKind,
    pub kinematics: Kinematics,
    pub origin: Position,
    /// Fixed aim point captured at launch.
    pub target_point: Position,
    /// Live target id for homing projectiles.
    pub homing_target: Option<u32>,
    /// Pixels per millisecond.
    pub speed: f64,
    pub damage: f64,
    pub created_ms: f64,
    pub shooter_id: u32,
    pub shooter_owner: u8,
    pub arc: Option<ArcParams>,
    /// The resolver drops the projectile after this long regardless of impact.
    pub max_flight_ms: Option<f64>,
    pub pod: Option<PodSide>,
}

impl Projectile {
    /// Time at which the resolver must retire this projectile, if bounded.
    pub fn expires_at_ms(&self) -> Option<f64> {
        self.max_flight_ms.map(|m| self.created_ms + m)
    }
}
