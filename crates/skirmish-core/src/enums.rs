//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Mobile unit archetype.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitKind {
    /// Standard turreted tank (also used in alert mode).
    Tank,
    /// Tank firing fixed-size bursts per cooldown.
    BurstTank,
    /// Turretless rocket launcher; the hull rotates to aim.
    RocketTank,
    /// Rotary-wing gunship with two rocket pods and a resupply cycle.
    Gunship,
    /// Indirect-fire artillery piece with a raised barrel.
    Howitzer,
    /// Unarmed resource collector.
    Harvester,
}

/// Static structure archetype.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StructureKind {
    /// Direct-fire defensive turret.
    GunTurret,
    /// Anti-air capable homing missile battery.
    RocketTurret,
    /// Continuous-beam tower.
    BeamTower,
    /// Landing and rearm pad for gunships.
    Helipad,
    /// Production building, no weapon.
    Factory,
}

/// What a shooter physically launches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectileKind {
    Bullet,
    Shell,
    Rocket,
    HomingMissile,
    Artillery,
    Beam,
}

/// Flight-kinematics tag consumed by the projectile resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Kinematics {
    /// Constant-velocity straight flight to the target point.
    Straight,
    /// Parabolic arc to the target point.
    BallisticArc,
    /// Steers toward a live target.
    Homing,
    /// Instant beam anchored at the shooter.
    StationaryBeam,
}

/// Crew positions a vehicle may require.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CrewRole {
    Driver,
    Gunner,
    Loader,
    Commander,
}

/// Weapon pod of a two-pod launcher.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PodSide {
    #[default]
    Left,
    Right,
}

impl PodSide {
    pub fn other(self) -> Self {
        match self {
            PodSide::Left => PodSide::Right,
            PodSide::Right => PodSide::Left,
        }
    }
}

/// Externally observable engagement state, re-derived every tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngagementState {
    #[default]
    NoTarget,
    /// Target held but out of range.
    Approaching,
    /// In range, but at least one firing gate is closed.
    InRangeIdle,
    /// Fired this tick or a multi-shot sequence is running.
    InRangeFiring,
    /// Gunship heading back to a helipad to rearm.
    ReturningToRearm,
}
