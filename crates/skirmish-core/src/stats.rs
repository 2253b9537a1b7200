//! Static stat tables keyed by unit and structure archetype.
//!
//! Read-only lookups; every runtime modifier (level, type factor) is applied
//! on top of these values by the simulation.

use serde::{Deserialize, Serialize};

use crate::enums::{CrewRole, ProjectileKind, StructureKind, UnitKind};

/// Set of crew roles, either present in a vehicle or required to fire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrewRoles {
    pub driver: bool,
    pub gunner: bool,
    pub loader: bool,
    pub commander: bool,
}

impl CrewRoles {
    pub const NONE: CrewRoles = CrewRoles {
        driver: false,
        gunner: false,
        loader: false,
        commander: false,
    };

    pub const FULL: CrewRoles = CrewRoles {
        driver: true,
        gunner: true,
        loader: true,
        commander: true,
    };

    pub fn has(&self, role: CrewRole) -> bool {
        match role {
            CrewRole::Driver => self.driver,
            CrewRole::Gunner => self.gunner,
            CrewRole::Loader => self.loader,
            CrewRole::Commander => self.commander,
        }
    }

    pub fn set(&mut self, role: CrewRole, present: bool) {
        match role {
            CrewRole::Driver => self.driver = present,
            CrewRole::Gunner => self.gunner = present,
            CrewRole::Loader => self.loader = present,
            CrewRole::Commander => self.commander = present,
        }
    }

    /// True when every role set in `required` is also set here.
    pub fn covers(&self, required: &CrewRoles) -> bool {
        (!required.driver || self.driver)
            && (!required.gunner || self.gunner)
            && (!required.loader || self.loader)
            && (!required.commander || self.commander)
    }
}

/// Fixed-count multi-shot parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BurstSpec {
    pub shots: u32,
    pub delay_ms: f64,
}

/// Weapon parameters shared by units and structures.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeaponStats {
    pub range_tiles: f64,
    /// Targets closer than this are never engaged (0 = no minimum).
    pub min_range_tiles: f64,
    pub cooldown_ms: f64,
    pub damage: f64,
    pub projectile: ProjectileKind,
    pub burst: Option<BurstSpec>,
    pub ammo_capacity: u32,
    pub ammo_per_shot: u32,
    /// Maximum facing error (radians) before a shot is allowed.
    pub aim_threshold: f64,
    /// Turret or hull traverse rate (radians per ms).
    pub traverse_rate: f64,
    /// Aiming uses a separate turret rather than the hull.
    pub has_turret: bool,
    pub anti_air: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UnitStats {
    pub weapon: Option<WeaponStats>,
    pub max_health: f64,
    pub armor: f64,
    /// Base movement speed (px per ms).
    pub speed: f64,
    pub required_crew: CrewRoles,
    pub airborne: bool,
    pub cost: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StructureStats {
    pub weapon: Option<WeaponStats>,
    pub max_health: f64,
    pub armor: f64,
    pub width: i32,
    pub height: i32,
    pub cost: u32,
}

const TANK_CREW: CrewRoles = CrewRoles {
    driver: true,
    gunner: true,
    loader: true,
    commander: false,
};

const LIGHT_CREW: CrewRoles = CrewRoles {
    driver: true,
    gunner: true,
    loader: false,
    commander: false,
};

const PILOT_CREW: CrewRoles = CrewRoles {
    driver: true,
    gunner: false,
    loader: false,
    commander: false,
};

pub fn unit_stats(kind: UnitKind) -> UnitStats {
    match kind {
        UnitKind::Tank => UnitStats {
            weapon: Some(WeaponStats {
                range_tiles: 9.0,
                min_range_tiles: 0.0,
                cooldown_ms: 1600.0,
                damage: 25.0,
                projectile: ProjectileKind::Shell,
                burst: None,
                ammo_capacity: 40,
                ammo_per_shot: 1,
                aim_threshold: 0.14,
                traverse_rate: 0.003,
                has_turret: true,
                anti_air: false,
            }),
            max_health: 400.0,
            armor: 0.3,
            speed: 0.06,
            required_crew: TANK_CREW,
            airborne: false,
            cost: 800,
        },
        UnitKind::BurstTank => UnitStats {
            weapon: Some(WeaponStats {
                range_tiles: 8.0,
                min_range_tiles: 0.0,
                cooldown_ms: 2400.0,
                damage: 9.0,
                projectile: ProjectileKind::Bullet,
                burst: Some(BurstSpec {
                    shots: 3,
                    delay_ms: 150.0,
                }),
                ammo_capacity: 90,
                ammo_per_shot: 1,
                aim_threshold: 0.2,
                traverse_rate: 0.004,
                has_turret: true,
                anti_air: true,
            }),
            max_health: 320.0,
            armor: 0.25,
            speed: 0.07,
            required_crew: TANK_CREW,
            airborne: false,
            cost: 900,
        },
        UnitKind::RocketTank => UnitStats {
            weapon: Some(WeaponStats {
                range_tiles: 11.0,
                min_range_tiles: 0.0,
                cooldown_ms: 5000.0,
                damage: 30.0,
                projectile: ProjectileKind::Rocket,
                burst: Some(BurstSpec {
                    shots: crate::constants::ROCKET_BURST_MAX,
                    delay_ms: 200.0,
                }),
                ammo_capacity: 16,
                ammo_per_shot: 1,
                aim_threshold: 0.12,
                traverse_rate: 0.002,
                has_turret: false,
                anti_air: false,
            }),
            max_health: 260.0,
            armor: 0.15,
            speed: 0.055,
            required_crew: LIGHT_CREW,
            airborne: false,
            cost: 1000,
        },
        UnitKind::Gunship => UnitStats {
            weapon: Some(WeaponStats {
                range_tiles: 9.0,
                min_range_tiles: 0.0,
                cooldown_ms: 4000.0,
                damage: 35.0,
                projectile: ProjectileKind::Rocket,
                burst: None,
                ammo_capacity: 8,
                ammo_per_shot: 1,
                aim_threshold: 0.35,
                traverse_rate: 0.005,
                has_turret: false,
                anti_air: false,
            }),
            max_health: 300.0,
            armor: 0.1,
            speed: 0.12,
            required_crew: PILOT_CREW,
            airborne: true,
            cost: 1500,
        },
        UnitKind::Howitzer => UnitStats {
            weapon: Some(WeaponStats {
                range_tiles: 14.0,
                min_range_tiles: 4.0,
                cooldown_ms: 6000.0,
                damage: 60.0,
                projectile: ProjectileKind::Artillery,
                burst: None,
                ammo_capacity: 10,
                ammo_per_shot: 1,
                aim_threshold: 0.1,
                traverse_rate: 0.0015,
                has_turret: false,
                anti_air: false,
            }),
            max_health: 220.0,
            armor: 0.1,
            speed: 0.04,
            required_crew: TANK_CREW,
            airborne: false,
            cost: 1200,
        },
        UnitKind::Harvester => UnitStats {
            weapon: None,
            max_health: 500.0,
            armor: 0.2,
            speed: 0.05,
            required_crew: PILOT_CREW,
            airborne: false,
            cost: 600,
        },
    }
}

pub fn structure_stats(kind: StructureKind) -> StructureStats {
    match kind {
        StructureKind::GunTurret => StructureStats {
            weapon: Some(WeaponStats {
                range_tiles: 8.0,
                min_range_tiles: 0.0,
                cooldown_ms: 1200.0,
                damage: 18.0,
                projectile: ProjectileKind::Bullet,
                burst: None,
                ammo_capacity: 10_000,
                ammo_per_shot: 1,
                aim_threshold: 0.14,
                traverse_rate: 0.004,
                has_turret: true,
                anti_air: false,
            }),
            max_health: 600.0,
            armor: 0.4,
            width: 1,
            height: 1,
            cost: 500,
        },
        StructureKind::RocketTurret => StructureStats {
            weapon: Some(WeaponStats {
                range_tiles: 10.0,
                min_range_tiles: 0.0,
                cooldown_ms: 2500.0,
                damage: 40.0,
                projectile: ProjectileKind::HomingMissile,
                burst: None,
                ammo_capacity: 10_000,
                ammo_per_shot: 1,
                aim_threshold: 0.25,
                traverse_rate: 0.003,
                has_turret: true,
                anti_air: true,
            }),
            max_health: 500.0,
            armor: 0.35,
            width: 1,
            height: 1,
            cost: 750,
        },
        StructureKind::BeamTower => StructureStats {
            weapon: Some(WeaponStats {
                range_tiles: 7.0,
                min_range_tiles: 0.0,
                cooldown_ms: 3000.0,
                damage: 70.0,
                projectile: ProjectileKind::Beam,
                burst: None,
                ammo_capacity: 10_000,
                ammo_per_shot: 1,
                aim_threshold: 0.1,
                traverse_rate: 0.002,
                has_turret: true,
                anti_air: false,
            }),
            max_health: 450.0,
            armor: 0.3,
            width: 1,
            height: 2,
            cost: 1100,
        },
        StructureKind::Helipad => StructureStats {
            weapon: None,
            max_health: 500.0,
            armor: 0.2,
            width: 2,
            height: 2,
            cost: 400,
        },
        StructureKind::Factory => StructureStats {
            weapon: None,
            max_health: 1200.0,
            armor: 0.3,
            width: 3,
            height: 3,
            cost: 2000,
        },
    }
}
