use std::f64::consts::{FRAC_PI_2, PI};

use crate::constants::*;
use crate::enums::*;
use crate::events::CombatEvent;
use crate::projectile::{ArcParams, Projectile};
use crate::stats::{structure_stats, unit_stats, CrewRoles};
use crate::types::*;

const ALL_UNITS: [UnitKind; 6] = [
    UnitKind::Tank,
    UnitKind::BurstTank,
    UnitKind::RocketTank,
    UnitKind::Gunship,
    UnitKind::Howitzer,
    UnitKind::Harvester,
];

const ALL_STRUCTURES: [StructureKind; 5] = [
    StructureKind::GunTurret,
    StructureKind::RocketTurret,
    StructureKind::BeamTower,
    StructureKind::Helipad,
    StructureKind::Factory,
];

#[test]
fn test_angle_diff_wraps() {
    assert!((angle_diff(0.0, FRAC_PI_2) - FRAC_PI_2).abs() < 1e-12);
    assert!((angle_diff(0.0, -FRAC_PI_2) + FRAC_PI_2).abs() < 1e-12);
    // Crossing the +-PI seam takes the short way round.
    let d = angle_diff(PI - 0.1, -PI + 0.1);
    assert!((d - 0.2).abs() < 1e-9, "got {d}");
}

#[test]
fn test_rotate_toward_does_not_overshoot() {
    let a = rotate_toward(0.0, 0.05, 0.1);
    assert_eq!(a, 0.05);
    let b = rotate_toward(0.0, 1.0, 0.1);
    assert!((b - 0.1).abs() < 1e-12);
    let c = rotate_toward(0.0, -1.0, 0.1);
    assert!((c + 0.1).abs() < 1e-12);
}

#[test]
fn test_tile_round_trip_through_center() {
    let tile = TilePos::new(7, 3);
    let center = Position::from_tile(tile);
    assert_eq!(center, Position::new(7.5 * TILE_SIZE, 3.5 * TILE_SIZE));
    assert_eq!(center.to_tile(), tile);
}

#[test]
fn test_negative_positions_floor_to_negative_tiles() {
    assert_eq!(Position::new(-1.0, -40.0).to_tile(), TilePos::new(-1, -2));
}

#[test]
fn test_structure_center_is_geometric() {
    let rect = TileRect::new(2, 4, 2, 3);
    let c = rect.center();
    assert_eq!(c, Position::new(3.0 * TILE_SIZE, 5.5 * TILE_SIZE));
    assert!(rect.contains(TilePos::new(3, 6)));
    assert!(!rect.contains(TilePos::new(4, 6)));
}

#[test]
fn test_sim_time_advance() {
    let mut t = SimTime::default();
    t.advance();
    t.advance_by(50.0);
    assert_eq!(t.tick, 2);
    assert!((t.now_ms - (DT_MS + 50.0)).abs() < 1e-9);
    // Negative steps never move time backwards.
    t.advance_by(-10.0);
    assert_eq!(t.tick, 3);
    assert!((t.now_ms - (DT_MS + 50.0)).abs() < 1e-9);
}

#[test]
fn test_weapon_tables_are_consistent() {
    let unit_weapons = ALL_UNITS.iter().filter_map(|k| unit_stats(*k).weapon);
    let structure_weapons = ALL_STRUCTURES
        .iter()
        .filter_map(|k| structure_stats(*k).weapon);
    for w in unit_weapons.chain(structure_weapons) {
        assert!(w.ammo_per_shot >= 1);
        assert!(w.ammo_capacity >= w.ammo_per_shot);
        assert!(w.min_range_tiles < w.range_tiles);
        assert!(w.cooldown_ms > 0.0);
        if let Some(burst) = w.burst {
            assert!(burst.shots >= 1);
            // A burst must fit inside one cooldown window.
            assert!(burst.delay_ms * (burst.shots as f64) < w.cooldown_ms);
        }
    }
}

#[test]
fn test_only_gunship_is_airborne() {
    for kind in ALL_UNITS {
        assert_eq!(unit_stats(kind).airborne, kind == UnitKind::Gunship);
    }
}

#[test]
fn test_howitzer_has_minimum_range() {
    let w = unit_stats(UnitKind::Howitzer).weapon.unwrap();
    assert_eq!(w.min_range_tiles, 4.0);
    assert!(!w.has_turret);
}

#[test]
fn test_unarmed_archetypes() {
    assert!(unit_stats(UnitKind::Harvester).weapon.is_none());
    assert!(structure_stats(StructureKind::Helipad).weapon.is_none());
    assert!(structure_stats(StructureKind::Factory).weapon.is_none());
}

#[test]
fn test_crew_roles_cover() {
    let required = unit_stats(UnitKind::Tank).required_crew;
    assert!(CrewRoles::FULL.covers(&required));
    let mut crew = required;
    crew.set(CrewRole::Loader, false);
    assert!(!crew.covers(&required));
    assert!(crew.covers(&CrewRoles::NONE));
    assert!(!crew.has(CrewRole::Loader));
}

#[test]
fn test_combat_event_tagged_json() {
    let event = CombatEvent::notify(0, "Out of ammunition", AMMO_NOTICE_MS);
    let json = serde_json::to_value(&event).unwrap();
    assert_eq!(json["type"], "Notify");
    assert_eq!(json["message"], "Out of ammunition");
    assert!(event.is_notification());
}

#[test]
fn test_projectile_expiry() {
    let p = Projectile {
        kind: ProjectileKind::Artillery,
        kinematics: Kinematics::BallisticArc,
        origin: Position::default(),
        target_point: Position::new(100.0, 0.0),
        homing_target: None,
        speed: 0.25,
        damage: 60.0,
        created_ms: 1000.0,
        shooter_id: 1,
        shooter_owner: 0,
        arc: Some(ArcParams {
            apex_height: 35.0,
            flight_ms: 400.0,
        }),
        max_flight_ms: Some(1300.0),
        pod: None,
    };
    assert_eq!(p.expires_at_ms(), Some(2300.0));
}

#[test]
fn test_order_json_round_trip() {
    use crate::commands::Order;

    let json = r#"{ "type": "SetCrew", "unit": 4, "role": "Loader", "present": false }"#;
    let order: Order = serde_json::from_str(json).unwrap();
    assert_eq!(
        order,
        Order::SetCrew {
            unit: 4,
            role: CrewRole::Loader,
            present: false
        }
    );
    assert_eq!(order.unit(), 4);

    let attack = Order::Attack { unit: 1, target: 9 };
    let value = serde_json::to_value(&attack).unwrap();
    assert_eq!(value["type"], "Attack");
    assert_eq!(value["target"], 9);
}
