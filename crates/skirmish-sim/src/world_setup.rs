//! Entity spawn factories.
//!
//! Component bundles come straight from the static stat tables. Armed
//! archetypes also get a [`Combatant`]; defensive structures start out
//! guarding their own footprint.

use hecs::{Entity, EntityBuilder, World};

use skirmish_core::enums::{StructureKind, UnitKind};
use skirmish_core::stats::{structure_stats, unit_stats, CrewRoles};
use skirmish_core::types::{Position, TilePos, TileRect};

use crate::components::*;

/// Combat state for a unit archetype, or `None` for unarmed units.
pub fn unit_combatant(kind: UnitKind) -> Option<Combatant> {
    let stats = unit_stats(kind);
    stats.weapon.map(|weapon| {
        Combatant::new(
            CombatantKind::Unit(kind),
            weapon,
            stats.required_crew,
            stats.speed,
        )
    })
}

/// Combat state for a structure archetype, guarding `footprint`.
pub fn structure_combatant(kind: StructureKind, footprint: TileRect) -> Option<Combatant> {
    let stats = structure_stats(kind);
    stats.weapon.map(|weapon| {
        let mut combatant =
            Combatant::new(CombatantKind::Structure(kind), weapon, CrewRoles::NONE, 0.0);
        combatant.targeting.guard = Some(Guard {
            anchor: GuardAnchor::Position(footprint.center()),
            acquired: None,
        });
        combatant
    })
}

/// Spawn a unit centered on `tile`.
pub fn spawn_unit(world: &mut World, id: u32, owner: u8, kind: UnitKind, tile: TilePos) -> Entity {
    let stats = unit_stats(kind);
    let mut builder = EntityBuilder::new();
    builder
        .add(Identity { id, owner })
        .add(Health::full(stats.max_health))
        .add(Armor(stats.armor))
        .add(Unit {
            kind,
            airborne: stats.airborne,
        })
        .add(Position::from_tile(tile))
        .add(tile);
    if let Some(combatant) = unit_combatant(kind) {
        builder.add(combatant);
    }
    world.spawn(builder.build())
}

/// Spawn a structure whose footprint starts at `origin` (top-left tile).
pub fn spawn_structure(
    world: &mut World,
    id: u32,
    owner: u8,
    kind: StructureKind,
    origin: TilePos,
) -> Entity {
    let stats = structure_stats(kind);
    let footprint = TileRect::new(origin.x, origin.y, stats.width, stats.height);
    let mut builder = EntityBuilder::new();
    builder
        .add(Identity { id, owner })
        .add(Health::full(stats.max_health))
        .add(Armor(stats.armor))
        .add(Structure { kind, footprint });
    if let Some(combatant) = structure_combatant(kind, footprint) {
        builder.add(combatant);
    }
    world.spawn(builder.build())
}
