//! Read-only per-tick snapshot of everything that can be targeted.
//!
//! Built once at the start of a combat pass so strategies can look at other
//! entities while a single combatant's state is checked out for mutation.

use std::collections::HashMap;

use hecs::{Entity, World};

use skirmish_core::enums::{StructureKind, UnitKind};
use skirmish_core::types::{Position, TilePos, TileRect};

use crate::components::{Health, Identity, Structure, TargetRef, Unit};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EntryKind {
    Unit { kind: UnitKind, airborne: bool },
    Structure { kind: StructureKind, footprint: TileRect },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RosterEntry {
    pub entity: Entity,
    pub id: u32,
    pub owner: u8,
    pub center: Position,
    pub tile: TilePos,
    pub health: Health,
    pub kind: EntryKind,
}

impl RosterEntry {
    pub fn target_ref(&self) -> TargetRef {
        match self.kind {
            EntryKind::Unit { .. } => TargetRef::Unit(self.entity),
            EntryKind::Structure { .. } => TargetRef::Structure(self.entity),
        }
    }

    pub fn is_alive(&self) -> bool {
        self.health.is_alive()
    }

    pub fn is_airborne(&self) -> bool {
        matches!(self.kind, EntryKind::Unit { airborne: true, .. })
    }

    pub fn unit_kind(&self) -> Option<UnitKind> {
        match self.kind {
            EntryKind::Unit { kind, .. } => Some(kind),
            EntryKind::Structure { .. } => None,
        }
    }

    pub fn structure_kind(&self) -> Option<StructureKind> {
        match self.kind {
            EntryKind::Structure { kind, .. } => Some(kind),
            EntryKind::Unit { .. } => None,
        }
    }

    pub fn health_ratio(&self) -> f64 {
        if self.health.max > 0.0 {
            self.health.current / self.health.max
        } else {
            0.0
        }
    }
}

/// Entries sorted by id, so iteration order is deterministic.
#[derive(Debug, Default)]
pub struct Roster {
    entries: Vec<RosterEntry>,
    index: HashMap<Entity, usize>,
}

impl Roster {
    pub fn build(world: &World) -> Self {
        let mut entries = Vec::new();

        for (entity, (ident, health, unit, pos, tile)) in world
            .query::<(&Identity, &Health, &Unit, &Position, Option<&TilePos>)>()
            .iter()
        {
            entries.push(RosterEntry {
                entity,
                id: ident.id,
                owner: ident.owner,
                center: *pos,
                tile: tile.copied().unwrap_or_else(|| pos.to_tile()),
                health: *health,
                kind: EntryKind::Unit {
                    kind: unit.kind,
                    airborne: unit.airborne,
                },
            });
        }

        for (entity, (ident, health, structure)) in
            world.query::<(&Identity, &Health, &Structure)>().iter()
        {
            let center = structure.footprint.center();
            entries.push(RosterEntry {
                entity,
                id: ident.id,
                owner: ident.owner,
                center,
                tile: center.to_tile(),
                health: *health,
                kind: EntryKind::Structure {
                    kind: structure.kind,
                    footprint: structure.footprint,
                },
            });
        }

        Self::from_entries(entries)
    }

    pub fn from_entries(mut entries: Vec<RosterEntry>) -> Self {
        entries.sort_by_key(|e| e.id);
        let index = entries
            .iter()
            .enumerate()
            .map(|(i, e)| (e.entity, i))
            .collect();
        Self { entries, index }
    }

    /// Entry for an entity, alive or not.
    pub fn get(&self, entity: Entity) -> Option<&RosterEntry> {
        self.index.get(&entity).map(|&i| &self.entries[i])
    }

    /// Resolve a target reference to a live entry of the matching variant.
    pub fn resolve(&self, target: TargetRef) -> Option<&RosterEntry> {
        self.get(target.entity())
            .filter(|e| e.is_alive() && e.target_ref() == target)
    }

    pub fn is_alive(&self, target: TargetRef) -> bool {
        self.resolve(target).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RosterEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
