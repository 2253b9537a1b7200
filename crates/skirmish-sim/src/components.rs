//! ECS components and combat state for hecs entities.
//!
//! Plain data. `Position` and `TilePos` from the core crate are also used as
//! components. Anything holding a `hecs::Entity` lives here rather than in
//! the core crate.

use std::collections::VecDeque;

use hecs::Entity;
use serde::{Deserialize, Serialize};

use skirmish_core::enums::{EngagementState, PodSide, StructureKind, UnitKind};
use skirmish_core::stats::{CrewRoles, WeaponStats};
use skirmish_core::types::{Position, TileRect};

use crate::gun_elevation::GunElevation;

/// Stable identity and owning party.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: u32,
    pub owner: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Health {
    pub current: f64,
    pub max: f64,
}

impl Health {
    pub fn full(max: f64) -> Self {
        Self { current: max, max }
    }

    pub fn is_alive(&self) -> bool {
        self.current > 0.0
    }
}

/// Damage reduction factor in [0, 1]; applied by the projectile resolver.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Armor(pub f64);

/// Marks a mobile unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    pub kind: UnitKind,
    /// Currently in the air (gunships in flight).
    pub airborne: bool,
}

/// Marks a static structure occupying a tile rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Structure {
    pub kind: StructureKind,
    pub footprint: TileRect,
}

/// Reference to something that can be shot at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetRef {
    Unit(Entity),
    Structure(Entity),
}

impl TargetRef {
    pub fn entity(&self) -> Entity {
        match self {
            TargetRef::Unit(e) | TargetRef::Structure(e) => *e,
        }
    }

    /// Center in world space; `None` when the entity is gone.
    pub fn center(&self, world: &hecs::World) -> Option<Position> {
        match self {
            TargetRef::Unit(e) => world.get::<&Position>(*e).ok().map(|p| *p),
            TargetRef::Structure(e) => world
                .get::<&Structure>(*e)
                .ok()
                .map(|s| s.footprint.center()),
        }
    }

    /// Tile used as a path destination.
    pub fn tile(&self, world: &hecs::World) -> Option<skirmish_core::types::TilePos> {
        match self {
            TargetRef::Unit(e) => world
                .get::<&skirmish_core::types::TilePos>(*e)
                .ok()
                .map(|t| *t),
            TargetRef::Structure(e) => world
                .get::<&Structure>(*e)
                .ok()
                .map(|s| s.footprint.center().to_tile()),
        }
    }
}

/// Archetype of a combat-capable entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CombatantKind {
    Unit(UnitKind),
    Structure(StructureKind),
}

/// Weapon stats plus firing timestamps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Weapon {
    pub stats: WeaponStats,
    /// Overall cooldown stamp. For bursts and volleys this is set when the
    /// sequence ends, not per shot.
    pub last_fire_ms: Option<f64>,
    /// Time of the most recent individual shot (muzzle/recoil animation).
    pub last_shot_anim_ms: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ammo {
    pub rounds: u32,
    pub capacity: u32,
    pub per_shot: u32,
    /// Latched once the empty notice went out; reset on resupply.
    pub empty_notified: bool,
}

impl Ammo {
    pub fn full(capacity: u32, per_shot: u32) -> Self {
        Self {
            rounds: capacity,
            capacity,
            per_shot: per_shot.max(1),
            empty_notified: false,
        }
    }

    pub fn can_fire(&self) -> bool {
        self.rounds > 0 && self.rounds >= self.per_shot
    }

    pub fn affordable_shots(&self) -> u32 {
        self.rounds / self.per_shot.max(1)
    }

    /// Add rounds up to capacity; re-arms the empty notice.
    pub fn refill(&mut self, rounds: u32) {
        self.rounds = self.rounds.saturating_add(rounds).min(self.capacity);
        if self.can_fire() {
            self.empty_notified = false;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Crew {
    pub present: CrewRoles,
    pub required: CrewRoles,
}

impl Crew {
    pub fn is_manned(&self) -> bool {
        self.present.covers(&self.required)
    }
}

/// Hull and turret facing (radians).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Facing {
    pub body: f64,
    pub turret: f64,
}

/// What a guarding combatant protects.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GuardAnchor {
    /// Post to hold. Scans are measured from the guard itself; the post is
    /// only read by the movement layer when walking back.
    Position(Position),
    /// Entity to protect. The guard is dropped when it dies.
    Target(TargetRef),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Guard {
    pub anchor: GuardAnchor,
    /// Target picked up by the guard scan (dropped when it leaves range).
    pub acquired: Option<TargetRef>,
}

/// A timestamped sighting of a target, for lead prediction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    pub target: TargetRef,
    pub position: Position,
    pub at_ms: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Targeting {
    pub target: Option<TargetRef>,
    pub queue: VecDeque<TargetRef>,
    pub guard: Option<Guard>,
    /// Scan passively and never chase.
    pub alert_mode: bool,
    /// Raised when the last shot attempt was obstructed.
    pub seeking_clear_shot: bool,
    pub last_seen: Option<Observation>,
    pub previous_seen: Option<Observation>,
}

impl Targeting {
    /// Record a sighting. History of a different target is discarded and a
    /// second sighting at the same time is ignored.
    pub fn observe(&mut self, target: TargetRef, position: Position, at_ms: f64) {
        match self.last_seen {
            Some(last) if last.target == target && last.at_ms == at_ms => return,
            Some(last) if last.target == target => self.previous_seen = Some(last),
            _ => self.previous_seen = None,
        }
        self.last_seen = Some(Observation {
            target,
            position,
            at_ms,
        });
    }

    pub fn forget_observations(&mut self) {
        self.last_seen = None;
        self.previous_seen = None;
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Motion {
    /// Remaining tiles of the current route.
    pub path: Vec<skirmish_core::types::TilePos>,
    pub moving: bool,
    /// Table speed in px/ms before status modifiers.
    pub base_speed: f64,
    pub last_path_request_ms: Option<f64>,
    /// Where the target was when the current route was requested.
    pub last_path_goal: Option<Position>,
    pub last_reposition_ms: Option<f64>,
}

impl Motion {
    pub fn halt(&mut self) {
        self.path.clear();
        self.moving = false;
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatusEffects {
    pub stunned_until_ms: Option<f64>,
    /// Slowdown from battle damage.
    pub damage_factor: f64,
    /// Product of every active movement modifier.
    pub speed_factor: f64,
}

impl Default for StatusEffects {
    fn default() -> Self {
        Self {
            stunned_until_ms: None,
            damage_factor: 1.0,
            speed_factor: 1.0,
        }
    }
}

impl StatusEffects {
    pub fn is_stunned(&self, now_ms: f64) -> bool {
        self.stunned_until_ms.is_some_and(|until| now_ms < until)
    }
}

/// Desired hover or landing point for an airborne unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlightPlan {
    pub destination: Position,
    pub landing: bool,
    pub pad: Option<Entity>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FlightState {
    pub plan: Option<FlightPlan>,
    /// Set the moment the last rocket leaves; cleared after rearming.
    pub ammo_empty: bool,
}

impl FlightState {
    pub fn landing_in_progress(&self) -> bool {
        self.plan.is_some_and(|p| p.landing)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BurstState {
    pub target: TargetRef,
    pub remaining: u32,
    pub delay_ms: f64,
    pub last_shot_ms: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VolleyState {
    /// Frozen at volley start; retargeting does not affect running volleys.
    pub target: TargetRef,
    pub frozen_center: Position,
    pub left_remaining: u32,
    pub right_remaining: u32,
    pub next_side: PodSide,
    pub delay_ms: f64,
    pub last_shot_ms: f64,
}

impl VolleyState {
    pub fn remaining(&self) -> u32 {
        self.left_remaining + self.right_remaining
    }

    pub fn remaining_on(&self, side: PodSide) -> u32 {
        match side {
            PodSide::Left => self.left_remaining,
            PodSide::Right => self.right_remaining,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LandingReturn {
    pub pad: Option<Entity>,
    /// Target interrupted by the ammo run; restored after rearming.
    pub resume_target: Option<TargetRef>,
    pub next_retry_ms: f64,
    pub last_notice_ms: Option<f64>,
}

/// Multi-tick task owned by a combatant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EngagementTask {
    Burst(BurstState),
    Volley(VolleyState),
    LandingReturn(LandingReturn),
}

/// Combat state of a combat-capable entity.
#[derive(Debug, Clone, PartialEq)]
pub struct Combatant {
    pub kind: CombatantKind,
    /// Veteran level, 0..=3.
    pub level: u8,
    pub precision: bool,
    pub ai_controlled: bool,
    pub weapon: Weapon,
    pub ammo: Ammo,
    pub crew: Crew,
    pub facing: Facing,
    pub targeting: Targeting,
    pub motion: Motion,
    pub status: StatusEffects,
    pub task: Option<EngagementTask>,
    pub gun: Option<GunElevation>,
    pub flight: Option<FlightState>,
    pub state: EngagementState,
}

impl Combatant {
    pub fn new(
        kind: CombatantKind,
        weapon: WeaponStats,
        required_crew: CrewRoles,
        speed: f64,
    ) -> Self {
        let flight = match kind {
            CombatantKind::Unit(UnitKind::Gunship) => Some(FlightState::default()),
            _ => None,
        };
        Self {
            kind,
            level: 0,
            precision: false,
            ai_controlled: false,
            weapon: Weapon {
                stats: weapon,
                last_fire_ms: None,
                last_shot_anim_ms: None,
            },
            ammo: Ammo::full(weapon.ammo_capacity, weapon.ammo_per_shot),
            crew: Crew {
                present: required_crew,
                required: required_crew,
            },
            facing: Facing::default(),
            targeting: Targeting::default(),
            motion: Motion {
                base_speed: speed,
                ..Default::default()
            },
            status: StatusEffects::default(),
            task: None,
            gun: None,
            flight,
            state: EngagementState::NoTarget,
        }
    }

    pub fn unit_kind(&self) -> Option<UnitKind> {
        match self.kind {
            CombatantKind::Unit(kind) => Some(kind),
            CombatantKind::Structure(_) => None,
        }
    }

    pub fn is_structure(&self) -> bool {
        matches!(self.kind, CombatantKind::Structure(_))
    }

    pub fn is_returning(&self) -> bool {
        matches!(self.task, Some(EngagementTask::LandingReturn(_)))
    }

    pub fn burst(&self) -> Option<&BurstState> {
        match &self.task {
            Some(EngagementTask::Burst(b)) => Some(b),
            _ => None,
        }
    }

    pub fn volley(&self) -> Option<&VolleyState> {
        match &self.task {
            Some(EngagementTask::Volley(v)) => Some(v),
            _ => None,
        }
    }

    /// Current movement speed after status modifiers (px/ms).
    pub fn effective_speed(&self) -> f64 {
        self.motion.base_speed * self.status.speed_factor
    }

    /// Enter or leave alert mode. Alert mode guards the unit's own spot.
    pub fn set_alert_mode(&mut self, enabled: bool, at: Position) {
        self.targeting.alert_mode = enabled;
        if enabled {
            self.targeting.guard = Some(Guard {
                anchor: GuardAnchor::Position(at),
                acquired: None,
            });
        } else {
            self.targeting.guard = None;
        }
    }

    /// Stamp the overall cooldown.
    pub fn stamp_cooldown(&mut self, now_ms: f64) {
        self.weapon.last_fire_ms = Some(now_ms);
    }
}
