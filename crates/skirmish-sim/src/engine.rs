//! Battlefield engine.
//!
//! `Battlefield` owns the hecs world, the tile grid, the seeded RNG and the
//! projectile/event outboxes, and runs one combat pass per tick. Headless
//! and deterministic: the same seed and inputs give the same output.

use std::collections::VecDeque;

use hecs::{Entity, World};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use skirmish_core::commands::Order;
use skirmish_core::config::{CombatTuning, ConfigError};
use skirmish_core::constants::DT_MS;
use skirmish_core::enums::{StructureKind, UnitKind};
use skirmish_core::events::CombatEvent;
use skirmish_core::projectile::Projectile;
use skirmish_core::types::{Position, SimTime, TilePos};
use skirmish_terrain::{Occupancy, TileGrid};

use crate::components::*;
use crate::context::{
    CombatContext, DirectPathPlanner, FullVisibility, GridLineOfSight, LineOfSight, PathPlanner,
    Visibility,
};
use crate::dispatcher::{self, PassSummary};
use crate::roster::Roster;
use crate::targeting;
use crate::world_setup;

/// Configuration for a new battlefield.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// RNG seed. Same seed = same projectile stream.
    pub seed: u64,
    pub fog_of_war: bool,
    /// Party whose notifications are surfaced.
    pub player_party: u8,
    pub tuning: CombatTuning,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            fog_of_war: false,
            player_party: 0,
            tuning: CombatTuning::default(),
        }
    }
}

impl SimConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: SimConfig = serde_json::from_str(json)?;
        config.tuning.validate()?;
        Ok(config)
    }
}

pub struct Battlefield {
    world: World,
    grid: TileGrid,
    occupancy: Occupancy,
    time: SimTime,
    rng: ChaCha8Rng,
    config: SimConfig,
    pathing: Box<dyn PathPlanner>,
    visibility: Box<dyn Visibility>,
    line_of_sight: Box<dyn LineOfSight>,
    orders: VecDeque<Order>,
    projectiles: Vec<Projectile>,
    events: Vec<CombatEvent>,
    next_id: u32,
}

impl Battlefield {
    pub fn new(config: SimConfig, grid: TileGrid) -> Self {
        Self {
            world: World::new(),
            grid,
            occupancy: Occupancy::new(),
            time: SimTime::default(),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            config,
            pathing: Box::new(DirectPathPlanner),
            visibility: Box::new(FullVisibility),
            line_of_sight: Box::new(GridLineOfSight),
            orders: VecDeque::new(),
            projectiles: Vec::new(),
            events: Vec::new(),
            next_id: 1,
        }
    }

    pub fn with_path_planner(mut self, planner: impl PathPlanner + 'static) -> Self {
        self.pathing = Box::new(planner);
        self
    }

    pub fn with_visibility(mut self, visibility: impl Visibility + 'static) -> Self {
        self.visibility = Box::new(visibility);
        self
    }

    pub fn with_line_of_sight(mut self, line_of_sight: impl LineOfSight + 'static) -> Self {
        self.line_of_sight = Box::new(line_of_sight);
        self
    }

    fn allocate_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn spawn_unit(&mut self, kind: UnitKind, owner: u8, tile: TilePos) -> Entity {
        let id = self.allocate_id();
        world_setup::spawn_unit(&mut self.world, id, owner, kind, tile)
    }

    pub fn spawn_structure(&mut self, kind: StructureKind, owner: u8, origin: TilePos) -> Entity {
        let id = self.allocate_id();
        world_setup::spawn_structure(&mut self.world, id, owner, kind, origin)
    }

    /// Queue an order for the next tick boundary.
    pub fn queue_order(&mut self, order: Order) {
        self.orders.push_back(order);
    }

    pub fn queue_orders(&mut self, orders: impl IntoIterator<Item = Order>) {
        self.orders.extend(orders);
    }

    /// Advance by one tick of the default length.
    pub fn tick(&mut self) -> PassSummary {
        self.step(DT_MS)
    }

    /// Apply queued orders, run one combat pass at the current time, then
    /// advance the clock by `dt_ms`.
    pub fn step(&mut self, dt_ms: f64) -> PassSummary {
        let dt_ms = dt_ms.max(0.0);
        self.process_orders();
        self.rebuild_occupancy();

        let roster = Roster::build(&self.world);
        let mut ctx = CombatContext {
            time: self.time,
            dt_ms,
            tuning: &self.config.tuning,
            fog_of_war: self.config.fog_of_war,
            player_party: self.config.player_party,
            grid: &self.grid,
            occupancy: &self.occupancy,
            pathing: self.pathing.as_ref(),
            visibility: self.visibility.as_ref(),
            line_of_sight: self.line_of_sight.as_ref(),
            rng: &mut self.rng,
            projectiles: &mut self.projectiles,
            events: &mut self.events,
        };
        let summary = dispatcher::run(&mut self.world, &roster, &mut ctx);

        self.time.advance_by(dt_ms);
        summary
    }

    fn rebuild_occupancy(&mut self) {
        self.occupancy = self
            .world
            .query::<(&Unit, &TilePos, &Health)>()
            .iter()
            .filter(|(_, (unit, _, health))| !unit.airborne && health.is_alive())
            .map(|(_, (_, tile, _))| *tile)
            .collect();
    }

    /// Take every projectile emitted since the last drain.
    pub fn drain_projectiles(&mut self) -> Vec<Projectile> {
        std::mem::take(&mut self.projectiles)
    }

    /// Take every notification and sound emitted since the last drain.
    pub fn drain_events(&mut self) -> Vec<CombatEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn grid(&self) -> &TileGrid {
        &self.grid
    }

    pub fn grid_mut(&mut self) -> &mut TileGrid {
        &mut self.grid
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Copy of an entity's combat state.
    pub fn combatant(&self, entity: Entity) -> Option<Combatant> {
        self.world
            .get::<&Combatant>(entity)
            .ok()
            .map(|c| (*c).clone())
    }

    pub fn entity_by_id(&self, id: u32) -> Option<Entity> {
        self.world
            .query::<&Identity>()
            .iter()
            .find(|(_, ident)| ident.id == id)
            .map(|(entity, _)| entity)
    }

    /// Target reference of the matching variant for an entity.
    pub fn target_ref(&self, entity: Entity) -> Option<TargetRef> {
        if self.world.get::<&Structure>(entity).is_ok() {
            Some(TargetRef::Structure(entity))
        } else if self.world.get::<&Unit>(entity).is_ok() {
            Some(TargetRef::Unit(entity))
        } else {
            None
        }
    }

    fn live_target(&self, entity: Entity) -> Option<TargetRef> {
        let alive = self
            .world
            .get::<&Health>(entity)
            .is_ok_and(|h| h.is_alive());
        if alive {
            self.target_ref(entity)
        } else {
            None
        }
    }

    fn with_combatant(&mut self, entity: Entity, f: impl FnOnce(&mut Combatant)) -> bool {
        match self.world.get::<&mut Combatant>(entity) {
            Ok(mut c) => {
                f(&mut *c);
                true
            }
            Err(_) => false,
        }
    }

    /// Order `entity` to attack `target`, dropping its attack queue.
    pub fn order_attack(&mut self, entity: Entity, target: Entity) -> bool {
        let Some(target) = self.live_target(target) else {
            return false;
        };
        self.with_combatant(entity, |c| {
            c.targeting.target = Some(target);
            c.targeting.queue.clear();
        })
    }

    /// Append `target` to the attack queue of `entity`.
    pub fn queue_attack(&mut self, entity: Entity, target: Entity) -> bool {
        let Some(target) = self.live_target(target) else {
            return false;
        };
        self.with_combatant(entity, |c| c.targeting.queue.push_back(target))
    }

    pub fn set_guard(&mut self, entity: Entity, anchor: GuardAnchor) -> bool {
        self.with_combatant(entity, |c| {
            c.targeting.guard = Some(Guard {
                anchor,
                acquired: None,
            });
        })
    }

    pub fn set_alert_mode(&mut self, entity: Entity, enabled: bool) -> bool {
        let Some(at) = self.world.get::<&Position>(entity).ok().map(|p| *p) else {
            return false;
        };
        self.with_combatant(entity, |c| c.set_alert_mode(enabled, at))
    }

    /// Stun for `duration_ms` from the current time.
    pub fn apply_stun(&mut self, entity: Entity, duration_ms: f64) -> bool {
        let now = self.time.now_ms;
        self.with_combatant(entity, |c| targeting::apply_stun(c, now, duration_ms))
    }

    /// Add ammunition up to capacity.
    pub fn resupply(&mut self, entity: Entity, rounds: u32) -> bool {
        self.with_combatant(entity, |c| c.ammo.refill(rounds))
    }

    /// Movement layer hook: the gunship touched down on its pad.
    pub fn finish_landing(&mut self, entity: Entity) -> bool {
        let Ok(mut unit) = self.world.get::<&mut Unit>(entity) else {
            return false;
        };
        unit.airborne = false;
        drop(unit);
        self.with_combatant(entity, |c| {
            if let Some(flight) = &mut c.flight {
                flight.plan = None;
            }
        })
    }

    pub fn take_off(&mut self, entity: Entity) -> bool {
        match self.world.get::<&mut Unit>(entity) {
            Ok(mut unit) => {
                unit.airborne = true;
                true
            }
            Err(_) => false,
        }
    }

    /// Movement layer hook: place a unit at `position`.
    pub fn move_unit(&mut self, entity: Entity, position: Position) -> bool {
        match self.world.query_one_mut::<(&mut Position, &mut TilePos)>(entity) {
            Ok((pos, tile)) => {
                *pos = position;
                *tile = position.to_tile();
                true
            }
            Err(_) => false,
        }
    }

    /// Projectile resolver hook.
    pub fn set_health(&mut self, entity: Entity, current: f64) -> bool {
        match self.world.get::<&mut Health>(entity) {
            Ok(mut health) => {
                health.current = current.min(health.max);
                true
            }
            Err(_) => false,
        }
    }

    fn process_orders(&mut self) {
        while let Some(order) = self.orders.pop_front() {
            if !self.apply_order(&order) {
                debug!(?order, "order dropped");
            }
        }
    }

    fn apply_order(&mut self, order: &Order) -> bool {
        let Some(unit) = self.entity_by_id(order.unit()) else {
            return false;
        };
        match *order {
            Order::Attack { target, .. } => self
                .entity_by_id(target)
                .is_some_and(|t| self.order_attack(unit, t)),
            Order::QueueAttack { target, .. } => self
                .entity_by_id(target)
                .is_some_and(|t| self.queue_attack(unit, t)),
            Order::GuardPosition { x, y, .. } => {
                self.set_guard(unit, GuardAnchor::Position(Position::new(x, y)))
            }
            Order::GuardTarget { target, .. } => {
                match self.entity_by_id(target).and_then(|t| self.live_target(t)) {
                    Some(t) => self.set_guard(unit, GuardAnchor::Target(t)),
                    None => false,
                }
            }
            Order::SetAlert { enabled, .. } => self.set_alert_mode(unit, enabled),
            Order::Stop { .. } => {
                let now = self.time.now_ms;
                self.with_combatant(unit, |c| stop(c, now))
            }
            Order::Stun { duration_ms, .. } => self.apply_stun(unit, duration_ms),
            Order::Resupply { rounds, .. } => self.resupply(unit, rounds),
            Order::SetCrew { role, present, .. } => {
                self.with_combatant(unit, |c| c.crew.present.set(role, present))
            }
        }
    }
}

/// Clear targets, running sequences and any pending resume target.
/// Structures keep guarding.
fn stop(c: &mut Combatant, now_ms: f64) {
    c.targeting.target = None;
    c.targeting.queue.clear();
    c.targeting.alert_mode = false;
    if c.is_structure() {
        if let Some(guard) = &mut c.targeting.guard {
            guard.acquired = None;
        }
    } else {
        c.targeting.guard = None;
    }
    if let Some(EngagementTask::LandingReturn(ret)) = &mut c.task {
        // Keep flying home, but do not come back for the old target.
        ret.resume_target = None;
    } else if c.task.is_some() {
        c.task = None;
        c.stamp_cooldown(now_ms);
    }
    c.motion.halt();
}
