//! Firing factory: gate checks, projectile construction, burst and volley
//! sequencing.
//!
//! Every gate failure is silent. The caller gets a [`ShotOutcome`] and tries
//! again on a later tick.

use glam::DVec2;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use skirmish_core::constants::*;
use skirmish_core::enums::{Kinematics, PodSide, ProjectileKind, UnitKind};
use skirmish_core::projectile::{ArcParams, Projectile};
use skirmish_core::types::Position;
use skirmish_terrain::TileGrid;

use crate::components::{
    BurstState, Combatant, CombatantKind, EngagementTask, TargetRef, VolleyState,
};
use crate::context::CombatContext;
use crate::helpers;
use crate::roster::{Roster, RosterEntry};

/// How a shot relates to the weapon cooldown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cadence {
    /// Gated by the cooldown and stamps it.
    Single,
    /// First shot of a burst or volley: gated by the cooldown, which is
    /// stamped when the sequence ends.
    SequenceOpen,
    /// Later shot of a running sequence, paced by the sequence delay.
    SequenceFollow,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShotRequest {
    pub target: TargetRef,
    pub cadence: Cadence,
    /// Explicit impact point (volley rockets); skips lead and spread.
    pub aim_override: Option<Position>,
    pub pod: Option<PodSide>,
}

impl ShotRequest {
    pub fn single(target: TargetRef) -> Self {
        Self {
            target,
            cadence: Cadence::Single,
            aim_override: None,
            pod: None,
        }
    }

    pub fn in_sequence(target: TargetRef, cadence: Cadence) -> Self {
        Self {
            cadence,
            ..Self::single(target)
        }
    }
}

/// Which gate stopped a shot, in check order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Blocked {
    InvalidTarget,
    Stunned,
    MissingCrew,
    NoAmmo,
    Cooldown,
    NotAimed,
    NoClearShot,
    AirborneTarget,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShotOutcome {
    Fired,
    Blocked(Blocked),
}

impl ShotOutcome {
    pub fn fired(&self) -> bool {
        matches!(self, ShotOutcome::Fired)
    }
}

/// Progress of a running burst or volley.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceStatus {
    /// No sequence of this type is running.
    Idle,
    Waiting,
    Fired,
    Finished,
    Abandoned,
}

/// Speed (px/ms) and kinematics for a projectile kind launched by a shooter.
pub fn flight_profile(kind: ProjectileKind, shooter: CombatantKind) -> (f64, Kinematics) {
    match kind {
        ProjectileKind::Bullet => (0.9, Kinematics::Straight),
        ProjectileKind::Shell => (0.6, Kinematics::Straight),
        ProjectileKind::Rocket => match shooter {
            CombatantKind::Unit(UnitKind::Gunship) => (0.5, Kinematics::Straight),
            _ => (0.35, Kinematics::BallisticArc),
        },
        ProjectileKind::HomingMissile => (0.45, Kinematics::Homing),
        ProjectileKind::Artillery => (0.25, Kinematics::BallisticArc),
        ProjectileKind::Beam => (0.0, Kinematics::StationaryBeam),
    }
}

fn sound_cue(kind: ProjectileKind) -> (&'static str, f64, bool) {
    match kind {
        ProjectileKind::Bullet => ("gun", 0.6, true),
        ProjectileKind::Shell => ("cannon", 0.8, true),
        ProjectileKind::Rocket => ("rocket", 0.8, true),
        ProjectileKind::HomingMissile => ("missile", 0.9, false),
        ProjectileKind::Artillery => ("artillery", 1.0, false),
        ProjectileKind::Beam => ("beam", 0.9, false),
    }
}

fn max_flight(flight_ms: f64) -> f64 {
    flight_ms * MAX_FLIGHT_FACTOR + MAX_FLIGHT_PAD_MS
}

/// Arc parameters and safety cutoff stamped at launch.
fn flight_bounds(
    kind: ProjectileKind,
    kinematics: Kinematics,
    distance: f64,
    speed: f64,
) -> (Option<ArcParams>, Option<f64>) {
    let flight_ms = if speed > 0.0 { distance / speed } else { 0.0 };
    match (kind, kinematics) {
        (_, Kinematics::BallisticArc) => (
            Some(ArcParams {
                apex_height: distance * ARC_HEIGHT_RATIO,
                flight_ms,
            }),
            Some(max_flight(flight_ms)),
        ),
        (_, Kinematics::Homing) => (
            Some(ArcParams {
                apex_height: 0.0,
                flight_ms,
            }),
            Some(HOMING_MAX_FLIGHT_MS),
        ),
        (ProjectileKind::Rocket, _) => (
            Some(ArcParams {
                apex_height: 0.0,
                flight_ms,
            }),
            Some(max_flight(flight_ms)),
        ),
        _ => (None, None),
    }
}

/// Emit the out-of-ammunition notice once per empty state.
pub fn note_out_of_ammo(c: &mut Combatant, shooter: &RosterEntry, ctx: &mut CombatContext<'_>) {
    if c.ammo.empty_notified {
        return;
    }
    c.ammo.empty_notified = true;
    debug!(id = shooter.id, "out of ammunition");
    let duration = ctx.tuning.ammo_notice_ms;
    ctx.notify(shooter.owner, "Out of ammunition", duration);
}

/// Run the gates and, if they all pass, emit one projectile.
pub fn fire(
    c: &mut Combatant,
    shooter: &RosterEntry,
    roster: &Roster,
    request: ShotRequest,
    ctx: &mut CombatContext<'_>,
) -> ShotOutcome {
    let now = ctx.now();
    let Some(target) = roster.resolve(request.target) else {
        return ShotOutcome::Blocked(Blocked::InvalidTarget);
    };

    if c.status.is_stunned(now) {
        return ShotOutcome::Blocked(Blocked::Stunned);
    }
    if !c.crew.is_manned() {
        return ShotOutcome::Blocked(Blocked::MissingCrew);
    }
    if !c.ammo.can_fire() {
        note_out_of_ammo(c, shooter, ctx);
        return ShotOutcome::Blocked(Blocked::NoAmmo);
    }
    if request.cadence != Cadence::SequenceFollow && !helpers::cooldown_elapsed(c, now) {
        return ShotOutcome::Blocked(Blocked::Cooldown);
    }
    let bearing = shooter.center.bearing_to(&target.center);
    if !helpers::is_aimed(c, bearing) {
        return ShotOutcome::Blocked(Blocked::NotAimed);
    }
    if !helpers::enforce_line_of_sight(c, shooter, &target.center, ctx) {
        return ShotOutcome::Blocked(Blocked::NoClearShot);
    }
    if target.is_airborne() && !c.weapon.stats.anti_air {
        return ShotOutcome::Blocked(Blocked::AirborneTarget);
    }

    let kind = c.weapon.stats.projectile;
    let (speed, kinematics) = flight_profile(kind, c.kind);
    let origin = shooter.center;
    let target_point = match request.aim_override {
        Some(point) => point,
        None => {
            let aim = match kinematics {
                Kinematics::Homing | Kinematics::StationaryBeam => target.center,
                _ => helpers::lead_point(c, &origin, target.center, speed),
            };
            helpers::apply_spread(&origin, &aim, helpers::spread_limit(c, kind), ctx.rng)
        }
    };
    let (arc, max_flight_ms) =
        flight_bounds(kind, kinematics, origin.distance_to(&target_point), speed);

    c.ammo.rounds = c.ammo.rounds.saturating_sub(c.ammo.per_shot);
    c.weapon.last_shot_anim_ms = Some(now);
    if request.cadence == Cadence::Single {
        c.stamp_cooldown(now);
    }

    ctx.projectiles.push(Projectile {
        kind,
        kinematics,
        origin,
        target_point,
        homing_target: (kinematics == Kinematics::Homing).then_some(target.id),
        speed,
        damage: c.weapon.stats.damage,
        created_ms: now,
        shooter_id: shooter.id,
        shooter_owner: shooter.owner,
        arc,
        max_flight_ms,
        pod: request.pod,
    });

    let (name, volume, stackable) = sound_cue(kind);
    ctx.play_sound(name, &origin, volume, stackable);
    ShotOutcome::Fired
}

/// Fire the first shot of an N-shot burst and arm the rest.
pub fn start_burst(
    c: &mut Combatant,
    shooter: &RosterEntry,
    roster: &Roster,
    target: TargetRef,
    shots: u32,
    delay_ms: f64,
    ctx: &mut CombatContext<'_>,
) -> ShotOutcome {
    let outcome = fire(
        c,
        shooter,
        roster,
        ShotRequest::in_sequence(target, Cadence::SequenceOpen),
        ctx,
    );
    if outcome.fired() {
        let now = ctx.now();
        if shots > 1 {
            c.task = Some(EngagementTask::Burst(BurstState {
                target,
                remaining: shots - 1,
                delay_ms,
                last_shot_ms: now,
            }));
            debug!(id = shooter.id, shots, "burst started");
        } else {
            c.stamp_cooldown(now);
        }
    }
    outcome
}

/// Fire the next burst shot once the inter-shot delay has elapsed. The
/// burst is abandoned when its target dies or leaves range.
pub fn advance_burst(
    c: &mut Combatant,
    shooter: &RosterEntry,
    roster: &Roster,
    ctx: &mut CombatContext<'_>,
) -> SequenceStatus {
    let Some(EngagementTask::Burst(burst)) = c.task else {
        return SequenceStatus::Idle;
    };
    let now = ctx.now();
    let range = helpers::effective_range(c);
    let valid = roster
        .resolve(burst.target)
        .is_some_and(|t| shooter.center.distance_to(&t.center) <= range);
    if !valid {
        c.task = None;
        c.stamp_cooldown(now);
        debug!(id = shooter.id, left = burst.remaining, "burst abandoned");
        return SequenceStatus::Abandoned;
    }
    if now - burst.last_shot_ms < burst.delay_ms {
        return SequenceStatus::Waiting;
    }

    let request = ShotRequest::in_sequence(burst.target, Cadence::SequenceFollow);
    match fire(c, shooter, roster, request, ctx) {
        ShotOutcome::Fired => {
            let remaining = burst.remaining.saturating_sub(1);
            if remaining == 0 {
                c.task = None;
                c.stamp_cooldown(now);
                debug!(id = shooter.id, "burst complete");
                SequenceStatus::Finished
            } else {
                c.task = Some(EngagementTask::Burst(BurstState {
                    remaining,
                    last_shot_ms: now,
                    ..burst
                }));
                SequenceStatus::Fired
            }
        }
        ShotOutcome::Blocked(Blocked::NoAmmo) => {
            c.task = None;
            c.stamp_cooldown(now);
            SequenceStatus::Abandoned
        }
        ShotOutcome::Blocked(_) => SequenceStatus::Waiting,
    }
}

/// Impact point around `center`, pulled back along the approach vector with
/// bounded jitter, clamped to the map.
pub fn volley_impact_point(
    shooter: &Position,
    center: &Position,
    grid: &TileGrid,
    rng: &mut ChaCha8Rng,
) -> Position {
    let dir = (center.to_vec() - shooter.to_vec())
        .try_normalize()
        .unwrap_or(DVec2::X);
    let forward =
        -VOLLEY_FORWARD_OFFSET + rng.gen_range(-VOLLEY_FORWARD_JITTER..=VOLLEY_FORWARD_JITTER);
    let lateral = rng.gen_range(-VOLLEY_LATERAL_JITTER..=VOLLEY_LATERAL_JITTER);
    let point = center.to_vec() + dir * forward + dir.perp() * lateral;
    grid.clamp_position(Position::from_vec(point))
}

fn mark_ammo_empty(c: &mut Combatant, shooter: &RosterEntry, ctx: &mut CombatContext<'_>) {
    if let Some(flight) = &mut c.flight {
        flight.ammo_empty = true;
    }
    note_out_of_ammo(c, shooter, ctx);
}

fn fire_volley_shot(
    c: &mut Combatant,
    shooter: &RosterEntry,
    roster: &Roster,
    cadence: Cadence,
    ctx: &mut CombatContext<'_>,
) -> ShotOutcome {
    let Some(EngagementTask::Volley(mut volley)) = c.task else {
        return ShotOutcome::Blocked(Blocked::InvalidTarget);
    };
    let side = if volley.remaining_on(volley.next_side) > 0 {
        volley.next_side
    } else {
        volley.next_side.other()
    };
    let impact = volley_impact_point(&shooter.center, &volley.frozen_center, ctx.grid, ctx.rng);
    let request = ShotRequest {
        target: volley.target,
        cadence,
        aim_override: Some(impact),
        pod: Some(side),
    };

    let now = ctx.now();
    let outcome = fire(c, shooter, roster, request, ctx);
    match outcome {
        ShotOutcome::Fired => {
            match side {
                PodSide::Left => volley.left_remaining = volley.left_remaining.saturating_sub(1),
                PodSide::Right => volley.right_remaining = volley.right_remaining.saturating_sub(1),
            }
            volley.next_side = side.other();
            volley.last_shot_ms = now;

            if !c.ammo.can_fire() {
                c.task = None;
                c.stamp_cooldown(now);
                mark_ammo_empty(c, shooter, ctx);
                debug!(id = shooter.id, "volley ended: rockets exhausted");
            } else if volley.remaining() == 0 {
                c.task = None;
                c.stamp_cooldown(now);
                debug!(id = shooter.id, "volley complete");
            } else {
                c.task = Some(EngagementTask::Volley(volley));
            }
        }
        ShotOutcome::Blocked(Blocked::NoAmmo) => {
            c.task = None;
            c.stamp_cooldown(now);
            mark_ammo_empty(c, shooter, ctx);
        }
        ShotOutcome::Blocked(_) => {}
    }
    outcome
}

/// Start a gunship volley against `target`: min(ammo, VOLLEY_MAX_ROCKETS)
/// rockets split across both pods, left pod first.
pub fn start_volley(
    c: &mut Combatant,
    shooter: &RosterEntry,
    roster: &Roster,
    target: TargetRef,
    ctx: &mut CombatContext<'_>,
) -> ShotOutcome {
    let Some(entry) = roster.resolve(target) else {
        return ShotOutcome::Blocked(Blocked::InvalidTarget);
    };
    let total = c.ammo.affordable_shots().min(VOLLEY_MAX_ROCKETS);
    if total == 0 {
        mark_ammo_empty(c, shooter, ctx);
        return ShotOutcome::Blocked(Blocked::NoAmmo);
    }

    let previous = c.task.take();
    c.task = Some(EngagementTask::Volley(VolleyState {
        target,
        frozen_center: entry.center,
        left_remaining: total.div_ceil(2),
        right_remaining: total / 2,
        next_side: PodSide::Left,
        delay_ms: VOLLEY_SHOT_DELAY_MS,
        last_shot_ms: ctx.now(),
    }));

    let outcome = fire_volley_shot(c, shooter, roster, Cadence::SequenceOpen, ctx);
    match outcome {
        ShotOutcome::Fired => debug!(id = shooter.id, rockets = total, "volley started"),
        // Gates closed on the opening shot: no volley.
        ShotOutcome::Blocked(Blocked::NoAmmo) => {}
        ShotOutcome::Blocked(_) => c.task = previous,
    }
    outcome
}

/// Fire the next volley rocket. Waits while the target is out of range;
/// the volley is dropped when its target dies.
pub fn advance_volley(
    c: &mut Combatant,
    shooter: &RosterEntry,
    roster: &Roster,
    ctx: &mut CombatContext<'_>,
) -> SequenceStatus {
    let Some(EngagementTask::Volley(volley)) = c.task else {
        return SequenceStatus::Idle;
    };
    let now = ctx.now();
    let Some(entry) = roster.resolve(volley.target) else {
        c.task = None;
        c.stamp_cooldown(now);
        debug!(id = shooter.id, "volley target lost");
        return SequenceStatus::Abandoned;
    };
    if shooter.center.distance_to(&entry.center) > helpers::effective_range(c) {
        return SequenceStatus::Waiting;
    }
    if now - volley.last_shot_ms < volley.delay_ms {
        return SequenceStatus::Waiting;
    }

    match fire_volley_shot(c, shooter, roster, Cadence::SequenceFollow, ctx) {
        ShotOutcome::Fired if c.task.is_none() => SequenceStatus::Finished,
        ShotOutcome::Fired => SequenceStatus::Fired,
        ShotOutcome::Blocked(_) if c.task.is_none() => SequenceStatus::Abandoned,
        ShotOutcome::Blocked(_) => SequenceStatus::Waiting,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use skirmish_core::config::CombatTuning;
    use skirmish_core::events::CombatEvent;
    use skirmish_core::stats::{structure_stats, unit_stats};
    use skirmish_core::types::{SimTime, TilePos};
    use skirmish_terrain::Occupancy;

    use crate::components::Health;
    use crate::context::{DirectPathPlanner, FullVisibility, GridLineOfSight};
    use crate::roster::EntryKind;

    struct Harness {
        grid: TileGrid,
        occupancy: Occupancy,
        tuning: CombatTuning,
        rng: ChaCha8Rng,
        projectiles: Vec<Projectile>,
        events: Vec<CombatEvent>,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                grid: TileGrid::new(40, 40),
                occupancy: Occupancy::new(),
                tuning: CombatTuning::default(),
                rng: ChaCha8Rng::seed_from_u64(1),
                projectiles: Vec::new(),
                events: Vec::new(),
            }
        }

        fn ctx(&mut self, now_ms: f64) -> CombatContext<'_> {
            CombatContext {
                time: SimTime::at(0, now_ms),
                dt_ms: DT_MS,
                tuning: &self.tuning,
                fog_of_war: false,
                player_party: 0,
                grid: &self.grid,
                occupancy: &self.occupancy,
                pathing: &DirectPathPlanner,
                visibility: &FullVisibility,
                line_of_sight: &GridLineOfSight,
                rng: &mut self.rng,
                projectiles: &mut self.projectiles,
                events: &mut self.events,
            }
        }
    }

    fn unit_entry(
        world: &mut hecs::World,
        id: u32,
        owner: u8,
        kind: UnitKind,
        tile: TilePos,
    ) -> RosterEntry {
        RosterEntry {
            entity: world.spawn(()),
            id,
            owner,
            center: Position::from_tile(tile),
            tile,
            health: Health::full(100.0),
            kind: EntryKind::Unit {
                kind,
                airborne: kind == UnitKind::Gunship,
            },
        }
    }

    fn armed(kind: UnitKind) -> Combatant {
        let stats = unit_stats(kind);
        let weapon = stats.weapon.unwrap();
        Combatant::new(CombatantKind::Unit(kind), weapon, stats.required_crew, stats.speed)
    }

    #[test]
    fn test_flight_profiles() {
        let gunship = CombatantKind::Unit(UnitKind::Gunship);
        let rocket_tank = CombatantKind::Unit(UnitKind::RocketTank);
        assert_eq!(flight_profile(ProjectileKind::Rocket, gunship).1, Kinematics::Straight);
        assert_eq!(
            flight_profile(ProjectileKind::Rocket, rocket_tank).1,
            Kinematics::BallisticArc
        );
        assert_eq!(
            flight_profile(ProjectileKind::Beam, rocket_tank).1,
            Kinematics::StationaryBeam
        );
    }

    #[test]
    fn test_stun_checked_before_ammo() {
        let mut world = hecs::World::new();
        let me = unit_entry(&mut world, 1, 0, UnitKind::Tank, TilePos::new(2, 2));
        let foe = unit_entry(&mut world, 2, 1, UnitKind::Tank, TilePos::new(6, 2));
        let roster = Roster::from_entries(vec![me, foe]);
        let mut h = Harness::new();
        let mut tank = armed(UnitKind::Tank);
        tank.ammo.rounds = 0;
        tank.status.stunned_until_ms = Some(500.0);

        let request = ShotRequest::single(foe.target_ref());

        let outcome = fire(&mut tank, &me, &roster, request, &mut h.ctx(0.0));
        assert_eq!(outcome, ShotOutcome::Blocked(Blocked::Stunned));
        assert!(h.events.is_empty());
    }

    #[test]
    fn test_empty_notice_once_and_player_only() {
        let mut world = hecs::World::new();
        let me = unit_entry(&mut world, 1, 0, UnitKind::Tank, TilePos::new(2, 2));
        let foe = unit_entry(&mut world, 2, 1, UnitKind::Tank, TilePos::new(6, 2));
        let roster = Roster::from_entries(vec![me, foe]);
        let mut h = Harness::new();
        let mut tank = armed(UnitKind::Tank);
        tank.ammo.rounds = 0;

        for t in 0..3 {
            let outcome = fire(
                &mut tank,
                &me,
                &roster,
                ShotRequest::single(foe.target_ref()),
                &mut h.ctx(t as f64 * 100.0),
            );
            assert_eq!(outcome, ShotOutcome::Blocked(Blocked::NoAmmo));
        }
        assert_eq!(h.events.iter().filter(|e| e.is_notification()).count(), 1);
        assert!(h.projectiles.is_empty());

        // Enemy-owned shooters run dry silently.
        let mut enemy = armed(UnitKind::Tank);
        enemy.ammo.rounds = 0;
        h.events.clear();
        fire(&mut enemy, &foe, &roster, ShotRequest::single(me.target_ref()), &mut h.ctx(0.0));
        assert!(h.events.is_empty());
        assert!(enemy.ammo.empty_notified);
    }

    #[test]
    fn test_airborne_needs_anti_air() {
        let mut world = hecs::World::new();
        let me = unit_entry(&mut world, 1, 0, UnitKind::Tank, TilePos::new(2, 2));
        let heli = unit_entry(&mut world, 2, 1, UnitKind::Gunship, TilePos::new(6, 2));
        let roster = Roster::from_entries(vec![me, heli]);
        let mut h = Harness::new();

        let mut tank = armed(UnitKind::Tank);
        let request = ShotRequest::single(heli.target_ref());
        let outcome = fire(&mut tank, &me, &roster, request, &mut h.ctx(0.0));
        assert_eq!(outcome, ShotOutcome::Blocked(Blocked::AirborneTarget));
        assert_eq!(tank.ammo.rounds, tank.ammo.capacity);

        let mut flak = armed(UnitKind::BurstTank);
        let request = ShotRequest::single(heli.target_ref());
        let outcome = fire(&mut flak, &me, &roster, request, &mut h.ctx(0.0));
        assert!(outcome.fired());
    }

    #[test]
    fn test_artillery_carries_flight_bounds() {
        let mut world = hecs::World::new();
        let me = unit_entry(&mut world, 1, 0, UnitKind::Howitzer, TilePos::new(2, 2));
        let foe = unit_entry(&mut world, 2, 1, UnitKind::Tank, TilePos::new(12, 2));
        let roster = Roster::from_entries(vec![me, foe]);
        let mut h = Harness::new();
        let mut howitzer = armed(UnitKind::Howitzer);

        let request = ShotRequest::single(foe.target_ref());

        let outcome = fire(&mut howitzer, &me, &roster, request, &mut h.ctx(250.0));
        assert!(outcome.fired());
        assert_eq!(howitzer.weapon.last_fire_ms, Some(250.0));
        assert_eq!(howitzer.ammo.rounds, howitzer.ammo.capacity - 1);

        let p = &h.projectiles[0];
        assert_eq!(p.kinematics, Kinematics::BallisticArc);
        let arc = p.arc.unwrap();
        let expected_flight = p.origin.distance_to(&p.target_point) / p.speed;
        assert!((arc.flight_ms - expected_flight).abs() < 1e-9);
        assert_eq!(p.max_flight_ms, Some(expected_flight * MAX_FLIGHT_FACTOR + MAX_FLIGHT_PAD_MS));
        assert_eq!(p.shooter_id, 1);
        assert_eq!(p.created_ms, 250.0);
    }

    #[test]
    fn test_homing_missile_has_no_spread() {
        let mut world = hecs::World::new();
        let site = world.spawn(());
        let me = RosterEntry {
            entity: site,
            id: 1,
            owner: 0,
            center: Position::from_tile(TilePos::new(2, 2)),
            tile: TilePos::new(2, 2),
            health: Health::full(500.0),
            kind: EntryKind::Structure {
                kind: skirmish_core::enums::StructureKind::RocketTurret,
                footprint: skirmish_core::types::TileRect::new(2, 2, 1, 1),
            },
        };
        let heli = unit_entry(&mut world, 2, 1, UnitKind::Gunship, TilePos::new(7, 2));
        let roster = Roster::from_entries(vec![me, heli]);
        let mut h = Harness::new();

        let stats = structure_stats(skirmish_core::enums::StructureKind::RocketTurret);
        let mut turret = Combatant::new(
            CombatantKind::Structure(skirmish_core::enums::StructureKind::RocketTurret),
            stats.weapon.unwrap(),
            skirmish_core::stats::CrewRoles::NONE,
            0.0,
        );
        let request = ShotRequest::single(heli.target_ref());
        let outcome = fire(&mut turret, &me, &roster, request, &mut h.ctx(0.0));
        assert!(outcome.fired());
        let p = &h.projectiles[0];
        assert_eq!(p.kinematics, Kinematics::Homing);
        assert_eq!(p.homing_target, Some(2));
        assert_eq!(p.target_point, heli.center);
        assert_eq!(p.max_flight_ms, Some(HOMING_MAX_FLIGHT_MS));
    }

    #[test]
    fn test_volley_impact_stays_on_map() {
        let grid = TileGrid::new(4, 4);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let (w, hgt) = grid.world_size();
        for _ in 0..50 {
            let shooter = Position::new(100.0, 100.0);
            let p = volley_impact_point(&shooter, &Position::new(0.0, 0.0), &grid, &mut rng);
            assert!(p.x >= 0.0 && p.x <= w && p.y >= 0.0 && p.y <= hgt);
        }
        let center = Position::new(64.0, 64.0);
        let p = volley_impact_point(&Position::new(0.0, 64.0), &center, &grid, &mut rng);
        let max = VOLLEY_FORWARD_OFFSET + VOLLEY_FORWARD_JITTER + VOLLEY_LATERAL_JITTER;
        assert!(center.distance_to(&p) <= max);
    }
}
