//! Engagement helpers shared by every strategy: range and cooldown
//! modifiers, aiming, line of sight, spread, lead and the chase decision.

use glam::DVec2;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use skirmish_core::config::CombatTuning;
use skirmish_core::constants::*;
use skirmish_core::enums::{ProjectileKind, UnitKind};
use skirmish_core::types::{angle_diff, rotate_toward, Position, TilePos};

use crate::components::{Combatant, Observation};
use crate::context::CombatContext;
use crate::roster::RosterEntry;

fn level_index(level: u8) -> usize {
    level.min(MAX_LEVEL) as usize
}

/// Table range in pixels, without modifiers.
pub fn base_range(c: &Combatant) -> f64 {
    c.weapon.stats.range_tiles * TILE_SIZE
}

pub fn min_range(c: &Combatant) -> f64 {
    c.weapon.stats.min_range_tiles * TILE_SIZE
}

/// Range in pixels after the rotary-wing and veteran modifiers.
pub fn effective_range(c: &Combatant) -> f64 {
    let type_factor = match c.unit_kind() {
        Some(UnitKind::Gunship) => ROTARY_RANGE_FACTOR,
        _ => 1.0,
    };
    base_range(c) * type_factor * LEVEL_RANGE_BONUS[level_index(c.level)]
}

pub fn effective_cooldown(c: &Combatant) -> f64 {
    c.weapon.stats.cooldown_ms * LEVEL_COOLDOWN_FACTOR[level_index(c.level)]
}

pub fn cooldown_elapsed(c: &Combatant, now_ms: f64) -> bool {
    c.weapon
        .last_fire_ms
        .map_or(true, |last| now_ms - last >= effective_cooldown(c))
}

/// Rocket tanks, howitzers and gunships aim with the hull.
pub fn aims_with_body(c: &Combatant) -> bool {
    !c.weapon.stats.has_turret
        || matches!(
            c.unit_kind(),
            Some(UnitKind::RocketTank | UnitKind::Howitzer | UnitKind::Gunship)
        )
}

pub fn aim_facing(c: &Combatant) -> f64 {
    if aims_with_body(c) {
        c.facing.body
    } else {
        c.facing.turret
    }
}

pub fn aim_threshold(c: &Combatant) -> f64 {
    let threshold = c.weapon.stats.aim_threshold;
    if c.precision {
        threshold * PRECISION_AIM_FACTOR
    } else {
        threshold
    }
}

pub fn is_aimed(c: &Combatant, bearing: f64) -> bool {
    angle_diff(aim_facing(c), bearing).abs() <= aim_threshold(c)
}

/// Traverse the aiming part (turret or hull) toward `bearing`.
pub fn slew_toward(c: &mut Combatant, bearing: f64, dt_ms: f64) {
    let step = c.weapon.stats.traverse_rate * dt_ms.max(0.0);
    if aims_with_body(c) {
        c.facing.body = rotate_toward(c.facing.body, bearing, step);
    } else {
        c.facing.turret = rotate_toward(c.facing.turret, bearing, step);
    }
}

/// Check for a clear shot and raise or clear `seeking_clear_shot`.
/// Airborne shooters always have a clear shot.
pub fn enforce_line_of_sight(
    c: &mut Combatant,
    shooter: &RosterEntry,
    target: &Position,
    ctx: &CombatContext<'_>,
) -> bool {
    let clear = shooter.is_airborne() || ctx.clear_shot(&shooter.center, target);
    c.targeting.seeking_clear_shot = !clear;
    clear
}

/// Maximum angular spread for this combatant and projectile.
pub fn spread_limit(c: &Combatant, kind: ProjectileKind) -> f64 {
    match kind {
        ProjectileKind::HomingMissile | ProjectileKind::Beam => 0.0,
        _ => {
            let spread = SPREAD_BY_LEVEL[level_index(c.level)];
            if c.precision {
                spread * PRECISION_SPREAD_FACTOR
            } else {
                spread
            }
        }
    }
}

/// Rotate `aim` about `origin` by a uniform angle in `[-max_angle, max_angle]`.
pub fn apply_spread(
    origin: &Position,
    aim: &Position,
    max_angle: f64,
    rng: &mut ChaCha8Rng,
) -> Position {
    if max_angle <= 0.0 {
        return *aim;
    }
    let angle = rng.gen_range(-max_angle..=max_angle);
    let offset = aim.to_vec() - origin.to_vec();
    Position::from_vec(origin.to_vec() + DVec2::from_angle(angle).rotate(offset))
}

/// Velocity-damped lead point from the last two sightings.
pub fn predict_lead(
    shooter: &Position,
    previous: &Observation,
    last: &Observation,
    projectile_speed: f64,
) -> Position {
    let dt = last.at_ms - previous.at_ms;
    if dt <= 0.0 || projectile_speed <= 0.0 {
        return last.position;
    }
    let velocity = (last.position.to_vec() - previous.position.to_vec()) / dt;
    let lead_time = shooter.distance_to(&last.position) / projectile_speed;
    let damping = 1.0 / (1.0 + velocity.length() * LEAD_DAMPING);
    let lead = (velocity * lead_time * damping).clamp_length_max(MAX_LEAD_TILES * TILE_SIZE);
    Position::from_vec(last.position.to_vec() + lead)
}

/// Lead point for the combatant's current sightings, or `fallback` without
/// enough history.
pub fn lead_point(
    c: &Combatant,
    shooter: &Position,
    fallback: Position,
    projectile_speed: f64,
) -> Position {
    match (c.targeting.previous_seen, c.targeting.last_seen) {
        (Some(prev), Some(last)) if prev.target == last.target => {
            predict_lead(shooter, &prev, &last, projectile_speed)
        }
        _ => fallback,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovementDecision {
    /// In range: stop and drop the route.
    Halt,
    /// Ask the planner for a new route.
    RequestPath,
    /// Keep the current route (or lack of one) for now.
    Hold,
}

pub fn movement_decision(
    c: &Combatant,
    distance: f64,
    target_center: &Position,
    now_ms: f64,
    tuning: &CombatTuning,
) -> MovementDecision {
    if distance <= effective_range(c) {
        return MovementDecision::Halt;
    }
    let cooled = c
        .motion
        .last_path_request_ms
        .map_or(true, |last| now_ms - last >= tuning.path_request_cooldown_ms);
    if !cooled {
        return MovementDecision::Hold;
    }
    let drifted = c.motion.last_path_goal.map_or(true, |goal| {
        goal.distance_to(target_center) > tuning.chase_multiplier * base_range(c)
    });
    if c.motion.path.is_empty() || drifted {
        MovementDecision::RequestPath
    } else {
        MovementDecision::Hold
    }
}

/// Request a route. The request time is stamped either way; an unusable
/// result leaves the previous route in place.
pub fn request_path(
    c: &mut Combatant,
    origin: TilePos,
    destination: TilePos,
    goal: Position,
    ctx: &CombatContext<'_>,
) -> bool {
    c.motion.last_path_request_ms = Some(ctx.now());
    let path = ctx
        .pathing
        .compute_path(origin, destination, ctx.grid, ctx.occupancy);
    if path.len() < 2 {
        return false;
    }
    c.motion.path = path;
    c.motion.moving = true;
    c.motion.last_path_goal = Some(goal);
    true
}

/// Chase or halt against `target`.
pub fn pursue(
    c: &mut Combatant,
    shooter: &RosterEntry,
    target: &RosterEntry,
    ctx: &CombatContext<'_>,
) -> MovementDecision {
    let distance = shooter.center.distance_to(&target.center);
    let decision = movement_decision(c, distance, &target.center, ctx.now(), ctx.tuning);
    match decision {
        MovementDecision::Halt => c.motion.halt(),
        MovementDecision::RequestPath => {
            request_path(c, shooter.tile, target.tile, target.center, ctx);
        }
        MovementDecision::Hold => {}
    }
    decision
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use skirmish_core::stats::unit_stats;

    use crate::components::{CombatantKind, TargetRef};

    fn combatant(kind: UnitKind) -> Combatant {
        let stats = unit_stats(kind);
        let weapon = stats.weapon.unwrap();
        Combatant::new(CombatantKind::Unit(kind), weapon, stats.required_crew, stats.speed)
    }

    fn sighting(x: f64, y: f64, at_ms: f64) -> Observation {
        let mut world = hecs::World::new();
        Observation {
            target: TargetRef::Unit(world.spawn(())),
            position: Position::new(x, y),
            at_ms,
        }
    }

    #[test]
    fn test_gunship_range_is_reduced() {
        let gunship = combatant(UnitKind::Gunship);
        assert!((effective_range(&gunship) - 9.0 * TILE_SIZE * ROTARY_RANGE_FACTOR).abs() < 1e-9);
        let tank = combatant(UnitKind::Tank);
        assert_eq!(effective_range(&tank), 9.0 * TILE_SIZE);
    }

    #[test]
    fn test_level_modifiers() {
        let mut tank = combatant(UnitKind::Tank);
        tank.level = 3;
        assert!(effective_range(&tank) > base_range(&tank));
        assert!(effective_cooldown(&tank) < tank.weapon.stats.cooldown_ms);
        tank.level = 200;
        assert_eq!(effective_range(&tank), base_range(&tank) * LEVEL_RANGE_BONUS[3]);
    }

    #[test]
    fn test_cooldown_gate() {
        let mut tank = combatant(UnitKind::Tank);
        assert!(cooldown_elapsed(&tank, 0.0));
        tank.stamp_cooldown(1000.0);
        assert!(!cooldown_elapsed(&tank, 1000.0 + 1599.0));
        assert!(cooldown_elapsed(&tank, 1000.0 + 1600.0));
    }

    #[test]
    fn test_aim_uses_turret_or_body() {
        let mut tank = combatant(UnitKind::Tank);
        tank.facing.body = 1.5;
        tank.facing.turret = 0.0;
        assert!(is_aimed(&tank, 0.1));
        assert!(!is_aimed(&tank, 1.5));

        let mut rocket = combatant(UnitKind::RocketTank);
        rocket.facing.body = 1.5;
        rocket.facing.turret = 0.0;
        assert!(is_aimed(&rocket, 1.5));
        assert!(!is_aimed(&rocket, 0.0));
    }

    #[test]
    fn test_precision_tightens_threshold() {
        let mut tank = combatant(UnitKind::Tank);
        let bearing = tank.weapon.stats.aim_threshold * 0.75;
        assert!(is_aimed(&tank, bearing));
        tank.precision = true;
        assert!(!is_aimed(&tank, bearing));
    }

    #[test]
    fn test_slew_is_rate_limited() {
        let mut tank = combatant(UnitKind::Tank);
        slew_toward(&mut tank, 1.0, 100.0);
        assert!((tank.facing.turret - 0.3).abs() < 1e-9);
        assert_eq!(tank.facing.body, 0.0);
        slew_toward(&mut tank, 1.0, 10_000.0);
        assert_eq!(tank.facing.turret, 1.0);
    }

    #[test]
    fn test_spread_bounds_and_exemptions() {
        let tank = combatant(UnitKind::Tank);
        assert_eq!(spread_limit(&tank, ProjectileKind::Beam), 0.0);
        assert_eq!(spread_limit(&tank, ProjectileKind::HomingMissile), 0.0);
        let limit = spread_limit(&tank, ProjectileKind::Shell);
        assert!(limit > 0.0);

        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let origin = Position::new(0.0, 0.0);
        let aim = Position::new(100.0, 0.0);
        for _ in 0..100 {
            let p = apply_spread(&origin, &aim, limit, &mut rng);
            assert!((origin.distance_to(&p) - 100.0).abs() < 1e-6);
            assert!(origin.bearing_to(&p).abs() <= limit + 1e-12);
        }
        assert_eq!(apply_spread(&origin, &aim, 0.0, &mut rng), aim);
    }

    #[test]
    fn test_lead_for_stationary_target() {
        let shooter = Position::new(0.0, 0.0);
        let prev = sighting(200.0, 0.0, 0.0);
        let last = Observation { at_ms: 100.0, ..prev };
        assert_eq!(predict_lead(&shooter, &prev, &last, 0.5), last.position);
    }

    #[test]
    fn test_lead_is_damped_and_bounded() {
        let shooter = Position::new(0.0, 0.0);
        let prev = sighting(300.0, 0.0, 0.0);
        let last = Observation {
            position: Position::new(300.0, 10.0),
            at_ms: 100.0,
            ..prev
        };
        let p = predict_lead(&shooter, &prev, &last, 0.5);
        assert!(p.y > last.position.y, "leads in the direction of travel");
        let undamped = 0.1 * (300.0_f64.hypot(10.0) / 0.5);
        assert!(p.y - last.position.y < undamped);

        let fast = Observation {
            position: Position::new(300.0, 5000.0),
            at_ms: 100.0,
            ..prev
        };
        let q = predict_lead(&shooter, &prev, &fast, 0.01);
        assert!(fast.position.distance_to(&q) <= MAX_LEAD_TILES * TILE_SIZE + 1e-9);
    }

    #[test]
    fn test_movement_decision() {
        let tuning = CombatTuning::default();
        let mut tank = combatant(UnitKind::Tank);
        let goal = Position::new(1000.0, 0.0);

        assert_eq!(
            movement_decision(&tank, 100.0, &goal, 0.0, &tuning),
            MovementDecision::Halt
        );
        assert_eq!(
            movement_decision(&tank, 1000.0, &goal, 0.0, &tuning),
            MovementDecision::RequestPath
        );

        tank.motion.last_path_request_ms = Some(0.0);
        tank.motion.last_path_goal = Some(goal);
        tank.motion.path = vec![TilePos::new(0, 0), TilePos::new(5, 0)];
        assert_eq!(
            movement_decision(&tank, 1000.0, &goal, 500.0, &tuning),
            MovementDecision::Hold,
            "rate limited"
        );
        assert_eq!(
            movement_decision(&tank, 1000.0, &goal, 1500.0, &tuning),
            MovementDecision::Hold,
            "goal has not drifted"
        );
        let drifted = Position::new(1000.0, 200.0);
        assert_eq!(
            movement_decision(&tank, 1000.0, &drifted, 1500.0, &tuning),
            MovementDecision::RequestPath
        );
    }
}
