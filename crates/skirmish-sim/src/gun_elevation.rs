//! Barrel elevation controller for indirect-fire guns.
//!
//! Pure state update: the caller supplies the shooter, an optional target
//! point, effective range and the current time. The controller never fires;
//! it only reports whether the barrel is `ready` and whether the carriage
//! should stay put (`movement_lock`).

use skirmish_core::constants::*;
use skirmish_core::types::{angle_diff, rotate_toward, Position};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GunElevation {
    /// Degrees above horizontal.
    pub current_deg: f64,
    pub target_deg: f64,
    /// Barrel azimuth in world space (radians).
    pub current_world_angle: f64,
    pub target_world_angle: f64,
    /// Target distance over effective range, in [0, 1].
    pub distance_factor: f64,
    pub ready: bool,
    pub movement_lock: bool,
    pub last_update_ms: Option<f64>,
}

impl GunElevation {
    /// Stowed barrel pointing along `facing`.
    pub fn new(facing: f64) -> Self {
        Self {
            current_deg: 0.0,
            target_deg: 0.0,
            current_world_angle: facing,
            target_world_angle: facing,
            distance_factor: 1.0,
            ready: false,
            movement_lock: false,
            last_update_ms: None,
        }
    }
}

/// Elevation of an arc with apex `GUN_ARC_MIN_HEIGHT + d * GUN_ARC_HEIGHT_RATIO`.
pub fn desired_elevation_deg(distance: f64) -> f64 {
    let d = distance.max(0.0);
    let apex = GUN_ARC_MIN_HEIGHT + d * GUN_ARC_HEIGHT_RATIO;
    (4.0 * apex)
        .atan2(d)
        .to_degrees()
        .clamp(0.0, GUN_MAX_ELEVATION_DEG)
}

/// Full-sweep raise duration; nearer targets raise faster.
fn raise_duration_ms(distance_factor: f64) -> f64 {
    GUN_RAISE_MIN_MS + GUN_RAISE_SPAN_MS * distance_factor
}

pub fn update(
    gun: &mut GunElevation,
    shooter: &Position,
    target: Option<&Position>,
    range: f64,
    now_ms: f64,
) {
    let dt = match gun.last_update_ms {
        Some(last) => (now_ms - last).clamp(0.0, GUN_MAX_DT_MS),
        None => 0.0,
    };
    gun.last_update_ms = Some(now_ms);

    match target {
        Some(point) => {
            let dist = shooter.distance_to(point);
            gun.target_world_angle = shooter.bearing_to(point);
            gun.distance_factor = if range > 0.0 {
                (dist / range).clamp(0.0, 1.0)
            } else {
                1.0
            };
            gun.target_deg = desired_elevation_deg(dist);
        }
        None => {
            gun.target_deg = 0.0;
            gun.target_world_angle = gun.current_world_angle;
        }
    }

    let raise_ms = raise_duration_ms(gun.distance_factor);
    let error = gun.target_deg - gun.current_deg;
    let sweep_ms = if error >= 0.0 {
        raise_ms
    } else {
        raise_ms * GUN_LOWER_FRACTION
    };
    let step = GUN_MAX_ELEVATION_DEG / sweep_ms * dt;
    gun.current_deg = if error.abs() <= step {
        gun.target_deg
    } else {
        gun.current_deg + step * error.signum()
    };

    gun.current_world_angle = rotate_toward(
        gun.current_world_angle,
        gun.target_world_angle,
        GUN_TRAVERSE_RATE * dt,
    );

    let tolerance = if target.is_some() {
        GUN_READY_TOLERANCE_DEG
    } else {
        GUN_IDLE_TOLERANCE_DEG
    };
    let elevation_error = (gun.target_deg - gun.current_deg).abs();
    let azimuth_error = angle_diff(gun.current_world_angle, gun.target_world_angle)
        .abs()
        .to_degrees();
    let settled = elevation_error <= tolerance && azimuth_error <= tolerance;

    gun.ready = settled;
    gun.movement_lock = !settled || (target.is_none() && gun.current_deg > tolerance);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_until_ready(gun: &mut GunElevation, shooter: &Position, target: &Position) -> f64 {
        let mut now = 0.0;
        for _ in 0..1000 {
            update(gun, shooter, Some(target), 14.0 * TILE_SIZE, now);
            if gun.ready {
                return now;
            }
            now += DT_MS;
        }
        panic!("gun never settled");
    }

    #[test]
    fn test_desired_elevation_bounds() {
        assert_eq!(desired_elevation_deg(0.0), GUN_MAX_ELEVATION_DEG);
        let far = desired_elevation_deg(14.0 * TILE_SIZE);
        assert!(far > 0.0 && far < GUN_MAX_ELEVATION_DEG);
        // Farther shots are flatter.
        assert!(desired_elevation_deg(400.0) < desired_elevation_deg(200.0));
    }

    #[test]
    fn test_first_update_uses_zero_dt() {
        let mut gun = GunElevation::new(0.0);
        let shooter = Position::new(0.0, 0.0);
        let target = Position::new(300.0, 0.0);
        update(&mut gun, &shooter, Some(&target), 448.0, 5000.0);
        assert_eq!(gun.current_deg, 0.0);
        assert!(gun.target_deg > 0.0);
        assert!(!gun.ready);
        assert!(gun.movement_lock);
    }

    #[test]
    fn test_raises_then_ready() {
        let mut gun = GunElevation::new(0.0);
        let shooter = Position::new(0.0, 0.0);
        let target = Position::new(300.0, 0.0);
        let t = run_until_ready(&mut gun, &shooter, &target);
        assert!(t > 0.0);
        assert!((gun.current_deg - gun.target_deg).abs() <= GUN_READY_TOLERANCE_DEG);
        assert!(!gun.movement_lock);
    }

    #[test]
    fn test_closer_target_raises_faster() {
        let shooter = Position::new(0.0, 0.0);
        let mut near = GunElevation::new(0.0);
        let mut far = GunElevation::new(0.0);
        update(&mut near, &shooter, Some(&Position::new(100.0, 0.0)), 448.0, 0.0);
        update(&mut far, &shooter, Some(&Position::new(440.0, 0.0)), 448.0, 0.0);
        update(&mut near, &shooter, Some(&Position::new(100.0, 0.0)), 448.0, 100.0);
        update(&mut far, &shooter, Some(&Position::new(440.0, 0.0)), 448.0, 100.0);
        assert!(near.current_deg > far.current_deg);
    }

    #[test]
    fn test_dt_is_clamped() {
        let mut gun = GunElevation::new(0.0);
        let shooter = Position::new(0.0, 0.0);
        let target = Position::new(100.0, 0.0);
        update(&mut gun, &shooter, Some(&target), 448.0, 0.0);
        update(&mut gun, &shooter, Some(&target), 448.0, 60_000.0);
        let max_step =
            GUN_MAX_ELEVATION_DEG / raise_duration_ms(gun.distance_factor) * GUN_MAX_DT_MS;
        assert!(gun.current_deg <= max_step + 1e-9);
    }

    #[test]
    fn test_stows_without_target() {
        let mut gun = GunElevation::new(0.0);
        let shooter = Position::new(0.0, 0.0);
        let target = Position::new(200.0, 0.0);
        run_until_ready(&mut gun, &shooter, &target);
        let start = gun.last_update_ms.unwrap_or(0.0);

        update(&mut gun, &shooter, None, 448.0, start + DT_MS);
        assert!(gun.movement_lock, "elevated barrel without target locks movement");

        let mut now = start + DT_MS;
        for _ in 0..200 {
            now += DT_MS;
            update(&mut gun, &shooter, None, 448.0, now);
        }
        assert_eq!(gun.current_deg, 0.0);
        assert!(gun.ready);
        assert!(!gun.movement_lock);
    }

    #[test]
    fn test_zero_dt_is_idempotent() {
        let mut gun = GunElevation::new(0.0);
        let shooter = Position::new(0.0, 0.0);
        let target = Position::new(250.0, 120.0);
        update(&mut gun, &shooter, Some(&target), 448.0, 0.0);
        update(&mut gun, &shooter, Some(&target), 448.0, 400.0);
        let snapshot = gun;
        for _ in 0..5 {
            update(&mut gun, &shooter, Some(&target), 448.0, 400.0);
        }
        assert_eq!(gun, snapshot);
    }

    #[test]
    fn test_azimuth_traverses() {
        let mut gun = GunElevation::new(0.0);
        let shooter = Position::new(0.0, 0.0);
        let target = Position::new(0.0, 300.0);
        update(&mut gun, &shooter, Some(&target), 448.0, 0.0);
        update(&mut gun, &shooter, Some(&target), 448.0, 100.0);
        assert!((gun.current_world_angle - GUN_TRAVERSE_RATE * 100.0).abs() < 1e-9);
        assert!(!gun.ready);
    }
}
