//! Simulation constants and tuning parameters.

/// Simulation tick rate (Hz).
pub const TICK_RATE: u32 = 30;

/// Milliseconds per tick.
pub const DT_MS: f64 = 1000.0 / TICK_RATE as f64;

// --- Map ---

/// World pixels per tile edge.
pub const TILE_SIZE: f64 = 32.0;

// --- Range / rate modifiers ---

/// Rotary-wing units engage at a reduced fraction of their table range.
pub const ROTARY_RANGE_FACTOR: f64 = 0.75;

/// Range multiplier per veteran level (index = level, 0..=3).
pub const LEVEL_RANGE_BONUS: [f64; 4] = [1.0, 1.05, 1.10, 1.15];

/// Cooldown multiplier per veteran level (lower = faster fire).
pub const LEVEL_COOLDOWN_FACTOR: [f64; 4] = [1.0, 0.92, 0.85, 0.78];

/// Highest veteran level.
pub const MAX_LEVEL: u8 = 3;

// --- Aim ---

/// Precision combatants use this fraction of their aim threshold.
pub const PRECISION_AIM_FACTOR: f64 = 0.5;

/// Maximum angular spread (radians) per precision tier (index = level).
pub const SPREAD_BY_LEVEL: [f64; 4] = [0.035, 0.025, 0.015, 0.008];

/// Spread multiplier for precision combatants.
pub const PRECISION_SPREAD_FACTOR: f64 = 0.5;

/// Lead damping: effective lead scales by `1 / (1 + speed * LEAD_DAMPING)`,
/// speed in px/ms.
pub const LEAD_DAMPING: f64 = 8.0;

/// Lead displacement bound in tiles.
pub const MAX_LEAD_TILES: f64 = 2.0;

// --- Movement / chasing ---

/// Default minimum interval between continuous path requests.
pub const PATH_REQUEST_COOLDOWN_MS: f64 = 1000.0;

/// Re-path when the target drifts this multiple of base range from the last goal.
pub const CHASE_MULTIPLIER: f64 = 0.5;

/// Default minimum interval between howitzer reposition attempts.
pub const REPOSITION_COOLDOWN_MS: f64 = 2000.0;

/// Tiles searched outward when a howitzer backs away from a close target.
pub const REPOSITION_SEARCH_RADIUS: i32 = 2;

// --- Status effects ---

/// Movement multiplier while stunned.
pub const STUN_SPEED_FACTOR: f64 = 0.5;

/// Health ratio below which a unit counts as damaged.
pub const DAMAGED_HEALTH_RATIO: f64 = 0.5;

/// Movement multiplier for damaged units.
pub const DAMAGED_SPEED_FACTOR: f64 = 0.75;

// --- Gun elevation (indirect fire) ---

/// Largest per-update time step fed to the elevation controller.
pub const GUN_MAX_DT_MS: f64 = 120.0;

/// Mechanical elevation ceiling (degrees).
pub const GUN_MAX_ELEVATION_DEG: f64 = 65.0;

/// Ready tolerance with a target present (degrees).
pub const GUN_READY_TOLERANCE_DEG: f64 = 1.5;

/// Settled tolerance with no target (degrees).
pub const GUN_IDLE_TOLERANCE_DEG: f64 = 2.0;

/// Minimum apex height of the firing arc (pixels).
pub const GUN_ARC_MIN_HEIGHT: f64 = 16.0;

/// Apex height added per pixel of horizontal distance.
pub const GUN_ARC_HEIGHT_RATIO: f64 = 0.2;

/// Full-sweep raise time for a target at point blank (ms).
pub const GUN_RAISE_MIN_MS: f64 = 900.0;

/// Extra full-sweep raise time at maximum range (ms).
pub const GUN_RAISE_SPAN_MS: f64 = 1800.0;

/// Lowering takes this fraction of the raise duration.
pub const GUN_LOWER_FRACTION: f64 = 0.6;

/// Barrel azimuth traverse rate (radians per ms).
pub const GUN_TRAVERSE_RATE: f64 = 0.004;

// --- Burst / volley ---

/// Upper bound on rockets in one rocket-tank burst.
pub const ROCKET_BURST_MAX: u32 = 4;

/// Upper bound on rockets in one gunship volley (both pods).
pub const VOLLEY_MAX_ROCKETS: u32 = 8;

/// Delay between volley rockets (ms).
pub const VOLLEY_SHOT_DELAY_MS: f64 = 180.0;

/// Impact point is pulled back along the approach vector by this much (px).
pub const VOLLEY_FORWARD_OFFSET: f64 = 12.0;

/// Maximum lateral jitter of a volley impact point (px).
pub const VOLLEY_LATERAL_JITTER: f64 = 14.0;

/// Maximum forward jitter of a volley impact point (px).
pub const VOLLEY_FORWARD_JITTER: f64 = 10.0;

// --- Gunship flight ---

/// Hover standoff as a fraction of effective range.
pub const GUNSHIP_STANDOFF_FACTOR: f64 = 0.7;

/// Below this distance (px) the target counts as directly beneath.
pub const GUNSHIP_OVERHEAD_RADIUS: f64 = 12.0;

/// Strafe offset when the target is directly beneath (px).
pub const GUNSHIP_STRAFE_OFFSET: f64 = 3.0 * TILE_SIZE;

/// A new hover point is only issued when it moves more than this (px).
pub const FLIGHT_PLAN_EPSILON: f64 = 4.0;

/// Retry interval while no helipad is available (ms).
pub const HELIPAD_RETRY_MS: f64 = 3000.0;

/// Minimum interval between "no helipad" notifications (ms).
pub const HELIPAD_NOTICE_THROTTLE_MS: f64 = 10_000.0;

// --- Projectile flight ---

/// Safety cutoff = flight duration * factor + pad.
pub const MAX_FLIGHT_FACTOR: f64 = 2.0;

/// Safety cutoff padding (ms).
pub const MAX_FLIGHT_PAD_MS: f64 = 500.0;

/// Fixed lifetime bound for homing missiles (ms).
pub const HOMING_MAX_FLIGHT_MS: f64 = 6000.0;

/// Apex height of a ballistic arc as a fraction of its horizontal distance.
pub const ARC_HEIGHT_RATIO: f64 = 0.35;

// --- Notifications ---

/// Display duration of the "out of ammunition" notice (ms).
pub const AMMO_NOTICE_MS: f64 = 2500.0;

/// Display duration of the "no helipad" notice (ms).
pub const HELIPAD_NOTICE_MS: f64 = 3000.0;
