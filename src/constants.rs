//! Centralised driving, physics and gameplay constants.
//!
//! All tuneable values live here so they can be found, reasoned-about, and
//! modified in one place without source-diving across multiple modules.
//! [`crate::config::DrivingConfig`] mirrors every value below and uses it as
//! its default, so `assets/driving.toml` can override any subset at startup.
//!
//! ## Tuning guidance
//!
//! Each constant notes the observable consequence of changing it.  After
//! editing, run `cargo test` and the `ramp_jump` / `wall_crash` scenarios to
//! confirm the driving feel has not regressed.

// ── Simulation Loop ───────────────────────────────────────────────────────────

/// Largest Δt (s) a single tick may integrate.
///
/// Frame hitches (window drag, debugger pause) otherwise produce one huge step
/// that tunnels the car through buildings.
pub const MAX_TICK_DT: f32 = 0.1;

/// Seed for the session RNG (prop spin, pedestrian wandering, limb detachment).
pub const RNG_SEED: u64 = 0x5EED_CA75;

// ── World Layout ──────────────────────────────────────────────────────────────

/// Number of city blocks along each side of the square grid.
pub const GRID_SIZE: u32 = 5;

/// Side length (u) of one city block.
pub const BLOCK_SIZE: f32 = 40.0;

/// Width (u) of the road between two blocks.
/// World half-extent is `GRID_SIZE × (BLOCK_SIZE + ROAD_WIDTH) / 2`.
pub const ROAD_WIDTH: f32 = 12.0;

/// Gravity (u/s²) shared by the car, props and transient bodies.
///
/// Deliberately stronger than 9.81: arcade jumps feel floaty at real gravity.
pub const GRAVITY: f32 = 30.0;

// ── Vehicle: Longitudinal ─────────────────────────────────────────────────────

/// Top forward speed (u/s).  Reverse is capped at half of this.
pub const VEHICLE_MAX_SPEED: f32 = 40.0;

/// Throttle acceleration (u/s²).  At 25 the car reaches top speed in 1.6 s.
pub const VEHICLE_ACCELERATION: f32 = 25.0;

/// Deceleration (u/s²) while braking against the current direction of travel.
pub const VEHICLE_BRAKING: f32 = 40.0;

/// Passive coast-down rate (u/s²) with no pedal held.
pub const VEHICLE_DECELERATION: f32 = 10.0;

/// Fraction of `VEHICLE_DECELERATION` applied while airborne (air drag).
pub const AIR_DRAG_FACTOR: f32 = 0.1;

// ── Vehicle: Steering ─────────────────────────────────────────────────────────

/// Base yaw rate (rad/s) at full steering input.
pub const VEHICLE_TURN_SPEED: f32 = 2.0;

/// Per-tick smoothing factor for the applied turn amount.
///
/// Not time-scaled: `current = current·(1−k) + target·k` once per tick, and
/// `current *= 1 − 2k` when the wheel is released.
pub const TURN_INERTIA: f32 = 0.15;

/// Steering intensity below 20 % of top speed (tight parking-lot turns).
pub const STEER_LOW_SPEED: f32 = 1.2;

/// Steering intensity between 20 % and 60 % of top speed.
pub const STEER_MID_SPEED: f32 = 1.0;

/// Steering intensity at 60 % of top speed; falls off linearly above it.
pub const STEER_HIGH_SPEED: f32 = 0.8;

/// Intensity lost per unit of normalised speed above 0.6.
pub const STEER_FALLOFF: f32 = 0.3;

// ── Vehicle: Body ─────────────────────────────────────────────────────────────

/// Bounding radius (u) of the car for collisions and pickups.
pub const VEHICLE_RADIUS: f32 = 1.5;

/// Height (u) of the car origin above the ground or ramp surface.
pub const RIDE_HEIGHT: f32 = 0.5;

/// Wheel rotation (rad) per unit travelled; cosmetic only.
pub const WHEEL_SPIN_RATE: f32 = 2.0;

/// Local-space offsets of the two rear wheels (x = right, z = forward).
pub const REAR_WHEEL_OFFSET_X: f32 = 0.9;
pub const REAR_WHEEL_OFFSET_Z: f32 = -1.3;

// ── Vehicle: Air Control ──────────────────────────────────────────────────────

/// Roll rate (rad/s) from left/right input while airborne.
pub const AIR_ROLL_RATE: f32 = 2.5;

/// Pitch rate (rad/s) from forward/reverse input while airborne.
pub const AIR_PITCH_RATE: f32 = 1.5;

/// Absolute pitch limit (rad) reachable through air control.
pub const AIR_PITCH_LIMIT: f32 = 0.5;

// ── Vehicle: Vertical ─────────────────────────────────────────────────────────

/// Speed multiplier applied on touchdown.
pub const LANDING_FRICTION: f32 = 0.9;

/// Pitch/roll multiplier applied on a natural touchdown.
pub const LANDING_TILT_RELAX: f32 = 0.5;

/// Per-tick pitch/roll multiplier while grounded.
pub const GROUND_TILT_RELAX: f32 = 0.9;

/// Per-tick blend of the current pitch toward the ramp slope.
pub const RAMP_PITCH_SMOOTHING: f32 = 0.2;

// ── Vehicle: Drift ────────────────────────────────────────────────────────────

/// Normalised speed above which a held turn counts as a drift.
pub const DRIFT_SPEED_THRESHOLD: f32 = 0.6;

/// Seconds of drifting between two pairs of skid marks.
pub const SKID_MARK_INTERVAL: f32 = 0.05;

/// Seconds for a skid mark to fade out completely.
pub const SKID_MARK_LIFETIME: f32 = 3.0;

/// Maximum live skid marks; the oldest is evicted first.
pub const SKID_MARK_MAX: usize = 200;

/// Height (u) of skid marks above the road to avoid z-fighting.
pub const SKID_MARK_HEIGHT: f32 = 0.02;

// ── Vehicle: Collision Response ───────────────────────────────────────────────

/// Fraction of the impact speed kept after bouncing off an obstacle.
pub const BOUNCE_FACTOR: f32 = 0.3;

/// Impact speed (u/s) above which a collision throws the car into the air.
pub const HARD_HIT_SPEED: f32 = 25.0;

/// Upward velocity gained per u/s of impact speed on a hard hit.
pub const HARD_HIT_LIFT_SCALE: f32 = 0.15;

/// Cap (u/s) on the hard-hit upward velocity.
pub const HARD_HIT_LIFT_MAX: f32 = 5.0;

/// Extra clearance (u) when pushing the car out of an obstacle.
pub const SEPARATION_EPSILON: f32 = 0.1;

/// Airborne speed (u/s) above which collision switches to swept sampling.
pub const FAST_MOTION_THRESHOLD: f32 = 20.0;

/// Minimum number of samples along a swept check.
pub const SWEEP_MIN_SAMPLES: u32 = 3;

/// Distance (u) covered per sweep sample; longer hops get more samples.
pub const SWEEP_SAMPLE_SPACING: f32 = 0.5;

/// Substitute for near-zero denominators in the slab intersection test.
pub const GEOMETRY_EPSILON: f32 = 1e-6;

// ── World Boundary ────────────────────────────────────────────────────────────

/// Fraction of the outward velocity kept when the car bounces off the world edge.
pub const BOUNDARY_BOUNCE: f32 = 0.5;

// ── Ramps & Launchpads ────────────────────────────────────────────────────────

/// Normalised ramp position past which a launch can trigger.
pub const RAMP_LAUNCH_ZONE: f32 = 0.8;

/// Minimum dot(car direction, ramp forward) to launch off a directional ramp.
pub const RAMP_ALIGNMENT: f32 = 0.7;

/// Minimum speed (u/s) to launch off a directional ramp.
pub const RAMP_MIN_LAUNCH_SPEED: f32 = 10.0;

/// Cap (u/s) on any launch velocity regardless of the ramp's jump strength.
pub const MAX_JUMP_VELOCITY: f32 = 18.0;

/// Pitch (rad) set at launch; negative is nose-up.
pub const LAUNCH_PITCH: f32 = -0.35;

/// Launch speeds above this are capped to it to keep jumps landable.
pub const MAX_SAFE_LAUNCH_SPEED: f32 = 38.0;

/// Speed multiplier on a directional launch below the safe speed.
pub const RAMP_LAUNCH_BOOST: f32 = 1.05;

/// Per-tick speed multiplier while riding a ramp with boost active.
pub const RAMP_BOOST_NUDGE: f32 = 1.02;

/// Per-tick speed multiplier while riding a launchpad.
pub const LAUNCHPAD_RIDE_NUDGE: f32 = 1.01;

/// Speed multiplier applied when a launchpad fires.
pub const LAUNCHPAD_LAUNCH_BOOST: f32 = 1.1;

/// Fraction of the pad radius inside which a launchpad fires.
pub const LAUNCHPAD_TRIGGER_FRACTION: f32 = 0.5;

/// Minimum speed (u/s) for a launchpad to fire.
pub const LAUNCHPAD_MIN_SPEED: f32 = 5.0;

/// Height (u) above ride height at which leaving a ramp becomes a fall.
pub const RAMP_EXIT_FALL_MARGIN: f32 = 0.05;

// ── Boost ─────────────────────────────────────────────────────────────────────

/// Capacity of the boost meter.
pub const BOOST_MAX: f32 = 100.0;

/// Meter drained per second while boosting.
pub const BOOST_DEPLETE_RATE: f32 = 35.0;

/// Meter regained per second while not boosting.
pub const BOOST_RECHARGE_RATE: f32 = 12.0;

/// Target travel multiplier while boosting.
pub const BOOST_MULTIPLIER: f32 = 1.6;

/// Rate (1/s) at which the applied multiplier eases toward its target.
pub const BOOST_SMOOTHING: f32 = 6.0;

// ── Dynamic Props ─────────────────────────────────────────────────────────────

/// Impact force per u/s of car speed.  15 u/s → 7.5, enough to fell a streetlight.
pub const PROP_IMPACT_FORCE_SCALE: f32 = 0.5;

/// Fraction of the car's velocity handed to a knocked prop.
pub const PROP_CARRY_FRACTION: f32 = 0.6;

/// Base upward velocity (u/s) of a knocked prop.
pub const PROP_LAUNCH_LIFT: f32 = 3.0;

/// Extra upward velocity per unit of impact force.
pub const PROP_VERTICAL_BIAS: f32 = 0.5;

/// Per-axis bound (rad/s) on the random spin of a knocked prop.
pub const PROP_SPIN_MAX: f32 = 6.0;

/// Car speed lost per kg of prop mass on a knockover.
pub const PROP_SLOWDOWN_PER_MASS: f32 = 0.004;

/// Lower bound on the speed fraction kept after a knockover.
pub const PROP_MIN_SPEED_RETAIN: f32 = 0.5;

/// Vertical restitution on ground contact.
pub const PROP_BOUNCE: f32 = 0.4;

/// Upward bounce speed (u/s) below which a prop stops bouncing.
pub const PROP_BOUNCE_CUTOFF: f32 = 0.5;

/// Horizontal velocity multiplier on ground contact.
pub const PROP_GROUND_FRICTION: f32 = 0.85;

/// Angular velocity multiplier on ground contact.
pub const PROP_GROUND_SPIN_DAMPING: f32 = 0.8;

/// Per-tick multiplier on both velocities (air resistance).
pub const PROP_AIR_RESISTANCE: f32 = 0.99;

/// Linear speed (u/s) under which a prop counts as at rest.
pub const PROP_REST_LINEAR: f32 = 0.1;

/// Angular speed (rad/s) under which a prop counts as at rest.
pub const PROP_REST_ANGULAR: f32 = 0.1;

/// Seconds after a knockover when a prop is reset regardless of motion.
pub const PROP_RESET_TIMEOUT: f32 = 12.0;

/// The car must be farther than this (u) for a prop to reset out of sight.
pub const PROP_RESET_MIN_DISTANCE: f32 = 40.0;

/// Radius (u) of the pole used in the streetlight cylinder check.
pub const POLE_RADIUS: f32 = 0.25;

/// Base light intensity of an upright streetlight.
pub const STREETLIGHT_INTENSITY: f32 = 1.0;

/// Range of the flicker fraction on knockover.
pub const STREETLIGHT_FLICKER_MIN: f32 = 0.2;
pub const STREETLIGHT_FLICKER_MAX: f32 = 0.6;

// ── Pedestrians ───────────────────────────────────────────────────────────────

/// Walking speed (u/s).
pub const PEDESTRIAN_WALK_SPEED: f32 = 1.5;

/// Fleeing speed (u/s).
pub const PEDESTRIAN_FLEE_SPEED: f32 = 5.0;

/// Distance (u) at which a walking pedestrian notices the car and flees.
pub const PEDESTRIAN_DETECTION_RADIUS: f32 = 15.0;

/// Multiple of the detection radius beyond which a fleeing pedestrian calms down.
pub const PEDESTRIAN_FLEE_HYSTERESIS: f32 = 1.5;

/// Bounding radius (u) of a pedestrian.
pub const PEDESTRIAN_RADIUS: f32 = 0.5;

/// Car speed (u/s) above which contact is fatal.
pub const PEDESTRIAN_KILL_SPEED: f32 = 5.0;

/// Score for running a pedestrian over.
pub const PEDESTRIAN_POINTS: u32 = 100;

/// Pedestrians farther than this (u) from the car only animate.
pub const PEDESTRIAN_AI_DISTANCE: f32 = 120.0;

/// Per-tick probability that a walking pedestrian picks a new direction.
pub const PEDESTRIAN_TURN_CHANCE: f64 = 0.005;

/// Look-ahead (u) used to detect walls and the world edge.
pub const PEDESTRIAN_LOOKAHEAD: f32 = 1.0;

/// Clearance (u) kept from the world edge.
pub const PEDESTRIAN_BOUNDARY_MARGIN: f32 = 2.0;

/// Per-tick blend of the facing angle toward the heading.
pub const PEDESTRIAN_FACING_SMOOTHING: f32 = 0.15;

/// Walk-cycle phase advance per u/s of movement.
pub const PEDESTRIAN_ANIM_RATE: f32 = 4.0;

/// Walk-cycle phase advance (rad/s) of a distant, idle pedestrian.
pub const PEDESTRIAN_IDLE_ANIM_RATE: f32 = 2.0;

/// Body height (u).  A car whose centre is higher than its ride height plus
/// this clears the pedestrian instead of hitting them.
pub const PEDESTRIAN_HEIGHT: f32 = 1.8;

/// Probability that a fatal hit detaches a limb.
pub const LIMB_DETACH_CHANCE: f64 = 0.6;

/// Seconds before a detached limb is removed.
pub const LIMB_LIFETIME: f32 = 6.0;

// ── Transient Bodies ──────────────────────────────────────────────────────────

/// Maximum live transient bodies; the oldest is evicted first.
pub const TRANSIENT_CAPACITY: usize = 64;

/// Vertical restitution of a transient body on ground contact.
pub const TRANSIENT_RESTITUTION: f32 = 0.3;

/// Horizontal and angular velocity multiplier on ground contact.
pub const TRANSIENT_FRICTION: f32 = 0.7;

/// Speed (u/s) under which a grounded transient body settles.
pub const TRANSIENT_SETTLE_SPEED: f32 = 0.3;
