//! Runtime driving configuration loaded from `assets/driving.toml`.
//!
//! [`DrivingConfig`] is a Bevy [`Resource`] that mirrors the tunables in
//! [`crate::constants`].  At startup, [`load_driving_config`] reads
//! `assets/driving.toml` and overwrites the defaults with any values present in
//! the file.  Missing keys fall back to the compile-time defaults, so a minimal
//! TOML can override just the constants you care about.
//!
//! ## Usage
//!
//! Systems take `config: Res<DrivingConfig>`; the plain simulation functions
//! take `&DrivingConfig` and read `config.vehicle_max_speed`,
//! `config.gravity`, etc.
//!
//! Keep `src/constants.rs` in sync: it remains the **authoritative default**
//! source used by `DrivingConfig::default()`.

use crate::constants::*;
use crate::error::{
    validate_positive, validate_probability, validate_unit_interval, SimError, SimResult,
};
use crate::vehicle::VehicleTuning;
use bevy::prelude::*;
use serde::Deserialize;
use std::path::Path;

/// Path of the optional override file, relative to the working directory.
pub const DRIVING_CONFIG_PATH: &str = "assets/driving.toml";

/// Runtime-tunable driving and gameplay configuration.
///
/// All fields default to the corresponding compile-time constant from
/// `src/constants.rs`.  Override any subset in `assets/driving.toml`.
#[derive(Resource, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DrivingConfig {
    // ── Simulation Loop ──────────────────────────────────────────────────────
    pub max_tick_dt: f32,
    pub rng_seed: u64,
    pub debug_log_collisions: bool,

    // ── World Layout ─────────────────────────────────────────────────────────
    pub grid_size: u32,
    pub block_size: f32,
    pub road_width: f32,
    pub gravity: f32,

    // ── Vehicle: Longitudinal ────────────────────────────────────────────────
    pub vehicle_max_speed: f32,
    pub vehicle_acceleration: f32,
    pub vehicle_braking: f32,
    pub vehicle_deceleration: f32,
    pub air_drag_factor: f32,

    // ── Vehicle: Steering ────────────────────────────────────────────────────
    pub vehicle_turn_speed: f32,
    pub turn_inertia: f32,

    // ── Vehicle: Body ────────────────────────────────────────────────────────
    pub vehicle_radius: f32,
    pub ride_height: f32,
    pub wheel_spin_rate: f32,

    // ── Vehicle: Air Control ─────────────────────────────────────────────────
    pub air_roll_rate: f32,
    pub air_pitch_rate: f32,
    pub air_pitch_limit: f32,

    // ── Vehicle: Vertical ────────────────────────────────────────────────────
    pub landing_friction: f32,
    pub landing_tilt_relax: f32,
    pub ground_tilt_relax: f32,
    pub ramp_pitch_smoothing: f32,

    // ── Vehicle: Drift ───────────────────────────────────────────────────────
    pub drift_speed_threshold: f32,
    pub skid_mark_interval: f32,
    pub skid_mark_lifetime: f32,
    pub skid_mark_max: usize,

    // ── Vehicle: Collision Response ──────────────────────────────────────────
    pub bounce_factor: f32,
    pub hard_hit_speed: f32,
    pub hard_hit_lift_scale: f32,
    pub hard_hit_lift_max: f32,
    pub separation_epsilon: f32,
    pub fast_motion_threshold: f32,
    pub sweep_min_samples: u32,
    pub sweep_sample_spacing: f32,

    // ── World Boundary ───────────────────────────────────────────────────────
    pub boundary_bounce: f32,

    // ── Ramps & Launchpads ───────────────────────────────────────────────────
    pub ramp_launch_zone: f32,
    pub ramp_alignment: f32,
    pub ramp_min_launch_speed: f32,
    pub max_jump_velocity: f32,
    pub launch_pitch: f32,
    pub max_safe_launch_speed: f32,
    pub launchpad_trigger_fraction: f32,
    pub launchpad_min_speed: f32,

    // ── Boost ────────────────────────────────────────────────────────────────
    pub boost_max: f32,
    pub boost_deplete_rate: f32,
    pub boost_recharge_rate: f32,
    pub boost_multiplier: f32,
    pub boost_smoothing: f32,

    // ── Dynamic Props ────────────────────────────────────────────────────────
    pub prop_impact_force_scale: f32,
    pub prop_carry_fraction: f32,
    pub prop_launch_lift: f32,
    pub prop_vertical_bias: f32,
    pub prop_spin_max: f32,
    pub prop_slowdown_per_mass: f32,
    pub prop_bounce: f32,
    pub prop_ground_friction: f32,
    pub prop_ground_spin_damping: f32,
    pub prop_air_resistance: f32,
    pub prop_reset_timeout: f32,
    pub prop_reset_min_distance: f32,

    // ── Pedestrians ──────────────────────────────────────────────────────────
    pub pedestrian_walk_speed: f32,
    pub pedestrian_flee_speed: f32,
    pub pedestrian_detection_radius: f32,
    pub pedestrian_flee_hysteresis: f32,
    pub pedestrian_radius: f32,
    pub pedestrian_kill_speed: f32,
    pub pedestrian_points: u32,
    pub pedestrian_ai_distance: f32,
    pub pedestrian_turn_chance: f64,
    pub limb_detach_chance: f64,
    pub limb_lifetime: f32,

    // ── Transient Bodies ─────────────────────────────────────────────────────
    pub transient_capacity: usize,
}

impl Default for DrivingConfig {
    fn default() -> Self {
        Self {
            // Simulation Loop
            max_tick_dt: MAX_TICK_DT,
            rng_seed: RNG_SEED,
            debug_log_collisions: false,
            // World Layout
            grid_size: GRID_SIZE,
            block_size: BLOCK_SIZE,
            road_width: ROAD_WIDTH,
            gravity: GRAVITY,
            // Vehicle: Longitudinal
            vehicle_max_speed: VEHICLE_MAX_SPEED,
            vehicle_acceleration: VEHICLE_ACCELERATION,
            vehicle_braking: VEHICLE_BRAKING,
            vehicle_deceleration: VEHICLE_DECELERATION,
            air_drag_factor: AIR_DRAG_FACTOR,
            // Vehicle: Steering
            vehicle_turn_speed: VEHICLE_TURN_SPEED,
            turn_inertia: TURN_INERTIA,
            // Vehicle: Body
            vehicle_radius: VEHICLE_RADIUS,
            ride_height: RIDE_HEIGHT,
            wheel_spin_rate: WHEEL_SPIN_RATE,
            // Vehicle: Air Control
            air_roll_rate: AIR_ROLL_RATE,
            air_pitch_rate: AIR_PITCH_RATE,
            air_pitch_limit: AIR_PITCH_LIMIT,
            // Vehicle: Vertical
            landing_friction: LANDING_FRICTION,
            landing_tilt_relax: LANDING_TILT_RELAX,
            ground_tilt_relax: GROUND_TILT_RELAX,
            ramp_pitch_smoothing: RAMP_PITCH_SMOOTHING,
            // Vehicle: Drift
            drift_speed_threshold: DRIFT_SPEED_THRESHOLD,
            skid_mark_interval: SKID_MARK_INTERVAL,
            skid_mark_lifetime: SKID_MARK_LIFETIME,
            skid_mark_max: SKID_MARK_MAX,
            // Vehicle: Collision Response
            bounce_factor: BOUNCE_FACTOR,
            hard_hit_speed: HARD_HIT_SPEED,
            hard_hit_lift_scale: HARD_HIT_LIFT_SCALE,
            hard_hit_lift_max: HARD_HIT_LIFT_MAX,
            separation_epsilon: SEPARATION_EPSILON,
            fast_motion_threshold: FAST_MOTION_THRESHOLD,
            sweep_min_samples: SWEEP_MIN_SAMPLES,
            sweep_sample_spacing: SWEEP_SAMPLE_SPACING,
            // World Boundary
            boundary_bounce: BOUNDARY_BOUNCE,
            // Ramps & Launchpads
            ramp_launch_zone: RAMP_LAUNCH_ZONE,
            ramp_alignment: RAMP_ALIGNMENT,
            ramp_min_launch_speed: RAMP_MIN_LAUNCH_SPEED,
            max_jump_velocity: MAX_JUMP_VELOCITY,
            launch_pitch: LAUNCH_PITCH,
            max_safe_launch_speed: MAX_SAFE_LAUNCH_SPEED,
            launchpad_trigger_fraction: LAUNCHPAD_TRIGGER_FRACTION,
            launchpad_min_speed: LAUNCHPAD_MIN_SPEED,
            // Boost
            boost_max: BOOST_MAX,
            boost_deplete_rate: BOOST_DEPLETE_RATE,
            boost_recharge_rate: BOOST_RECHARGE_RATE,
            boost_multiplier: BOOST_MULTIPLIER,
            boost_smoothing: BOOST_SMOOTHING,
            // Dynamic Props
            prop_impact_force_scale: PROP_IMPACT_FORCE_SCALE,
            prop_carry_fraction: PROP_CARRY_FRACTION,
            prop_launch_lift: PROP_LAUNCH_LIFT,
            prop_vertical_bias: PROP_VERTICAL_BIAS,
            prop_spin_max: PROP_SPIN_MAX,
            prop_slowdown_per_mass: PROP_SLOWDOWN_PER_MASS,
            prop_bounce: PROP_BOUNCE,
            prop_ground_friction: PROP_GROUND_FRICTION,
            prop_ground_spin_damping: PROP_GROUND_SPIN_DAMPING,
            prop_air_resistance: PROP_AIR_RESISTANCE,
            prop_reset_timeout: PROP_RESET_TIMEOUT,
            prop_reset_min_distance: PROP_RESET_MIN_DISTANCE,
            // Pedestrians
            pedestrian_walk_speed: PEDESTRIAN_WALK_SPEED,
            pedestrian_flee_speed: PEDESTRIAN_FLEE_SPEED,
            pedestrian_detection_radius: PEDESTRIAN_DETECTION_RADIUS,
            pedestrian_flee_hysteresis: PEDESTRIAN_FLEE_HYSTERESIS,
            pedestrian_radius: PEDESTRIAN_RADIUS,
            pedestrian_kill_speed: PEDESTRIAN_KILL_SPEED,
            pedestrian_points: PEDESTRIAN_POINTS,
            pedestrian_ai_distance: PEDESTRIAN_AI_DISTANCE,
            pedestrian_turn_chance: PEDESTRIAN_TURN_CHANCE,
            limb_detach_chance: LIMB_DETACH_CHANCE,
            limb_lifetime: LIMB_LIFETIME,
            // Transient Bodies
            transient_capacity: TRANSIENT_CAPACITY,
        }
    }
}

impl DrivingConfig {
    /// Parse a TOML document; keys not present keep their defaults.
    pub fn from_toml_str(contents: &str) -> SimResult<Self> {
        let config: Self = toml::from_str(contents).map_err(|e| SimError::ConfigParse {
            path: "<inline>".to_string(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load_from_path(path: impl AsRef<Path>) -> SimResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| SimError::ConfigRead {
            path: path.display().to_string(),
            source,
        })?;
        let config: Self = toml::from_str(&contents).map_err(|e| SimError::ConfigParse {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that make the simulation diverge or stall.
    pub fn validate(&self) -> SimResult<()> {
        validate_positive("max_tick_dt", self.max_tick_dt)?;
        validate_positive("vehicle_max_speed", self.vehicle_max_speed)?;
        validate_positive("vehicle_acceleration", self.vehicle_acceleration)?;
        validate_positive("vehicle_radius", self.vehicle_radius)?;
        validate_positive("gravity", self.gravity)?;
        validate_positive("skid_mark_interval", self.skid_mark_interval)?;
        validate_positive("skid_mark_lifetime", self.skid_mark_lifetime)?;
        validate_positive("sweep_sample_spacing", self.sweep_sample_spacing)?;
        validate_positive("prop_spin_max", self.prop_spin_max)?;
        validate_positive("prop_reset_min_distance", self.prop_reset_min_distance)?;
        validate_positive("pedestrian_ai_distance", self.pedestrian_ai_distance)?;
        validate_unit_interval("bounce_factor", self.bounce_factor)?;
        validate_unit_interval("boundary_bounce", self.boundary_bounce)?;
        validate_unit_interval("landing_friction", self.landing_friction)?;
        validate_unit_interval("prop_air_resistance", self.prop_air_resistance)?;
        validate_probability("pedestrian_turn_chance", self.pedestrian_turn_chance)?;
        validate_probability("limb_detach_chance", self.limb_detach_chance)?;
        if self.turn_inertia <= 0.0 || self.turn_inertia > 0.5 {
            return Err(SimError::UnsafeConstant {
                name: "turn_inertia",
                value: self.turn_inertia,
                safe_range: "(0.0, 0.5]",
            });
        }
        Ok(())
    }

    /// Tunables copied into a freshly built [`crate::vehicle::Vehicle`].
    pub fn vehicle_tuning(&self) -> VehicleTuning {
        VehicleTuning {
            max_speed: self.vehicle_max_speed,
            acceleration: self.vehicle_acceleration,
            braking: self.vehicle_braking,
            deceleration: self.vehicle_deceleration,
            turn_speed: self.vehicle_turn_speed,
            radius: self.vehicle_radius,
            ride_height: self.ride_height,
        }
    }
}

/// Startup system: attempt to load `assets/driving.toml` and overwrite the
/// `DrivingConfig` resource with it.
///
/// A missing file is not an error (defaults are already in place from
/// `init_resource`).  Parse and validation errors are logged and the defaults
/// are kept.
pub fn load_driving_config(mut config: ResMut<DrivingConfig>) {
    let path = Path::new(DRIVING_CONFIG_PATH);
    if !path.exists() {
        info!("No {DRIVING_CONFIG_PATH} found; using compiled defaults");
        return;
    }
    match DrivingConfig::load_from_path(path) {
        Ok(loaded) => {
            *config = loaded;
            info!("Loaded driving config from {DRIVING_CONFIG_PATH}");
        }
        Err(e) => warn!("{e}; using defaults"),
    }
}
