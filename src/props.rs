//! Knockable street furniture.
//!
//! Each prop is a two-state machine:
//!
//! ```text
//! AtRest ──(hit hard enough)──▶ KnockedOver ──(settled / lost / timed out,
//!    ▲                                          car far away)──┐
//!    └─────────────────────────────────────────────────────────┘
//! ```
//!
//! Knocked props fly ballistically with spin, bounce on the road, and are
//! put back where they started once the car is out of sight.

use crate::collision::{ground_distance, ground_normal};
use crate::config::DrivingConfig;
use crate::constants::{
    POLE_RADIUS, PROP_BOUNCE_CUTOFF, PROP_MIN_SPEED_RETAIN, PROP_REST_ANGULAR,
    PROP_REST_LINEAR, STREETLIGHT_FLICKER_MAX, STREETLIGHT_FLICKER_MIN, STREETLIGHT_INTENSITY,
};
use crate::effects::EffectSink;
use crate::session::SessionState;
use crate::transient::integrate_rotation;
use crate::vehicle::Vehicle;
use crate::world::WorldBounds;
use bevy::prelude::*;
use rand::Rng;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropKind {
    TrashCan,
    Bench,
    Streetlight,
    Barrel,
    Crate,
}

/// Fixed physical and scoring data for one [`PropKind`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PropProfile {
    pub mass: f32,
    pub radius: f32,
    pub height: f32,
    /// Impact force needed to knock it over.
    pub knock_threshold: f32,
    pub score: u32,
    /// Thin and tall: also tested as a vertical cylinder.
    pub pole: bool,
}

impl PropKind {
    pub const ALL: [PropKind; 5] = [
        PropKind::TrashCan,
        PropKind::Bench,
        PropKind::Streetlight,
        PropKind::Barrel,
        PropKind::Crate,
    ];

    pub fn profile(self) -> PropProfile {
        match self {
            PropKind::TrashCan => PropProfile {
                mass: 10.0,
                radius: 0.5,
                height: 1.0,
                knock_threshold: 2.0,
                score: 10,
                pole: false,
            },
            PropKind::Bench => PropProfile {
                mass: 40.0,
                radius: 1.0,
                height: 0.8,
                knock_threshold: 5.0,
                score: 20,
                pole: false,
            },
            PropKind::Streetlight => PropProfile {
                mass: 25.0,
                radius: 0.3,
                height: 6.0,
                knock_threshold: 6.0,
                score: 50,
                pole: true,
            },
            PropKind::Barrel => PropProfile {
                mass: 15.0,
                radius: 0.6,
                height: 1.2,
                knock_threshold: 3.0,
                score: 15,
                pole: false,
            },
            PropKind::Crate => PropProfile {
                mass: 20.0,
                radius: 0.7,
                height: 1.4,
                knock_threshold: 4.0,
                score: 25,
                pole: false,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PropState {
    #[default]
    AtRest,
    KnockedOver,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DynamicProp {
    pub kind: PropKind,
    /// Base of the prop (ground contact point).
    pub position: Vec3,
    pub rotation: Quat,
    pub velocity: Vec3,
    pub angular_velocity: Vec3,
    pub original_position: Vec3,
    pub original_rotation: Quat,
    pub mass: f32,
    pub radius: f32,
    pub height: f32,
    pub state: PropState,
    /// Seconds spent knocked over.
    pub reset_timer: f32,
    /// Lamp brightness; zero for kinds without a light.
    pub light_intensity: f32,
    pub visual: Option<Entity>,
}

impl DynamicProp {
    pub fn new(kind: PropKind, position: Vec3, yaw: f32) -> Self {
        let profile = kind.profile();
        let rotation = Quat::from_rotation_y(yaw);
        Self {
            kind,
            position,
            rotation,
            velocity: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
            original_position: position,
            original_rotation: rotation,
            mass: profile.mass,
            radius: profile.radius,
            height: profile.height,
            state: PropState::AtRest,
            reset_timer: 0.0,
            light_intensity: base_intensity(kind),
            visual: None,
        }
    }

    pub fn is_knocked(&self) -> bool {
        self.state == PropState::KnockedOver
    }

    /// Centre of the collision sphere.
    pub fn centre(&self) -> Vec3 {
        self.position + self.rotation * Vec3::new(0.0, self.height * 0.5, 0.0)
    }

    /// Put the prop back exactly where it started.  Calling it twice is the
    /// same as calling it once.
    pub fn reset(&mut self) {
        self.position = self.original_position;
        self.rotation = self.original_rotation;
        self.velocity = Vec3::ZERO;
        self.angular_velocity = Vec3::ZERO;
        self.state = PropState::AtRest;
        self.reset_timer = 0.0;
        self.light_intensity = base_intensity(self.kind);
    }

    fn touches(&self, vehicle: &Vehicle) -> bool {
        let reach = vehicle.tuning.radius + self.radius;
        if vehicle.position.distance(self.centre()) < reach {
            return true;
        }
        if self.kind.profile().pole {
            let base = self.position.y;
            let within_height = vehicle.position.y >= base && vehicle.position.y <= base + self.height;
            return within_height
                && ground_distance(vehicle.position, self.position) < vehicle.tuning.radius + POLE_RADIUS;
        }
        false
    }
}

fn base_intensity(kind: PropKind) -> f32 {
    match kind {
        PropKind::Streetlight => STREETLIGHT_INTENSITY,
        _ => 0.0,
    }
}

/// Knock over anything the car hits hard enough, then advance every knocked
/// prop and reset the ones that are done.  Returns how many props were
/// knocked over this tick.
pub fn update_props(
    props: &mut [DynamicProp],
    vehicle: &mut Vehicle,
    bounds: &WorldBounds,
    dt: f32,
    config: &DrivingConfig,
    session: &mut SessionState,
    sink: &mut impl EffectSink,
) -> u32 {
    let mut knocked = 0;
    for prop in props.iter_mut() {
        match prop.state {
            PropState::AtRest => {
                if try_knock(prop, vehicle, config, session, sink) {
                    knocked += 1;
                }
            }
            PropState::KnockedOver => {
                step_knocked(prop, dt, config);
                if should_reset(prop, bounds, config)
                    && ground_distance(vehicle.position, prop.position) > config.prop_reset_min_distance
                {
                    prop.reset();
                }
            }
        }
    }
    knocked
}

fn try_knock(
    prop: &mut DynamicProp,
    vehicle: &mut Vehicle,
    config: &DrivingConfig,
    session: &mut SessionState,
    sink: &mut impl EffectSink,
) -> bool {
    let profile = prop.kind.profile();
    let impact_force = vehicle.speed.abs() * config.prop_impact_force_scale;
    if impact_force <= profile.knock_threshold || !prop.touches(vehicle) {
        return false;
    }

    let away = ground_normal(vehicle.position, prop.position).unwrap_or(vehicle.direction);
    let mut velocity = vehicle.velocity() * config.prop_carry_fraction + away * impact_force;
    velocity.y += config.prop_launch_lift + impact_force * config.prop_vertical_bias;
    prop.velocity = velocity;

    let spin = config.prop_spin_max;
    prop.angular_velocity = Vec3::new(
        session.rng.gen_range(-spin..=spin),
        session.rng.gen_range(-spin..=spin),
        session.rng.gen_range(-spin..=spin),
    );
    prop.state = PropState::KnockedOver;
    prop.reset_timer = 0.0;

    if profile.pole {
        prop.light_intensity = STREETLIGHT_INTENSITY
            * session
                .rng
                .gen_range(STREETLIGHT_FLICKER_MIN..STREETLIGHT_FLICKER_MAX);
    }

    vehicle.speed *= (1.0 - prop.mass * config.prop_slowdown_per_mass).max(PROP_MIN_SPEED_RETAIN);

    session.props_knocked += 1;
    session.award(profile.score, sink);
    info!(
        "Knocked over {:?} at ({:.1}, {:.1}) with force {:.1} (+{})",
        prop.kind, prop.position.x, prop.position.z, impact_force, profile.score
    );
    true
}

fn step_knocked(prop: &mut DynamicProp, dt: f32, config: &DrivingConfig) {
    prop.velocity.y -= config.gravity * dt;
    prop.position += prop.velocity * dt;
    prop.rotation = integrate_rotation(prop.rotation, prop.angular_velocity, dt);

    let floor = prop.original_position.y;
    if prop.position.y <= floor {
        prop.position.y = floor;
        if prop.velocity.y < 0.0 {
            prop.velocity.y = -prop.velocity.y * config.prop_bounce;
        }
        if prop.velocity.y.abs() < PROP_BOUNCE_CUTOFF {
            prop.velocity.y = 0.0;
        }
        prop.velocity.x *= config.prop_ground_friction;
        prop.velocity.z *= config.prop_ground_friction;
        prop.angular_velocity *= config.prop_ground_spin_damping;
    }

    prop.velocity *= config.prop_air_resistance;
    prop.angular_velocity *= config.prop_air_resistance;

    if prop.kind.profile().pole {
        let upright = (prop.rotation * Vec3::Y).y.max(0.0);
        prop.light_intensity = STREETLIGHT_INTENSITY * upright;
    }

    prop.reset_timer += dt;
}

fn should_reset(prop: &DynamicProp, bounds: &WorldBounds, config: &DrivingConfig) -> bool {
    let at_rest = prop.velocity.length() < PROP_REST_LINEAR
        && prop.angular_velocity.length() < PROP_REST_ANGULAR;
    let lost = !bounds.contains(prop.position, 0.0);
    at_rest || lost || prop.reset_timer > config.prop_reset_timeout
}
