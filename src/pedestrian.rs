//! Pedestrian AI.
//!
//! ```text
//! Walking ──(car within detection radius)──▶ Fleeing
//!    ▲                                          │
//!    └──(car beyond 1.5 × detection radius)─────┘
//!
//! Walking | Fleeing ──(hit by a fast car)──▶ Dead   (terminal)
//! ```
//!
//! Pedestrians far from the car only advance their animation.  Everyone is
//! kept inside the world and on the ground.

use crate::boundary::confine;
use crate::collision::{check_collision, ground_distance, ground_normal};
use crate::config::DrivingConfig;
use crate::constants::{
    PEDESTRIAN_ANIM_RATE, PEDESTRIAN_BOUNDARY_MARGIN, PEDESTRIAN_FACING_SMOOTHING,
    PEDESTRIAN_HEIGHT, PEDESTRIAN_IDLE_ANIM_RATE, PEDESTRIAN_LOOKAHEAD,
};
use crate::effects::EffectSink;
use crate::session::SessionState;
use crate::transient::{TransientBody, TransientPool};
use crate::vehicle::{yaw_of, Vehicle};
use crate::world::{Obstacle, WorldBounds};
use bevy::prelude::*;
use rand::Rng;
use std::f32::consts::FRAC_PI_2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PedestrianState {
    #[default]
    Walking,
    Fleeing,
    Dead,
}

/// Which cardinal axis a walking pedestrian follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkAxis {
    AlongX,
    AlongZ,
}

impl WalkAxis {
    fn swapped(self) -> Self {
        match self {
            WalkAxis::AlongX => WalkAxis::AlongZ,
            WalkAxis::AlongZ => WalkAxis::AlongX,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Pedestrian {
    /// Ground position; `y` is always 0.
    pub position: Vec3,
    pub velocity: Vec3,
    /// Heading angle, same convention as the car's yaw.
    pub facing: f32,
    /// 0 standing, π/2 lying down.
    pub body_pitch: f32,
    pub state: PedestrianState,
    pub walk_speed: f32,
    pub flee_speed: f32,
    pub detection_radius: f32,
    pub radius: f32,
    pub points: u32,
    pub anim_phase: f32,
    pub walk_axis: WalkAxis,
    /// +1 or −1 along `walk_axis`.
    pub walk_sign: f32,
    pub visual: Option<Entity>,
}

impl Pedestrian {
    pub fn new(position: Vec3, walk_axis: WalkAxis, walk_sign: f32, config: &DrivingConfig) -> Self {
        let mut ped = Self {
            position: Vec3::new(position.x, 0.0, position.z),
            velocity: Vec3::ZERO,
            facing: 0.0,
            body_pitch: 0.0,
            state: PedestrianState::Walking,
            walk_speed: config.pedestrian_walk_speed,
            flee_speed: config.pedestrian_flee_speed,
            detection_radius: config.pedestrian_detection_radius,
            radius: config.pedestrian_radius,
            points: config.pedestrian_points,
            anim_phase: 0.0,
            walk_axis,
            walk_sign: if walk_sign < 0.0 { -1.0 } else { 1.0 },
            visual: None,
        };
        ped.facing = yaw_of(ped.walk_direction());
        ped
    }

    pub fn is_dead(&self) -> bool {
        self.state == PedestrianState::Dead
    }

    /// Unit vector along the current walk axis and sign.
    pub fn walk_direction(&self) -> Vec3 {
        match self.walk_axis {
            WalkAxis::AlongX => Vec3::X * self.walk_sign,
            WalkAxis::AlongZ => Vec3::Z * self.walk_sign,
        }
    }
}

/// Everything a pedestrian update needs besides the pedestrian itself.
pub struct PedestrianContext<'a> {
    pub vehicle: &'a Vehicle,
    pub obstacles: &'a [Obstacle],
    pub bounds: &'a WorldBounds,
    pub dt: f32,
    pub config: &'a DrivingConfig,
}

/// Advance every pedestrian.  Returns the number killed this tick.
pub fn update_pedestrians(
    pedestrians: &mut [Pedestrian],
    ctx: &PedestrianContext<'_>,
    session: &mut SessionState,
    transients: &mut TransientPool,
    sink: &mut impl EffectSink,
) -> u32 {
    let mut kills = 0;
    for ped in pedestrians.iter_mut() {
        if ped.is_dead() {
            continue;
        }

        let distance = ground_distance(ped.position, ctx.vehicle.position);
        if distance > ctx.config.pedestrian_ai_distance {
            ped.anim_phase += PEDESTRIAN_IDLE_ANIM_RATE * ctx.dt;
            ped.position.y = 0.0;
            continue;
        }

        let contact = ctx.vehicle.tuning.radius + ped.radius;
        let low_enough = ctx.vehicle.position.y < ctx.vehicle.tuning.ride_height + PEDESTRIAN_HEIGHT;
        if distance < contact
            && low_enough
            && ctx.vehicle.speed.abs() > ctx.config.pedestrian_kill_speed
        {
            kill(ped, ctx, session, transients, sink);
            kills += 1;
            continue;
        }

        match ped.state {
            PedestrianState::Walking if distance < ped.detection_radius => {
                ped.state = PedestrianState::Fleeing;
            }
            PedestrianState::Fleeing
                if distance > ped.detection_radius * ctx.config.pedestrian_flee_hysteresis =>
            {
                ped.state = PedestrianState::Walking;
            }
            _ => {}
        }

        let heading = match ped.state {
            PedestrianState::Fleeing => flee_heading(ped, ctx),
            _ => walk_heading(ped, ctx, session),
        };
        let speed = if ped.state == PedestrianState::Fleeing {
            ped.flee_speed
        } else {
            ped.walk_speed
        };
        ped.velocity = heading * speed;
        ped.position += ped.velocity * ctx.dt;
        confine(&mut ped.position, &mut ped.velocity, ped.radius, ctx.bounds, 1.0);
        ped.position.y = 0.0;

        if ped.velocity.length_squared() > 0.0 {
            let target = yaw_of(ped.velocity);
            ped.facing += wrap_angle(target - ped.facing) * PEDESTRIAN_FACING_SMOOTHING;
        }
        if ped.walk_speed > 0.0 {
            ped.anim_phase += PEDESTRIAN_ANIM_RATE * ctx.dt * ped.velocity.length() / ped.walk_speed;
        }
    }
    kills
}

fn kill(
    ped: &mut Pedestrian,
    ctx: &PedestrianContext<'_>,
    session: &mut SessionState,
    transients: &mut TransientPool,
    sink: &mut impl EffectSink,
) {
    ped.state = PedestrianState::Dead;
    ped.velocity = Vec3::ZERO;
    ped.body_pitch = FRAC_PI_2;
    ped.facing = ctx.vehicle.yaw;
    ped.position.y = 0.0;

    session.pedestrians_hit += 1;
    session.award(ped.points, sink);
    sink.emit_blood_splatter(ped.position);

    if session.rng.gen_bool(ctx.config.limb_detach_chance) {
        let rng = &mut session.rng;
        let throw = ctx.vehicle.velocity() * 0.5
            + Vec3::new(rng.gen_range(-3.0..3.0), rng.gen_range(4.0..8.0), rng.gen_range(-3.0..3.0));
        let spin = Vec3::new(
            rng.gen_range(-8.0..8.0),
            rng.gen_range(-8.0..8.0),
            rng.gen_range(-8.0..8.0),
        );
        transients.spawn(TransientBody::limb(
            ped.position + Vec3::Y,
            throw,
            spin,
            ctx.config.limb_lifetime,
        ));
    }
    info!(
        "Pedestrian hit at ({:.1}, {:.1}), {:.1} u/s (+{})",
        ped.position.x,
        ped.position.z,
        ctx.vehicle.speed.abs(),
        ped.points
    );
}

/// Direction along the walk axis, turned around in front of walls and
/// obstacles, with an occasional random change of mind.
fn walk_heading(ped: &mut Pedestrian, ctx: &PedestrianContext<'_>, session: &mut SessionState) -> Vec3 {
    let ahead = ped.position + ped.walk_direction() * PEDESTRIAN_LOOKAHEAD;
    let blocked = !ctx.bounds.contains(ahead, PEDESTRIAN_BOUNDARY_MARGIN)
        || check_collision(ahead, ped.radius, ctx.obstacles).is_some();
    if blocked {
        ped.walk_sign = -ped.walk_sign;
    } else if session.rng.gen_bool(ctx.config.pedestrian_turn_chance) {
        if session.rng.gen_bool(0.5) {
            ped.walk_sign = -ped.walk_sign;
        } else {
            ped.walk_axis = ped.walk_axis.swapped();
        }
    }
    ped.walk_direction()
}

/// Straight away from the car, or along the wall when straight away is out
/// of the world.
fn flee_heading(ped: &Pedestrian, ctx: &PedestrianContext<'_>) -> Vec3 {
    let away = ground_normal(ctx.vehicle.position, ped.position).unwrap_or(ctx.vehicle.direction);
    if !flee_blocked(ped.position + away * PEDESTRIAN_LOOKAHEAD, ped.radius, ctx) {
        return away;
    }
    let tangents = [Vec3::new(-away.z, 0.0, away.x), Vec3::new(away.z, 0.0, -away.x)];
    tangents
        .into_iter()
        .find(|t| !flee_blocked(ped.position + *t * PEDESTRIAN_LOOKAHEAD, ped.radius, ctx))
        .unwrap_or(away)
}

fn flee_blocked(point: Vec3, radius: f32, ctx: &PedestrianContext<'_>) -> bool {
    !ctx.bounds.contains(point, PEDESTRIAN_BOUNDARY_MARGIN)
        || ctx.obstacles.iter().any(|obstacle| {
            obstacle.kind.is_boundary()
                && check_collision(point, radius, std::slice::from_ref(obstacle)).is_some()
        })
}

/// Map an angle into (−π, π].
fn wrap_angle(angle: f32) -> f32 {
    angle.sin().atan2(angle.cos())
}
