//! Short-lived physics bodies (detached limbs).
//!
//! A fixed-capacity pool: spawning into a full pool evicts the oldest body.
//! Bodies fly under gravity with spin, bounce on the ground, settle once
//! slow, and are removed when their lifetime runs out.

use crate::constants::{TRANSIENT_FRICTION, TRANSIENT_RESTITUTION, TRANSIENT_SETTLE_SPEED};
use bevy::prelude::*;
use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransientKind {
    Limb,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TransientBody {
    pub kind: TransientKind,
    pub position: Vec3,
    pub rotation: Quat,
    pub velocity: Vec3,
    pub angular_velocity: Vec3,
    pub age: f32,
    pub lifetime: f32,
    pub settled: bool,
    /// Height of the body's resting point above the road.
    pub ground_offset: f32,
}

impl TransientBody {
    pub fn limb(position: Vec3, velocity: Vec3, angular_velocity: Vec3, lifetime: f32) -> Self {
        Self {
            kind: TransientKind::Limb,
            position,
            rotation: Quat::IDENTITY,
            velocity,
            angular_velocity,
            age: 0.0,
            lifetime,
            settled: false,
            ground_offset: 0.1,
        }
    }

    pub fn expired(&self) -> bool {
        self.age >= self.lifetime
    }

    fn step(&mut self, gravity: f32, dt: f32) {
        self.age += dt;
        if self.settled {
            return;
        }

        self.velocity.y -= gravity * dt;
        self.position += self.velocity * dt;
        self.rotation = integrate_rotation(self.rotation, self.angular_velocity, dt);

        if self.position.y <= self.ground_offset {
            self.position.y = self.ground_offset;
            if self.velocity.y < 0.0 {
                self.velocity.y = -self.velocity.y * TRANSIENT_RESTITUTION;
            }
            self.velocity.x *= TRANSIENT_FRICTION;
            self.velocity.z *= TRANSIENT_FRICTION;
            self.angular_velocity *= TRANSIENT_FRICTION;

            if self.velocity.length() < TRANSIENT_SETTLE_SPEED {
                self.velocity = Vec3::ZERO;
                self.angular_velocity = Vec3::ZERO;
                self.settled = true;
            }
        }
    }
}

/// Apply an angular velocity (rad/s, world axes) to a rotation over `dt`.
pub fn integrate_rotation(rotation: Quat, angular_velocity: Vec3, dt: f32) -> Quat {
    let angle = angular_velocity.length() * dt;
    if angle <= f32::EPSILON {
        return rotation;
    }
    let axis = angular_velocity.normalize();
    (Quat::from_axis_angle(axis, angle) * rotation).normalize()
}

#[derive(Debug, Clone)]
pub struct TransientPool {
    bodies: VecDeque<TransientBody>,
    capacity: usize,
}

impl TransientPool {
    pub fn new(capacity: usize) -> Self {
        Self {
            bodies: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TransientBody> {
        self.bodies.iter()
    }

    pub fn spawn(&mut self, body: TransientBody) {
        if self.capacity == 0 {
            return;
        }
        if self.bodies.len() >= self.capacity {
            self.bodies.pop_front();
        }
        self.bodies.push_back(body);
    }

    pub fn update(&mut self, gravity: f32, dt: f32) {
        for body in self.bodies.iter_mut() {
            body.step(gravity, dt);
        }
        self.bodies.retain(|body| !body.expired());
    }
}
