//! Skid marks laid while drifting.

use super::state::Vehicle;
use crate::config::DrivingConfig;
use bevy::prelude::*;
use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkidMark {
    pub position: Vec3,
    pub yaw: f32,
    pub age: f32,
}

impl SkidMark {
    /// Linear fade from 1 at birth to 0 at `lifetime`.
    pub fn opacity(&self, lifetime: f32) -> f32 {
        if lifetime <= 0.0 {
            return 0.0;
        }
        (1.0 - self.age / lifetime).clamp(0.0, 1.0)
    }
}

/// Bounded, oldest-first queue of skid marks.
#[derive(Debug, Clone, Default)]
pub struct SkidMarks {
    pub marks: VecDeque<SkidMark>,
    spawn_timer: f32,
}

impl SkidMarks {
    pub fn len(&self) -> usize {
        self.marks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.marks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SkidMark> {
        self.marks.iter()
    }

    /// Age and expire existing marks, then lay a pair under the rear wheels
    /// every `skid_mark_interval` seconds of continuous drifting.
    pub fn update(&mut self, vehicle: &Vehicle, dt: f32, config: &DrivingConfig) {
        for mark in self.marks.iter_mut() {
            mark.age += dt;
        }
        self.marks.retain(|mark| mark.age < config.skid_mark_lifetime);

        if !vehicle.drifting {
            self.spawn_timer = 0.0;
            return;
        }

        self.spawn_timer += dt;
        while self.spawn_timer >= config.skid_mark_interval {
            self.spawn_timer -= config.skid_mark_interval;
            for position in vehicle.rear_wheel_positions() {
                self.push(
                    SkidMark {
                        position,
                        yaw: vehicle.yaw,
                        age: 0.0,
                    },
                    config.skid_mark_max,
                );
            }
        }
    }

    fn push(&mut self, mark: SkidMark, max: usize) {
        if max == 0 {
            return;
        }
        while self.marks.len() >= max {
            self.marks.pop_front();
        }
        self.marks.push_back(mark);
    }
}
