//! Vehicle kinematic state.
//!
//! Everything the dynamics engine mutates lives on [`Vehicle`]; the systems
//! that mutate it are in the sibling modules:
//! - [`super::control`]: pedals, steering, air control, drift detection
//! - [`super::motion`]: integration, obstacle response, vertical state machine
//! - [`super::drift`]: skid marks

use crate::constants::*;
use crate::world::SpawnPose;
use bevy::prelude::*;

/// Which surface (if any) carries the car.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VerticalState {
    /// On the road; height locked to the ride height.
    #[default]
    Grounded,
    /// On a ramp or launchpad; height and pitch owned by the ramp resolver.
    OnRamp,
    /// Ballistic; integrates vertical velocity under gravity.
    Airborne,
}

/// Per-car tunables, copied from [`crate::config::DrivingConfig`] at spawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VehicleTuning {
    pub max_speed: f32,
    pub acceleration: f32,
    pub braking: f32,
    pub deceleration: f32,
    pub turn_speed: f32,
    pub radius: f32,
    pub ride_height: f32,
}

impl Default for VehicleTuning {
    fn default() -> Self {
        Self {
            max_speed: VEHICLE_MAX_SPEED,
            acceleration: VEHICLE_ACCELERATION,
            braking: VEHICLE_BRAKING,
            deceleration: VEHICLE_DECELERATION,
            turn_speed: VEHICLE_TURN_SPEED,
            radius: VEHICLE_RADIUS,
            ride_height: RIDE_HEIGHT,
        }
    }
}

/// The player's car.
///
/// `direction` is always the unit vector of +Z rotated by `yaw`, and
/// `rotation` the quaternion of (yaw, pitch, roll); call
/// [`Vehicle::sync_orientation`] after touching any angle.  Positive pitch is
/// nose-down; positive yaw turns left.
#[derive(Debug, Clone, PartialEq)]
pub struct Vehicle {
    pub position: Vec3,
    pub pitch: f32,
    pub roll: f32,
    pub yaw: f32,
    pub rotation: Quat,
    pub direction: Vec3,
    /// Signed speed along `direction` (u/s); negative while reversing.
    pub speed: f32,
    pub vertical_velocity: f32,
    pub vertical: VerticalState,
    /// Set on the tick the car hit an obstacle.
    pub colliding: bool,
    pub drifting: bool,
    /// Smoothed steering input in [−1, 1].
    pub turn_amount: f32,
    /// Cosmetic wheel angle (rad).
    pub wheel_rotation: f32,
    /// Most recent position known to be clear of every obstacle.
    pub last_safe_position: Vec3,
    pub tuning: VehicleTuning,
}

impl Vehicle {
    pub fn new(position: Vec3, yaw: f32, tuning: VehicleTuning) -> Self {
        let mut vehicle = Self {
            position,
            pitch: 0.0,
            roll: 0.0,
            yaw,
            rotation: Quat::IDENTITY,
            direction: Vec3::Z,
            speed: 0.0,
            vertical_velocity: 0.0,
            vertical: VerticalState::Grounded,
            colliding: false,
            drifting: false,
            turn_amount: 0.0,
            wheel_rotation: 0.0,
            last_safe_position: position,
            tuning,
        };
        vehicle.sync_orientation();
        vehicle
    }

    /// Place the car at a ground-level spawn pose, lifted to its ride height.
    pub fn spawn(pose: SpawnPose, tuning: VehicleTuning) -> Self {
        let position = Vec3::new(pose.position.x, tuning.ride_height, pose.position.z);
        Self::new(position, pose.yaw, tuning)
    }

    #[inline]
    pub fn is_airborne(&self) -> bool {
        self.vertical == VerticalState::Airborne
    }

    #[inline]
    pub fn is_on_ramp(&self) -> bool {
        self.vertical == VerticalState::OnRamp
    }

    /// |speed| / max_speed.
    pub fn normalized_speed(&self) -> f32 {
        if self.tuning.max_speed > 0.0 {
            self.speed.abs() / self.tuning.max_speed
        } else {
            0.0
        }
    }

    /// Horizontal velocity (u/s), ignoring boost.
    pub fn velocity(&self) -> Vec3 {
        self.direction * self.speed
    }

    /// Recompute `direction` and `rotation` from the Euler angles.
    pub fn sync_orientation(&mut self) {
        self.direction = forward_from_yaw(self.yaw);
        self.rotation = Quat::from_euler(EulerRot::YXZ, self.yaw, self.pitch, self.roll);
    }

    /// Point the car along a ground-plane direction.  Returns `false` (and
    /// leaves the heading alone) for a zero-length vector.
    pub fn set_heading(&mut self, direction: Vec3) -> bool {
        let flat = Vec3::new(direction.x, 0.0, direction.z);
        match flat.try_normalize() {
            Some(dir) => {
                self.yaw = yaw_of(dir);
                self.sync_orientation();
                true
            }
            None => false,
        }
    }

    /// Pull speed back inside [−max/2, max] after a transient nudge.
    pub fn clamp_speed(&mut self) {
        let max = self.tuning.max_speed;
        self.speed = self.speed.clamp(-max * 0.5, max);
    }

    /// Ground-level world positions of the two rear wheels.
    pub fn rear_wheel_positions(&self) -> [Vec3; 2] {
        let heading = Quat::from_rotation_y(self.yaw);
        [-REAR_WHEEL_OFFSET_X, REAR_WHEEL_OFFSET_X].map(|x| {
            let p = self.position + heading * Vec3::new(x, 0.0, REAR_WHEEL_OFFSET_Z);
            Vec3::new(p.x, SKID_MARK_HEIGHT, p.z)
        })
    }

    /// Midpoint behind the car, used for the boost trail.
    pub fn rear_position(&self) -> Vec3 {
        self.position + Quat::from_rotation_y(self.yaw) * Vec3::new(0.0, 0.0, REAR_WHEEL_OFFSET_Z)
    }
}

/// Unit forward vector for a yaw angle: +Z rotated about +Y.
#[inline]
pub fn forward_from_yaw(yaw: f32) -> Vec3 {
    let (sin, cos) = yaw.sin_cos();
    Vec3::new(sin, 0.0, cos)
}

/// Yaw angle of a ground-plane direction; inverse of [`forward_from_yaw`].
#[inline]
pub fn yaw_of(direction: Vec3) -> f32 {
    direction.x.atan2(direction.z)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_follows_yaw() {
        let mut car = Vehicle::new(Vec3::ZERO, 0.0, VehicleTuning::default());
        assert!((car.direction - Vec3::Z).length() < 1e-6);

        car.yaw = std::f32::consts::FRAC_PI_2;
        car.sync_orientation();
        assert!((car.direction - Vec3::X).length() < 1e-6);
        assert!((car.rotation * Vec3::Z - car.direction).length() < 1e-5);
    }

    #[test]
    fn positive_pitch_is_nose_down() {
        let mut car = Vehicle::new(Vec3::ZERO, 0.0, VehicleTuning::default());
        car.pitch = 0.3;
        car.sync_orientation();
        let nose = car.rotation * Vec3::Z;
        assert!(nose.y < 0.0, "nose {nose:?}");
    }

    #[test]
    fn zero_heading_is_rejected() {
        let mut car = Vehicle::new(Vec3::ZERO, 1.0, VehicleTuning::default());
        assert!(!car.set_heading(Vec3::Y));
        assert_eq!(car.yaw, 1.0);
    }

    #[test]
    fn spawn_lifts_to_ride_height() {
        let pose = SpawnPose {
            position: Vec3::new(3.0, 0.0, -4.0),
            yaw: 0.5,
        };
        let car = Vehicle::spawn(pose, VehicleTuning::default());
        assert_eq!(car.position, Vec3::new(3.0, RIDE_HEIGHT, -4.0));
        assert_eq!(car.last_safe_position, car.position);
    }

    #[test]
    fn clamp_speed_limits_reverse_to_half() {
        let mut car = Vehicle::new(Vec3::ZERO, 0.0, VehicleTuning::default());
        car.speed = -100.0;
        car.clamp_speed();
        assert_eq!(car.speed, -VEHICLE_MAX_SPEED * 0.5);
        car.speed = 100.0;
        car.clamp_speed();
        assert_eq!(car.speed, VEHICLE_MAX_SPEED);
    }

    #[test]
    fn rear_wheels_sit_behind_the_car() {
        let car = Vehicle::new(Vec3::new(0.0, RIDE_HEIGHT, 0.0), 0.0, VehicleTuning::default());
        for wheel in car.rear_wheel_positions() {
            assert!(wheel.z < 0.0);
            assert_eq!(wheel.y, SKID_MARK_HEIGHT);
        }
    }
}
