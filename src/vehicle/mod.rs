//! Vehicle dynamics engine.
//!
//! ## Sub-modules
//! - [`state`]: `Vehicle`, `VehicleTuning`, `VerticalState`
//! - [`control`]: pedals, steering, air control, drift detection
//! - [`motion`]: integration, obstacle response, vertical state machine
//! - [`drift`]: skid marks

pub mod control;
pub mod drift;
pub mod motion;
pub mod state;

pub use control::{apply_longitudinal, apply_steering, detect_drift, steering_intensity};
pub use drift::{SkidMark, SkidMarks};
pub use motion::{integrate_motion, resolve_collision, spin_wheels, update_vertical};
pub use state::{forward_from_yaw, yaw_of, Vehicle, VehicleTuning, VerticalState};

use crate::collision::CollisionHit;
use crate::config::DrivingConfig;
use crate::input::KeySnapshot;
use crate::world::Obstacle;

/// What happened to the car during one [`update_vehicle`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct VehicleReport {
    pub collision: Option<CollisionHit>,
    /// |speed| at the moment of the hit.
    pub impact_speed: f32,
    /// Touched down on the road this tick.
    pub landed: bool,
}

/// Advance the car by one tick.
///
/// Order: re-clamp speed, pedals, steering, drift flag, integrate against the
/// static obstacles, vertical state, wheel spin.  Ramps, world bounds and
/// skid marks are applied afterwards by the orchestration loop.
pub fn update_vehicle(
    vehicle: &mut Vehicle,
    input: &KeySnapshot,
    boost_multiplier: f32,
    obstacles: &[Obstacle],
    dt: f32,
    config: &DrivingConfig,
) -> VehicleReport {
    vehicle.clamp_speed();

    apply_longitudinal(vehicle, input, dt, config);
    apply_steering(vehicle, input, dt, config);
    vehicle.drifting = detect_drift(vehicle, input, config);
    vehicle.sync_orientation();

    let impact_speed = vehicle.speed.abs();
    let collision = integrate_motion(vehicle, boost_multiplier, obstacles, dt, config);
    let landed = update_vertical(vehicle, dt, config);
    spin_wheels(vehicle, dt, config);
    vehicle.sync_orientation();

    VehicleReport {
        collision,
        impact_speed: if collision.is_some() { impact_speed } else { 0.0 },
        landed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::check_collision;
    use crate::world::ObstacleKind;
    use bevy::prelude::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    const DT: f32 = 1.0 / 60.0;

    fn car() -> Vehicle {
        Vehicle::new(Vec3::new(0.0, 0.5, 0.0), 0.0, VehicleTuning::default())
    }

    #[test]
    fn full_throttle_reaches_top_speed_within_two_seconds() {
        let cfg = DrivingConfig::default();
        let mut v = car();
        let mut last_z = v.position.z;
        let mut reached = None;

        for tick in 0..120 {
            update_vehicle(&mut v, &KeySnapshot::throttle(), 1.0, &[], DT, &cfg);
            assert!(v.position.z > last_z, "z must increase every tick (tick {tick})");
            last_z = v.position.z;
            if reached.is_none() && v.speed >= cfg.vehicle_max_speed {
                reached = Some(tick);
            }
        }
        let tick = reached.expect("top speed never reached");
        assert!((tick as f32 + 1.0) * DT < 2.0);
        assert_eq!(v.speed, cfg.vehicle_max_speed);
    }

    #[test]
    fn head_on_into_box_reverses_and_slows() {
        let cfg = DrivingConfig::default();
        let walls = [Obstacle::boxed(
            ObstacleKind::Building,
            Vec3::new(0.0, 0.0, 10.0),
            4.0,
            4.0,
            0.0,
        )];
        let mut v = car();
        v.speed = 20.0;

        let mut report = VehicleReport::default();
        for _ in 0..60 {
            report = update_vehicle(&mut v, &KeySnapshot::default(), 1.0, &walls, DT, &cfg);
            if report.collision.is_some() {
                break;
            }
        }
        assert!(report.collision.is_some(), "never reached the wall");
        let expected = report.impact_speed * cfg.bounce_factor;
        assert!((v.speed - expected).abs() < 1e-3, "speed {} expected {expected}", v.speed);
        assert!(v.direction.z < 0.0);
        assert!(check_collision(v.position, v.tuning.radius, &walls).is_none());
    }

    #[test]
    fn speed_stays_bounded_under_random_input() {
        let cfg = DrivingConfig::default();
        let mut rng = StdRng::seed_from_u64(42);
        let mut v = car();
        let max = cfg.vehicle_max_speed;

        for _ in 0..2000 {
            let keys = KeySnapshot {
                forward: rng.gen_bool(0.6),
                reverse: rng.gen_bool(0.3),
                left: rng.gen_bool(0.3),
                right: rng.gen_bool(0.3),
                boost: false,
            };
            let dt = rng.gen_range(0.0..0.1);
            update_vehicle(&mut v, &keys, 1.0, &[], dt, &cfg);
            assert!(v.speed <= max + 1e-4 && v.speed >= -max * 0.5 - 1e-4, "speed {}", v.speed);
            assert!((v.direction - forward_from_yaw(v.yaw)).length() < 1e-5);
        }
    }

    #[test]
    fn drifting_flag_follows_input() {
        let cfg = DrivingConfig::default();
        let mut v = car();
        v.speed = 35.0;
        let keys = KeySnapshot {
            forward: true,
            left: true,
            ..Default::default()
        };
        update_vehicle(&mut v, &keys, 1.0, &[], DT, &cfg);
        assert!(v.drifting);
        update_vehicle(&mut v, &KeySnapshot::throttle(), 1.0, &[], DT, &cfg);
        assert!(!v.drifting);
    }
}
