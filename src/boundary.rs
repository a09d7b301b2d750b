//! World boundary enforcement.
//!
//! Bodies are clamped into the playable rectangle shrunk by their radius, and
//! the outward component of their velocity is reflected and scaled by a
//! restitution factor.  The car bounces at 0.5; pedestrians at 1.0.

use crate::config::DrivingConfig;
use crate::vehicle::Vehicle;
use crate::world::WorldBounds;
use bevy::prelude::*;

/// The wall(s) a body was pushed back from this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundaryContact {
    /// Inward-pointing ground-plane normal; diagonal (normalised) in a corner.
    pub normal: Vec3,
}

/// Clamp `position` inside `bounds` padded by `radius` and reflect the
/// outward part of `velocity`.  Returns `None` when already inside.
pub fn confine(
    position: &mut Vec3,
    velocity: &mut Vec3,
    radius: f32,
    bounds: &WorldBounds,
    restitution: f32,
) -> Option<BoundaryContact> {
    let min = bounds.min + Vec2::splat(radius);
    let max = bounds.max - Vec2::splat(radius);
    let mut normal = Vec3::ZERO;

    if position.x < min.x {
        position.x = min.x;
        normal.x = 1.0;
        if velocity.x < 0.0 {
            velocity.x = -velocity.x * restitution;
        }
    } else if position.x > max.x {
        position.x = max.x;
        normal.x = -1.0;
        if velocity.x > 0.0 {
            velocity.x = -velocity.x * restitution;
        }
    }

    if position.z < min.y {
        position.z = min.y;
        normal.z = 1.0;
        if velocity.z < 0.0 {
            velocity.z = -velocity.z * restitution;
        }
    } else if position.z > max.y {
        position.z = max.y;
        normal.z = -1.0;
        if velocity.z > 0.0 {
            velocity.z = -velocity.z * restitution;
        }
    }

    normal.try_normalize().map(|normal| BoundaryContact { normal })
}

/// Keep the car in the world.  Speed and heading are rebuilt from the
/// reflected velocity; a zero result stops the car without turning it.
pub fn confine_vehicle(
    vehicle: &mut Vehicle,
    bounds: &WorldBounds,
    config: &DrivingConfig,
) -> Option<BoundaryContact> {
    let mut velocity = vehicle.velocity();
    let contact = confine(
        &mut vehicle.position,
        &mut velocity,
        vehicle.tuning.radius,
        bounds,
        config.boundary_bounce,
    )?;

    let flat = Vec3::new(velocity.x, 0.0, velocity.z);
    let travel = flat.length();
    // A reversing car keeps backing up, just away from the wall.
    let reversing = vehicle.speed < 0.0;
    let heading = if reversing { -flat } else { flat };
    if vehicle.set_heading(heading) {
        vehicle.speed = if reversing { -travel } else { travel };
    } else {
        vehicle.speed = 0.0;
    }
    vehicle.last_safe_position = vehicle.position;
    Some(contact)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vehicle::VehicleTuning;

    fn arena() -> WorldBounds {
        WorldBounds::new(Vec2::splat(-50.0), Vec2::splat(50.0))
    }

    #[test]
    fn inside_is_untouched() {
        let mut p = Vec3::new(10.0, 0.0, -10.0);
        let mut v = Vec3::new(3.0, 0.0, 4.0);
        assert!(confine(&mut p, &mut v, 1.0, &arena(), 0.5).is_none());
        assert_eq!(p, Vec3::new(10.0, 0.0, -10.0));
        assert_eq!(v, Vec3::new(3.0, 0.0, 4.0));
    }

    #[test]
    fn outward_component_reflects_with_restitution() {
        let mut p = Vec3::new(52.0, 1.0, 0.0);
        let mut v = Vec3::new(10.0, 0.0, 2.0);
        let contact = confine(&mut p, &mut v, 1.0, &arena(), 0.5).expect("outside");
        assert_eq!(p.x, 49.0);
        assert_eq!(v, Vec3::new(-5.0, 0.0, 2.0));
        assert_eq!(contact.normal, Vec3::NEG_X);
    }

    #[test]
    fn corner_contact_has_diagonal_normal() {
        let mut p = Vec3::new(-60.0, 0.0, -60.0);
        let mut v = Vec3::new(-1.0, 0.0, -1.0);
        let contact = confine(&mut p, &mut v, 0.0, &arena(), 1.0).expect("outside");
        assert!((contact.normal - Vec3::new(1.0, 0.0, 1.0).normalize()).length() < 1e-6);
        assert_eq!(v, Vec3::new(1.0, 0.0, 1.0));
    }

    #[test]
    fn vehicle_bounces_back_at_half_speed() {
        let cfg = DrivingConfig::default();
        let mut car = Vehicle::new(Vec3::new(0.0, 0.5, 55.0), 0.0, VehicleTuning::default());
        car.speed = 20.0;

        confine_vehicle(&mut car, &arena(), &cfg).expect("outside");
        assert!((car.position.z - (50.0 - car.tuning.radius)).abs() < 1e-5);
        assert!((car.speed - 10.0).abs() < 1e-4);
        assert!(car.direction.z < -0.99);
    }

    #[test]
    fn reversing_vehicle_keeps_reversing() {
        let cfg = DrivingConfig::default();
        let mut car = Vehicle::new(Vec3::new(0.0, 0.5, -55.0), 0.0, VehicleTuning::default());
        car.speed = -10.0;

        confine_vehicle(&mut car, &arena(), &cfg).expect("outside");
        assert!((car.speed + 5.0).abs() < 1e-4);
        assert!(car.direction.z < -0.99, "nose now points at the wall");
        assert!(car.velocity().z > 0.0, "moving back into the arena");
    }

    #[test]
    fn stationary_vehicle_outside_is_pulled_in_and_stays_stopped() {
        let cfg = DrivingConfig::default();
        let mut car = Vehicle::new(Vec3::new(70.0, 0.5, 0.0), 0.7, VehicleTuning::default());
        confine_vehicle(&mut car, &arena(), &cfg).expect("outside");
        assert_eq!(car.speed, 0.0);
        assert_eq!(car.yaw, 0.7);
        assert!(arena().contains(car.position, car.tuning.radius - 1e-4));
    }
}
