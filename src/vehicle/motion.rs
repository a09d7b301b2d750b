//! Integration, static-obstacle response and the vertical state machine.

use super::state::{Vehicle, VerticalState};
use crate::collision::{
    check_collision, sweep_collision, sweep_sample_count, CollisionHit,
};
use crate::config::DrivingConfig;
use crate::world::Obstacle;
use bevy::prelude::*;

/// Advance the car horizontally by one tick and resolve any obstacle hit.
///
/// `boost_multiplier` scales the travel velocity, never the stored speed.
/// Returns the hit that was resolved, if any.
pub fn integrate_motion(
    vehicle: &mut Vehicle,
    boost_multiplier: f32,
    obstacles: &[Obstacle],
    dt: f32,
    config: &DrivingConfig,
) -> Option<CollisionHit> {
    let velocity = vehicle.direction * vehicle.speed * boost_multiplier;
    let candidate = vehicle.position + velocity * dt;
    let radius = vehicle.tuning.radius;

    // A fast airborne car can cover more than its own width in one tick, so
    // sample the whole hop instead of just its end point.
    let fast = (vehicle.speed * boost_multiplier).abs() > config.fast_motion_threshold;
    let (hit, safe) = if vehicle.is_airborne() && fast {
        let travel = (candidate - vehicle.position).length();
        let samples = sweep_sample_count(travel, config.sweep_sample_spacing, config.sweep_min_samples);
        let sweep = sweep_collision(vehicle.position, candidate, radius, obstacles, samples);
        (sweep.hit, sweep.last_free)
    } else {
        (check_collision(candidate, radius, obstacles), vehicle.position)
    };

    match hit {
        None => {
            vehicle.position = candidate;
            vehicle.last_safe_position = candidate;
            vehicle.colliding = false;
            None
        }
        Some(hit) => {
            resolve_collision(vehicle, &obstacles[hit.obstacle], hit.normal, safe, config);
            Some(hit)
        }
    }
}

/// Bounce the car off `obstacle` and move it somewhere clear.
///
/// - With a normal: reflect the travel direction (`v − 2(v·n)n`), keep
///   `bounce_factor` of the impact speed, and either land (airborne and
///   falling) or get kicked up (impact above `hard_hit_speed`).  The car goes
///   back to `safe` when that is clear of the obstacle, otherwise it is pushed
///   out from the obstacle centre along the normal.
/// - Without a normal: stop dead at `safe`.
pub fn resolve_collision(
    vehicle: &mut Vehicle,
    obstacle: &Obstacle,
    normal: Option<Vec3>,
    safe: Vec3,
    config: &DrivingConfig,
) {
    vehicle.colliding = true;
    let impact = vehicle.speed.abs();

    let Some(normal) = normal else {
        vehicle.speed = 0.0;
        vehicle.position = safe;
        vehicle.last_safe_position = safe;
        vehicle.sync_orientation();
        return;
    };

    let velocity = vehicle.velocity();
    let reflected = velocity - 2.0 * velocity.dot(normal) * normal;
    if vehicle.set_heading(reflected) {
        vehicle.speed = impact * config.bounce_factor;
    } else {
        vehicle.speed = 0.0;
    }

    if vehicle.is_airborne() && vehicle.vertical_velocity < 0.0 {
        // Came down on top of it.
        vehicle.vertical = VerticalState::Grounded;
        vehicle.position.y = vehicle.tuning.ride_height;
        vehicle.vertical_velocity = 0.0;
        vehicle.pitch = 0.0;
        vehicle.roll = 0.0;
    } else if impact > config.hard_hit_speed {
        vehicle.vertical = VerticalState::Airborne;
        vehicle.vertical_velocity = (impact * config.hard_hit_lift_scale).min(config.hard_hit_lift_max);
    }

    let radius = vehicle.tuning.radius;
    let target = if check_collision(safe, radius, std::slice::from_ref(obstacle)).is_none() {
        safe
    } else {
        let separation = separation_along(obstacle, normal, radius);
        let pushed = obstacle.position + normal * (separation + config.separation_epsilon);
        Vec3::new(pushed.x, vehicle.position.y, pushed.z)
    };
    vehicle.position.x = target.x;
    vehicle.position.z = target.z;
    vehicle.last_safe_position = vehicle.position;
    vehicle.sync_orientation();
}

/// Centre distance along `normal` at which the car no longer touches
/// `obstacle`.  Boxes are tested against the car's bounding square, whose
/// support along the normal is `r·(|n.x| + |n.z|)`.
fn separation_along(obstacle: &Obstacle, normal: Vec3, radius: f32) -> f32 {
    let car = if obstacle.kind.has_box_footprint() {
        radius * (normal.x.abs() + normal.z.abs())
    } else {
        radius
    };
    car + obstacle.extent_along(normal)
}

/// Step the `Grounded | OnRamp | Airborne` machine.  Returns `true` on the
/// tick the car touches down on the road.
pub fn update_vertical(vehicle: &mut Vehicle, dt: f32, config: &DrivingConfig) -> bool {
    let ride_height = vehicle.tuning.ride_height;
    match vehicle.vertical {
        VerticalState::Airborne => {
            vehicle.vertical_velocity -= config.gravity * dt;
            vehicle.position.y += vehicle.vertical_velocity * dt;
            if vehicle.position.y <= ride_height {
                vehicle.position.y = ride_height;
                vehicle.vertical_velocity = 0.0;
                vehicle.vertical = VerticalState::Grounded;
                vehicle.speed *= config.landing_friction;
                vehicle.pitch *= config.landing_tilt_relax;
                vehicle.roll *= config.landing_tilt_relax;
                return true;
            }
            false
        }
        VerticalState::Grounded => {
            vehicle.position.y = ride_height;
            vehicle.pitch *= config.ground_tilt_relax;
            vehicle.roll *= config.ground_tilt_relax;
            false
        }
        // Height and pitch belong to the ramp resolver.
        VerticalState::OnRamp => false,
    }
}

/// Cosmetic wheel spin.
pub fn spin_wheels(vehicle: &mut Vehicle, dt: f32, config: &DrivingConfig) {
    if !vehicle.is_airborne() && vehicle.speed != 0.0 {
        vehicle.wheel_rotation += vehicle.speed * config.wheel_spin_rate * dt;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vehicle::VehicleTuning;
    use crate::world::ObstacleKind;

    const DT: f32 = 1.0 / 60.0;

    fn car_at(z: f32) -> Vehicle {
        Vehicle::new(Vec3::new(0.0, 0.5, z), 0.0, VehicleTuning::default())
    }

    fn wall_at(z: f32) -> Obstacle {
        Obstacle::boxed(ObstacleKind::Building, Vec3::new(0.0, 0.0, z), 4.0, 4.0, 0.0)
    }

    // ── integrate_motion ──────────────────────────────────────────────────────

    #[test]
    fn clear_road_commits_candidate() {
        let cfg = DrivingConfig::default();
        let mut v = car_at(0.0);
        v.speed = 12.0;
        let hit = integrate_motion(&mut v, 1.0, &[], 0.5, &cfg);
        assert!(hit.is_none());
        assert!((v.position.z - 6.0).abs() < 1e-5);
        assert_eq!(v.last_safe_position, v.position);
        assert!(!v.colliding);
    }

    #[test]
    fn boost_multiplier_scales_travel_not_speed() {
        let cfg = DrivingConfig::default();
        let mut v = car_at(0.0);
        v.speed = 10.0;
        integrate_motion(&mut v, 1.5, &[], 1.0, &cfg);
        assert!((v.position.z - 15.0).abs() < 1e-5);
        assert_eq!(v.speed, 10.0);
    }

    #[test]
    fn head_on_box_bounces_back_and_separates() {
        let cfg = DrivingConfig::default();
        let mut v = car_at(6.3);
        v.speed = 20.0;
        let walls = [wall_at(10.0)];
        let hit = integrate_motion(&mut v, 1.0, &walls, DT, &cfg).expect("wall hit");

        assert_eq!(hit.obstacle, 0);
        assert!(v.colliding);
        assert!((v.speed - 6.0).abs() < 1e-4, "bounce keeps 30 %: {}", v.speed);
        assert!(v.direction.z < -0.99, "heading reversed: {:?}", v.direction);
        assert!(
            check_collision(v.position, v.tuning.radius, &walls).is_none(),
            "car left overlapping at {:?}",
            v.position
        );
    }

    #[test]
    fn head_on_building_hit_returns_to_the_safe_point() {
        let cfg = DrivingConfig::default();
        let mut v = car_at(20.3);
        v.speed = 20.0;
        let building = [Obstacle::boxed(
            ObstacleKind::Building,
            Vec3::new(0.0, 0.0, 40.0),
            36.0,
            36.0,
            0.0,
        )];
        let before = v.position;
        integrate_motion(&mut v, 1.0, &building, DT, &cfg).expect("face hit");

        let moved = Vec2::new(v.position.x - before.x, v.position.z - before.z).length();
        assert!(moved < 1e-4, "car jumped {moved} units on impact");
        assert!(check_collision(v.position, v.tuning.radius, &building).is_none());
    }

    #[test]
    fn overlapping_safe_point_is_pushed_just_clear() {
        let cfg = DrivingConfig::default();
        let block = Obstacle::boxed(ObstacleKind::Building, Vec3::ZERO, 4.0, 4.0, 0.0);
        for i in 0..12 {
            let angle = i as f32 * std::f32::consts::TAU / 12.0;
            let normal = Vec3::new(angle.cos(), 0.0, angle.sin());
            let mut v = car_at(0.0);
            let inside = Vec3::new(normal.x, 0.5, normal.z);
            v.position = inside;
            v.speed = 10.0;
            resolve_collision(&mut v, &block, Some(normal), inside, &cfg);

            assert!(
                check_collision(v.position, v.tuning.radius, std::slice::from_ref(&block)).is_none(),
                "still overlapping at angle {angle}: {:?}",
                v.position
            );
            let out = Vec2::new(v.position.x, v.position.z).length();
            assert!(out < (2.0 + 1.5) * std::f32::consts::SQRT_2 + 0.2, "pushed too far: {out}");
        }
    }

    #[test]
    fn boosted_airborne_hop_is_swept() {
        let cfg = DrivingConfig::default();
        let mut v = car_at(0.0);
        v.vertical = VerticalState::Airborne;
        v.vertical_velocity = 2.0;
        v.speed = 16.0;
        let walls = [Obstacle::boxed(
            ObstacleKind::BoundaryWall,
            Vec3::new(0.0, 0.0, 5.0),
            20.0,
            0.2,
            0.0,
        )];
        let hit = integrate_motion(&mut v, 1.6, &walls, 0.4, &cfg);
        assert!(hit.is_some(), "25.6 u/s of travel must use the swept check");
        assert!(v.position.z < 5.0);
    }

    #[test]
    fn fast_airborne_hop_does_not_tunnel() {
        let cfg = DrivingConfig::default();
        let mut v = car_at(0.0);
        v.vertical = VerticalState::Airborne;
        v.vertical_velocity = 2.0;
        v.speed = 40.0;
        // Thin wall the end point alone would jump straight over.
        let walls = [Obstacle::boxed(
            ObstacleKind::BoundaryWall,
            Vec3::new(0.0, 0.0, 5.0),
            20.0,
            0.2,
            0.0,
        )];
        let hit = integrate_motion(&mut v, 1.0, &walls, 0.25, &cfg);
        assert!(hit.is_some(), "the swept check must catch the wall");
        assert!(v.position.z < 5.0);
    }

    // ── resolve_collision ─────────────────────────────────────────────────────

    #[test]
    fn missing_normal_stops_at_safe_position() {
        let cfg = DrivingConfig::default();
        let mut v = car_at(0.0);
        v.speed = 15.0;
        let safe = Vec3::new(1.0, 0.5, -2.0);
        resolve_collision(&mut v, &wall_at(0.0), None, safe, &cfg);
        assert_eq!(v.speed, 0.0);
        assert_eq!(v.position, safe);
        assert!(v.direction.is_finite());
    }

    #[test]
    fn hard_hit_lifts_the_car() {
        let cfg = DrivingConfig::default();
        let mut v = car_at(0.0);
        v.speed = 30.0;
        resolve_collision(&mut v, &wall_at(10.0), Some(Vec3::NEG_Z), Vec3::new(0.0, 0.5, -5.0), &cfg);
        assert!(v.is_airborne());
        assert!((v.vertical_velocity - 4.5).abs() < 1e-5);
        assert!((v.speed - 9.0).abs() < 1e-5);
    }

    #[test]
    fn falling_onto_an_obstacle_is_a_hard_landing() {
        let cfg = DrivingConfig::default();
        let mut v = car_at(0.0);
        v.vertical = VerticalState::Airborne;
        v.vertical_velocity = -4.0;
        v.pitch = 0.3;
        v.roll = -0.2;
        v.speed = 30.0;
        resolve_collision(&mut v, &wall_at(10.0), Some(Vec3::NEG_Z), Vec3::new(0.0, 3.0, -5.0), &cfg);
        assert_eq!(v.vertical, VerticalState::Grounded);
        assert_eq!(v.position.y, v.tuning.ride_height);
        assert_eq!(v.pitch, 0.0);
        assert_eq!(v.roll, 0.0);
    }

    #[test]
    fn reflection_never_gains_speed() {
        let cfg = DrivingConfig::default();
        for i in 0..16 {
            let angle = i as f32 * std::f32::consts::TAU / 16.0;
            let normal = Vec3::new(angle.cos(), 0.0, angle.sin());
            let mut v = car_at(0.0);
            v.speed = 18.0;
            resolve_collision(&mut v, &wall_at(30.0), Some(normal), Vec3::ZERO, &cfg);
            assert!(v.speed.abs() <= 18.0 * cfg.bounce_factor + 1e-5);
        }
    }

    // ── update_vertical ───────────────────────────────────────────────────────

    #[test]
    fn airborne_falls_and_lands_with_friction() {
        let cfg = DrivingConfig::default();
        let mut v = car_at(0.0);
        v.vertical = VerticalState::Airborne;
        v.position.y = 3.0;
        v.speed = 20.0;
        v.pitch = 0.4;

        let mut landed = false;
        for _ in 0..120 {
            if update_vertical(&mut v, DT, &cfg) {
                landed = true;
                break;
            }
        }
        assert!(landed);
        assert_eq!(v.position.y, v.tuning.ride_height);
        assert_eq!(v.vertical_velocity, 0.0);
        assert!((v.speed - 18.0).abs() < 1e-5);
        assert!((v.pitch - 0.2).abs() < 1e-6);
    }

    #[test]
    fn grounded_locks_height_and_relaxes_tilt() {
        let cfg = DrivingConfig::default();
        let mut v = car_at(0.0);
        v.position.y = 0.7;
        v.roll = 0.1;
        assert!(!update_vertical(&mut v, DT, &cfg));
        assert_eq!(v.position.y, v.tuning.ride_height);
        assert!((v.roll - 0.09).abs() < 1e-7);
    }

    #[test]
    fn wheels_only_spin_on_the_ground() {
        let cfg = DrivingConfig::default();
        let mut v = car_at(0.0);
        v.speed = 10.0;
        spin_wheels(&mut v, 0.5, &cfg);
        assert!((v.wheel_rotation - 10.0).abs() < 1e-5);
        v.vertical = VerticalState::Airborne;
        spin_wheels(&mut v, 0.5, &cfg);
        assert!((v.wheel_rotation - 10.0).abs() < 1e-5);
    }
}
