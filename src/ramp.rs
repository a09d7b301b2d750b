//! Ramp and launchpad interaction.
//!
//! Runs after the vehicle has been integrated for the tick.  Every ramp is
//! tested in list order and the first one the car is on owns its height,
//! pitch and launch for this tick.
//!
//! | Kind        | Footprint              | Launch when                                   |
//! |-------------|------------------------|-----------------------------------------------|
//! | Directional | rectangle along `yaw`  | past 80 % of its length, fast, aligned        |
//! | Launchpad   | circle                 | inside half the radius, above a small speed   |
//!
//! Speed nudges (boost on a ramp, riding a pad, launching) multiply the
//! current speed independently and stack.

use crate::collision::ground_distance;
use crate::config::DrivingConfig;
use crate::constants::{
    LAUNCHPAD_LAUNCH_BOOST, LAUNCHPAD_RIDE_NUDGE, RAMP_BOOST_NUDGE, RAMP_EXIT_FALL_MARGIN,
    RAMP_LAUNCH_BOOST,
};
use crate::effects::EffectSink;
use crate::vehicle::{forward_from_yaw, Vehicle, VerticalState};
use crate::world::{Ramp, RampKind};
use bevy::prelude::*;

/// Result of one [`resolve_ramps`] pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RampContact {
    /// Index of the ramp the car is riding, if any.
    pub ramp: Option<usize>,
    pub launched: bool,
}

/// Where the car sits on a ramp that contains it.
struct Footprint {
    /// Normalised progress from entry (0) to the high end (1).  Always 1 on a
    /// launchpad.
    progress: f32,
    /// Height of the ramp surface under the car.
    surface: f32,
    /// Pitch the car should settle into while riding.
    ride_pitch: f32,
}

fn footprint(ramp: &Ramp, position: Vec3) -> Option<Footprint> {
    match ramp.kind {
        RampKind::Directional {
            yaw,
            width,
            length,
            height,
        } => {
            if !(width > 0.0 && length > 0.0) {
                return None;
            }
            let forward = forward_from_yaw(yaw);
            let right = Vec3::new(yaw.cos(), 0.0, -yaw.sin());
            let offset = Vec3::new(position.x - ramp.position.x, 0.0, position.z - ramp.position.z);
            let along = offset.dot(forward);
            let across = offset.dot(right);

            let half_length = length * 0.5;
            if across.abs() >= width * 0.5 || along < -half_length || along > half_length {
                return None;
            }
            let progress = (along + half_length) / length;
            Some(Footprint {
                progress,
                surface: ramp.position.y + height * progress,
                ride_pitch: -height.atan2(length),
            })
        }
        RampKind::Launchpad { radius, height } => {
            if ground_distance(position, ramp.position) >= radius {
                return None;
            }
            Some(Footprint {
                progress: 1.0,
                surface: ramp.position.y + height,
                ride_pitch: 0.0,
            })
        }
    }
}

/// Put the car on the first ramp it touches and fire any launch.
///
/// With no ramp underneath, a car that was riding one either starts to fall
/// (if it left the ramp above road height) or settles on the road.
pub fn resolve_ramps(
    vehicle: &mut Vehicle,
    ramps: &[Ramp],
    boost_active: bool,
    config: &DrivingConfig,
    sink: &mut impl EffectSink,
) -> RampContact {
    let ride_height = vehicle.tuning.ride_height;
    let was_airborne = vehicle.is_airborne();

    for (index, ramp) in ramps.iter().enumerate() {
        let Some(foot) = footprint(ramp, vehicle.position) else {
            continue;
        };
        let ride_y = foot.surface + ride_height;
        // Flying over it.
        if was_airborne && vehicle.position.y > ride_y {
            continue;
        }

        vehicle.vertical = VerticalState::OnRamp;
        vehicle.position.y = ride_y;
        vehicle.vertical_velocity = 0.0;
        vehicle.pitch += (foot.ride_pitch - vehicle.pitch) * config.ramp_pitch_smoothing;

        let launched = match ramp.kind {
            RampKind::Directional { yaw, .. } => {
                if boost_active {
                    vehicle.speed *= RAMP_BOOST_NUDGE;
                }
                let aligned = vehicle.direction.dot(forward_from_yaw(yaw)) > config.ramp_alignment;
                let fire = foot.progress > config.ramp_launch_zone
                    && vehicle.speed > config.ramp_min_launch_speed
                    && aligned
                    && !was_airborne;
                if fire {
                    launch(vehicle, ramp.jump_strength, config);
                    if vehicle.speed > config.max_safe_launch_speed {
                        vehicle.speed = config.max_safe_launch_speed;
                    } else {
                        vehicle.speed *= RAMP_LAUNCH_BOOST;
                    }
                }
                fire
            }
            RampKind::Launchpad { radius, .. } => {
                vehicle.speed *= LAUNCHPAD_RIDE_NUDGE;
                let distance = ground_distance(vehicle.position, ramp.position);
                let fire = distance < radius * config.launchpad_trigger_fraction
                    && vehicle.speed > config.launchpad_min_speed
                    && !was_airborne;
                if fire {
                    launch(vehicle, ramp.jump_strength, config);
                    vehicle.speed *= LAUNCHPAD_LAUNCH_BOOST;
                }
                fire
            }
        };

        if launched {
            sink.emit_jump_burst(vehicle.position);
            debug!(
                "Launched from ramp {index} at {:.1} u/s, vv {:.1}",
                vehicle.speed, vehicle.vertical_velocity
            );
        }
        vehicle.sync_orientation();
        return RampContact {
            ramp: Some(index),
            launched,
        };
    }

    match vehicle.vertical {
        VerticalState::OnRamp => {
            if vehicle.position.y > ride_height + RAMP_EXIT_FALL_MARGIN {
                vehicle.vertical = VerticalState::Airborne;
                vehicle.vertical_velocity = 0.0;
            } else {
                vehicle.vertical = VerticalState::Grounded;
                vehicle.position.y = ride_height;
            }
        }
        VerticalState::Grounded => vehicle.position.y = ride_height,
        VerticalState::Airborne => {}
    }
    RampContact::default()
}

/// Shared launch kick: vertical velocity scales with how close to top speed
/// the car is.
fn launch(vehicle: &mut Vehicle, jump_strength: f32, config: &DrivingConfig) {
    let speed_factor = vehicle.normalized_speed().min(1.0);
    vehicle.vertical_velocity = jump_strength.min(config.max_jump_velocity) * speed_factor;
    vehicle.pitch = config.launch_pitch;
    vehicle.vertical = VerticalState::Airborne;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::SimEffect;
    use crate::vehicle::VehicleTuning;

    // ── helpers ───────────────────────────────────────────────────────────────

    /// Wedge at the origin rising toward +Z: 6 wide, 10 long, 2 high.
    fn wedge() -> Ramp {
        Ramp::directional(Vec3::ZERO, 0.0, 6.0, 10.0, 2.0, 15.0)
    }

    fn car_at(x: f32, z: f32, speed: f32) -> Vehicle {
        let mut v = Vehicle::new(Vec3::new(x, 0.5, z), 0.0, VehicleTuning::default());
        v.speed = speed;
        v
    }

    // ── directional ───────────────────────────────────────────────────────────

    #[test]
    fn riding_interpolates_height_along_the_ramp() {
        let cfg = DrivingConfig::default();
        let mut fx: Vec<SimEffect> = Vec::new();
        let mut v = car_at(0.0, 0.0, 5.0);

        let contact = resolve_ramps(&mut v, &[wedge()], false, &cfg, &mut fx);
        assert_eq!(contact.ramp, Some(0));
        assert!(!contact.launched);
        assert_eq!(v.vertical, VerticalState::OnRamp);
        assert!((v.position.y - 1.5).abs() < 1e-5);
        assert!(v.pitch < 0.0, "nose up on the incline");
    }

    #[test]
    fn high_end_at_speed_launches() {
        let cfg = DrivingConfig::default();
        let mut fx: Vec<SimEffect> = Vec::new();
        let mut v = car_at(0.0, 4.5, 30.0);

        let contact = resolve_ramps(&mut v, &[wedge()], false, &cfg, &mut fx);
        assert!(contact.launched);
        assert!(v.is_airborne());
        assert!((v.vertical_velocity - 15.0 * 0.75).abs() < 1e-4);
        assert_eq!(v.pitch, cfg.launch_pitch);
        assert!((v.speed - 31.5).abs() < 1e-4);
        assert!(matches!(fx.as_slice(), [SimEffect::JumpBurst { .. }]));
    }

    #[test]
    fn launch_caps_speed_at_safe_maximum() {
        let cfg = DrivingConfig::default();
        let mut fx: Vec<SimEffect> = Vec::new();
        let mut v = car_at(0.0, 4.5, 39.5);
        resolve_ramps(&mut v, &[wedge()], false, &cfg, &mut fx);
        assert_eq!(v.speed, cfg.max_safe_launch_speed);
    }

    #[test]
    fn crossing_sideways_does_not_launch() {
        let cfg = DrivingConfig::default();
        let mut fx: Vec<SimEffect> = Vec::new();
        let mut v = car_at(0.0, 4.5, 30.0);
        v.yaw = std::f32::consts::FRAC_PI_2;
        v.sync_orientation();

        let contact = resolve_ramps(&mut v, &[wedge()], false, &cfg, &mut fx);
        assert_eq!(contact.ramp, Some(0));
        assert!(!contact.launched);
        assert!(fx.is_empty());
    }

    #[test]
    fn boost_nudges_speed_on_the_ramp() {
        let cfg = DrivingConfig::default();
        let mut fx: Vec<SimEffect> = Vec::new();
        let mut v = car_at(0.0, -2.0, 20.0);
        resolve_ramps(&mut v, &[wedge()], true, &cfg, &mut fx);
        assert!((v.speed - 20.4).abs() < 1e-4);
    }

    #[test]
    fn airborne_car_above_surface_is_not_riding() {
        let cfg = DrivingConfig::default();
        let mut fx: Vec<SimEffect> = Vec::new();
        let mut v = car_at(0.0, 0.0, 20.0);
        v.vertical = VerticalState::Airborne;
        v.position.y = 5.0;

        let contact = resolve_ramps(&mut v, &[wedge()], false, &cfg, &mut fx);
        assert_eq!(contact.ramp, None);
        assert!(v.is_airborne());
        assert_eq!(v.position.y, 5.0);
    }

    #[test]
    fn airborne_car_landing_on_a_ramp_does_not_relaunch() {
        let cfg = DrivingConfig::default();
        let mut fx: Vec<SimEffect> = Vec::new();
        let mut v = car_at(0.0, 4.5, 30.0);
        v.vertical = VerticalState::Airborne;
        v.position.y = 1.0;

        let contact = resolve_ramps(&mut v, &[wedge()], false, &cfg, &mut fx);
        assert_eq!(contact.ramp, Some(0));
        assert!(!contact.launched);
        assert_eq!(v.vertical, VerticalState::OnRamp);
    }

    // ── leaving ───────────────────────────────────────────────────────────────

    #[test]
    fn leaving_a_ramp_high_starts_a_fall() {
        let cfg = DrivingConfig::default();
        let mut fx: Vec<SimEffect> = Vec::new();
        let mut v = car_at(0.0, 20.0, 8.0);
        v.vertical = VerticalState::OnRamp;
        v.position.y = 2.4;

        resolve_ramps(&mut v, &[wedge()], false, &cfg, &mut fx);
        assert!(v.is_airborne());
        assert_eq!(v.vertical_velocity, 0.0);
    }

    #[test]
    fn leaving_a_ramp_low_settles_on_the_road() {
        let cfg = DrivingConfig::default();
        let mut fx: Vec<SimEffect> = Vec::new();
        let mut v = car_at(0.0, -20.0, 8.0);
        v.vertical = VerticalState::OnRamp;
        v.position.y = 0.52;

        resolve_ramps(&mut v, &[wedge()], false, &cfg, &mut fx);
        assert_eq!(v.vertical, VerticalState::Grounded);
        assert_eq!(v.position.y, v.tuning.ride_height);
    }

    // ── launchpad ─────────────────────────────────────────────────────────────

    #[test]
    fn launchpad_fires_from_any_direction() {
        let cfg = DrivingConfig::default();
        let pad = Ramp::launchpad(Vec3::ZERO, 4.0, 0.3, 12.0);
        for yaw in [0.0_f32, 1.5, 3.0, -2.0] {
            let mut fx: Vec<SimEffect> = Vec::new();
            let mut v = car_at(1.0, 0.0, 10.0);
            v.yaw = yaw;
            v.sync_orientation();

            let contact = resolve_ramps(&mut v, &[pad.clone()], false, &cfg, &mut fx);
            assert!(contact.launched, "yaw {yaw}");
            assert!((v.speed - 10.0 * 1.01 * 1.1).abs() < 1e-3);
            assert_eq!(fx.len(), 1);
        }
    }

    #[test]
    fn launchpad_rim_only_nudges() {
        let cfg = DrivingConfig::default();
        let mut fx: Vec<SimEffect> = Vec::new();
        let pad = Ramp::launchpad(Vec3::ZERO, 4.0, 0.3, 12.0);
        let mut v = car_at(3.0, 0.0, 10.0);

        let contact = resolve_ramps(&mut v, &[pad], false, &cfg, &mut fx);
        assert_eq!(contact.ramp, Some(0));
        assert!(!contact.launched);
        assert!((v.speed - 10.1).abs() < 1e-4);
        assert!((v.position.y - 0.8).abs() < 1e-5);
    }

    #[test]
    fn first_ramp_in_list_wins() {
        let cfg = DrivingConfig::default();
        let mut fx: Vec<SimEffect> = Vec::new();
        let pad = Ramp::launchpad(Vec3::ZERO, 20.0, 0.3, 12.0);
        let mut v = car_at(0.0, 0.0, 2.0);

        let contact = resolve_ramps(&mut v, &[pad, wedge()], false, &cfg, &mut fx);
        assert_eq!(contact.ramp, Some(0));
    }
}
