//! Pedal, steering and air-control response.
//!
//! ## Per-tick order (called from [`super::update_vehicle`])
//!
//! 1. [`apply_longitudinal`]: throttle / brake / coast, or air drag and
//!    attitude control while airborne.
//! 2. [`apply_steering`]: smoothed turn amount and yaw.
//! 3. [`detect_drift`]: drift flag for skid marks.

use super::state::Vehicle;
use crate::config::DrivingConfig;
use crate::constants::{STEER_FALLOFF, STEER_HIGH_SPEED, STEER_LOW_SPEED, STEER_MID_SPEED};
use crate::input::KeySnapshot;

/// Steering intensity for a normalised speed `s = |speed| / max_speed`.
///
/// | s           | intensity             |
/// |-------------|-----------------------|
/// | `< 0.2`     | 1.2                   |
/// | `< 0.6`     | 1.0                   |
/// | otherwise   | `0.8 − (s − 0.6)·0.3` |
pub fn steering_intensity(normalized_speed: f32) -> f32 {
    let s = normalized_speed.abs();
    if s < 0.2 {
        STEER_LOW_SPEED
    } else if s < 0.6 {
        STEER_MID_SPEED
    } else {
        STEER_HIGH_SPEED - (s - 0.6) * STEER_FALLOFF
    }
}

/// Move `value` toward zero by `amount` without crossing it.
#[inline]
pub fn decay_toward_zero(value: f32, amount: f32) -> f32 {
    if value > 0.0 {
        (value - amount).max(0.0)
    } else if value < 0.0 {
        (value + amount).min(0.0)
    } else {
        0.0
    }
}

/// Throttle and brake on the ground; drag plus pitch/roll control in the air.
///
/// Grounded:
/// - **forward** → toward `+max_speed` (at `braking` while still rolling back)
/// - **reverse** → toward `−max_speed/2` (at `braking` while still rolling forward)
/// - neither → coast toward zero at `deceleration`
///
/// Airborne: coast at `deceleration × air_drag_factor`; left/right roll,
/// forward pitches the nose down and reverse pulls it up, clamped to
/// `±air_pitch_limit`.
pub fn apply_longitudinal(vehicle: &mut Vehicle, input: &KeySnapshot, dt: f32, config: &DrivingConfig) {
    let t = vehicle.tuning;

    if vehicle.is_airborne() {
        vehicle.speed = decay_toward_zero(vehicle.speed, t.deceleration * config.air_drag_factor * dt);

        if input.left {
            vehicle.roll += config.air_roll_rate * dt;
        } else if input.right {
            vehicle.roll -= config.air_roll_rate * dt;
        }
        if input.forward {
            vehicle.pitch += config.air_pitch_rate * dt;
        } else if input.reverse {
            vehicle.pitch -= config.air_pitch_rate * dt;
        }
        vehicle.pitch = vehicle
            .pitch
            .clamp(-config.air_pitch_limit, config.air_pitch_limit);
        return;
    }

    if input.forward {
        let rate = if vehicle.speed < 0.0 {
            t.braking
        } else {
            t.acceleration
        };
        vehicle.speed = (vehicle.speed + rate * dt).min(t.max_speed);
    } else if input.reverse {
        let rate = if vehicle.speed > 0.0 {
            t.braking
        } else {
            t.acceleration
        };
        vehicle.speed = (vehicle.speed - rate * dt).max(-t.max_speed * 0.5);
    } else {
        vehicle.speed = decay_toward_zero(vehicle.speed, t.deceleration * dt);
    }
}

/// Smooth the turn amount toward the held direction and apply yaw.
///
/// The smoothing is applied once per tick, unscaled by Δt:
/// `current = current·(1−k) + target·k` while turning, `current *= 1 − 2k`
/// otherwise.  Yaw only changes on the ground with the car moving.
pub fn apply_steering(vehicle: &mut Vehicle, input: &KeySnapshot, dt: f32, config: &DrivingConfig) {
    let k = config.turn_inertia;
    let target = input.turn_target();
    let can_steer = !vehicle.is_airborne() && vehicle.speed != 0.0;

    if can_steer && target != 0.0 {
        vehicle.turn_amount = vehicle.turn_amount * (1.0 - k) + target * k;
    } else {
        vehicle.turn_amount *= 1.0 - 2.0 * k;
    }

    if can_steer {
        let intensity = steering_intensity(vehicle.normalized_speed());
        vehicle.yaw += vehicle.tuning.turn_speed * dt * intensity * vehicle.turn_amount;
    }
}

/// A held turn at more than 60 % of top speed on flat ground is a drift.
pub fn detect_drift(vehicle: &Vehicle, input: &KeySnapshot, config: &DrivingConfig) -> bool {
    input.turn_target() != 0.0
        && vehicle.normalized_speed() > config.drift_speed_threshold
        && !vehicle.is_airborne()
        && !vehicle.is_on_ramp()
}
