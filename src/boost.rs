//! Boost resource.
//!
//! A rechargeable pool spent while the boost key is held.  The speed
//! multiplier it produces is eased rather than switched, so engaging boost
//! ramps the car's travel velocity up over a few frames.

use crate::config::DrivingConfig;
use crate::vehicle::Vehicle;

#[derive(Debug, Clone, PartialEq)]
pub struct Boost {
    pub amount: f32,
    pub max: f32,
    pub recharge_rate: f32,
    pub deplete_rate: f32,
    pub active: bool,
    /// Smoothed multiplier applied to the car's travel velocity.
    pub multiplier: f32,
    pub target_multiplier: f32,
}

impl Boost {
    /// A full tank.
    pub fn new(config: &DrivingConfig) -> Self {
        Self {
            amount: config.boost_max,
            max: config.boost_max,
            recharge_rate: config.boost_recharge_rate,
            deplete_rate: config.boost_deplete_rate,
            active: false,
            multiplier: 1.0,
            target_multiplier: 1.0,
        }
    }

    /// Fraction of the tank remaining, in [0, 1].
    pub fn fraction(&self) -> f32 {
        if self.max > 0.0 {
            (self.amount / self.max).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// Spend or recharge for one tick and ease the multiplier.
    ///
    /// Boost only engages while the key is held, there is fuel left, and the
    /// car is moving forward.
    pub fn update(&mut self, wants_boost: bool, vehicle: &Vehicle, dt: f32, config: &DrivingConfig) {
        self.active = wants_boost && self.amount > 0.0 && vehicle.speed > 0.0;

        if self.active {
            self.amount = (self.amount - self.deplete_rate * dt).max(0.0);
            self.target_multiplier = config.boost_multiplier;
        } else {
            self.amount = (self.amount + self.recharge_rate * dt).min(self.max);
            self.target_multiplier = 1.0;
        }

        let blend = (config.boost_smoothing * dt).min(1.0);
        self.multiplier += (self.target_multiplier - self.multiplier) * blend;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vehicle::VehicleTuning;
    use bevy::prelude::*;

    fn moving_car(speed: f32) -> Vehicle {
        let mut v = Vehicle::new(Vec3::ZERO, 0.0, VehicleTuning::default());
        v.speed = speed;
        v
    }

    #[test]
    fn holding_boost_drains_and_raises_multiplier() {
        let cfg = DrivingConfig::default();
        let mut boost = Boost::new(&cfg);
        let car = moving_car(20.0);

        boost.update(true, &car, 1.0, &cfg);
        assert!(boost.active);
        assert!((boost.amount - 65.0).abs() < 1e-4);
        assert_eq!(boost.target_multiplier, cfg.boost_multiplier);
        // rate·Δt ≥ 1 snaps straight to the target.
        assert!((boost.multiplier - cfg.boost_multiplier).abs() < 1e-6);
    }

    #[test]
    fn multiplier_eases_in_small_steps() {
        let cfg = DrivingConfig::default();
        let mut boost = Boost::new(&cfg);
        let car = moving_car(20.0);
        boost.update(true, &car, 0.05, &cfg);
        let expected = 1.0 + (cfg.boost_multiplier - 1.0) * 0.3;
        assert!((boost.multiplier - expected).abs() < 1e-5);
    }

    #[test]
    fn empty_tank_or_reversing_disables_boost() {
        let cfg = DrivingConfig::default();
        let mut boost = Boost::new(&cfg);

        boost.update(true, &moving_car(-5.0), 0.1, &cfg);
        assert!(!boost.active);

        boost.amount = 0.0;
        boost.update(true, &moving_car(20.0), 0.1, &cfg);
        assert!(!boost.active);
        assert!((boost.amount - 1.2).abs() < 1e-5, "recharges while idle");
    }

    #[test]
    fn amount_stays_within_tank() {
        let cfg = DrivingConfig::default();
        let mut boost = Boost::new(&cfg);
        let car = moving_car(30.0);
        for _ in 0..100 {
            boost.update(true, &car, 0.1, &cfg);
            assert!(boost.amount >= 0.0);
        }
        for _ in 0..200 {
            boost.update(false, &car, 0.1, &cfg);
            assert!(boost.amount <= boost.max);
        }
        assert_eq!(boost.fraction(), 1.0);
    }
}
