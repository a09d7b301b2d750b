//! Effect/presentation sink.
//!
//! The simulation core never touches rendering state.  It reports things
//! worth showing through the fire-and-forget [`EffectSink`] trait; the Bevy
//! plugin buffers those calls as [`SimEffect`] values and forwards them as
//! messages for whatever particle, HUD or camera systems the game installs.

use bevy::prelude::*;

/// Narrow one-way interface from the core to presentation.
pub trait EffectSink {
    fn emit_jump_burst(&mut self, position: Vec3);
    fn emit_blood_splatter(&mut self, position: Vec3);
    fn emit_boost_trail(&mut self, position: Vec3, direction: Vec3);
    /// `total` is the new score, not the increment.
    fn on_score_changed(&mut self, total: u32);
    fn on_speed_changed(&mut self, speed: f32);
}

/// One recorded sink call.
#[derive(Message, Debug, Clone, Copy, PartialEq)]
pub enum SimEffect {
    JumpBurst { position: Vec3 },
    BloodSplatter { position: Vec3 },
    BoostTrail { position: Vec3, direction: Vec3 },
    ScoreChanged { total: u32 },
    SpeedChanged { speed: f32 },
}

impl EffectSink for Vec<SimEffect> {
    fn emit_jump_burst(&mut self, position: Vec3) {
        self.push(SimEffect::JumpBurst { position });
    }

    fn emit_blood_splatter(&mut self, position: Vec3) {
        self.push(SimEffect::BloodSplatter { position });
    }

    fn emit_boost_trail(&mut self, position: Vec3, direction: Vec3) {
        self.push(SimEffect::BoostTrail {
            position,
            direction,
        });
    }

    fn on_score_changed(&mut self, total: u32) {
        self.push(SimEffect::ScoreChanged { total });
    }

    fn on_speed_changed(&mut self, speed: f32) {
        self.push(SimEffect::SpeedChanged { speed });
    }
}

/// Sink that drops everything.  Handy for benchmarks and warm-up ticks.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EffectSink for NullSink {
    fn emit_jump_burst(&mut self, _position: Vec3) {}
    fn emit_blood_splatter(&mut self, _position: Vec3) {}
    fn emit_boost_trail(&mut self, _position: Vec3, _direction: Vec3) {}
    fn on_score_changed(&mut self, _total: u32) {}
    fn on_speed_changed(&mut self, _speed: f32) {}
}

/// Effects produced by the current frame's tick, drained by
/// `forward_effects_system`.
#[derive(Resource, Debug, Default)]
pub struct EffectBuffer(pub Vec<SimEffect>);

/// Sends every buffered effect as a [`SimEffect`] message.
pub fn forward_effects_system(mut buffer: ResMut<EffectBuffer>, mut writer: MessageWriter<SimEffect>) {
    for effect in buffer.0.drain(..) {
        writer.write(effect);
    }
}
