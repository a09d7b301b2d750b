//! Input state provider.
//!
//! The simulation never sees raw keyboard events.  Once per tick the
//! orchestration layer captures a [`KeySnapshot`] from any [`InputState`]
//! (Bevy's `ButtonInput<KeyCode>` in the game, a scripted autopilot in the
//! scenario runner, a literal struct in tests) and every component reads that
//! same snapshot, so a key pressed mid-tick is observed consistently.

use crate::error::{SimError, SimResult};
use bevy::prelude::*;
use std::str::FromStr;

/// The named controls the driving core understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlKey {
    Forward,
    Reverse,
    Left,
    Right,
    Boost,
}

impl ControlKey {
    pub const ALL: [ControlKey; 5] = [
        ControlKey::Forward,
        ControlKey::Reverse,
        ControlKey::Left,
        ControlKey::Right,
        ControlKey::Boost,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ControlKey::Forward => "forward",
            ControlKey::Reverse => "reverse",
            ControlKey::Left => "left",
            ControlKey::Right => "right",
            ControlKey::Boost => "boost",
        }
    }
}

impl FromStr for ControlKey {
    type Err = SimError;

    fn from_str(s: &str) -> SimResult<Self> {
        ControlKey::ALL
            .into_iter()
            .find(|key| key.name().eq_ignore_ascii_case(s))
            // "brake" is the same pedal as reverse.
            .or_else(|| s.eq_ignore_ascii_case("brake").then_some(ControlKey::Reverse))
            .ok_or_else(|| SimError::UnknownControl {
                name: s.to_string(),
            })
    }
}

/// Anything that can answer "is this control held right now?".
pub trait InputState {
    fn is_key_down(&self, key: ControlKey) -> bool;
}

/// Keyboard bindings: WASD or arrows to drive, Shift or Space to boost.
impl InputState for ButtonInput<KeyCode> {
    fn is_key_down(&self, key: ControlKey) -> bool {
        match key {
            ControlKey::Forward => self.any_pressed([KeyCode::KeyW, KeyCode::ArrowUp]),
            ControlKey::Reverse => self.any_pressed([KeyCode::KeyS, KeyCode::ArrowDown]),
            ControlKey::Left => self.any_pressed([KeyCode::KeyA, KeyCode::ArrowLeft]),
            ControlKey::Right => self.any_pressed([KeyCode::KeyD, KeyCode::ArrowRight]),
            ControlKey::Boost => {
                self.any_pressed([KeyCode::ShiftLeft, KeyCode::ShiftRight, KeyCode::Space])
            }
        }
    }
}

/// Tick-consistent copy of every control.
///
/// This is also the resource tests and the scenario autopilot write directly,
/// which keeps the physics testable without a keyboard.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeySnapshot {
    pub forward: bool,
    pub reverse: bool,
    pub left: bool,
    pub right: bool,
    pub boost: bool,
}

impl KeySnapshot {
    /// Read every control exactly once.
    pub fn capture(source: &impl InputState) -> Self {
        Self {
            forward: source.is_key_down(ControlKey::Forward),
            reverse: source.is_key_down(ControlKey::Reverse),
            left: source.is_key_down(ControlKey::Left),
            right: source.is_key_down(ControlKey::Right),
            boost: source.is_key_down(ControlKey::Boost),
        }
    }

    /// Full throttle, nothing else.
    pub fn throttle() -> Self {
        Self {
            forward: true,
            ..Default::default()
        }
    }

    /// Steering target in {−1, 0, 1}; left is positive yaw.
    ///
    /// Holding both directions cancels out.
    pub fn turn_target(&self) -> f32 {
        match (self.left, self.right) {
            (true, false) => 1.0,
            (false, true) => -1.0,
            _ => 0.0,
        }
    }
}

impl InputState for KeySnapshot {
    fn is_key_down(&self, key: ControlKey) -> bool {
        match key {
            ControlKey::Forward => self.forward,
            ControlKey::Reverse => self.reverse,
            ControlKey::Left => self.left,
            ControlKey::Right => self.right,
            ControlKey::Boost => self.boost,
        }
    }
}
