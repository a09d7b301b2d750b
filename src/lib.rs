//! Joyride: the simulation core of an arcade city driving game.
//!
//! The physics are plain functions over plain structs, advanced one tick at a
//! time by [`simulation::Simulation::step`].  [`simulation::DrivingSimPlugin`]
//! wires that loop into a Bevy app; rendering, audio and UI live elsewhere and
//! listen for [`effects::SimEffect`] messages.

pub mod boost;
pub mod boundary;
pub mod collision;
pub mod config;
pub mod constants;
pub mod effects;
pub mod error;
pub mod input;
pub mod pedestrian;
pub mod props;
pub mod ramp;
pub mod session;
pub mod simulation;
pub mod testing;
pub mod transient;
pub mod vehicle;
pub mod world;
