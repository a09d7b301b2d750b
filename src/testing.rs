//! Headless scenario runner.
//!
//! `JOYRIDE_SCENARIO=<name> cargo run` builds a scripted city, drives it with
//! an autopilot for a fixed number of frames, then prints PASS/FAIL and exits.

mod scenarios;
mod types;
mod verification;

pub use scenarios::{build_layout, demo_city, setup_scenario};
pub use types::{Autopilot, Scenario, ScenarioConfig};
pub use verification::{
    autopilot_system, evaluate, scenario_logging_system, scenario_verification_system, Verdict,
};
