use bevy::app::ScheduleRunnerPlugin;
use bevy::log::LogPlugin;
use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use std::env;
use std::time::Duration;

use joyride::config::{load_driving_config, DrivingConfig};
use joyride::simulation::{capture_keys_system, DrivingSimPlugin};
use joyride::testing::{
    autopilot_system, scenario_logging_system, scenario_verification_system, setup_scenario,
    Scenario, ScenarioConfig,
};

const FRAME: Duration = Duration::from_nanos(16_666_667);

fn main() {
    let requested = env::var("JOYRIDE_SCENARIO").ok();
    let scenario = match requested.as_deref() {
        None => Scenario::default(),
        Some(name) => Scenario::from_name(name).unwrap_or_else(|| {
            eprintln!("Unknown scenario {name:?}; running cruise");
            Scenario::default()
        }),
    };

    let mut app = App::new();

    app.add_plugins((
        MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(FRAME)),
        LogPlugin::default(),
    ))
    // Every frame advances exactly one 60 Hz tick, so runs are reproducible.
    .insert_resource(TimeUpdateStrategy::ManualDuration(FRAME))
    // Compiled defaults; load_driving_config overwrites them from
    // assets/driving.toml (if present) in the Startup schedule.
    .insert_resource(DrivingConfig::default())
    .insert_resource(ScenarioConfig::new(scenario))
    .add_plugins(DrivingSimPlugin)
    .add_systems(
        Startup,
        (
            load_driving_config,
            setup_scenario.after(load_driving_config),
        ),
    )
    .add_systems(Update, autopilot_system.before(capture_keys_system))
    .add_systems(
        PostUpdate,
        (scenario_logging_system, scenario_verification_system).chain(),
    );

    println!("Running scenario: {}", scenario.name());
    app.run();
}
