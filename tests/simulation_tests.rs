//! Headless tests for [`DrivingSimPlugin`].
//!
//! These tests use [`MinimalPlugins`] with a manual 60 Hz clock.  No window,
//! no rendering and no keyboard plugin are created, so they run fast and
//! deterministically in CI.
//!
//! Covered scenarios:
//! 1. Nothing ticks until a `Simulation` resource exists.
//! 2. A scripted `KeySnapshot` drives the car forward.
//! 3. A `ButtonInput<KeyCode>` resource, when present, is captured each frame.
//! 4. Buffered effects arrive as `SimEffect` messages.
//! 5. Simulated poses are copied onto the attached visual entity.

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use joyride::config::DrivingConfig;
use joyride::effects::{EffectBuffer, SimEffect};
use joyride::input::KeySnapshot;
use joyride::simulation::{DrivingSimPlugin, Simulation};
use joyride::world::{CityLayout, Ramp, SpawnPose, WorldBounds};
use std::time::Duration;

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Every effect message seen so far.
#[derive(Resource, Default)]
struct SeenEffects(Vec<SimEffect>);

fn record_effects(mut reader: MessageReader<SimEffect>, mut seen: ResMut<SeenEffects>) {
    seen.0.extend(reader.read().copied());
}

/// Headless app with the plugin and a fixed 1/60 s frame.  No simulation yet.
fn bare_app() -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(
            1.0 / 60.0,
        )))
        .add_plugins(DrivingSimPlugin)
        .init_resource::<SeenEffects>()
        .add_systems(PostUpdate, record_effects);
    app
}

/// Empty city with the car at the origin facing +Z.
fn open_layout() -> CityLayout {
    let mut layout = CityLayout::empty(WorldBounds::new(Vec2::splat(-200.0), Vec2::splat(200.0)));
    layout.spawn = SpawnPose {
        position: Vec3::ZERO,
        yaw: 0.0,
    };
    layout
}

fn app_with_layout(layout: CityLayout) -> App {
    let mut app = bare_app();
    let sim = Simulation::new(layout, &DrivingConfig::default());
    app.insert_resource(sim);
    app
}

fn run_frames(app: &mut App, frames: usize) {
    for _ in 0..frames {
        app.update();
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

/// Without a `Simulation` the plugin's systems stay idle.
#[test]
fn idle_without_simulation() {
    let mut app = bare_app();
    app.insert_resource(KeySnapshot::throttle());
    run_frames(&mut app, 5);
    assert!(app.world().get_resource::<Simulation>().is_none());
    assert!(app.world().resource::<EffectBuffer>().0.is_empty());
    assert!(
        app.world().resource::<SeenEffects>().0.is_empty(),
        "no effects may be sent before the world is built"
    );
}

/// Holding throttle through the snapshot accelerates the car along +Z.
#[test]
fn scripted_throttle_moves_the_car() {
    let mut app = app_with_layout(open_layout());
    app.insert_resource(KeySnapshot::throttle());
    run_frames(&mut app, 60);

    let sim = app.world().resource::<Simulation>();
    assert!(sim.vehicle.speed > 10.0, "speed {}", sim.vehicle.speed);
    assert!(sim.vehicle.position.z > 5.0, "z {}", sim.vehicle.position.z);
    assert!(sim.vehicle.position.x.abs() < 1e-3, "drifted sideways");
    assert!(sim.session.elapsed > 0.5);
}

/// A keyboard resource, when installed, replaces the snapshot every frame.
#[test]
fn keyboard_is_captured_when_present() {
    let mut app = app_with_layout(open_layout());
    let mut keys = ButtonInput::<KeyCode>::default();
    keys.press(KeyCode::KeyW);
    keys.press(KeyCode::KeyA);
    app.insert_resource(keys);
    run_frames(&mut app, 30);

    let snapshot = *app.world().resource::<KeySnapshot>();
    assert!(snapshot.forward && snapshot.left);
    assert!(!snapshot.reverse && !snapshot.right && !snapshot.boost);

    let sim = app.world().resource::<Simulation>();
    assert!(sim.vehicle.speed > 0.0);
    assert!(sim.vehicle.yaw > 0.0, "left turns to positive yaw");
}

/// Speed readouts flow every tick, and a launchpad under the car produces a
/// jump burst.
#[test]
fn effects_are_forwarded_as_messages() {
    let mut layout = open_layout();
    layout
        .ramps
        .push(Ramp::launchpad(Vec3::ZERO, 4.0, 0.3, 16.0));
    let mut app = app_with_layout(layout);
    app.world_mut().resource_mut::<Simulation>().vehicle.speed = 20.0;
    run_frames(&mut app, 10);

    let seen = &app.world().resource::<SeenEffects>().0;
    assert!(
        seen.iter().any(|e| matches!(e, SimEffect::SpeedChanged { .. })),
        "speed readout missing"
    );
    assert!(
        seen.iter().any(|e| matches!(e, SimEffect::JumpBurst { .. })),
        "launchpad never fired"
    );
    assert!(app.world().resource::<Simulation>().session.jumps >= 1);
    assert!(
        app.world().resource::<EffectBuffer>().0.is_empty(),
        "buffer is drained each frame"
    );
}

/// The vehicle's visual entity follows the simulated pose.
#[test]
fn visual_transform_follows_vehicle() {
    let mut app = app_with_layout(open_layout());
    let visual = app.world_mut().spawn(Transform::default()).id();
    app.world_mut().resource_mut::<Simulation>().vehicle_visual = Some(visual);
    app.insert_resource(KeySnapshot::throttle());
    run_frames(&mut app, 20);

    let position = app.world().resource::<Simulation>().vehicle.position;
    let transform = app.world().get::<Transform>(visual).expect("visual entity");
    assert_eq!(transform.translation, position);
    assert!(transform.translation.z > 0.0);
}
