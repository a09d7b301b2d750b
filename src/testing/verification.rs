use crate::input::KeySnapshot;
use crate::simulation::Simulation;
use bevy::prelude::*;

use super::{Scenario, ScenarioConfig};

/// Outcome of a finished scenario run.
#[derive(Debug, Clone, PartialEq)]
pub struct Verdict {
    pub passed: bool,
    pub summary: String,
}

/// Feed the scripted keys for the current frame into the snapshot.  Runs
/// before `capture_keys_system`, which leaves the snapshot alone headless.
pub fn autopilot_system(scenario: Res<ScenarioConfig>, mut snapshot: ResMut<KeySnapshot>) {
    if !scenario.enabled {
        return;
    }
    *snapshot = scenario.autopilot.keys_at(scenario.frame_count);
}

pub fn scenario_logging_system(
    mut scenario: ResMut<ScenarioConfig>,
    sim: Option<Res<Simulation>>,
) {
    if !scenario.enabled {
        return;
    }
    scenario.frame_count += 1;

    let Some(sim) = sim else { return };
    if scenario.frame_count % 60 == 0 {
        let v = &sim.vehicle;
        println!(
            "[Frame {}] pos: ({:.1}, {:.1}, {:.1}) speed: {:.1} {:?} boost: {:.0}% score: {}",
            scenario.frame_count,
            v.position.x,
            v.position.y,
            v.position.z,
            v.speed,
            v.vertical,
            sim.boost.fraction() * 100.0,
            sim.score()
        );
    }
}

pub fn scenario_verification_system(
    scenario: Res<ScenarioConfig>,
    sim: Option<Res<Simulation>>,
    mut exit: MessageWriter<bevy::app::AppExit>,
) {
    if !scenario.enabled || scenario.frame_count < scenario.frame_limit {
        return;
    }

    println!("\n╔════════════════════════════════════════════╗");
    println!("║           SCENARIO COMPLETE                ║");
    println!("╚════════════════════════════════════════════╝");
    println!("Scenario: {}", scenario.scenario.name());
    println!("Frames: {}", scenario.frame_count);

    match sim {
        Some(sim) => {
            let s = &sim.session;
            println!(
                "Score: {}  props: {}  pedestrians: {}  jumps: {}  collisions: {}",
                s.score, s.props_knocked, s.pedestrians_hit, s.jumps, s.collisions
            );
            let verdict = evaluate(scenario.scenario, &sim);
            if verdict.passed {
                println!("✓ PASS: {} — {}", scenario.scenario.name(), verdict.summary);
            } else {
                println!("✗ FAIL: {} — {}", scenario.scenario.name(), verdict.summary);
            }
        }
        None => println!("✗ FAIL: {} — simulation never started", scenario.scenario.name()),
    }

    exit.write(bevy::app::AppExit::Success);
}

/// Judge a finished run against what the scenario is meant to provoke.
pub fn evaluate(scenario: Scenario, sim: &Simulation) -> Verdict {
    let s = &sim.session;
    let v = &sim.vehicle;
    let (passed, summary) = match scenario {
        Scenario::Cruise => {
            let sane = v.position.is_finite() && v.speed.is_finite();
            let inside = sim.bounds.contains(v.position, 0.0);
            (
                sane && inside,
                format!("finite={sane} inside_bounds={inside}"),
            )
        }
        Scenario::RampJump => (s.jumps >= 1, format!("{} jump(s)", s.jumps)),
        Scenario::PropSmash => (
            s.props_knocked >= 3,
            format!("{} prop(s) knocked", s.props_knocked),
        ),
        Scenario::PedestrianRun => (
            s.pedestrians_hit >= 1,
            format!("{} pedestrian(s) hit", s.pedestrians_hit),
        ),
        Scenario::WallCrash => (
            s.collisions >= 1,
            format!("{} collision(s)", s.collisions),
        ),
    };
    Verdict { passed, summary }
}
