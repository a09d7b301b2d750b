use crate::input::KeySnapshot;
use bevy::prelude::*;

/// Scripted scenarios runnable with `JOYRIDE_SCENARIO=<name> cargo run`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scenario {
    /// Free drive through the generated demo city.
    #[default]
    Cruise,
    /// Straight run up a single wedge ramp.
    RampJump,
    /// Straight run through a line of props.
    PropSmash,
    /// Straight run at a group of pedestrians.
    PedestrianRun,
    /// Straight run into a building.
    WallCrash,
}

impl Scenario {
    pub const ALL: [Scenario; 5] = [
        Scenario::Cruise,
        Scenario::RampJump,
        Scenario::PropSmash,
        Scenario::PedestrianRun,
        Scenario::WallCrash,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Scenario::Cruise => "cruise",
            Scenario::RampJump => "ramp_jump",
            Scenario::PropSmash => "prop_smash",
            Scenario::PedestrianRun => "pedestrian_run",
            Scenario::WallCrash => "wall_crash",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.name() == name)
    }

    pub fn frame_limit(self) -> u32 {
        match self {
            Scenario::Cruise => 900,
            Scenario::RampJump => 300,
            Scenario::PropSmash => 300,
            Scenario::PedestrianRun => 300,
            Scenario::WallCrash => 240,
        }
    }

    /// Input script for the scenario.
    pub fn autopilot(self) -> Autopilot {
        let throttle = KeySnapshot::throttle();
        match self {
            Scenario::Cruise => {
                let left = KeySnapshot {
                    forward: true,
                    left: true,
                    ..Default::default()
                };
                let right = KeySnapshot {
                    forward: true,
                    right: true,
                    ..Default::default()
                };
                let boost = KeySnapshot {
                    forward: true,
                    boost: true,
                    ..Default::default()
                };
                Autopilot::new(vec![
                    (0, throttle),
                    (120, boost),
                    (240, left),
                    (300, throttle),
                    (420, right),
                    (480, KeySnapshot::default()),
                    (540, throttle),
                ])
            }
            Scenario::RampJump | Scenario::PropSmash | Scenario::PedestrianRun | Scenario::WallCrash => {
                Autopilot::new(vec![(0, throttle)])
            }
        }
    }
}

/// Time-keyed input script.  Each entry holds from its start frame until the
/// next entry's start frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Autopilot {
    segments: Vec<(u32, KeySnapshot)>,
}

impl Autopilot {
    pub fn new(mut segments: Vec<(u32, KeySnapshot)>) -> Self {
        segments.sort_by_key(|(start, _)| *start);
        Self { segments }
    }

    /// Keys held on `frame`; nothing before the first segment.
    pub fn keys_at(&self, frame: u32) -> KeySnapshot {
        self.segments
            .iter()
            .rev()
            .find(|(start, _)| *start <= frame)
            .map(|(_, keys)| *keys)
            .unwrap_or_default()
    }
}

/// Scenario run state
#[derive(Resource, Debug, Clone)]
pub struct ScenarioConfig {
    pub enabled: bool,
    pub scenario: Scenario,
    pub frame_limit: u32,
    pub frame_count: u32,
    pub autopilot: Autopilot,
}

impl ScenarioConfig {
    pub fn new(scenario: Scenario) -> Self {
        Self {
            enabled: true,
            scenario,
            frame_limit: scenario.frame_limit(),
            frame_count: 0,
            autopilot: scenario.autopilot(),
        }
    }
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            ..Self::new(Scenario::Cruise)
        }
    }
}
