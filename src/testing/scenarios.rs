//! City layouts for the scripted scenarios.

use super::{Scenario, ScenarioConfig};
use crate::config::DrivingConfig;
use crate::pedestrian::{Pedestrian, WalkAxis};
use crate::props::{DynamicProp, PropKind};
use crate::simulation::Simulation;
use crate::world::{CityLayout, Obstacle, ObstacleKind, Ramp, SpawnPose, WorldBounds};
use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Startup system: build the selected scenario's city and insert the
/// [`Simulation`].  Must run after the config loader.
pub fn setup_scenario(
    mut commands: Commands,
    config: Res<DrivingConfig>,
    scenario: Res<ScenarioConfig>,
) {
    let layout = build_layout(scenario.scenario, &config);
    commands.insert_resource(Simulation::new(layout, &config));
    println!(
        "✓ Spawned scenario: {} ({} frames)",
        scenario.scenario.name(),
        scenario.frame_limit
    );
}

pub fn build_layout(scenario: Scenario, config: &DrivingConfig) -> CityLayout {
    match scenario {
        Scenario::Cruise => demo_city(config),
        Scenario::RampJump => ramp_jump(config),
        Scenario::PropSmash => prop_smash(config),
        Scenario::PedestrianRun => pedestrian_run(config),
        Scenario::WallCrash => wall_crash(config),
    }
}

fn straight_run(config: &DrivingConfig) -> CityLayout {
    let mut layout = CityLayout::empty(WorldBounds::from_grid(
        config.grid_size,
        config.block_size,
        config.road_width,
    ));
    layout.spawn = SpawnPose {
        position: Vec3::new(0.0, 0.0, -60.0),
        yaw: 0.0,
    };
    layout
}

fn ramp_jump(config: &DrivingConfig) -> CityLayout {
    let mut layout = straight_run(config);
    layout
        .ramps
        .push(Ramp::directional(Vec3::new(0.0, 0.0, 30.0), 0.0, 8.0, 12.0, 2.5, 14.0));
    layout
}

fn prop_smash(config: &DrivingConfig) -> CityLayout {
    let mut layout = straight_run(config);
    for (i, kind) in PropKind::ALL.into_iter().enumerate() {
        let z = -20.0 + i as f32 * 15.0;
        layout.props.push(DynamicProp::new(kind, Vec3::new(0.0, 0.0, z), 0.0));
    }
    layout
}

fn pedestrian_run(config: &DrivingConfig) -> CityLayout {
    let mut layout = straight_run(config);
    for i in 0..4 {
        let x = (i as f32 - 1.5) * 1.2;
        layout.pedestrians.push(Pedestrian::new(
            Vec3::new(x, 0.0, 10.0 + i as f32 * 8.0),
            WalkAxis::AlongX,
            if i % 2 == 0 { 1.0 } else { -1.0 },
            config,
        ));
    }
    layout
}

fn wall_crash(config: &DrivingConfig) -> CityLayout {
    let mut layout = straight_run(config);
    layout.obstacles.push(Obstacle::boxed(
        ObstacleKind::Building,
        Vec3::new(0.0, 0.0, 40.0),
        20.0,
        10.0,
        0.0,
    ));
    layout
}

/// Grid city: a building per block with a park in the middle, roads between
/// blocks, and props, parked cars, pedestrians and ramps on the roads.
/// Seeded from `config.rng_seed`, so the same config builds the same city.
pub fn demo_city(config: &DrivingConfig) -> CityLayout {
    let mut rng = StdRng::seed_from_u64(config.rng_seed);
    let bounds = WorldBounds::from_grid(config.grid_size, config.block_size, config.road_width);
    let mut layout = CityLayout::empty(bounds);

    let cell = config.block_size + config.road_width;
    let grid = config.grid_size as i32;
    let park = grid / 2;
    let block_centre = |i: i32| bounds.min.x + cell * (i as f32 + 0.5);
    // Roads run along the cell boundaries between blocks.
    let roads: Vec<f32> = (1..grid).map(|k| bounds.min.x + cell * k as f32).collect();

    for i in 0..grid {
        for j in 0..grid {
            let centre = Vec3::new(block_centre(i), 0.0, block_centre(j));
            if i == park && j == park {
                layout
                    .obstacles
                    .push(Obstacle::sphere(ObstacleKind::Fountain, centre, 4.0));
                for corner in [
                    Vec3::new(1.0, 0.0, 1.0),
                    Vec3::new(-1.0, 0.0, 1.0),
                    Vec3::new(1.0, 0.0, -1.0),
                    Vec3::new(-1.0, 0.0, -1.0),
                ] {
                    layout.obstacles.push(Obstacle::sphere(
                        ObstacleKind::Tree,
                        centre + corner * (config.block_size * 0.3),
                        1.2,
                    ));
                }
                continue;
            }
            let tall = rng.gen_bool(0.15);
            if tall {
                layout.obstacles.push(Obstacle::sphere(
                    ObstacleKind::Skyscraper,
                    centre,
                    config.block_size * 0.35,
                ));
            } else {
                let width = config.block_size * rng.gen_range(0.6..0.9);
                let depth = config.block_size * rng.gen_range(0.6..0.9);
                layout
                    .obstacles
                    .push(Obstacle::boxed(ObstacleKind::Building, centre, width, depth, 0.0));
            }
        }
    }

    // Walls just outside the playable area, beyond the reach of a confined car.
    let wall = bounds.max.x + 2.0;
    let span = bounds.width() + 6.0;
    for (position, width, depth) in [
        (Vec3::new(0.0, 0.0, wall), span, 1.0),
        (Vec3::new(0.0, 0.0, -wall), span, 1.0),
        (Vec3::new(wall, 0.0, 0.0), 1.0, span),
        (Vec3::new(-wall, 0.0, 0.0), 1.0, span),
    ] {
        layout
            .obstacles
            .push(Obstacle::boxed(ObstacleKind::BoundaryWall, position, width, depth, 0.0));
    }

    let Some(&first_road) = roads.first() else {
        return layout;
    };

    // Parked cars tucked against the kerb.
    let kerb = config.road_width * 0.5 - 1.0;
    for &road in &roads {
        let z = block_centre(rng.gen_range(0..grid));
        layout
            .obstacles
            .push(Obstacle::sphere(ObstacleKind::ParkedCar, Vec3::new(road + kerb, 0.0, z), 1.4));
    }

    layout
        .ramps
        .push(Ramp::directional(Vec3::new(first_road, 0.0, block_centre(1)), 0.0, 8.0, 12.0, 2.5, 14.0));
    if let Some(&cross) = roads.get(1) {
        layout
            .ramps
            .push(Ramp::launchpad(Vec3::new(cross, 0.0, cross), 4.0, 0.3, 16.0));
    }

    for _ in 0..24 {
        let kind = PropKind::ALL[rng.gen_range(0..PropKind::ALL.len())];
        let position = road_point(&mut rng, &roads, bounds, kerb);
        layout.props.push(DynamicProp::new(kind, position, rng.gen_range(0.0..std::f32::consts::TAU)));
    }

    for _ in 0..30 {
        let position = road_point(&mut rng, &roads, bounds, kerb);
        let axis = if rng.gen_bool(0.5) {
            WalkAxis::AlongX
        } else {
            WalkAxis::AlongZ
        };
        let sign = if rng.gen_bool(0.5) { 1.0 } else { -1.0 };
        layout.pedestrians.push(Pedestrian::new(position, axis, sign, config));
    }

    layout.spawn = SpawnPose {
        position: Vec3::new(first_road, 0.0, bounds.min.y + 10.0),
        yaw: 0.0,
    };
    layout
}

/// A random point on a kerb, along either a north-south or east-west road.
fn road_point(rng: &mut StdRng, roads: &[f32], bounds: WorldBounds, kerb: f32) -> Vec3 {
    let road = roads[rng.gen_range(0..roads.len())];
    let along = rng.gen_range(bounds.min.x + 5.0..bounds.max.x - 5.0);
    let side = if rng.gen_bool(0.5) { kerb } else { -kerb };
    if rng.gen_bool(0.5) {
        Vec3::new(road + side, 0.0, along)
    } else {
        Vec3::new(along, 0.0, road + side)
    }
}
