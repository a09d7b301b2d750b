//! Orchestration loop and the Bevy plugin that drives it.
//!
//! [`Simulation::step`] advances the whole driving world by one tick in a
//! fixed dependency order: the vehicle (with its static collisions) first,
//! then everything that reads the vehicle's new pose.
//!
//! ## Per-tick order
//!
//! | # | Stage | Reads | Writes |
//! |---|-------|-------|--------|
//! | 1 | boost | key snapshot, vehicle speed | boost amount, multiplier |
//! | 2 | vehicle dynamics + obstacles | keys, multiplier | vehicle |
//! | 3 | world boundary | vehicle | vehicle |
//! | 4 | skid marks | vehicle | skid marks |
//! | 5 | ramps / launchpads | vehicle | vehicle, effects |
//! | 6 | props | vehicle | props, vehicle speed, score |
//! | 7 | pedestrians | vehicle | pedestrians, limbs, score |
//! | 8 | transient bodies | | limbs |
//! | 9 | boost trail, speed readout | vehicle, boost | effects |
//!
//! In the game, [`DrivingSimPlugin`] runs one step per `Update` frame and
//! forwards the buffered effects as [`SimEffect`] messages.

use crate::boost::Boost;
use crate::boundary::{confine_vehicle, BoundaryContact};
use crate::collision::CollisionHit;
use crate::config::DrivingConfig;
use crate::effects::{forward_effects_system, EffectBuffer, EffectSink, SimEffect};
use crate::input::KeySnapshot;
use crate::pedestrian::{update_pedestrians, Pedestrian, PedestrianContext};
use crate::props::{update_props, DynamicProp};
use crate::ramp::{resolve_ramps, RampContact};
use crate::session::SessionState;
use crate::transient::TransientPool;
use crate::vehicle::{update_vehicle, SkidMarks, Vehicle};
use crate::world::{CityLayout, Obstacle, Ramp, WorldBounds};
use bevy::prelude::*;

/// The whole mutable driving world.
#[derive(Resource, Debug)]
pub struct Simulation {
    pub vehicle: Vehicle,
    pub vehicle_visual: Option<Entity>,
    pub boost: Boost,
    pub skid_marks: SkidMarks,
    pub obstacles: Vec<Obstacle>,
    pub ramps: Vec<Ramp>,
    pub props: Vec<DynamicProp>,
    pub pedestrians: Vec<Pedestrian>,
    pub transients: TransientPool,
    pub bounds: WorldBounds,
    pub session: SessionState,
}

/// Notable events of one [`Simulation::step`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickReport {
    pub dt: f32,
    pub collision: Option<CollisionHit>,
    pub landed: bool,
    pub boundary: Option<BoundaryContact>,
    pub ramp: RampContact,
    pub props_knocked: u32,
    pub pedestrians_killed: u32,
}

impl Simulation {
    /// Take ownership of a freshly built city and put the car on its spawn.
    pub fn new(layout: CityLayout, config: &DrivingConfig) -> Self {
        let CityLayout {
            obstacles,
            ramps,
            props,
            pedestrians,
            bounds,
            spawn,
        } = layout;
        info!(
            "Simulation built: {} obstacles, {} ramps, {} props, {} pedestrians",
            obstacles.len(),
            ramps.len(),
            props.len(),
            pedestrians.len()
        );
        Self {
            vehicle: Vehicle::spawn(spawn, config.vehicle_tuning()),
            vehicle_visual: None,
            boost: Boost::new(config),
            skid_marks: SkidMarks::default(),
            obstacles,
            ramps,
            props,
            pedestrians,
            transients: TransientPool::new(config.transient_capacity),
            bounds,
            session: SessionState::new(config),
        }
    }

    pub fn score(&self) -> u32 {
        self.session.score
    }

    /// Advance one tick.  `dt` is clamped to `[0, max_tick_dt]` so a long
    /// frame hitch cannot launch bodies through walls.
    pub fn step(
        &mut self,
        input: &KeySnapshot,
        dt: f32,
        config: &DrivingConfig,
        sink: &mut impl EffectSink,
    ) -> TickReport {
        let dt = if dt.is_finite() {
            dt.clamp(0.0, config.max_tick_dt)
        } else {
            0.0
        };
        self.session.elapsed += dt;

        self.boost.update(input.boost, &self.vehicle, dt, config);

        let vehicle_report = update_vehicle(
            &mut self.vehicle,
            input,
            self.boost.multiplier,
            &self.obstacles,
            dt,
            config,
        );
        if let Some(hit) = vehicle_report.collision {
            self.session.collisions += 1;
            if self.session.debug.log_collisions {
                info!(
                    "Hit {:?} #{} at {:.1} u/s",
                    self.obstacles[hit.obstacle].kind, hit.obstacle, vehicle_report.impact_speed
                );
            }
        }
        if vehicle_report.landed {
            debug!("Landed at {:.1} u/s", self.vehicle.speed);
        }

        let boundary = confine_vehicle(&mut self.vehicle, &self.bounds, config);
        self.skid_marks.update(&self.vehicle, dt, config);

        let ramp = resolve_ramps(&mut self.vehicle, &self.ramps, self.boost.active, config, sink);
        if ramp.launched {
            self.session.jumps += 1;
        }

        let props_knocked = update_props(
            &mut self.props,
            &mut self.vehicle,
            &self.bounds,
            dt,
            config,
            &mut self.session,
            sink,
        );

        let pedestrians_killed = if self.session.debug.freeze_pedestrians {
            0
        } else {
            let ctx = PedestrianContext {
                vehicle: &self.vehicle,
                obstacles: &self.obstacles,
                bounds: &self.bounds,
                dt,
                config,
            };
            update_pedestrians(
                &mut self.pedestrians,
                &ctx,
                &mut self.session,
                &mut self.transients,
                sink,
            )
        };

        self.transients.update(config.gravity, dt);

        if self.boost.active {
            sink.emit_boost_trail(self.vehicle.rear_position(), -self.vehicle.direction);
        }
        sink.on_speed_changed(self.vehicle.speed.abs() * self.boost.multiplier);

        TickReport {
            dt,
            collision: vehicle_report.collision,
            landed: vehicle_report.landed,
            boundary,
            ramp,
            props_knocked,
            pedestrians_killed,
        }
    }
}

// ── Plugin ────────────────────────────────────────────────────────────────────

/// Runs one [`Simulation::step`] per `Update` frame once a [`Simulation`]
/// resource has been inserted.
pub struct DrivingSimPlugin;

impl Plugin for DrivingSimPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<DrivingConfig>()
            .init_resource::<KeySnapshot>()
            .init_resource::<EffectBuffer>()
            .add_message::<SimEffect>()
            .add_systems(
                Update,
                (
                    capture_keys_system,
                    simulation_tick_system,
                    forward_effects_system,
                    sync_visuals_system,
                )
                    .chain()
                    .run_if(resource_exists::<Simulation>),
            );
    }
}

/// Snapshot the keyboard once per frame.  Without a keyboard (headless runs)
/// the snapshot is left as whatever the autopilot or a test wrote.
pub fn capture_keys_system(keys: Option<Res<ButtonInput<KeyCode>>>, mut snapshot: ResMut<KeySnapshot>) {
    if let Some(keys) = keys {
        *snapshot = KeySnapshot::capture(&*keys);
    }
}

pub fn simulation_tick_system(
    time: Res<Time>,
    config: Res<DrivingConfig>,
    input: Res<KeySnapshot>,
    mut sim: ResMut<Simulation>,
    mut effects: ResMut<EffectBuffer>,
) {
    sim.step(&input, time.delta_secs(), &config, &mut effects.0);
}

/// Copy simulated poses onto whatever visual entities are attached.
pub fn sync_visuals_system(sim: Res<Simulation>, mut transforms: Query<&mut Transform>) {
    if let Some(entity) = sim.vehicle_visual {
        if let Ok(mut transform) = transforms.get_mut(entity) {
            transform.translation = sim.vehicle.position;
            transform.rotation = sim.vehicle.rotation;
        }
    }
    for prop in &sim.props {
        let Some(entity) = prop.visual else { continue };
        if let Ok(mut transform) = transforms.get_mut(entity) {
            transform.translation = prop.position;
            transform.rotation = prop.rotation;
        }
    }
    for ped in &sim.pedestrians {
        let Some(entity) = ped.visual else { continue };
        if let Ok(mut transform) = transforms.get_mut(entity) {
            transform.translation = ped.position;
            transform.rotation = Quat::from_euler(EulerRot::YXZ, ped.facing, ped.body_pitch, 0.0);
        }
    }
}
