//! World/city data handed to the simulation at world build.
//!
//! The city generator (an external collaborator) produces a [`CityLayout`]
//! once; after that obstacles, ramps and bounds are read-only.  Props and
//! pedestrians are moved into the simulation, which owns their mutable state.

use crate::pedestrian::Pedestrian;
use crate::props::DynamicProp;
use bevy::prelude::*;

// ── Obstacles ─────────────────────────────────────────────────────────────────

/// What an obstacle is.  The footprint shape follows from the kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObstacleKind {
    Building,
    BoundaryWall,
    Stadium,
    Tree,
    Fountain,
    Skyscraper,
    ParkedCar,
}

impl ObstacleKind {
    /// `true` for kinds collided against with an oriented rectangle.
    pub fn has_box_footprint(self) -> bool {
        match self {
            ObstacleKind::Building | ObstacleKind::BoundaryWall | ObstacleKind::Stadium => true,
            ObstacleKind::Tree
            | ObstacleKind::Fountain
            | ObstacleKind::Skyscraper
            | ObstacleKind::ParkedCar => false,
        }
    }

    /// Walls around the playable area that fleeing pedestrians steer along.
    pub fn is_boundary(self) -> bool {
        matches!(self, ObstacleKind::BoundaryWall)
    }
}

/// Collision footprint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ObstacleShape {
    Sphere { radius: f32 },
    /// Rectangle in the ground plane; `width` runs along the local right axis,
    /// `depth` along the local forward axis.
    Box { width: f32, depth: f32, yaw: f32 },
}

/// A static obstacle.  Immutable after world build.
#[derive(Debug, Clone, PartialEq)]
pub struct Obstacle {
    pub kind: ObstacleKind,
    pub position: Vec3,
    pub shape: ObstacleShape,
    /// Presentation handle; opaque to the simulation.
    pub visual: Option<Entity>,
}

impl Obstacle {
    /// A rectangular obstacle.  Panics in debug builds if `kind` is a sphere kind.
    pub fn boxed(kind: ObstacleKind, position: Vec3, width: f32, depth: f32, yaw: f32) -> Self {
        debug_assert!(kind.has_box_footprint(), "{kind:?} has a sphere footprint");
        Self {
            kind,
            position,
            shape: ObstacleShape::Box { width, depth, yaw },
            visual: None,
        }
    }

    /// A spherical obstacle.  Panics in debug builds if `kind` is a box kind.
    pub fn sphere(kind: ObstacleKind, position: Vec3, radius: f32) -> Self {
        debug_assert!(!kind.has_box_footprint(), "{kind:?} has a box footprint");
        Self {
            kind,
            position,
            shape: ObstacleShape::Sphere { radius },
            visual: None,
        }
    }

    /// Half-extent of the footprint along a ground-plane unit `direction`: the
    /// sphere radius, or the rectangle's support `|n·right|·w/2 + |n·fwd|·d/2`.
    pub fn extent_along(&self, direction: Vec3) -> f32 {
        match self.shape {
            ObstacleShape::Sphere { radius } => radius,
            ObstacleShape::Box { width, depth, yaw } => {
                let (sin, cos) = yaw.sin_cos();
                let right = Vec3::new(cos, 0.0, -sin);
                let forward = Vec3::new(sin, 0.0, cos);
                direction.dot(right).abs() * width * 0.5 + direction.dot(forward).abs() * depth * 0.5
            }
        }
    }
}

// ── Ramps ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RampKind {
    /// Wedge rising linearly along its forward axis, from 0 at the entry edge
    /// to `height` at the far edge.
    Directional {
        yaw: f32,
        width: f32,
        length: f32,
        height: f32,
    },
    /// Flat circular pad that fires from any approach direction.
    Launchpad { radius: f32, height: f32 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Ramp {
    pub kind: RampKind,
    pub position: Vec3,
    /// Launch velocity (u/s) before the global cap and speed scaling.
    pub jump_strength: f32,
}

impl Ramp {
    pub fn directional(
        position: Vec3,
        yaw: f32,
        width: f32,
        length: f32,
        height: f32,
        jump_strength: f32,
    ) -> Self {
        Self {
            kind: RampKind::Directional {
                yaw,
                width,
                length,
                height,
            },
            position,
            jump_strength,
        }
    }

    pub fn launchpad(position: Vec3, radius: f32, height: f32, jump_strength: f32) -> Self {
        Self {
            kind: RampKind::Launchpad { radius, height },
            position,
            jump_strength,
        }
    }
}

// ── Bounds ────────────────────────────────────────────────────────────────────

/// Playable rectangle in the ground plane.  `min.y`/`max.y` are world Z.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldBounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl WorldBounds {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Square centred on the origin covering `grid_size` blocks plus their roads.
    pub fn from_grid(grid_size: u32, block_size: f32, road_width: f32) -> Self {
        let half = grid_size as f32 * (block_size + road_width) * 0.5;
        Self::new(Vec2::splat(-half), Vec2::splat(half))
    }

    /// Whether `point` (world space) lies inside the rectangle shrunk by `margin`.
    pub fn contains(&self, point: Vec3, margin: f32) -> bool {
        point.x >= self.min.x + margin
            && point.x <= self.max.x - margin
            && point.z >= self.min.y + margin
            && point.z <= self.max.y - margin
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn depth(&self) -> f32 {
        self.max.y - self.min.y
    }
}

impl Default for WorldBounds {
    fn default() -> Self {
        Self::from_grid(
            crate::constants::GRID_SIZE,
            crate::constants::BLOCK_SIZE,
            crate::constants::ROAD_WIDTH,
        )
    }
}

// ── Layout ────────────────────────────────────────────────────────────────────

/// Where the car starts.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SpawnPose {
    pub position: Vec3,
    pub yaw: f32,
}

/// Everything the city collaborator produces at world build.
#[derive(Debug, Clone, Default)]
pub struct CityLayout {
    pub obstacles: Vec<Obstacle>,
    pub ramps: Vec<Ramp>,
    pub props: Vec<DynamicProp>,
    pub pedestrians: Vec<Pedestrian>,
    pub bounds: WorldBounds,
    pub spawn: SpawnPose,
}

impl CityLayout {
    /// An empty city of the given size.
    pub fn empty(bounds: WorldBounds) -> Self {
        Self {
            bounds,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_from_grid_are_centred() {
        let b = WorldBounds::from_grid(5, 40.0, 12.0);
        assert_eq!(b.min, Vec2::splat(-130.0));
        assert_eq!(b.max, Vec2::splat(130.0));
        assert_eq!(b.width(), 260.0);
    }

    #[test]
    fn contains_respects_margin() {
        let b = WorldBounds::new(Vec2::splat(-10.0), Vec2::splat(10.0));
        assert!(b.contains(Vec3::new(9.0, 5.0, -9.0), 0.0));
        assert!(!b.contains(Vec3::new(9.0, 0.0, 0.0), 2.0));
    }

    #[test]
    fn box_extent_follows_the_direction() {
        let o = Obstacle::boxed(ObstacleKind::BoundaryWall, Vec3::ZERO, 200.0, 1.0, 0.0);
        assert!((o.extent_along(Vec3::Z) - 0.5).abs() < 1e-6);
        assert!((o.extent_along(Vec3::NEG_X) - 100.0).abs() < 1e-4);
        let t = Obstacle::sphere(ObstacleKind::Tree, Vec3::ZERO, 1.25);
        assert_eq!(t.extent_along(Vec3::X), 1.25);
    }

    #[test]
    fn footprint_kinds_partition() {
        assert!(ObstacleKind::Stadium.has_box_footprint());
        assert!(!ObstacleKind::ParkedCar.has_box_footprint());
        assert!(ObstacleKind::BoundaryWall.is_boundary());
        assert!(!ObstacleKind::Building.is_boundary());
    }
}
