//! Static obstacle collision tests.
//!
//! ## Contract
//!
//! [`check_collision`] scans the obstacle list **in order** and returns the
//! first obstacle the vehicle's bounding volume touches.  List order is the
//! tie-breaker when two obstacles overlap the car on the same tick.
//!
//! | Footprint | Test |
//! |-----------|------|
//! | Sphere    | 3D centre distance < sum of radii |
//! | Box       | any of the 4 rotated edges crosses the car's axis-aligned bounding square, or the car centre lies inside the rotated rectangle |
//!
//! The reported normal is the ground-plane unit vector from the obstacle
//! centre to the car, not the true face normal of the box.

use crate::constants::GEOMETRY_EPSILON;
use crate::world::{Obstacle, ObstacleShape};
use bevy::prelude::*;

/// One obstacle contact.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionHit {
    /// Index into the obstacle slice that was scanned.
    pub obstacle: usize,
    /// Ground-plane unit vector from the obstacle centre toward the car, or
    /// `None` when the two centres coincide in the ground plane.
    pub normal: Option<Vec3>,
}

/// Outcome of a swept check.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepResult {
    pub hit: Option<CollisionHit>,
    /// Last sample along the segment that was collision-free (the start point
    /// if the very first sample hit).
    pub last_free: Vec3,
}

/// Ground-plane unit vector from `from` to `to`; `None` for coincident points.
pub fn ground_normal(from: Vec3, to: Vec3) -> Option<Vec3> {
    Vec3::new(to.x - from.x, 0.0, to.z - from.z).try_normalize()
}

/// Ground-plane distance between two points.
#[inline]
pub fn ground_distance(a: Vec3, b: Vec3) -> f32 {
    Vec2::new(a.x - b.x, a.z - b.z).length()
}

/// Test a body of `radius` at `position` against every obstacle in order.
pub fn check_collision(position: Vec3, radius: f32, obstacles: &[Obstacle]) -> Option<CollisionHit> {
    obstacles
        .iter()
        .position(|obstacle| overlaps(position, radius, obstacle))
        .map(|index| CollisionHit {
            obstacle: index,
            normal: ground_normal(obstacles[index].position, position),
        })
}

/// Sample `samples` evenly spaced points from `from` (exclusive) to `to`
/// (inclusive); the first sample that collides wins.
pub fn sweep_collision(
    from: Vec3,
    to: Vec3,
    radius: f32,
    obstacles: &[Obstacle],
    samples: u32,
) -> SweepResult {
    let samples = samples.max(1);
    let mut last_free = from;
    for i in 1..=samples {
        let point = from.lerp(to, i as f32 / samples as f32);
        if let Some(hit) = check_collision(point, radius, obstacles) {
            return SweepResult {
                hit: Some(hit),
                last_free,
            };
        }
        last_free = point;
    }
    SweepResult {
        hit: None,
        last_free,
    }
}

/// Number of sweep samples for a hop of `travel` units: at least `min_samples`,
/// plus one per `spacing` travelled.
pub fn sweep_sample_count(travel: f32, spacing: f32, min_samples: u32) -> u32 {
    let by_distance = if spacing > 0.0 && travel.is_finite() {
        (travel / spacing).ceil() as u32
    } else {
        0
    };
    by_distance.max(min_samples)
}

fn overlaps(position: Vec3, radius: f32, obstacle: &Obstacle) -> bool {
    match obstacle.shape {
        ObstacleShape::Sphere { radius: r } => position.distance(obstacle.position) < radius + r,
        ObstacleShape::Box { width, depth, yaw } => {
            if !box_geometry_valid(width, depth, yaw) {
                return false;
            }
            let centre = Vec2::new(obstacle.position.x, obstacle.position.z);
            let point = Vec2::new(position.x, position.z);
            let aabb_min = point - Vec2::splat(radius);
            let aabb_max = point + Vec2::splat(radius);

            let corners = box_corners(centre, width, depth, yaw);
            let edge_hit = (0..4).any(|i| {
                segment_intersects_aabb(corners[i], corners[(i + 1) % 4], aabb_min, aabb_max)
            });
            edge_hit || point_in_rotated_rect(point, centre, width, depth, yaw)
        }
    }
}

/// Malformed footprints are skipped rather than aborting the scan.
fn box_geometry_valid(width: f32, depth: f32, yaw: f32) -> bool {
    width.is_finite() && depth.is_finite() && yaw.is_finite() && width > 0.0 && depth > 0.0
}

/// Local right and forward axes of a footprint rotated by `yaw`, as (x, z).
fn footprint_axes(yaw: f32) -> (Vec2, Vec2) {
    let (sin, cos) = yaw.sin_cos();
    (Vec2::new(cos, -sin), Vec2::new(sin, cos))
}

/// The four corners of a rotated rectangle, in winding order.
pub fn box_corners(centre: Vec2, width: f32, depth: f32, yaw: f32) -> [Vec2; 4] {
    let (right, forward) = footprint_axes(yaw);
    let r = right * (width * 0.5);
    let f = forward * (depth * 0.5);
    [centre - r - f, centre + r - f, centre + r + f, centre - r + f]
}

/// Whether `point` lies inside (or on the edge of) the rotated rectangle.
pub fn point_in_rotated_rect(point: Vec2, centre: Vec2, width: f32, depth: f32, yaw: f32) -> bool {
    let (right, forward) = footprint_axes(yaw);
    let rel = point - centre;
    rel.dot(right).abs() <= width * 0.5 && rel.dot(forward).abs() <= depth * 0.5
}

/// Slab test of the segment `p0 → p1` against an axis-aligned box.
///
/// Near-zero direction components are replaced by `GEOMETRY_EPSILON` so
/// axis-parallel edges never divide by zero.
pub fn segment_intersects_aabb(p0: Vec2, p1: Vec2, min: Vec2, max: Vec2) -> bool {
    let d = p1 - p0;
    let mut t_min = 0.0_f32;
    let mut t_max = 1.0_f32;

    for (origin, dir, lo, hi) in [(p0.x, d.x, min.x, max.x), (p0.y, d.y, min.y, max.y)] {
        let dir = if dir.abs() < GEOMETRY_EPSILON {
            GEOMETRY_EPSILON.copysign(dir)
        } else {
            dir
        };
        let inv = 1.0 / dir;
        let mut t0 = (lo - origin) * inv;
        let mut t1 = (hi - origin) * inv;
        if t0 > t1 {
            std::mem::swap(&mut t0, &mut t1);
        }
        t_min = t_min.max(t0);
        t_max = t_max.min(t1);
        if t_min > t_max {
            return false;
        }
    }
    true
}
