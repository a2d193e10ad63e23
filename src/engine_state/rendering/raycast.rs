//! # Ray Casting
//!
//! Rays are traversed cell by cell through the grid (a voxel DDA) and test each
//! entered cell against whatever the caller considers solid. The streamer backs
//! that test with its resident chunk geometry, so a ray only ever hits what is
//! actually on screen.

use std::ops::ControlFlow;

use cgmath::{InnerSpace, Point3, Vector3};

use crate::engine_state::voxels::{
    block::block_side::BlockFace,
    chunk::{BlockPosition, ChunkLayout, ChunkPosition},
};

/// A half-line in world space with a unit direction.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Ray {
    pub origin: Point3<f32>,
    pub direction: Vector3<f32>,
}

impl Ray {
    /// Creates a ray, normalising `direction`. A zero direction is kept as is
    /// and hits nothing.
    pub fn new(origin: Point3<f32>, direction: Vector3<f32>) -> Self {
        let direction = if direction.magnitude2() > 0.0 {
            direction.normalize()
        } else {
            direction
        };
        Ray { origin, direction }
    }

    /// The point `distance` units along the ray.
    pub fn at(&self, distance: f32) -> Point3<f32> {
        self.origin + self.direction * distance
    }
}

/// One intersection of a ray with a cube face.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RayHit {
    /// Distance from the ray origin
    pub distance: f32,
    /// World-space intersection point on the face
    pub point: Point3<f32>,
    /// The face entered; its normal points back toward the ray origin
    pub face: BlockFace,
    /// The chunk owning the hit cube
    pub chunk: ChunkPosition,
}

/// Something rays can be cast against.
pub trait RayCaster {
    /// Every hit within `limit` units of the ray origin, nearest first.
    fn cast_ray(&self, ray: &Ray, limit: f32) -> Vec<RayHit>;

    /// The nearest hit within `limit` units of the ray origin.
    fn first_hit(&self, ray: &Ray, limit: f32) -> Option<RayHit> {
        self.cast_ray(ray, limit).into_iter().next()
    }
}

/// Walks `ray` through the grid cells of `layout` and reports each cell for
/// which `is_solid` holds, up to `limit` units from the origin.
///
/// The cell containing the origin is never reported. Traversal stops once the
/// ray has left the grid and is moving away from it.
pub fn traverse_cells(
    layout: &ChunkLayout,
    ray: &Ray,
    limit: f32,
    is_solid: impl FnMut(BlockPosition) -> bool,
) -> Vec<RayHit> {
    let mut hits = Vec::new();
    walk_cells(layout, ray, limit, is_solid, |hit| {
        hits.push(hit);
        ControlFlow::Continue(())
    });
    hits
}

/// Like [`traverse_cells`], but stops at the first solid cell.
pub fn first_cell_hit(
    layout: &ChunkLayout,
    ray: &Ray,
    limit: f32,
    is_solid: impl FnMut(BlockPosition) -> bool,
) -> Option<RayHit> {
    let mut first = None;
    walk_cells(layout, ray, limit, is_solid, |hit| {
        first = Some(hit);
        ControlFlow::Break(())
    });
    first
}

fn walk_cells(
    layout: &ChunkLayout,
    ray: &Ray,
    limit: f32,
    mut is_solid: impl FnMut(BlockPosition) -> bool,
    mut on_hit: impl FnMut(RayHit) -> ControlFlow<()>,
) {
    if ray.direction.magnitude2() == 0.0 || limit.is_nan() || limit <= 0.0 {
        return;
    }

    let start = layout.block_of_world(ray.origin);
    let start_min = layout.block_world_min(start);
    let mut cell = [start.x, start.y, start.z];
    let mut step = [0i32; 3];
    let mut t_max = [f32::INFINITY; 3];
    let mut t_delta = [f32::INFINITY; 3];

    for axis in 0..3 {
        let direction = ray.direction[axis];
        if direction > 0.0 {
            step[axis] = 1;
            t_max[axis] = (start_min[axis] + 1.0 - ray.origin[axis]) / direction;
            t_delta[axis] = 1.0 / direction;
        } else if direction < 0.0 {
            step[axis] = -1;
            t_max[axis] = (start_min[axis] - ray.origin[axis]) / direction;
            t_delta[axis] = -1.0 / direction;
        }
    }

    let bounds = [
        layout.dimensions.width as i32,
        layout.dimensions.height as i32,
        layout.dimensions.depth as i32,
    ];

    loop {
        let mut axis = 0;
        for candidate in 1..3 {
            if t_max[candidate] < t_max[axis] {
                axis = candidate;
            }
        }

        let distance = t_max[axis];
        if distance > limit {
            break;
        }

        cell[axis] += step[axis];
        t_max[axis] += t_delta[axis];

        let leaving = (0..3).any(|axis| {
            (cell[axis] < 0 && step[axis] <= 0) || (cell[axis] >= bounds[axis] && step[axis] >= 0)
        });
        if leaving {
            break;
        }

        let position = Point3::new(cell[0], cell[1], cell[2]);
        if is_solid(position) {
            if let Some(face) = BlockFace::from_axis(axis, step[axis] < 0) {
                let hit = RayHit {
                    distance,
                    point: ray.at(distance),
                    face,
                    chunk: layout.chunk_of_block(position),
                };
                if on_hit(hit).is_break() {
                    return;
                }
            }
        }
    }
}

/// The grid cell behind a hit face: the cube that was struck.
pub fn struck_cell(layout: &ChunkLayout, hit: &RayHit) -> BlockPosition {
    layout.block_of_world(hit.point - hit.face.normal() * 0.5)
}

/// The grid cell in front of a hit face: where a new block would go.
pub fn adjacent_cell(layout: &ChunkLayout, hit: &RayHit) -> BlockPosition {
    layout.block_of_world(hit.point + hit.face.normal() * 0.5)
}
