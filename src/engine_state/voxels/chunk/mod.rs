//! # Chunk Module
//!
//! A chunk is a fixed-size, axis-aligned box of the voxel grid and the unit of
//! mesh build and teardown. This module holds the chunk extent and the
//! coordinate conversions between the three spaces the engine works in:
//!
//! * **Grid space**: non-negative block indices into the dense grid.
//! * **Chunk space**: integer chunk coordinates; chunk `(cx, cy, cz)` covers
//!   grid cells `[cx*sx, cx*sx + sx)` and likewise for Y and Z.
//! * **World space**: continuous coordinates centred on the grid's horizontal
//!   midpoint. World X is grid X minus half the width, world Z is grid Z minus
//!   half the depth, and Y is not shifted, so the floor sits at zero.

use cgmath::{Point3, Vector3};
use serde::{Deserialize, Serialize};

use super::grid::WorldDimensions;

pub mod chunk_iteration;

/// Chunk coordinates (not block coordinates).
pub type ChunkPosition = Point3<i32>;

/// Grid coordinates of a single block. Signed so that out-of-range lookups can
/// be expressed and rejected.
pub type BlockPosition = Point3<i32>;

/// Block extent of every chunk along each axis.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkSize {
    pub x: u32,
    pub y: u32,
    pub z: u32,
}

impl ChunkSize {
    /// Creates a chunk extent.
    pub const fn new(x: u32, y: u32, z: u32) -> Self {
        ChunkSize { x, y, z }
    }

    /// Smallest extent over the three axes.
    pub fn min_extent(&self) -> u32 {
        self.x.min(self.y).min(self.z)
    }

    /// Number of blocks in one chunk.
    pub fn volume(&self) -> usize {
        self.x as usize * self.y as usize * self.z as usize
    }

    /// Row-major (x fastest, then y, then z) index of a local block position.
    pub fn local_index(&self, local: Point3<u32>) -> usize {
        local.x as usize
            + self.x as usize * (local.y as usize + self.y as usize * local.z as usize)
    }

    fn as_vector(&self) -> Vector3<i32> {
        Vector3::new(self.x as i32, self.y as i32, self.z as i32)
    }
}

impl Default for ChunkSize {
    fn default() -> Self {
        ChunkSize::new(4, 4, 4)
    }
}

/// The grid dimensions and chunk extent, and every conversion that needs both.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ChunkLayout {
    pub dimensions: WorldDimensions,
    pub chunk_size: ChunkSize,
}

impl ChunkLayout {
    /// Creates a layout for a grid of `dimensions` cut into chunks of `chunk_size`.
    pub fn new(dimensions: WorldDimensions, chunk_size: ChunkSize) -> Self {
        ChunkLayout {
            dimensions,
            chunk_size,
        }
    }

    /// Half the grid width and depth: the offset between grid and world space.
    fn horizontal_offset(&self) -> Vector3<f32> {
        Vector3::new(
            self.dimensions.width as f32 / 2.0,
            0.0,
            self.dimensions.depth as f32 / 2.0,
        )
    }

    /// The chunk containing a world-space position.
    pub fn chunk_of_world(&self, position: Point3<f32>) -> ChunkPosition {
        let grid = position + self.horizontal_offset();
        Point3::new(
            (grid.x / self.chunk_size.x as f32).floor() as i32,
            (grid.y / self.chunk_size.y as f32).floor() as i32,
            (grid.z / self.chunk_size.z as f32).floor() as i32,
        )
    }

    /// The chunk containing a grid cell.
    pub fn chunk_of_block(&self, block: BlockPosition) -> ChunkPosition {
        let size = self.chunk_size.as_vector();
        Point3::new(
            block.x.div_euclid(size.x),
            block.y.div_euclid(size.y),
            block.z.div_euclid(size.z),
        )
    }

    /// The grid cell containing a world-space position.
    pub fn block_of_world(&self, position: Point3<f32>) -> BlockPosition {
        let grid = position + self.horizontal_offset();
        Point3::new(
            grid.x.floor() as i32,
            grid.y.floor() as i32,
            grid.z.floor() as i32,
        )
    }

    /// World-space position of the minimum corner of a grid cell.
    pub fn block_world_min(&self, block: BlockPosition) -> Point3<f32> {
        Point3::new(block.x as f32, block.y as f32, block.z as f32) - self.horizontal_offset()
    }

    /// Grid coordinates of the first block of a chunk.
    pub fn chunk_start(&self, chunk: ChunkPosition) -> BlockPosition {
        let size = self.chunk_size.as_vector();
        Point3::new(chunk.x * size.x, chunk.y * size.y, chunk.z * size.z)
    }

    /// World-space position of a chunk's minimum corner. Chunk geometry is
    /// placed here.
    pub fn chunk_world_origin(&self, chunk: ChunkPosition) -> Point3<f32> {
        self.block_world_min(self.chunk_start(chunk))
    }

    /// World-space geometric centre of a chunk.
    pub fn chunk_center(&self, chunk: ChunkPosition) -> Point3<f32> {
        let half = Vector3::new(
            self.chunk_size.x as f32 / 2.0,
            self.chunk_size.y as f32 / 2.0,
            self.chunk_size.z as f32 / 2.0,
        );
        self.chunk_world_origin(chunk) + half
    }

    /// Highest chunk coordinate on each axis that still overlaps the grid.
    pub fn max_chunk(&self) -> ChunkPosition {
        let last = |extent: u32, size: u32| (extent.saturating_sub(1) / size.max(1)) as i32;
        Point3::new(
            last(self.dimensions.width, self.chunk_size.x),
            last(self.dimensions.height, self.chunk_size.y),
            last(self.dimensions.depth, self.chunk_size.z),
        )
    }

    /// Highest chunk Y coordinate that still overlaps the grid.
    pub fn max_chunk_y(&self) -> i32 {
        self.max_chunk().y
    }

    /// Position of a grid cell relative to the start of its chunk.
    pub fn local_position(&self, block: BlockPosition) -> Point3<u32> {
        let size = self.chunk_size.as_vector();
        Point3::new(
            block.x.rem_euclid(size.x) as u32,
            block.y.rem_euclid(size.y) as u32,
            block.z.rem_euclid(size.z) as u32,
        )
    }
}
