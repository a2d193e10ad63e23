//! # Voxel Grid Module
//!
//! The dense block store for the whole world. The grid is allocated once at
//! world init, filled by the layering rule, edited in place by break and place,
//! and never resized.
//!
//! Out-of-range access is not an error: reads return air (`None`) and writes
//! are rejected without touching the grid.

use cgmath::Point3;
use log::{debug, info};
use serde::{Deserialize, Serialize};

use super::{block::BlockId, chunk::BlockPosition};

/// Width (X), height (Y) and depth (Z) of the grid in blocks.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldDimensions {
    pub width: u32,
    pub height: u32,
    pub depth: u32,
}

impl WorldDimensions {
    /// Creates grid dimensions.
    pub const fn new(width: u32, height: u32, depth: u32) -> Self {
        WorldDimensions {
            width,
            height,
            depth,
        }
    }

    /// Whether `position` is a valid grid cell.
    pub fn contains(&self, position: BlockPosition) -> bool {
        (0..self.width as i64).contains(&(position.x as i64))
            && (0..self.height as i64).contains(&(position.y as i64))
            && (0..self.depth as i64).contains(&(position.z as i64))
    }

    /// Number of cells in the grid.
    pub fn volume(&self) -> usize {
        self.width as usize * self.height as usize * self.depth as usize
    }
}

impl Default for WorldDimensions {
    fn default() -> Self {
        WorldDimensions::new(256, 63, 256)
    }
}

/// A contiguous, inclusive Y range filled with one block type in every column.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockLayer {
    pub block_id: BlockId,
    pub y_start: i32,
    pub y_end: i32,
}

impl BlockLayer {
    /// Creates a layer covering `y_start..=y_end`.
    pub const fn new(block_id: BlockId, y_start: i32, y_end: i32) -> Self {
        BlockLayer {
            block_id,
            y_start,
            y_end,
        }
    }
}

/// Dense 3D array of block ids with fixed bounds.
pub struct VoxelGrid {
    dimensions: WorldDimensions,
    blocks: Vec<Option<BlockId>>,
    layers: Vec<BlockLayer>,
}

impl VoxelGrid {
    /// Allocates a grid of `dimensions` filled with air.
    pub fn new(dimensions: WorldDimensions) -> Self {
        VoxelGrid {
            dimensions,
            blocks: vec![None; dimensions.volume()],
            layers: Vec::new(),
        }
    }

    /// The grid's fixed bounds.
    pub fn dimensions(&self) -> WorldDimensions {
        self.dimensions
    }

    fn index_of(&self, position: BlockPosition) -> Option<usize> {
        if !self.dimensions.contains(position) {
            return None;
        }
        let width = self.dimensions.width as usize;
        let depth = self.dimensions.depth as usize;
        Some(
            position.x as usize
                + width * (position.z as usize + depth * position.y as usize),
        )
    }

    /// The block at `(x, y, z)`, or `None` for air and for positions outside
    /// the grid.
    pub fn get(&self, x: i32, y: i32, z: i32) -> Option<BlockId> {
        self.get_at(Point3::new(x, y, z))
    }

    /// [`VoxelGrid::get`] taking a position.
    pub fn get_at(&self, position: BlockPosition) -> Option<BlockId> {
        self.index_of(position).and_then(|index| self.blocks[index])
    }

    /// Writes `block` (or air for `None`) at `(x, y, z)`.
    ///
    /// Returns `false` and leaves the grid untouched when the position is
    /// outside the grid.
    pub fn set(&mut self, x: i32, y: i32, z: i32, block: Option<BlockId>) -> bool {
        self.set_at(Point3::new(x, y, z), block)
    }

    /// [`VoxelGrid::set`] taking a position.
    pub fn set_at(&mut self, position: BlockPosition, block: Option<BlockId>) -> bool {
        match self.index_of(position) {
            Some(index) => {
                self.blocks[index] = block;
                true
            }
            None => false,
        }
    }

    /// Refills the grid from a layering table.
    ///
    /// The grid is cleared to air, then each layer is written into every
    /// column in list order, so a later layer overwrites an earlier one where
    /// their ranges overlap. Parts of a layer outside the grid height are
    /// dropped.
    pub fn generate(&mut self, layers: &[BlockLayer]) {
        self.blocks.fill(None);
        self.layers = layers.to_vec();

        let height = self.dimensions.height as i32;
        for layer in layers {
            let y_start = layer.y_start.max(0);
            let y_end = layer.y_end.min(height - 1);
            if y_start > y_end {
                debug!("Layer {:?} lies outside the grid, skipped", layer);
                continue;
            }
            for y in y_start..=y_end {
                for z in 0..self.dimensions.depth as i32 {
                    for x in 0..self.dimensions.width as i32 {
                        self.set(x, y, z, Some(layer.block_id));
                    }
                }
            }
        }

        info!(
            "Generated {}x{}x{} grid from {} layers",
            self.dimensions.width,
            self.dimensions.height,
            self.dimensions.depth,
            layers.len()
        );
    }

    /// Highest `y_end` over the configured layers, or 0 with no layers.
    ///
    /// Used to spawn the viewer above the terrain.
    pub fn highest_solid_y(&self) -> i32 {
        self.layers
            .iter()
            .map(|layer| layer.y_end)
            .max()
            .unwrap_or(0)
            .max(0)
    }

    /// The block type of the bottom-most layer, which is indestructible at the
    /// world floor.
    pub fn floor_block(&self) -> Option<BlockId> {
        self.layers
            .iter()
            .min_by_key(|layer| layer.y_start)
            .map(|layer| layer.block_id)
    }
}
