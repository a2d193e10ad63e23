//! Task for generating chunk geometry in a background thread.
//!
//! Each task carries its own mesher clone and a shared handle to the grid, so
//! workers never touch the streamer's resident map. Results are merged back
//! sequentially by the owner.

use crate::{
    core::MtResource,
    engine_state::{
        rendering::meshing::{ChunkGeometry, ChunkMesher},
        task_management::task::Task,
        voxels::{chunk::ChunkPosition, grid::VoxelGrid},
    },
};

/// A task that builds the geometry of one chunk.
pub struct ChunkMeshGenerationTask {
    /// Mesher carrying the layout and material lookup
    mesher: ChunkMesher,
    /// The grid, read only while the task runs
    grid: MtResource<VoxelGrid>,
    /// The chunk to build
    chunk: ChunkPosition,
}

impl ChunkMeshGenerationTask {
    /// Creates a new chunk mesh generation task.
    ///
    /// # Arguments
    /// * `mesher` - Mesher to build with
    /// * `grid` - Shared handle to the voxel grid
    /// * `chunk` - Coordinates of the chunk to build
    ///
    /// # Returns
    /// A new `ChunkMeshGenerationTask` instance
    pub fn new(mesher: ChunkMesher, grid: MtResource<VoxelGrid>, chunk: ChunkPosition) -> Self {
        ChunkMeshGenerationTask {
            mesher,
            grid,
            chunk,
        }
    }
}

impl Task for ChunkMeshGenerationTask {
    type Output = ChunkMeshGenerationResult;

    /// Builds the chunk under a read lock on the grid.
    fn process(&self) -> ChunkMeshGenerationResult {
        let grid = self.grid.get();
        ChunkMeshGenerationResult {
            chunk: self.chunk,
            geometry: self.mesher.build(self.chunk, &grid),
        }
    }
}

/// The result of a chunk mesh generation task.
#[derive(Debug)]
pub struct ChunkMeshGenerationResult {
    /// The chunk that was built
    pub chunk: ChunkPosition,
    /// Its geometry, or `None` if it holds nothing drawable
    pub geometry: Option<ChunkGeometry>,
}
