//! Background tasks for the rendering system.
//!
//! Meshing one chunk has no data dependency on any other chunk: it reads a
//! disjoint region of the grid and writes only its own geometry. The streamer
//! therefore hands the chunks it needs to a `MeshScheduler`, which builds them
//! either inline or across a worker pool, and merges the results itself.
//!
//! # Available Tasks
//! - `ChunkMeshGenerationTask`: Builds the geometry of one chunk

use log::debug;

use crate::{
    core::MtResource,
    engine_state::{
        rendering::meshing::ChunkMesher,
        task_management::TaskManager,
        voxels::{chunk::ChunkPosition, grid::VoxelGrid},
    },
};

pub mod chunk_mesh_generation_task;

use chunk_mesh_generation_task::{ChunkMeshGenerationResult, ChunkMeshGenerationTask};

/// How chunk geometry gets built.
pub enum MeshScheduler {
    /// On the calling thread, one chunk after another.
    Inline,
    /// Across a pool of worker threads.
    Pooled(TaskManager<ChunkMeshGenerationResult>),
}

impl MeshScheduler {
    /// A pool of `worker_threads` workers, or `Inline` for zero.
    pub fn with_workers(worker_threads: usize) -> Self {
        if worker_threads == 0 {
            MeshScheduler::Inline
        } else {
            MeshScheduler::Pooled(TaskManager::new(worker_threads))
        }
    }

    /// Builds every chunk in `chunks` and returns the results once all are done.
    ///
    /// The caller must not hold a write guard on `grid`.
    pub fn build_all(
        &mut self,
        mesher: &ChunkMesher,
        grid: &MtResource<VoxelGrid>,
        chunks: Vec<ChunkPosition>,
    ) -> Vec<ChunkMeshGenerationResult> {
        let mut results = Vec::with_capacity(chunks.len());
        if chunks.is_empty() {
            return results;
        }

        match self {
            MeshScheduler::Inline => {
                let grid = grid.get();
                for chunk in chunks {
                    results.push(ChunkMeshGenerationResult {
                        chunk,
                        geometry: mesher.build(chunk, &grid),
                    });
                }
            }
            MeshScheduler::Pooled(task_manager) => {
                debug!("Publishing {} chunk mesh tasks", chunks.len());
                for chunk in chunks {
                    task_manager.publish_task(Box::new(ChunkMeshGenerationTask::new(
                        mesher.clone(),
                        grid.clone(),
                        chunk,
                    )));
                }
                task_manager.wait_for_all(|result| results.push(result));
            }
        }

        results
    }
}
