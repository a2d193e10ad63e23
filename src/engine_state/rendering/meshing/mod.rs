//! Chunk mesh generation.
//!
//! Converts one chunk's slice of the voxel grid into `ChunkGeometry`: one unit
//! cube per solid block, centred at the block's local position plus one half,
//! with the geometry placed at the chunk's world-space minimum corner.
//!
//! # Architecture
//! - `ChunkMesher`: Reads the grid and produces geometry; cheap to clone so each
//!   meshing task can carry its own
//! - `geometry`: The `ChunkGeometry` and `CubeInstance` output types
//!
//! # Performance Considerations
//! - No face culling: a fully buried block still costs a cube, so build cost
//!   grows with chunk volume rather than exposed surface
//! - Materials are deduplicated per chunk, so the per-cube material reference is
//!   a 32-bit slot rather than a handle

use std::sync::Arc;

use bitvec::vec::BitVec;
use log::{debug, warn};

use crate::engine_state::voxels::{
    block::BlockId,
    chunk::{chunk_iteration::ChunkBlockIterator, ChunkLayout, ChunkPosition},
    grid::VoxelGrid,
};

use super::{BlockAssets, MaterialHandle};

mod geometry;

pub use geometry::{ChunkGeometry, CubeInstance};

/// Builds and disposes chunk geometry.
#[derive(Clone)]
pub struct ChunkMesher {
    layout: ChunkLayout,
    assets: Arc<dyn BlockAssets>,
}

impl ChunkMesher {
    /// Creates a mesher for chunks of `layout`, drawing materials from `assets`.
    ///
    /// # Arguments
    /// * `layout` - Grid dimensions and chunk extent
    /// * `assets` - The asset collaborator providing block materials
    pub fn new(layout: ChunkLayout, assets: Arc<dyn BlockAssets>) -> Self {
        ChunkMesher { layout, assets }
    }

    /// The layout this mesher builds chunks for.
    pub fn layout(&self) -> &ChunkLayout {
        &self.layout
    }

    /// Builds the geometry for `chunk`.
    ///
    /// Every solid block inside the chunk's box with a known material becomes
    /// one cube. Blocks whose material lookup fails are skipped with a warning;
    /// the rest of the chunk still builds.
    ///
    /// # Arguments
    /// * `chunk` - Chunk coordinates to build
    /// * `grid` - The voxel grid, read only
    ///
    /// # Returns
    /// * `Some(ChunkGeometry)` with at least one cube
    /// * `None` if the chunk produced no cubes
    pub fn build(&self, chunk: ChunkPosition, grid: &VoxelGrid) -> Option<ChunkGeometry> {
        let chunk_size = self.layout.chunk_size;
        let mut instances = Vec::new();
        let mut materials: Vec<MaterialHandle> = Vec::new();
        let mut slots: Vec<(BlockId, u32)> = Vec::new();
        let mut occupancy = BitVec::repeat(false, chunk_size.volume());

        for (local, block_position) in ChunkBlockIterator::new(&self.layout, chunk) {
            let Some(block) = grid.get_at(block_position) else {
                continue;
            };

            let material_slot = match slots.iter().find(|(id, _)| *id == block) {
                Some((_, slot)) => *slot,
                None => match self.assets.material(block) {
                    Some(material) => {
                        let slot = materials.len() as u32;
                        materials.push(material);
                        slots.push((block, slot));
                        slot
                    }
                    None => {
                        warn!(
                            "No material for block {} at {:?}, skipping it",
                            block, block_position
                        );
                        continue;
                    }
                },
            };

            instances.push(CubeInstance {
                offset: [
                    local.x as f32 + 0.5,
                    local.y as f32 + 0.5,
                    local.z as f32 + 0.5,
                ],
                material_slot,
            });
            occupancy.set(chunk_size.local_index(local), true);
        }

        if instances.is_empty() {
            return None;
        }

        Some(ChunkGeometry {
            chunk,
            origin: self.layout.chunk_world_origin(chunk),
            chunk_size,
            instances,
            materials,
            occupancy,
        })
    }

    /// Releases a chunk's geometry.
    ///
    /// Only the geometry's own buffers and its clones of the material handles
    /// are dropped. The materials themselves stay with the asset collaborator.
    pub fn dispose(&self, geometry: ChunkGeometry) {
        debug!(
            "Disposing geometry of chunk {:?} ({} cubes)",
            geometry.chunk,
            geometry.cube_count()
        );
        drop(geometry);
    }
}

#[cfg(test)]
mod tests {
    use cgmath::Point3;

    use super::*;
    use crate::engine_state::{
        rendering::{assets::BlockRegistry, BlockMaterial},
        voxels::{
            block::{block, block_definition::BlockDefinition},
            chunk::ChunkSize,
            grid::{BlockLayer, WorldDimensions},
        },
    };

    fn small_layout() -> ChunkLayout {
        ChunkLayout::new(WorldDimensions::new(16, 8, 16), ChunkSize::new(4, 4, 4))
    }

    fn mesher() -> ChunkMesher {
        ChunkMesher::new(small_layout(), Arc::new(BlockRegistry::builtin()))
    }

    #[test]
    fn empty_chunk_builds_nothing() {
        let grid = VoxelGrid::new(small_layout().dimensions);
        assert!(mesher().build(Point3::new(0, 0, 0), &grid).is_none());
    }

    #[test]
    fn every_solid_block_gets_a_cube() {
        let mut grid = VoxelGrid::new(small_layout().dimensions);
        grid.generate(&[BlockLayer::new(block(4), 0, 0), BlockLayer::new(block(3), 1, 1)]);

        let geometry = mesher().build(Point3::new(1, 0, 2), &grid).unwrap();
        assert_eq!(geometry.cube_count(), 32);
        assert_eq!(geometry.materials().len(), 2);
        assert_eq!(geometry.origin, Point3::new(-4.0, 0.0, 0.0));
        assert_eq!(geometry.instances()[0].offset, [0.5, 0.5, 0.5]);
        assert!(geometry.is_occupied(Point3::new(3, 1, 3)));
        assert!(!geometry.is_occupied(Point3::new(0, 2, 0)));
        assert_eq!(
            geometry.instance_bytes().len(),
            32 * std::mem::size_of::<CubeInstance>()
        );
    }

    #[test]
    fn buried_blocks_are_not_culled() {
        let mut grid = VoxelGrid::new(small_layout().dimensions);
        grid.generate(&[BlockLayer::new(block(3), 0, 7)]);
        let geometry = mesher().build(Point3::new(1, 1, 1), &grid).unwrap();
        assert_eq!(geometry.cube_count(), 64);
    }

    #[test]
    fn cube_centres_are_in_world_space() {
        let mut grid = VoxelGrid::new(small_layout().dimensions);
        grid.set(8, 5, 8, Some(block(2)));
        let geometry = mesher().build(Point3::new(2, 1, 2), &grid).unwrap();
        let centres: Vec<_> = geometry.cube_centers().collect();
        assert_eq!(centres, vec![Point3::new(0.5, 5.5, 0.5)]);
    }

    struct StoneOnly(MaterialHandle);

    impl BlockAssets for StoneOnly {
        fn material(&self, id: BlockId) -> Option<MaterialHandle> {
            (id == block(3)).then(|| self.0.clone())
        }

        fn block_definition(&self, _id: BlockId) -> Option<&BlockDefinition> {
            None
        }
    }

    #[test]
    fn blocks_without_material_are_skipped() {
        let stone = Arc::new(BlockMaterial {
            block: block(3),
            face_textures: Default::default(),
        });
        let mesher = ChunkMesher::new(small_layout(), Arc::new(StoneOnly(stone.clone())));
        let mut grid = VoxelGrid::new(small_layout().dimensions);
        grid.set(0, 0, 0, Some(block(3)));
        grid.set(1, 0, 0, Some(block(7)));

        let geometry = mesher.build(Point3::new(0, 0, 0), &grid).unwrap();
        assert_eq!(geometry.cube_count(), 1);
        assert!(!geometry.is_occupied(Point3::new(1, 0, 0)));

        grid.set(0, 0, 0, None);
        assert!(mesher.build(Point3::new(0, 0, 0), &grid).is_none());
    }

    #[test]
    fn dispose_keeps_shared_materials_alive() {
        let registry = Arc::new(BlockRegistry::builtin());
        let mesher = ChunkMesher::new(small_layout(), registry.clone());
        let mut grid = VoxelGrid::new(small_layout().dimensions);
        grid.set(0, 0, 0, Some(block(1)));

        let handle = registry.material(block(1)).unwrap();
        let before = Arc::strong_count(&handle);
        let geometry = mesher.build(Point3::new(0, 0, 0), &grid).unwrap();
        assert_eq!(Arc::strong_count(&handle), before + 1);
        mesher.dispose(geometry);
        assert_eq!(Arc::strong_count(&handle), before);
    }
}
