//! Chunk geometry produced by the mesher and handed to the presentation layer.

use bitvec::vec::BitVec;
use cgmath::Point3;

use crate::engine_state::{
    rendering::MaterialHandle,
    voxels::chunk::{ChunkPosition, ChunkSize},
};

/// One unit cube inside a chunk.
///
/// # Memory Layout
/// `#[repr(C)]` and `Pod` so a renderer can upload a chunk's instances as one
/// instance buffer. Total size: 16 bytes.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CubeInstance {
    /// Cube centre relative to the chunk origin (local block position + 0.5)
    pub offset: [f32; 3],
    /// Index into the owning geometry's material table
    pub material_slot: u32,
}

/// Renderable geometry for one resident chunk.
///
/// Holds one cube per solid block with a known material. Cubes are never culled
/// against their neighbours, so cost grows with chunk volume rather than
/// exposed surface.
#[derive(Debug)]
pub struct ChunkGeometry {
    /// Chunk coordinates this geometry was built from
    pub chunk: ChunkPosition,
    /// World-space position of the chunk's minimum corner
    pub origin: Point3<f32>,
    pub(crate) chunk_size: ChunkSize,
    pub(crate) instances: Vec<CubeInstance>,
    pub(crate) materials: Vec<MaterialHandle>,
    /// One bit per local cell (row-major, x fastest) set where a cube was emitted
    pub(crate) occupancy: BitVec,
}

impl ChunkGeometry {
    /// The cubes in this chunk.
    pub fn instances(&self) -> &[CubeInstance] {
        &self.instances
    }

    /// The cubes as raw bytes, ready for an instance buffer.
    pub fn instance_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.instances)
    }

    /// The shared materials referenced by `CubeInstance::material_slot`.
    pub fn materials(&self) -> &[MaterialHandle] {
        &self.materials
    }

    /// Number of cubes.
    pub fn cube_count(&self) -> usize {
        self.instances.len()
    }

    /// Whether a cube was emitted for the local cell `local`.
    pub fn is_occupied(&self, local: Point3<u32>) -> bool {
        if local.x >= self.chunk_size.x || local.y >= self.chunk_size.y || local.z >= self.chunk_size.z
        {
            return false;
        }
        self.occupancy
            .get(self.chunk_size.local_index(local))
            .map(|bit| *bit)
            .unwrap_or(false)
    }

    /// World-space centre of every cube, in emission order.
    pub fn cube_centers(&self) -> impl Iterator<Item = Point3<f32>> + '_ {
        self.instances.iter().map(|instance| {
            Point3::new(
                self.origin.x + instance.offset[0],
                self.origin.y + instance.offset[1],
                self.origin.z + instance.offset[2],
            )
        })
    }
}
