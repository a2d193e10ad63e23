//! # Rendering Seams
//!
//! The streaming core hands geometry to a presentation layer and borrows
//! drawable materials from an asset loader, but owns neither. This module
//! defines those seams and the pieces of them the core implements itself.
//!
//! ## Key Components
//!
//! * `BlockAssets` - The asset collaborator: block id to shared material and definition
//! * `ChunkScene` - The presentation collaborator: receives chunk geometry as it
//!   enters and leaves the resident set
//! * `assets` - A JSON-backed `BlockAssets` implementation
//! * `meshing` - Turns a chunk of the grid into `ChunkGeometry`
//! * `raycast` - Ray traversal against resident chunk geometry
//! * `tasks` - Background chunk mesh generation
//!
//! ## Ownership
//!
//! Materials are created once by the asset collaborator and shared by every
//! chunk through `MaterialHandle`s. Disposing chunk geometry releases only the
//! geometry's own data and its clones of the handles.

use std::sync::Arc;

use crate::engine_state::voxels::{
    block::{block_definition::BlockDefinition, block_side::BlockFace, BlockId},
    chunk::ChunkPosition,
};

pub mod assets;
pub mod meshing;
pub mod raycast;
pub mod tasks;

pub use meshing::{ChunkGeometry, ChunkMesher, CubeInstance};

/// A drawable material for one block type: one texture per face, in
/// [`BlockFace`] order.
#[derive(Debug, PartialEq, Eq)]
pub struct BlockMaterial {
    /// The block type this material draws.
    pub block: BlockId,
    /// Resolved texture paths, indexed by `BlockFace as usize`.
    pub face_textures: [String; 6],
}

impl BlockMaterial {
    /// The texture drawn on `face`.
    pub fn texture(&self, face: BlockFace) -> &str {
        &self.face_textures[face as usize]
    }
}

/// Shared handle to a material owned by the asset collaborator.
pub type MaterialHandle = Arc<BlockMaterial>;

/// The asset collaborator.
///
/// Asset loading finishes before streaming starts, so lookups are synchronous
/// and must be callable from meshing workers.
pub trait BlockAssets: Send + Sync {
    /// The shared material for `block`, if one was loaded.
    fn material(&self, block: BlockId) -> Option<MaterialHandle>;

    /// The definition of `block`, if one was loaded.
    fn block_definition(&self, block: BlockId) -> Option<&BlockDefinition>;
}

/// The presentation collaborator.
///
/// The streamer calls `remove_chunk` for a chunk's old geometry before it calls
/// `add_chunk` for its replacement, so a scene never shows both.
pub trait ChunkScene {
    /// `geometry` became resident and should be drawn.
    fn add_chunk(&mut self, geometry: &ChunkGeometry);

    /// The geometry for `chunk` is about to be disposed and must stop being drawn.
    fn remove_chunk(&mut self, chunk: ChunkPosition);
}

/// A scene that draws nothing. Used for headless runs.
#[derive(Default)]
pub struct NullScene;

impl ChunkScene for NullScene {
    fn add_chunk(&mut self, _geometry: &ChunkGeometry) {}

    fn remove_chunk(&mut self, _chunk: ChunkPosition) {}
}
