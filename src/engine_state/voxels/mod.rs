//! # Voxel Data
//!
//! The voxel world's data model.
//!
//! * **Block**: block ids, faces and the per-type definitions supplied by the
//!   asset collaborator
//! * **Chunk**: chunk extents and the grid/chunk/world coordinate conversions
//! * **Grid**: the dense, fixed-size block store and its layering generator
//!
//! The grid is the only owner of block data. Chunks are views over it: a
//! chunk's geometry is rebuilt from the grid whenever a block inside it changes.

pub mod block;
pub mod chunk;
pub mod grid;
