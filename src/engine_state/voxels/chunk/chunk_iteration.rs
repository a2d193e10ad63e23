//! # Chunk Iteration Module
//!
//! Walks every block position inside one chunk's box, in the same row-major
//! order (x fastest, then y, then z) the chunk occupancy masks use.

use cgmath::Point3;

use super::{BlockPosition, ChunkLayout, ChunkPosition, ChunkSize};

/// An iterator over all block positions of a chunk.
///
/// Each item is the block's position relative to the chunk start together with
/// its grid position. Positions outside the grid are still produced; reading
/// them from the grid yields air.
pub struct ChunkBlockIterator {
    start: BlockPosition,
    size: ChunkSize,
    local: Point3<u32>,
    done: bool,
}

impl ChunkBlockIterator {
    /// Creates an iterator over `chunk` under `layout`.
    pub fn new(layout: &ChunkLayout, chunk: ChunkPosition) -> Self {
        let size = layout.chunk_size;
        ChunkBlockIterator {
            start: layout.chunk_start(chunk),
            size,
            local: Point3::new(0, 0, 0),
            done: size.volume() == 0,
        }
    }
}

impl Iterator for ChunkBlockIterator {
    type Item = (Point3<u32>, BlockPosition);

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let local = self.local;
        let block = Point3::new(
            self.start.x + local.x as i32,
            self.start.y + local.y as i32,
            self.start.z + local.z as i32,
        );

        self.local.x += 1;
        if self.local.x == self.size.x {
            self.local.x = 0;
            self.local.y += 1;
            if self.local.y == self.size.y {
                self.local.y = 0;
                self.local.z += 1;
                if self.local.z == self.size.z {
                    self.done = true;
                }
            }
        }

        Some((local, block))
    }
}
