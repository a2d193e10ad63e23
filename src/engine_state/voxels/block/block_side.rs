//! # Block Side Module
//!
//! The six faces of a unit cube. The order matches the per-face texture table
//! of a block definition: east, west, up, down, south, north.

use cgmath::Vector3;
use num_derive::FromPrimitive;
use num_traits::FromPrimitive;

/// One face of a block, named by the direction its outward normal points.
///
/// The discriminants index the six-entry texture table of a `BlockMaterial`.
#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug, FromPrimitive)]
pub enum BlockFace {
    /// Facing positive X
    EAST = 0,
    /// Facing negative X
    WEST = 1,
    /// Facing positive Y
    UP = 2,
    /// Facing negative Y
    DOWN = 3,
    /// Facing positive Z
    SOUTH = 4,
    /// Facing negative Z
    NORTH = 5,
}

impl BlockFace {
    /// All six faces in texture-table order.
    pub fn all() -> [BlockFace; 6] {
        [
            BlockFace::EAST,
            BlockFace::WEST,
            BlockFace::UP,
            BlockFace::DOWN,
            BlockFace::SOUTH,
            BlockFace::NORTH,
        ]
    }

    /// Looks a face up by its texture-table index.
    pub fn from_index(index: usize) -> Option<Self> {
        FromPrimitive::from_usize(index)
    }

    /// The face whose outward normal points along `axis` (0 = X, 1 = Y, 2 = Z)
    /// in the positive direction when `positive` is set.
    pub fn from_axis(axis: usize, positive: bool) -> Option<Self> {
        if axis > 2 {
            return None;
        }
        Self::from_index(axis * 2 + usize::from(!positive))
    }

    /// Unit outward normal of this face.
    pub fn normal(self) -> Vector3<f32> {
        match self {
            BlockFace::EAST => Vector3::new(1.0, 0.0, 0.0),
            BlockFace::WEST => Vector3::new(-1.0, 0.0, 0.0),
            BlockFace::UP => Vector3::new(0.0, 1.0, 0.0),
            BlockFace::DOWN => Vector3::new(0.0, -1.0, 0.0),
            BlockFace::SOUTH => Vector3::new(0.0, 0.0, 1.0),
            BlockFace::NORTH => Vector3::new(0.0, 0.0, -1.0),
        }
    }
}
