//! # Block Module
//!
//! Block identifiers, block faces and the definitions the asset collaborator
//! supplies for each block type.

use std::{fmt, num::NonZeroU8};

use serde::{Deserialize, Serialize};

pub mod block_definition;
pub mod block_side;

/// The underlying integer type used to represent block types in memory.
pub type BlockTypeSize = u8;

/// Identifies a non-empty block type.
///
/// Zero is reserved for air, so a grid cell is stored as `Option<BlockId>` and
/// `None` is the empty value. The niche keeps that at one byte per cell.
///
/// Block data files name ids either as strings (`"4"`) or as integers (`4`);
/// both deserialize to the same `BlockId`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "BlockIdRepr", into = "BlockTypeSize")]
pub struct BlockId(NonZeroU8);

impl BlockId {
    /// Creates an id from its integer value. Returns `None` for zero, which is air.
    pub const fn new(value: BlockTypeSize) -> Option<Self> {
        match NonZeroU8::new(value) {
            Some(value) => Some(BlockId(value)),
            None => None,
        }
    }

    /// The integer value of this id.
    pub const fn get(self) -> BlockTypeSize {
        self.0.get()
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<BlockId> for BlockTypeSize {
    fn from(id: BlockId) -> Self {
        id.get()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum BlockIdRepr {
    Number(u64),
    Text(String),
}

impl TryFrom<BlockIdRepr> for BlockId {
    type Error = String;

    fn try_from(repr: BlockIdRepr) -> Result<Self, Self::Error> {
        let value = match repr {
            BlockIdRepr::Number(value) => value,
            BlockIdRepr::Text(text) => text
                .trim()
                .parse::<u64>()
                .map_err(|_| format!("block id {text:?} is not an integer"))?,
        };
        BlockTypeSize::try_from(value)
            .ok()
            .and_then(BlockId::new)
            .ok_or_else(|| format!("block id {value} is outside 1..=255"))
    }
}

/// Shorthand used by tests and the built-in content tables.
///
/// # Panics
/// Panics at compile time when used in a const context with zero.
pub const fn block(value: BlockTypeSize) -> BlockId {
    match BlockId::new(value) {
        Some(id) => id,
        None => panic!("block id 0 is reserved for air"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_is_air() {
        assert_eq!(BlockId::new(0), None);
        assert_eq!(BlockId::new(4).map(BlockId::get), Some(4));
    }

    #[test]
    fn empty_cells_stay_one_byte() {
        assert_eq!(std::mem::size_of::<Option<BlockId>>(), 1);
    }

    #[test]
    fn deserializes_from_strings_and_numbers() {
        let ids: Vec<BlockId> = serde_json::from_str(r#"["1", 2, " 3 "]"#).unwrap();
        assert_eq!(ids, vec![block(1), block(2), block(3)]);
    }

    #[test]
    fn rejects_air_and_out_of_range_ids() {
        assert!(serde_json::from_str::<BlockId>("0").is_err());
        assert!(serde_json::from_str::<BlockId>(r#""256""#).is_err());
        assert!(serde_json::from_str::<BlockId>(r#""stone""#).is_err());
    }
}
