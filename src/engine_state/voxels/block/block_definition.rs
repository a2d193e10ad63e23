//! # Block Definition Module
//!
//! The per-block-type data the asset collaborator loads: display name, texture
//! references for each face, whether the block may be broken and which sound
//! category plays when it is broken or placed.
//!
//! Definitions come from a JSON block-data document:
//!
//! ```json
//! {
//!     "textureBasePath": "textures/",
//!     "blocks": [
//!         {
//!             "id": "1",
//!             "name": "Grass",
//!             "textures": {
//!                 "east": "grass_side.png", "west": "grass_side.png",
//!                 "up": "grass_top.png", "down": "dirt.png",
//!                 "south": "grass_side.png", "north": "grass_side.png"
//!             },
//!             "sound": "grass"
//!         }
//!     ]
//! }
//! ```

use serde::{Deserialize, Serialize};

use super::{block_side::BlockFace, BlockId};

/// Texture file references for the six faces of a block.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaceTextures {
    pub east: String,
    pub west: String,
    pub up: String,
    pub down: String,
    pub south: String,
    pub north: String,
}

impl FaceTextures {
    /// Uses the same texture on every face.
    pub fn uniform(texture: &str) -> Self {
        FaceTextures {
            east: texture.to_string(),
            west: texture.to_string(),
            up: texture.to_string(),
            down: texture.to_string(),
            south: texture.to_string(),
            north: texture.to_string(),
        }
    }

    /// The texture reference for `face`.
    pub fn for_face(&self, face: BlockFace) -> &str {
        match face {
            BlockFace::EAST => &self.east,
            BlockFace::WEST => &self.west,
            BlockFace::UP => &self.up,
            BlockFace::DOWN => &self.down,
            BlockFace::SOUTH => &self.south,
            BlockFace::NORTH => &self.north,
        }
    }
}

fn default_allow_breaking() -> bool {
    true
}

/// Everything the engine knows about one block type.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockDefinition {
    pub id: BlockId,
    #[serde(default)]
    pub name: String,
    pub textures: FaceTextures,
    /// Blocks with this cleared can never be broken by the player.
    #[serde(default = "default_allow_breaking")]
    pub allow_breaking: bool,
    /// Sound category raised with break and place events.
    #[serde(default, alias = "soundCategory")]
    pub sound: Option<String>,
}

/// The on-disk block-data document.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockDataFile {
    #[serde(default)]
    pub texture_base_path: String,
    pub blocks: Vec<BlockDefinition>,
}
