//! # Block Assets
//!
//! A `BlockAssets` implementation backed by the JSON block-data document.
//! Every block gets one shared `BlockMaterial` whose face textures are resolved
//! against the document's texture base path. Texture decoding belongs to the
//! presentation layer; this registry only tracks which texture goes where.

use std::{collections::HashMap, fmt, fs, path::Path, sync::Arc};

use log::info;

use crate::engine_state::voxels::block::{
    block,
    block_definition::{BlockDataFile, BlockDefinition, FaceTextures},
    block_side::BlockFace,
    BlockId,
};

use super::{BlockAssets, BlockMaterial, MaterialHandle};

#[derive(Debug)]
pub enum BlockDataError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    DuplicateBlock(BlockId),
    MissingTexture { block: BlockId, face: BlockFace },
}

impl fmt::Display for BlockDataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "failed to read block data: {e}"),
            Self::Parse(e) => write!(f, "failed to parse block data: {e}"),
            Self::DuplicateBlock(id) => write!(f, "block {id} is defined more than once"),
            Self::MissingTexture { block, face } => {
                write!(f, "block {block} has no texture for its {face:?} face")
            }
        }
    }
}

impl std::error::Error for BlockDataError {}

impl From<std::io::Error> for BlockDataError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for BlockDataError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse(e)
    }
}

struct RegisteredBlock {
    definition: BlockDefinition,
    material: MaterialHandle,
}

fn register(
    blocks: &mut HashMap<BlockId, RegisteredBlock>,
    definition: BlockDefinition,
    texture_base_path: &str,
) {
    let face_textures = BlockFace::all()
        .map(|face| format!("{}{}", texture_base_path, definition.textures.for_face(face)));
    let material = Arc::new(BlockMaterial {
        block: definition.id,
        face_textures,
    });
    blocks.insert(
        definition.id,
        RegisteredBlock {
            definition,
            material,
        },
    );
}

/// Loaded block definitions and their shared materials.
pub struct BlockRegistry {
    blocks: HashMap<BlockId, RegisteredBlock>,
}

impl BlockRegistry {
    /// Builds a registry from parsed block data.
    pub fn from_data(data: BlockDataFile) -> Result<Self, BlockDataError> {
        let mut blocks = HashMap::with_capacity(data.blocks.len());

        for definition in data.blocks {
            let id = definition.id;
            if blocks.contains_key(&id) {
                return Err(BlockDataError::DuplicateBlock(id));
            }
            if let Some(face) = BlockFace::all()
                .into_iter()
                .find(|face| definition.textures.for_face(*face).is_empty())
            {
                return Err(BlockDataError::MissingTexture { block: id, face });
            }
            register(&mut blocks, definition, &data.texture_base_path);
        }

        info!("Prepared materials for {} block types", blocks.len());
        Ok(BlockRegistry { blocks })
    }

    /// Parses a block-data document.
    pub fn from_json(json: &str) -> Result<Self, BlockDataError> {
        Self::from_data(serde_json::from_str(json)?)
    }

    /// Reads and parses a block-data file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, BlockDataError> {
        let path = path.as_ref();
        info!("Loading block data from {}", path.display());
        Self::from_json(&fs::read_to_string(path)?)
    }

    /// The four terrain blocks of the default world: grass (1), dirt (2),
    /// stone (3) and bedrock (4). Bedrock cannot be broken.
    pub fn builtin() -> Self {
        let define = |id, name: &str, textures, allow_breaking, sound: &str| BlockDefinition {
            id: block(id),
            name: name.to_string(),
            textures,
            allow_breaking,
            sound: Some(sound.to_string()),
        };
        let grass = FaceTextures {
            up: "grass_top.png".to_string(),
            down: "dirt.png".to_string(),
            ..FaceTextures::uniform("grass_side.png")
        };
        let definitions = vec![
            define(1, "Grass", grass, true, "grass"),
            define(2, "Dirt", FaceTextures::uniform("dirt.png"), true, "gravel"),
            define(3, "Stone", FaceTextures::uniform("stone.png"), true, "stone"),
            define(4, "Bedrock", FaceTextures::uniform("bedrock.png"), false, "stone"),
        ];

        let mut blocks = HashMap::with_capacity(definitions.len());
        for definition in definitions {
            register(&mut blocks, definition, "textures/");
        }
        BlockRegistry { blocks }
    }

    /// Registered ids in ascending order.
    pub fn block_ids(&self) -> Vec<BlockId> {
        let mut ids: Vec<BlockId> = self.blocks.keys().copied().collect();
        ids.sort();
        ids
    }
}

impl BlockAssets for BlockRegistry {
    fn material(&self, block: BlockId) -> Option<MaterialHandle> {
        self.blocks.get(&block).map(|entry| entry.material.clone())
    }

    fn block_definition(&self, block: BlockId) -> Option<&BlockDefinition> {
        self.blocks.get(&block).map(|entry| &entry.definition)
    }
}
