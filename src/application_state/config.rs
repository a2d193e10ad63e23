//! # World Configuration
//!
//! The static settings a world is created from. Every field has a default, so a
//! configuration file only needs to name what it changes:
//!
//! ```json
//! {
//!     "dimensions": { "width": 64, "height": 32, "depth": 64 },
//!     "renderDistance": 16,
//!     "layers": [
//!         { "blockId": "4", "yStart": 0, "yEnd": 0 },
//!         { "blockId": 3, "yStart": 1, "yEnd": 30 }
//!     ]
//! }
//! ```

use std::{
    fmt, fs,
    path::{Path, PathBuf},
};

use log::info;
use serde::{Deserialize, Serialize};

use crate::engine_state::voxels::{
    block::block,
    chunk::{ChunkLayout, ChunkSize},
    grid::{BlockLayer, WorldDimensions},
};

/// Environment variable naming the configuration file.
pub const CONFIG_ENV_VAR: &str = "VOXEL_CONFIG";

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    EmptyWorld(WorldDimensions),
    EmptyChunk(ChunkSize),
    RenderDistance(f32),
    Reach(f32),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "failed to read configuration: {e}"),
            Self::Parse(e) => write!(f, "failed to parse configuration: {e}"),
            Self::EmptyWorld(d) => write!(
                f,
                "world dimensions {}x{}x{} must all be non-zero",
                d.width, d.height, d.depth
            ),
            Self::EmptyChunk(s) => {
                write!(f, "chunk size {}x{}x{} must all be non-zero", s.x, s.y, s.z)
            }
            Self::RenderDistance(d) => write!(f, "render distance {d} must be positive"),
            Self::Reach(r) => write!(f, "reach {r} must be positive"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse(e)
    }
}

/// Everything needed to create and stream a world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WorldConfig {
    /// Grid extent in blocks
    pub dimensions: WorldDimensions,
    /// Chunk extent in blocks
    pub chunk_size: ChunkSize,
    /// Radius of the resident chunk set, in world units
    pub render_distance: f32,
    /// Maximum interaction distance, in world units
    pub reach: f32,
    /// Terrain layers, applied in order
    pub layers: Vec<BlockLayer>,
    /// Meshing worker threads; 0 meshes on the frame thread
    pub worker_threads: usize,
    /// Frames the headless driver runs for
    pub frames: u32,
    /// Block-data document; the built-in blocks are used when absent
    pub block_data: Option<PathBuf>,
}

impl Default for WorldConfig {
    fn default() -> Self {
        WorldConfig {
            dimensions: WorldDimensions::default(),
            chunk_size: ChunkSize::default(),
            render_distance: 10.0,
            reach: 8.0,
            layers: vec![
                BlockLayer::new(block(4), 0, 0),
                BlockLayer::new(block(3), 1, 58),
                BlockLayer::new(block(2), 59, 61),
                BlockLayer::new(block(1), 62, 62),
            ],
            worker_threads: 2,
            frames: 600,
            block_data: None,
        }
    }
}

impl WorldConfig {
    /// Parses and validates a configuration document.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: WorldConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        info!("Loading world configuration from {}", path.display());
        Self::from_json(&fs::read_to_string(path)?)
    }

    /// Loads the file named by `VOXEL_CONFIG`, or returns the defaults when
    /// the variable is unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Rejects settings the engine cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let d = self.dimensions;
        if d.width == 0 || d.height == 0 || d.depth == 0 {
            return Err(ConfigError::EmptyWorld(d));
        }
        if self.chunk_size.min_extent() == 0 {
            return Err(ConfigError::EmptyChunk(self.chunk_size));
        }
        if !(self.render_distance.is_finite() && self.render_distance > 0.0) {
            return Err(ConfigError::RenderDistance(self.render_distance));
        }
        if !(self.reach.is_finite() && self.reach > 0.0) {
            return Err(ConfigError::Reach(self.reach));
        }
        Ok(())
    }

    /// The chunk layout these settings describe.
    pub fn layout(&self) -> ChunkLayout {
        ChunkLayout::new(self.dimensions, self.chunk_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_describe_the_standard_world() {
        let config = WorldConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.dimensions, WorldDimensions::new(256, 63, 256));
        assert_eq!(config.chunk_size, ChunkSize::new(4, 4, 4));
        assert_eq!(config.render_distance, 10.0);
        assert_eq!(config.layers.len(), 4);
        assert_eq!(config.layers[0], BlockLayer::new(block(4), 0, 0));
    }

    #[test]
    fn partial_documents_keep_the_remaining_defaults() {
        let config = WorldConfig::from_json(
            r#"{
                "dimensions": { "width": 16, "height": 8, "depth": 16 },
                "workerThreads": 0,
                "layers": [{ "blockId": "4", "yStart": 0, "yEnd": 0 }]
            }"#,
        )
        .unwrap();
        assert_eq!(config.dimensions, WorldDimensions::new(16, 8, 16));
        assert_eq!(config.worker_threads, 0);
        assert_eq!(config.layers, vec![BlockLayer::new(block(4), 0, 0)]);
        assert_eq!(config.reach, 8.0);
        assert_eq!(config.block_data, None);
    }

    #[test]
    fn invalid_settings_are_rejected() {
        assert!(matches!(
            WorldConfig::from_json(r#"{"chunkSize": {"x": 4, "y": 0, "z": 4}}"#),
            Err(ConfigError::EmptyChunk(_))
        ));
        assert!(matches!(
            WorldConfig::from_json(r#"{"renderDistance": -1}"#),
            Err(ConfigError::RenderDistance(_))
        ));
        assert!(matches!(
            WorldConfig::from_json(r#"{"layers": [{"blockId": 0, "yStart": 0, "yEnd": 0}]}"#),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            WorldConfig::load("/nonexistent/world.json"),
            Err(ConfigError::Io(_))
        ));
    }
}
