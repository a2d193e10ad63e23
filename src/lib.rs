#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Voxel Streamer
//!
//! The chunk streaming and meshing core of a voxel world: a dense grid of
//! typed blocks, cut into fixed-size chunks that are meshed into cube geometry
//! as they come within render distance of the viewer and released as they
//! leave it, with break and place edits resolved along the viewer's ray.
//!
//! ## Key Modules
//!
//! * `application_state` - Configuration, player intents and the headless driver
//! * `core` - Shared-resource primitives used throughout the engine
//! * `engine_state` - The voxel grid, meshing, streaming, interaction and task management
//!
//! ## Collaborators
//!
//! Drawing, input, audio and asset loading are not part of this crate. They
//! plug in through narrow seams: a `ChunkScene` receives geometry, a
//! `BlockAssets` supplies materials and definitions, `PlayerIntent`s come in
//! and `BlockEvent`s go out.
//!
//! ## Usage
//!
//! ```no_run
//! fn main() {
//!     voxel_streamer::run();
//! }
//! ```

use std::sync::Arc;

use application_state::{config::WorldConfig, ApplicationState};
use engine_state::rendering::{assets::BlockRegistry, BlockAssets};
use log::{error, info};

pub mod application_state;
pub mod core;
pub mod engine_state;

/// Runs a headless session.
///
/// Configuration comes from the file named by `VOXEL_CONFIG`, block data from
/// the configuration's `blockData` path. Either falls back to the built-in
/// defaults if it cannot be loaded.
pub fn run() {
    let mut log_builder = env_logger::Builder::new();
    log_builder
        .target(env_logger::Target::Stdout)
        .parse_env("RUST_LOG")
        .init();

    info!("Logger initialized");

    let config = WorldConfig::from_env().unwrap_or_else(|e| {
        error!("{e}; using the default world");
        WorldConfig::default()
    });

    let assets: Arc<dyn BlockAssets> = match &config.block_data {
        Some(path) => match BlockRegistry::load(path) {
            Ok(registry) => Arc::new(registry),
            Err(e) => {
                error!("{e}; using the built-in blocks");
                Arc::new(BlockRegistry::builtin())
            }
        },
        None => Arc::new(BlockRegistry::builtin()),
    };

    let mut state = ApplicationState::new(&config, assets);
    state.run();
}
