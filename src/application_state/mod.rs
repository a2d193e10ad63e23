//! # Application State Management
//!
//! This module handles the application's side of the engine:
//! - World configuration
//! - Player intents
//! - The headless driver loop that stands in for a display clock
//!
//! The presentation, input and audio collaborators live outside this crate.
//! Headless runs replace them with a counting scene, a seeded random walk and
//! the log.

pub mod config;
pub mod input_state;

use std::sync::Arc;

use log::info;

use config::WorldConfig;
use input_state::{MovementInput, PlayerIntent};

use crate::engine_state::{
    interaction::BlockEvent,
    rendering::{BlockAssets, ChunkGeometry, ChunkScene},
    voxels::chunk::ChunkPosition,
    EngineState,
};

/// Frame length of the headless clock, in seconds.
const FRAME_SECONDS: f32 = 1.0 / 60.0;

/// Frames between changes of the random walk's heading.
const WALK_SEGMENT_FRAMES: u32 = 30;

/// Frames between scripted edits.
const EDIT_INTERVAL_FRAMES: u32 = 45;

/// A scene that keeps totals instead of drawing.
#[derive(Default)]
pub struct CountingScene {
    added: usize,
    removed: usize,
    uploaded_bytes: usize,
}

impl ChunkScene for CountingScene {
    fn add_chunk(&mut self, geometry: &ChunkGeometry) {
        self.added += 1;
        self.uploaded_bytes += geometry.instance_bytes().len();
    }

    fn remove_chunk(&mut self, _chunk: ChunkPosition) {
        self.removed += 1;
    }
}

impl Drop for CountingScene {
    fn drop(&mut self) {
        info!(
            "Scene saw {} chunk additions ({} instance bytes) and {} removals",
            self.added, self.uploaded_bytes, self.removed
        );
    }
}

/// Drives an `EngineState` for a fixed number of frames without a window.
pub struct ApplicationState {
    /// The core engine state
    pub engine_state: EngineState,
    /// Frames left to run
    frames: u32,
    /// Seeded source for the random walk
    rng: fastrand::Rng,
    /// Timestamp of the first frame, for the closing summary
    started: web_time::Instant,
}

impl ApplicationState {
    /// Builds the engine for `config` with a counting scene.
    pub fn new(config: &WorldConfig, assets: Arc<dyn BlockAssets>) -> Self {
        ApplicationState {
            engine_state: EngineState::new(config, assets, Box::new(CountingScene::default())),
            frames: config.frames,
            rng: fastrand::Rng::with_seed(0x5eed),
            started: web_time::Instant::now(),
        }
    }

    /// Runs every configured frame, then releases the resident chunks.
    pub fn run(&mut self) {
        let mut movement = MovementInput::default();
        let mut passes = 0u32;
        let mut edits = 0usize;

        for frame in 0..self.frames {
            if frame % WALK_SEGMENT_FRAMES == 0 {
                movement = self.random_movement();
            }

            let mut intents = vec![
                PlayerIntent::Move(movement),
                PlayerIntent::Look {
                    dx: self.rng.f32() * 8.0 - 4.0,
                    dy: self.rng.f32() * 4.0 - 2.0,
                },
            ];
            if frame % EDIT_INTERVAL_FRAMES == EDIT_INTERVAL_FRAMES - 1 {
                intents.push(match self.rng.u8(0..3) {
                    0 => PlayerIntent::Destroy,
                    1 => PlayerIntent::Select,
                    _ => PlayerIntent::Place,
                });
            }

            if self.engine_state.frame(FRAME_SECONDS, &intents).is_some() {
                passes += 1;
            }

            for event in self.engine_state.drain_events() {
                edits += 1;
                log_event(&event);
            }
        }

        info!(
            "Ran {} frames in {:?}: {} streaming passes, {} edits, {} chunks resident",
            self.frames,
            self.started.elapsed(),
            passes,
            edits,
            self.engine_state.streamer().resident_count()
        );
        self.engine_state.shutdown();
    }

    fn random_movement(&mut self) -> MovementInput {
        MovementInput {
            forward: self.rng.bool(),
            backward: false,
            left: self.rng.u8(0..4) == 0,
            right: self.rng.u8(0..4) == 0,
            up: false,
            down: self.rng.u8(0..8) == 0,
        }
    }
}

fn log_event(event: &BlockEvent) {
    let verb = match event {
        BlockEvent::Broken { .. } => "Broke",
        BlockEvent::Placed { .. } => "Placed",
    };
    info!(
        "{} block {} at {:?} (sound: {})",
        verb,
        event.block(),
        event.position(),
        event.sound().unwrap_or("none")
    );
}
