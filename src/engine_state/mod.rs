//! # Engine State Module
//!
//! The core engine module that owns the world and drives it one frame at a time.
//!
//! ## Key Components
//!
//! * `EngineState` - The main state container for the engine
//! * `camera_state` - The viewer and the controller that moves it
//! * `voxels` - Block ids, chunk layout and the dense voxel grid
//! * `rendering` - Collaborator seams, chunk meshing and ray casting
//! * `streaming` - Keeps the resident chunk set in step with the viewer
//! * `interaction` - Break, place and select through the viewer's ray
//! * `task_management` - Worker threads for parallel meshing
//!
//! ## Frame Order
//!
//! Each frame applies movement and look input to the camera, resolves edit
//! intents along the updated view ray (each edit rebuilds its chunk on the
//! spot), and finally lets the streamer re-evaluate residency for the new
//! camera position. Everything happens on the caller's thread; only meshing
//! during a streaming pass may fan out to workers, and its results are merged
//! back before `frame` returns.

use std::sync::Arc;

use camera_state::{camera::Camera, CameraState};
use interaction::{BlockEvent, InteractionResolver};
use log::{debug, info};
use rendering::{tasks::MeshScheduler, BlockAssets, ChunkMesher, ChunkScene};
use streaming::{ChunkStreamer, StreamingPass};
use voxels::{block::BlockId, grid::VoxelGrid};

use crate::{
    application_state::{config::WorldConfig, input_state::PlayerIntent},
    core::MtResource,
};

pub mod camera_state;
pub mod interaction;
pub mod rendering;
pub mod streaming;
pub mod task_management;
pub mod voxels;

/// The main state container for the voxel engine.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use voxel_streamer::{
///     application_state::{config::WorldConfig, input_state::PlayerIntent},
///     engine_state::{
///         rendering::{assets::BlockRegistry, NullScene},
///         EngineState,
///     },
/// };
///
/// let config = WorldConfig::default();
/// let mut engine_state = EngineState::new(
///     &config,
///     Arc::new(BlockRegistry::builtin()),
///     Box::new(NullScene),
/// );
///
/// engine_state.frame(1.0 / 60.0, &[PlayerIntent::Destroy]);
/// for event in engine_state.drain_events() {
///     println!("{:?}", event);
/// }
/// ```
pub struct EngineState {
    /// Camera state managing position, orientation and movement
    pub camera_state: CameraState,
    /// The voxel grid, shared with meshing workers
    world: MtResource<VoxelGrid>,
    /// Block materials and definitions
    assets: Arc<dyn BlockAssets>,
    /// Resident chunk geometry and the scene drawing it
    streamer: ChunkStreamer,
    /// Break/place/select along the view ray
    resolver: InteractionResolver,
    /// Block placed by `PlayerIntent::Place`
    selected_block: Option<BlockId>,
    /// Radius of the resident set, in world units
    render_distance: f32,
    /// Edits not yet drained by the collaborators
    events: Vec<BlockEvent>,
}

impl EngineState {
    /// Generates the world and streams in the chunks around the spawn point.
    ///
    /// # Arguments
    ///
    /// * `config` - World settings; assumed valid
    /// * `assets` - The asset collaborator, fully loaded
    /// * `scene` - The presentation collaborator
    pub fn new(
        config: &WorldConfig,
        assets: Arc<dyn BlockAssets>,
        scene: Box<dyn ChunkScene>,
    ) -> Self {
        let layout = config.layout();

        let mut grid = VoxelGrid::new(config.dimensions);
        grid.generate(&config.layers);
        let camera_state = CameraState::at_spawn(&grid);
        let world = MtResource::new(grid);

        let streamer = ChunkStreamer::new(
            ChunkMesher::new(layout, assets.clone()),
            MeshScheduler::with_workers(config.worker_threads),
            scene,
        );

        let mut engine_state = EngineState {
            camera_state,
            world,
            assets,
            streamer,
            resolver: InteractionResolver::new(layout, config.reach),
            selected_block: config.layers.last().map(|layer| layer.block_id),
            render_distance: config.render_distance,
            events: Vec::new(),
        };

        let position = engine_state.camera_state.camera.position;
        info!("Spawning at {:?}", position);
        engine_state
            .streamer
            .tick(&engine_state.world, position, engine_state.render_distance);
        engine_state
    }

    /// Advances the engine by one frame.
    ///
    /// # Arguments
    ///
    /// * `dt` - Seconds since the previous frame
    /// * `intents` - What the player asked for this frame, in order
    ///
    /// # Returns
    ///
    /// What the streaming pass changed, if the camera entered a new chunk.
    pub fn frame(&mut self, dt: f32, intents: &[PlayerIntent]) -> Option<StreamingPass> {
        for intent in intents {
            match *intent {
                PlayerIntent::Move(movement) => self.camera_state.intake_movement(movement),
                PlayerIntent::Look { dx, dy } => self.camera_state.intake_look(dx, dy),
                PlayerIntent::SelectBlock(block) => self.select_block(block),
                _ => {}
            }
        }
        self.camera_state.update(dt);

        for intent in intents {
            match intent {
                PlayerIntent::Destroy => self.destroy(),
                PlayerIntent::Place => self.place(),
                PlayerIntent::Select => self.select(),
                _ => {}
            }
        }

        self.streamer.tick(
            &self.world,
            self.camera_state.camera.position,
            self.render_distance,
        )
    }

    /// Breaks the block under the crosshair.
    fn destroy(&mut self) {
        let ray = self.camera_state.camera.view_ray();
        if let Some(event) =
            self.resolver
                .destroy(&ray, &self.world, &mut self.streamer, self.assets.as_ref())
        {
            self.events.push(event);
        }
    }

    /// Places the selected block against the face under the crosshair.
    fn place(&mut self) {
        let Some(block) = self.selected_block else {
            debug!("No block selected, nothing to place");
            return;
        };
        let ray = self.camera_state.camera.view_ray();
        if let Some(event) = self.resolver.place(
            &ray,
            block,
            &self.world,
            &mut self.streamer,
            self.assets.as_ref(),
        ) {
            self.events.push(event);
        }
    }

    /// Picks the block under the crosshair as the one to place.
    fn select(&mut self) {
        let ray = self.camera_state.camera.view_ray();
        let selected = self
            .resolver
            .select(&ray, &self.streamer, &self.world.get());
        if let Some(block) = selected {
            self.select_block(block);
        }
    }

    fn select_block(&mut self, block: BlockId) {
        if self.selected_block != Some(block) {
            debug!("Selected block {}", block);
        }
        self.selected_block = Some(block);
    }

    /// Takes every block event raised since the last call.
    pub fn drain_events(&mut self) -> Vec<BlockEvent> {
        std::mem::take(&mut self.events)
    }

    /// The voxel grid.
    pub fn world(&self) -> &MtResource<VoxelGrid> {
        &self.world
    }

    /// The chunk streamer.
    pub fn streamer(&self) -> &ChunkStreamer {
        &self.streamer
    }

    /// The viewer.
    pub fn camera(&self) -> &Camera {
        &self.camera_state.camera
    }

    /// The block `PlayerIntent::Place` would place.
    pub fn selected_block(&self) -> Option<BlockId> {
        self.selected_block
    }

    /// Drops every resident chunk, handing each removal to the scene.
    pub fn shutdown(&mut self) {
        info!(
            "Releasing {} resident chunks",
            self.streamer.resident_count()
        );
        self.streamer.unload_all();
    }
}
