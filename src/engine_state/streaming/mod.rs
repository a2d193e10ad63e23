//! # Chunk Streaming
//!
//! Keeps the set of resident chunks consistent with the viewer's position.
//!
//! Residency is re-evaluated only when the viewer crosses a chunk boundary. A
//! pass looks at a cubic window of chunks around the viewer, keeps every chunk
//! whose centre is within the render distance, meshes the ones not yet
//! resident and drops the ones that fell out of range. Chunks that mesh to
//! nothing are never resident and are only retried on a later crossing.
//!
//! Edits bypass the crossing gate: `rebuild_chunk` replaces one chunk's
//! geometry immediately, so an edit that empties a chunk removes it without
//! the viewer moving.

use std::collections::{HashMap, HashSet};

use cgmath::{MetricSpace, Point3};
use log::{debug, info};
use web_time::Instant;

use crate::{
    core::MtResource,
    engine_state::{
        rendering::{
            raycast::{first_cell_hit, traverse_cells, Ray, RayCaster, RayHit},
            tasks::MeshScheduler,
            ChunkGeometry, ChunkMesher, ChunkScene,
        },
        voxels::{
            chunk::{BlockPosition, ChunkLayout, ChunkPosition},
            grid::VoxelGrid,
        },
    },
};

/// What one streaming pass changed.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct StreamingPass {
    /// Chunks that became resident
    pub loaded: usize,
    /// Desired chunks that meshed to nothing
    pub empty: usize,
    /// Chunks that left the resident set
    pub unloaded: usize,
}

/// Owns the resident chunk map and the scene collaborator that draws it.
pub struct ChunkStreamer {
    mesher: ChunkMesher,
    scheduler: MeshScheduler,
    scene: Box<dyn ChunkScene>,
    resident: HashMap<ChunkPosition, ChunkGeometry>,
    last_player_chunk: Option<ChunkPosition>,
}

impl ChunkStreamer {
    /// Creates a streamer with nothing resident.
    ///
    /// # Arguments
    /// * `mesher` - Builds and disposes chunk geometry
    /// * `scheduler` - Where streaming passes run their meshing
    /// * `scene` - The presentation collaborator
    pub fn new(mesher: ChunkMesher, scheduler: MeshScheduler, scene: Box<dyn ChunkScene>) -> Self {
        ChunkStreamer {
            mesher,
            scheduler,
            scene,
            resident: HashMap::new(),
            last_player_chunk: None,
        }
    }

    /// The layout chunks are cut by.
    pub fn layout(&self) -> &ChunkLayout {
        self.mesher.layout()
    }

    /// The chunk containing a world-space position.
    pub fn chunk_coord_of(&self, position: Point3<f32>) -> ChunkPosition {
        self.layout().chunk_of_world(position)
    }

    /// World-space centre of a chunk.
    pub fn chunk_center(&self, chunk: ChunkPosition) -> Point3<f32> {
        self.layout().chunk_center(chunk)
    }

    /// The chunk the viewer was in at the last streaming pass.
    pub fn last_player_chunk(&self) -> Option<ChunkPosition> {
        self.last_player_chunk
    }

    /// Whether `chunk` currently has geometry.
    pub fn is_resident(&self, chunk: ChunkPosition) -> bool {
        self.resident.contains_key(&chunk)
    }

    /// The resident geometry of `chunk`.
    pub fn geometry(&self, chunk: ChunkPosition) -> Option<&ChunkGeometry> {
        self.resident.get(&chunk)
    }

    /// Number of resident chunks.
    pub fn resident_count(&self) -> usize {
        self.resident.len()
    }

    /// Coordinates of every resident chunk, in no particular order.
    pub fn resident_chunks(&self) -> impl Iterator<Item = ChunkPosition> + '_ {
        self.resident.keys().copied()
    }

    /// Updates the resident set for a viewer at `player`.
    ///
    /// Does nothing unless the viewer is in a different chunk than at the last
    /// pass, or this is the first call.
    ///
    /// # Arguments
    /// * `grid` - The voxel grid; no write guard may be held during the call
    /// * `player` - Viewer position in world space
    /// * `render_distance` - Radius, in world units, of the chunks to keep
    ///
    /// # Returns
    /// What the pass changed, or `None` if no pass ran.
    pub fn tick(
        &mut self,
        grid: &MtResource<VoxelGrid>,
        player: Point3<f32>,
        render_distance: f32,
    ) -> Option<StreamingPass> {
        let current = self.chunk_coord_of(player);
        if self.last_player_chunk == Some(current) {
            return None;
        }
        self.last_player_chunk = Some(current);
        info!("Player entered chunk {:?}", current);

        let started = Instant::now();
        let layout = *self.layout();
        // Float to int casts saturate, so huge distances only widen the window
        // until the grid clamp below takes over.
        let radius = ((render_distance / layout.chunk_size.min_extent().max(1) as f32).ceil()
            as i32)
            .saturating_add(1);
        let max_chunk = layout.max_chunk();
        let window = |center: i32, max: i32| {
            (
                center.saturating_sub(radius).max(0),
                center.saturating_add(radius).min(max),
            )
        };
        let (x_min, x_max) = window(current.x, max_chunk.x);
        let (y_min, y_max) = window(current.y, max_chunk.y);
        let (z_min, z_max) = window(current.z, max_chunk.z);

        let mut desired = HashSet::new();
        let mut to_build = Vec::new();
        for cy in y_min..=y_max {
            for cz in z_min..=z_max {
                for cx in x_min..=x_max {
                    let chunk = Point3::new(cx, cy, cz);
                    if player.distance(layout.chunk_center(chunk)) > render_distance {
                        continue;
                    }
                    desired.insert(chunk);
                    if !self.resident.contains_key(&chunk) {
                        to_build.push(chunk);
                    }
                }
            }
        }

        let mut pass = StreamingPass::default();
        for result in self.scheduler.build_all(&self.mesher, grid, to_build) {
            match result.geometry {
                Some(geometry) => {
                    debug!("Loaded chunk {:?} ({} cubes)", result.chunk, geometry.cube_count());
                    self.scene.add_chunk(&geometry);
                    self.resident.insert(result.chunk, geometry);
                    pass.loaded += 1;
                }
                None => pass.empty += 1,
            }
        }

        let stale: Vec<ChunkPosition> = self
            .resident
            .keys()
            .filter(|chunk| !desired.contains(*chunk))
            .copied()
            .collect();
        for chunk in stale {
            if let Some(geometry) = self.resident.remove(&chunk) {
                debug!("Unloaded chunk {:?}", chunk);
                self.scene.remove_chunk(chunk);
                self.mesher.dispose(geometry);
                pass.unloaded += 1;
            }
        }

        debug!(
            "Streaming pass around {:?}: {} loaded, {} empty, {} unloaded, {} resident in {:?}",
            current,
            pass.loaded,
            pass.empty,
            pass.unloaded,
            self.resident.len(),
            started.elapsed()
        );
        Some(pass)
    }

    /// Rebuilds one chunk after an edit, regardless of where the viewer is.
    ///
    /// The new geometry is built first; the old geometry is then removed from
    /// the scene and disposed before the new one is added, so the two are never
    /// drawn together. A chunk that now meshes to nothing ends up absent.
    ///
    /// # Returns
    /// Whether the chunk is resident afterwards.
    pub fn rebuild_chunk(&mut self, grid: &MtResource<VoxelGrid>, chunk: ChunkPosition) -> bool {
        let started = Instant::now();
        let rebuilt = self.mesher.build(chunk, &grid.get());

        if let Some(old) = self.resident.remove(&chunk) {
            self.scene.remove_chunk(chunk);
            self.mesher.dispose(old);
        }

        let resident = match rebuilt {
            Some(geometry) => {
                self.scene.add_chunk(&geometry);
                self.resident.insert(chunk, geometry);
                true
            }
            None => false,
        };

        debug!(
            "Rebuilt chunk {:?} in {:?}, resident: {}",
            chunk,
            started.elapsed(),
            resident
        );
        resident
    }

    /// Drops every resident chunk and forgets the viewer's chunk, so the next
    /// `tick` runs a full pass.
    pub fn unload_all(&mut self) {
        for (chunk, geometry) in self.resident.drain() {
            self.scene.remove_chunk(chunk);
            self.mesher.dispose(geometry);
        }
        self.last_player_chunk = None;
    }
}

impl RayCaster for ChunkStreamer {
    /// Traverses the grid and reports cells covered by a resident cube.
    fn cast_ray(&self, ray: &Ray, limit: f32) -> Vec<RayHit> {
        traverse_cells(self.layout(), ray, limit, |cell| self.covers(cell))
    }

    fn first_hit(&self, ray: &Ray, limit: f32) -> Option<RayHit> {
        first_cell_hit(self.layout(), ray, limit, |cell| self.covers(cell))
    }
}

impl ChunkStreamer {
    fn covers(&self, cell: BlockPosition) -> bool {
        let layout = self.layout();
        self.resident
            .get(&layout.chunk_of_block(cell))
            .is_some_and(|geometry| geometry.is_occupied(layout.local_position(cell)))
    }
}
