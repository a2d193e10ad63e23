//! # Block Interaction
//!
//! Maps the viewer's ray to a block and performs break and place edits.
//!
//! Rays are cast against resident chunk geometry, not the grid, so only what
//! is drawn can be targeted. Every accepted edit writes the grid and then
//! rebuilds the owning chunk straight away; the streaming gate is not
//! involved.
//!
//! ## Floor Rule
//! The block type of the bottom-most generation layer can never be broken in
//! grid row `y == 0`, whatever its definition says. Elsewhere the definition's
//! `allow_breaking` flag decides.

use cgmath::Point3;
use log::{debug, warn};

use crate::{
    core::MtResource,
    engine_state::{
        rendering::{
            raycast::{adjacent_cell, struck_cell, Ray, RayCaster, RayHit},
            BlockAssets,
        },
        streaming::ChunkStreamer,
        voxels::{
            block::BlockId,
            chunk::{BlockPosition, ChunkLayout},
            grid::VoxelGrid,
        },
    },
};

/// A block the viewer is pointing at.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RayTarget {
    /// Grid cell of the struck block
    pub block_position: BlockPosition,
    /// Where the ray met the block's face, in world space
    pub world_position: Point3<f32>,
    /// The struck block's type
    pub block: BlockId,
    /// The raw hit
    pub hit: RayHit,
}

/// An accepted edit, raised for the particle and audio collaborators.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BlockEvent {
    Broken {
        block: BlockId,
        position: BlockPosition,
        sound: Option<String>,
    },
    Placed {
        block: BlockId,
        position: BlockPosition,
        sound: Option<String>,
    },
}

impl BlockEvent {
    /// The block type that was broken or placed.
    pub fn block(&self) -> BlockId {
        match self {
            BlockEvent::Broken { block, .. } | BlockEvent::Placed { block, .. } => *block,
        }
    }

    /// The grid cell that changed.
    pub fn position(&self) -> BlockPosition {
        match self {
            BlockEvent::Broken { position, .. } | BlockEvent::Placed { position, .. } => *position,
        }
    }

    /// The sound category of the block, if it has one.
    pub fn sound(&self) -> Option<&str> {
        match self {
            BlockEvent::Broken { sound, .. } | BlockEvent::Placed { sound, .. } => sound.as_deref(),
        }
    }
}

/// Resolves interaction rays and applies edits.
#[derive(Copy, Clone, Debug)]
pub struct InteractionResolver {
    layout: ChunkLayout,
    reach: f32,
}

impl InteractionResolver {
    /// Creates a resolver for `layout` that reaches `reach` world units.
    pub fn new(layout: ChunkLayout, reach: f32) -> Self {
        InteractionResolver { layout, reach }
    }

    /// The block under `ray`, if one is within reach.
    ///
    /// # Arguments
    /// * `ray` - The interaction ray
    /// * `caster` - What the ray is cast against
    /// * `grid` - The grid the struck cell is read from
    /// * `max_distance` - Hits further away are ignored
    ///
    /// # Returns
    /// `None` if nothing is hit in range, or the struck cell is outside the
    /// grid or holds air.
    pub fn resolve_target(
        &self,
        ray: &Ray,
        caster: &dyn RayCaster,
        grid: &VoxelGrid,
        max_distance: f32,
    ) -> Option<RayTarget> {
        let hit = caster.first_hit(ray, max_distance)?;
        if hit.distance > max_distance {
            return None;
        }

        let block_position = struck_cell(&self.layout, &hit);
        if !grid.dimensions().contains(block_position) {
            return None;
        }

        let block = grid.get_at(block_position)?;
        Some(RayTarget {
            block_position,
            world_position: hit.point,
            block,
            hit,
        })
    }

    /// The block type under `ray`, for picking the block to place.
    pub fn select(&self, ray: &Ray, streamer: &ChunkStreamer, grid: &VoxelGrid) -> Option<BlockId> {
        self.resolve_target(ray, streamer, grid, self.reach)
            .map(|target| target.block)
    }

    /// Breaks the block under `ray`.
    ///
    /// Refused (returning `None` with the grid untouched) when nothing is in
    /// reach, when the target is the floor block type in row 0, when the block
    /// has no definition, or when its definition disallows breaking.
    pub fn destroy(
        &self,
        ray: &Ray,
        grid: &MtResource<VoxelGrid>,
        streamer: &mut ChunkStreamer,
        assets: &dyn BlockAssets,
    ) -> Option<BlockEvent> {
        let (target, floor_block) = {
            let grid = grid.get();
            (
                self.resolve_target(ray, &*streamer, &grid, self.reach)?,
                grid.floor_block(),
            )
        };

        if target.block_position.y == 0 && Some(target.block) == floor_block {
            debug!("Refusing to break floor block at {:?}", target.block_position);
            return None;
        }

        let Some(definition) = assets.block_definition(target.block) else {
            warn!(
                "No definition for block {} at {:?}, refusing to break it",
                target.block, target.block_position
            );
            return None;
        };
        if !definition.allow_breaking {
            debug!(
                "Block {} at {:?} cannot be broken",
                target.block, target.block_position
            );
            return None;
        }

        if !grid.get_mut().set_at(target.block_position, None) {
            return None;
        }
        streamer.rebuild_chunk(grid, self.layout.chunk_of_block(target.block_position));

        debug!("Broke block {} at {:?}", target.block, target.block_position);
        Some(BlockEvent::Broken {
            block: target.block,
            position: target.block_position,
            sound: definition.sound.clone(),
        })
    }

    /// Places `block` against the face under `ray`, or at full reach straight
    /// ahead when the ray hits nothing.
    ///
    /// Refused when `block` has no material, when the chosen cell is outside
    /// the grid, or when it is already occupied.
    pub fn place(
        &self,
        ray: &Ray,
        block: BlockId,
        grid: &MtResource<VoxelGrid>,
        streamer: &mut ChunkStreamer,
        assets: &dyn BlockAssets,
    ) -> Option<BlockEvent> {
        if assets.material(block).is_none() {
            warn!("No material for block {}, refusing to place it", block);
            return None;
        }

        let position = match streamer.first_hit(ray, self.reach) {
            Some(hit) => adjacent_cell(&self.layout, &hit),
            None => self.layout.block_of_world(ray.at(self.reach)),
        };

        {
            let mut grid = grid.get_mut();
            if grid.get_at(position).is_some() {
                debug!("Cell {:?} is occupied, not placing", position);
                return None;
            }
            if !grid.set_at(position, Some(block)) {
                debug!("Cell {:?} is outside the grid, not placing", position);
                return None;
            }
        }
        streamer.rebuild_chunk(grid, self.layout.chunk_of_block(position));

        debug!("Placed block {} at {:?}", block, position);
        Some(BlockEvent::Placed {
            block,
            position,
            sound: assets
                .block_definition(block)
                .and_then(|definition| definition.sound.clone()),
        })
    }
}
