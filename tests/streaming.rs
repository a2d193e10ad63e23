mod common;

use std::{collections::HashSet, sync::Arc};

use cgmath::Point3;
use common::{SceneCall, SceneLog};
use voxel_streamer::{
    core::MtResource,
    engine_state::{
        rendering::{assets::BlockRegistry, tasks::MeshScheduler, ChunkMesher, NullScene},
        streaming::ChunkStreamer,
        voxels::{
            block::block,
            chunk::{ChunkLayout, ChunkPosition, ChunkSize},
            grid::{BlockLayer, VoxelGrid, WorldDimensions},
        },
    },
};

fn terrain(dimensions: WorldDimensions, top: i32) -> MtResource<VoxelGrid> {
    let mut grid = VoxelGrid::new(dimensions);
    grid.generate(&[BlockLayer::new(block(4), 0, 0), BlockLayer::new(block(3), 1, top)]);
    MtResource::new(grid)
}

fn streamer(layout: ChunkLayout, scheduler: MeshScheduler, log: &SceneLog) -> ChunkStreamer {
    ChunkStreamer::new(
        ChunkMesher::new(layout, Arc::new(BlockRegistry::builtin())),
        scheduler,
        log.scene(),
    )
}

fn resident(streamer: &ChunkStreamer) -> HashSet<ChunkPosition> {
    streamer.resident_chunks().collect()
}

#[test]
fn generate_applies_the_standard_layering() {
    let mut grid = VoxelGrid::new(WorldDimensions::new(8, 63, 8));
    grid.generate(&[
        BlockLayer::new(block(4), 0, 0),
        BlockLayer::new(block(3), 1, 58),
        BlockLayer::new(block(2), 59, 61),
        BlockLayer::new(block(1), 62, 62),
    ]);

    for x in 0..8 {
        for z in 0..8 {
            assert_eq!(grid.get(x, 0, z), Some(block(4)));
            assert_eq!(grid.get(x, 30, z), Some(block(3)));
            assert_eq!(grid.get(x, 60, z), Some(block(2)));
            assert_eq!(grid.get(x, 62, z), Some(block(1)));
        }
    }
    assert_eq!(grid.highest_solid_y(), 62);
}

#[test]
fn out_of_range_cells_read_as_air_and_reject_writes() {
    let grid = terrain(WorldDimensions::new(8, 8, 8), 3);
    let mut grid = grid.get_mut();

    for (x, y, z) in [(-1, 0, 0), (8, 0, 0), (0, -1, 0), (0, 8, 0), (0, 0, 8), (3, 3, -9)] {
        assert_eq!(grid.get(x, y, z), None);
        assert!(!grid.set(x, y, z, Some(block(2))));
        assert_eq!(grid.get(x, y, z), None);
    }
    assert_eq!(grid.get(0, 0, 0), Some(block(4)));
    assert_eq!(grid.get(7, 3, 7), Some(block(3)));

    assert!(grid.set(7, 7, 7, Some(block(2))));
    assert_eq!(grid.get(7, 7, 7), Some(block(2)));
    assert!(grid.set(7, 7, 7, None));
    assert_eq!(grid.get(7, 7, 7), None);
}

#[test]
fn repeated_ticks_in_one_chunk_change_nothing() {
    let layout = ChunkLayout::new(WorldDimensions::new(32, 16, 32), ChunkSize::new(4, 4, 4));
    let grid = terrain(layout.dimensions, 9);
    let log = SceneLog::default();
    let mut streamer = streamer(layout, MeshScheduler::Inline, &log);

    assert!(streamer.tick(&grid, Point3::new(0.5, 10.5, 0.5), 10.0).is_some());
    let first = resident(&streamer);
    let calls = log.len();

    assert!(streamer.tick(&grid, Point3::new(0.5, 10.5, 0.5), 10.0).is_none());
    assert!(streamer.tick(&grid, Point3::new(1.9, 11.9, 1.9), 10.0).is_none());
    assert_eq!(resident(&streamer), first);
    assert_eq!(log.len(), calls);
}

#[test]
fn chunk_in_range_throughout_a_round_trip_is_never_dropped() {
    let layout = ChunkLayout::new(WorldDimensions::new(32, 16, 32), ChunkSize::new(4, 4, 4));
    let grid = terrain(layout.dimensions, 9);
    let log = SceneLog::default();
    let mut streamer = streamer(layout, MeshScheduler::Inline, &log);

    let at_a = Point3::new(0.5, 10.5, 0.5);
    let at_b = Point3::new(4.5, 10.5, 0.5);
    let chunk_a = streamer.chunk_coord_of(at_a);
    assert_eq!(chunk_a, Point3::new(4, 2, 4));
    assert_ne!(streamer.chunk_coord_of(at_b), chunk_a);

    streamer.tick(&grid, at_a, 10.0);
    let start = resident(&streamer);
    assert!(streamer.is_resident(chunk_a));

    assert!(streamer.tick(&grid, at_b, 10.0).is_some());
    assert!(streamer.is_resident(chunk_a));
    assert!(streamer.tick(&grid, at_a, 10.0).is_some());
    assert!(streamer.is_resident(chunk_a));

    assert_eq!(log.adds(chunk_a), 1);
    assert_eq!(log.removes(chunk_a), 0);
    assert_eq!(resident(&streamer), start);
}

#[test]
fn chunks_above_the_terrain_are_never_resident() {
    let layout = ChunkLayout::new(WorldDimensions::new(32, 16, 32), ChunkSize::new(4, 4, 4));
    let grid = terrain(layout.dimensions, 5);
    let log = SceneLog::default();
    let mut streamer = streamer(layout, MeshScheduler::Inline, &log);

    let pass = streamer.tick(&grid, Point3::new(0.5, 10.5, 0.5), 10.0).unwrap();
    assert!(pass.empty > 0);
    assert!(streamer.resident_chunks().all(|chunk| chunk.y <= 1));
    assert!(log
        .calls()
        .iter()
        .all(|call| matches!(call, SceneCall::Add(_, cubes) if *cubes > 0)));
}

#[test]
fn worker_pool_streams_the_same_chunks_as_inline_meshing() {
    let layout = ChunkLayout::new(WorldDimensions::new(32, 16, 32), ChunkSize::new(4, 4, 4));
    let grid = terrain(layout.dimensions, 9);
    let inline_log = SceneLog::default();
    let mut inline = streamer(layout, MeshScheduler::Inline, &inline_log);
    let mut pooled = ChunkStreamer::new(
        ChunkMesher::new(layout, Arc::new(BlockRegistry::builtin())),
        MeshScheduler::with_workers(4),
        Box::new(NullScene),
    );

    for step in 0..12 {
        let player = Point3::new(-14.0 + step as f32 * 2.5, 9.0, -6.0 + step as f32);
        inline.tick(&grid, player, 7.0);
        pooled.tick(&grid, player, 7.0);
        assert_eq!(resident(&inline), resident(&pooled));
    }
}

#[test]
fn an_edit_that_empties_a_chunk_removes_it_without_moving() {
    let layout = ChunkLayout::new(WorldDimensions::new(16, 8, 16), ChunkSize::new(4, 4, 4));
    let grid = MtResource::new(VoxelGrid::new(layout.dimensions));
    grid.get_mut().set(8, 5, 8, Some(block(2)));
    let log = SceneLog::default();
    let mut streamer = streamer(layout, MeshScheduler::Inline, &log);

    streamer.tick(&grid, Point3::new(0.5, 5.5, 0.5), 6.0);
    let chunk = Point3::new(2, 1, 2);
    assert!(streamer.is_resident(chunk));
    assert_eq!(streamer.resident_count(), 1);

    grid.get_mut().set(8, 5, 8, None);
    assert!(!streamer.rebuild_chunk(&grid, chunk));
    assert!(!streamer.is_resident(chunk));
    assert_eq!(log.calls(), vec![SceneCall::Add(chunk, 1), SceneCall::Remove(chunk)]);
    assert!(streamer.tick(&grid, Point3::new(0.5, 5.5, 0.5), 6.0).is_none());
}
