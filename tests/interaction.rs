mod common;

use std::{f32::consts::FRAC_PI_2, sync::Arc};

use cgmath::{Point3, Rad};
use common::SceneLog;
use voxel_streamer::{
    application_state::{config::WorldConfig, input_state::PlayerIntent},
    engine_state::{
        camera_state::camera::Camera,
        interaction::BlockEvent,
        rendering::assets::BlockRegistry,
        voxels::{
            block::{block, BlockId},
            grid::{BlockLayer, WorldDimensions},
        },
        EngineState,
    },
};

const DT: f32 = 1.0 / 60.0;

/// A 16x8x16 world of bedrock, two rows of stone and a row of grass, with the
/// viewer hovering above the middle column looking straight down.
fn engine(log: &SceneLog) -> EngineState {
    let config = WorldConfig {
        dimensions: WorldDimensions::new(16, 8, 16),
        render_distance: 8.0,
        reach: 8.0,
        layers: vec![
            BlockLayer::new(block(4), 0, 0),
            BlockLayer::new(block(3), 1, 2),
            BlockLayer::new(block(1), 3, 3),
        ],
        worker_threads: 0,
        ..WorldConfig::default()
    };
    let mut engine = EngineState::new(&config, Arc::new(BlockRegistry::builtin()), log.scene());
    engine.camera_state.camera = Camera::new(Point3::new(0.5, 6.5, 0.5), Rad(0.0), Rad(-FRAC_PI_2));
    engine
}

fn cell(engine: &EngineState, x: i32, y: i32, z: i32) -> Option<BlockId> {
    engine.world().get().get(x, y, z)
}

#[test]
fn breaking_and_replacing_rebuilds_the_chunk_once_per_edit() {
    let log = SceneLog::default();
    let mut engine = engine(&log);
    let ground = Point3::new(2, 0, 2);
    assert_eq!(log.adds(ground), 1);

    engine.frame(DT, &[PlayerIntent::Destroy]);
    assert_eq!(cell(&engine, 8, 3, 8), None);
    assert_eq!(log.removes(ground), 1);
    assert_eq!(log.adds(ground), 2);

    let events = engine.drain_events();
    assert_eq!(events.len(), 1);
    assert!(matches!(events[0], BlockEvent::Broken { .. }));
    assert_eq!(events[0].block(), block(1));
    assert_eq!(events[0].position(), Point3::new(8, 3, 8));
    assert_eq!(events[0].sound(), Some("grass"));

    engine.frame(DT, &[PlayerIntent::SelectBlock(block(1)), PlayerIntent::Place]);
    assert_eq!(cell(&engine, 8, 3, 8), Some(block(1)));
    assert_eq!(log.removes(ground), 2);
    assert_eq!(log.adds(ground), 3);

    let events = engine.drain_events();
    assert_eq!(events.len(), 1);
    assert!(matches!(events[0], BlockEvent::Placed { .. }));
    assert_eq!(events[0].position(), Point3::new(8, 3, 8));
}

#[test]
fn digging_stops_at_the_floor() {
    let log = SceneLog::default();
    let mut engine = engine(&log);

    for _ in 0..4 {
        engine.frame(DT, &[PlayerIntent::Destroy]);
    }

    let broken: Vec<_> = engine
        .drain_events()
        .iter()
        .map(|event| (event.block(), event.position().y))
        .collect();
    assert_eq!(broken, vec![(block(1), 3), (block(3), 2), (block(3), 1)]);
    assert_eq!(cell(&engine, 8, 0, 8), Some(block(4)));
    assert_eq!(log.removes(Point3::new(2, 0, 2)), 3);
}

#[test]
fn placing_into_an_occupied_cell_is_refused() {
    let log = SceneLog::default();
    let mut engine = engine(&log);
    engine.world().get_mut().set(8, 4, 8, Some(block(2)));
    let calls = log.len();

    engine.frame(DT, &[PlayerIntent::SelectBlock(block(3)), PlayerIntent::Place]);

    assert!(engine.drain_events().is_empty());
    assert_eq!(cell(&engine, 8, 4, 8), Some(block(2)));
    assert_eq!(log.len(), calls);
}

#[test]
fn edits_move_a_chunk_in_and_out_of_the_resident_set() {
    let log = SceneLog::default();
    let mut engine = engine(&log);
    let above = Point3::new(2, 1, 2);
    assert!(!engine.streamer().is_resident(above));

    engine.frame(DT, &[PlayerIntent::Place]);
    assert_eq!(cell(&engine, 8, 4, 8), Some(block(1)));
    assert!(engine.streamer().is_resident(above));
    assert_eq!(log.adds(above), 1);

    engine.frame(DT, &[PlayerIntent::Destroy]);
    assert_eq!(cell(&engine, 8, 4, 8), None);
    assert!(!engine.streamer().is_resident(above));
    assert_eq!(log.removes(above), 1);
    assert_eq!(engine.drain_events().len(), 2);
}

#[test]
fn select_picks_the_block_under_the_crosshair() {
    let log = SceneLog::default();
    let mut engine = engine(&log);

    engine.frame(DT, &[PlayerIntent::SelectBlock(block(3))]);
    assert_eq!(engine.selected_block(), Some(block(3)));

    engine.frame(DT, &[PlayerIntent::Select]);
    assert_eq!(engine.selected_block(), Some(block(1)));
    assert!(engine.drain_events().is_empty());
}

#[test]
fn bundled_assets_load_and_drive_an_engine() {
    let root = env!("CARGO_MANIFEST_DIR");
    let registry = BlockRegistry::load(format!("{root}/assets/blocks.json")).unwrap();
    assert_eq!(registry.block_ids(), vec![block(1), block(2), block(3), block(4)]);

    let mut config = WorldConfig::load(format!("{root}/assets/world.json")).unwrap();
    assert_eq!(config.layers.len(), 4);
    config.dimensions = WorldDimensions::new(32, 63, 32);
    config.worker_threads = 2;

    let log = SceneLog::default();
    let mut engine = EngineState::new(&config, Arc::new(registry), log.scene());
    assert_eq!(engine.camera().position, Point3::new(0.0, 65.0, 0.0));
    assert!(engine.streamer().resident_count() > 0);

    engine.camera_state.camera = Camera::new(Point3::new(0.5, 65.0, 0.5), Rad(0.0), Rad(-FRAC_PI_2));
    engine.frame(DT, &[PlayerIntent::Destroy]);
    let events = engine.drain_events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].block(), block(1));
    assert_eq!(events[0].position().y, 62);

    engine.shutdown();
    assert_eq!(engine.streamer().resident_count(), 0);
}
