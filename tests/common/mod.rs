#![allow(dead_code)]

use std::{cell::RefCell, rc::Rc};

use voxel_streamer::engine_state::{
    rendering::{ChunkGeometry, ChunkScene},
    voxels::chunk::ChunkPosition,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneCall {
    Add(ChunkPosition, usize),
    Remove(ChunkPosition),
}

/// Shared record of every call a scene received, in order.
#[derive(Default, Clone)]
pub struct SceneLog(Rc<RefCell<Vec<SceneCall>>>);

impl SceneLog {
    pub fn scene(&self) -> Box<dyn ChunkScene> {
        Box::new(RecordingScene(self.clone()))
    }

    pub fn calls(&self) -> Vec<SceneCall> {
        self.0.borrow().clone()
    }

    pub fn adds(&self, chunk: ChunkPosition) -> usize {
        self.0
            .borrow()
            .iter()
            .filter(|call| matches!(call, SceneCall::Add(c, _) if *c == chunk))
            .count()
    }

    pub fn removes(&self, chunk: ChunkPosition) -> usize {
        self.0
            .borrow()
            .iter()
            .filter(|call| matches!(call, SceneCall::Remove(c) if *c == chunk))
            .count()
    }

    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }
}

struct RecordingScene(SceneLog);

impl ChunkScene for RecordingScene {
    fn add_chunk(&mut self, geometry: &ChunkGeometry) {
        (self.0).0.borrow_mut().push(SceneCall::Add(geometry.chunk, geometry.cube_count()));
    }

    fn remove_chunk(&mut self, chunk: ChunkPosition) {
        (self.0).0.borrow_mut().push(SceneCall::Remove(chunk));
    }
}
