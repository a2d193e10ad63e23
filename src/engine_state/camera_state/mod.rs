//! # Camera State Management
//!
//! The viewer: where it stands, where it looks, and the controller feeding it
//! player input. The streamer reads the camera position each frame and the
//! interaction resolver casts along its view ray.
//!
//! ## Core Components
//! - `Camera`: The camera's position and orientation in world space
//! - `CameraController`: Accumulates movement and look input between updates

use cgmath::{Point3, Rad};

use camera::{Camera, CameraController};

use crate::application_state::input_state::MovementInput;

use super::voxels::grid::VoxelGrid;

pub mod camera;

/// Blocks of clearance between the top terrain layer and the spawn point.
const SPAWN_CLEARANCE: f32 = 3.0;

/// The camera together with its controller.
///
/// # Fields
/// - `camera`: The current camera state (position, orientation)
/// - `camera_controller`: Handles player input and camera movement
pub struct CameraState {
    /// The current camera position and orientation
    pub camera: Camera,
    /// Handles player input and camera movement
    pub camera_controller: CameraController,
}

impl CameraState {
    /// Wraps `camera` with a default controller.
    pub fn new(camera: Camera) -> Self {
        Self {
            camera,
            camera_controller: CameraController::default(),
        }
    }

    /// A camera at the spawn point of `grid`, looking along negative Z.
    pub fn at_spawn(grid: &VoxelGrid) -> Self {
        Self::new(Camera::new(spawn_position(grid), Rad(0.0), Rad(0.0)))
    }

    /// Records which movement keys are held this frame.
    pub fn intake_movement(&mut self, movement: MovementInput) {
        self.camera_controller.intake_movement(movement);
    }

    /// Adds a pointer movement.
    pub fn intake_look(&mut self, delta_x: f32, delta_y: f32) {
        self.camera_controller.intake_look(delta_x, delta_y);
    }

    /// Applies the pending input over `dt` seconds.
    ///
    /// # Returns
    /// `true` if there was any input to apply
    pub fn update(&mut self, dt: f32) -> bool {
        if !self.camera_controller.has_updates() {
            return false;
        }
        self.camera
            .get_controller_updates_and_reset_controller(&mut self.camera_controller, dt);
        true
    }
}

/// Where the viewer starts: above the world origin, clear of the top layer.
pub fn spawn_position(grid: &VoxelGrid) -> Point3<f32> {
    Point3::new(0.0, grid.highest_solid_y() as f32 + SPAWN_CLEARANCE, 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::{
        block::block,
        grid::{BlockLayer, WorldDimensions},
    };

    #[test]
    fn spawn_is_above_the_top_layer() {
        let mut grid = VoxelGrid::new(WorldDimensions::default());
        assert_eq!(spawn_position(&grid), Point3::new(0.0, 3.0, 0.0));

        grid.generate(&[
            BlockLayer::new(block(4), 0, 0),
            BlockLayer::new(block(3), 1, 58),
            BlockLayer::new(block(2), 59, 61),
            BlockLayer::new(block(1), 62, 62),
        ]);
        assert_eq!(spawn_position(&grid), Point3::new(0.0, 65.0, 0.0));
    }

    #[test]
    fn update_without_input_does_nothing() {
        let grid = VoxelGrid::new(WorldDimensions::new(8, 8, 8));
        let mut state = CameraState::at_spawn(&grid);
        let before = state.camera;
        assert!(!state.update(1.0));
        assert_eq!(state.camera, before);

        state.intake_movement(MovementInput {
            up: true,
            ..Default::default()
        });
        assert!(state.update(1.0));
        assert_eq!(state.camera.position.y, before.position.y + 5.0);
    }
}
