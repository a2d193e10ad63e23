//! # Camera Implementation
//!
//! ## Key Components
//! - `Camera`: The viewer's position and orientation in world space
//! - `CameraController`: Accumulates movement and look input between updates
//!
//! ## Conventions
//! With zero yaw and pitch the camera looks down negative Z. Yaw turns left
//! for positive values, pitch looks up for positive values.

use cgmath::{InnerSpace, Point3, Rad, Vector3};
use std::f32::consts::FRAC_PI_2;

use crate::{
    application_state::input_state::MovementInput, engine_state::rendering::raycast::Ray,
};

/// Movement speed in world units per second.
pub const DEFAULT_SPEED: f32 = 5.0;

/// Look sensitivity in radians per pointer unit.
pub const DEFAULT_SENSITIVITY: f32 = 0.002;

/// Represents a first-person camera in 3D space.
///
/// # Fields
/// - `position`: The camera's position in world space
/// - `yaw`: Horizontal rotation (around Y axis) in radians
/// - `pitch`: Vertical rotation (around X axis) in radians, within ±π/2
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// The camera's position in world space
    pub position: Point3<f32>,
    /// Horizontal rotation (around Y axis) in radians
    pub yaw: Rad<f32>,
    /// Vertical rotation (around X axis) in radians
    pub pitch: Rad<f32>,
}

impl Camera {
    /// Creates a new camera with the specified position and orientation.
    ///
    /// # Arguments
    /// * `position` - Initial position of the camera in world space
    /// * `yaw` - Initial yaw
    /// * `pitch` - Initial pitch, clamped to ±π/2
    pub fn new<V: Into<Point3<f32>>, Y: Into<Rad<f32>>, P: Into<Rad<f32>>>(
        position: V,
        yaw: Y,
        pitch: P,
    ) -> Self {
        let mut camera = Self {
            position: position.into(),
            yaw: yaw.into(),
            pitch: pitch.into(),
        };
        camera.clamp_pitch();
        camera
    }

    /// The unit vector the camera looks along.
    pub fn forward(&self) -> Vector3<f32> {
        let (yaw_sin, yaw_cos) = self.yaw.0.sin_cos();
        let (pitch_sin, pitch_cos) = self.pitch.0.sin_cos();
        Vector3::new(-yaw_sin * pitch_cos, pitch_sin, -yaw_cos * pitch_cos).normalize()
    }

    /// The ray through the centre of the view, used for block interaction.
    pub fn view_ray(&self) -> Ray {
        Ray::new(self.position, self.forward())
    }

    /// Applies and then clears the controller's accumulated input.
    ///
    /// Horizontal movement follows the yaw only and is normalised, so diagonal
    /// movement is no faster than straight movement. Vertical movement is
    /// independent of where the camera looks.
    ///
    /// # Arguments
    /// * `controller` - The controller holding this frame's input
    /// * `dt` - Seconds elapsed since the last update
    pub fn get_controller_updates_and_reset_controller(
        &mut self,
        controller: &mut CameraController,
        dt: f32,
    ) {
        // Rotate first so movement follows the new heading
        self.yaw -= Rad(controller.rotate_horizontal * controller.sensitivity);
        self.pitch -= Rad(controller.rotate_vertical * controller.sensitivity);
        self.clamp_pitch();

        let (yaw_sin, yaw_cos) = self.yaw.0.sin_cos();
        let forward = Vector3::new(-yaw_sin, 0.0, -yaw_cos);
        let right = Vector3::new(yaw_cos, 0.0, -yaw_sin);
        let movement = controller.movement;

        let horizontal = forward * movement.forward_axis() + right * movement.right_axis();
        if horizontal.magnitude2() > 0.0 {
            self.position += horizontal.normalize() * controller.speed * dt;
        }
        self.position.y += movement.up_axis() * controller.speed * dt;

        controller.movement = MovementInput::default();
        controller.rotate_horizontal = 0.0;
        controller.rotate_vertical = 0.0;
    }

    fn clamp_pitch(&mut self) {
        self.pitch = Rad(self.pitch.0.clamp(-FRAC_PI_2, FRAC_PI_2));
    }
}

/// Handles camera movement and rotation based on player intents.
#[derive(Debug)]
pub struct CameraController {
    movement: MovementInput,
    // Pointer deltas accumulated since the last update
    rotate_horizontal: f32,
    rotate_vertical: f32,
    speed: f32,
    sensitivity: f32,
}

impl CameraController {
    /// Creates a new camera controller with the given speed and sensitivity.
    ///
    /// # Arguments
    /// * `speed` - Movement speed in units per second
    /// * `sensitivity` - Radians of rotation per pointer unit
    pub fn new(speed: f32, sensitivity: f32) -> Self {
        Self {
            movement: MovementInput::default(),
            rotate_horizontal: 0.0,
            rotate_vertical: 0.0,
            speed,
            sensitivity,
        }
    }

    /// Records which movement keys are held this frame.
    pub fn intake_movement(&mut self, movement: MovementInput) {
        self.movement = movement;
    }

    /// Adds a pointer movement.
    pub fn intake_look(&mut self, delta_x: f32, delta_y: f32) {
        self.rotate_horizontal += delta_x;
        self.rotate_vertical += delta_y;
    }

    /// Checks if there are any pending updates that would affect the camera.
    pub fn has_updates(&self) -> bool {
        self.movement.is_active() || self.rotate_horizontal != 0.0 || self.rotate_vertical != 0.0
    }
}

impl Default for CameraController {
    fn default() -> Self {
        CameraController::new(DEFAULT_SPEED, DEFAULT_SENSITIVITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Vector3<f32>, b: Vector3<f32>) -> bool {
        (a - b).magnitude() < 1e-5
    }

    #[test]
    fn default_orientation_looks_down_negative_z() {
        let camera = Camera::new(Point3::new(0.0, 0.0, 0.0), Rad(0.0), Rad(0.0));
        assert!(close(camera.forward(), Vector3::new(0.0, 0.0, -1.0)));
        assert!(close(camera.view_ray().direction, camera.forward()));
    }

    #[test]
    fn pitch_is_clamped_to_straight_up_and_down() {
        let mut camera = Camera::new(Point3::new(0.0, 0.0, 0.0), Rad(0.0), Rad(0.0));
        let mut controller = CameraController::default();
        controller.intake_look(0.0, -10_000.0);
        camera.get_controller_updates_and_reset_controller(&mut controller, 0.016);
        assert_eq!(camera.pitch, Rad(FRAC_PI_2));
        assert!(close(camera.forward(), Vector3::new(0.0, 1.0, 0.0)));
        assert!(!controller.has_updates());
    }

    #[test]
    fn diagonal_movement_is_normalised() {
        let mut camera = Camera::new(Point3::new(0.0, 10.0, 0.0), Rad(0.0), Rad(0.0));
        let mut controller = CameraController::default();
        controller.intake_movement(MovementInput {
            forward: true,
            right: true,
            up: true,
            ..Default::default()
        });
        camera.get_controller_updates_and_reset_controller(&mut controller, 1.0);

        let moved = camera.position - Point3::new(0.0, 10.0, 0.0);
        assert!((Vector3::new(moved.x, 0.0, moved.z).magnitude() - DEFAULT_SPEED).abs() < 1e-4);
        assert!(moved.x > 0.0 && moved.z < 0.0);
        assert!((moved.y - DEFAULT_SPEED).abs() < 1e-4);
    }

    #[test]
    fn looking_right_turns_toward_positive_x() {
        let mut camera = Camera::new(Point3::new(0.0, 0.0, 0.0), Rad(0.0), Rad(0.0));
        let mut controller = CameraController::default();
        controller.intake_look(FRAC_PI_2 / DEFAULT_SENSITIVITY, 0.0);
        camera.get_controller_updates_and_reset_controller(&mut controller, 0.016);
        assert!(close(camera.forward(), Vector3::new(1.0, 0.0, 0.0)));
    }
}
