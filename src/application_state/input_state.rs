//! # Input State
//!
//! The intents the input collaborator raises. Key bindings and device polling
//! belong to the presentation layer; the engine only sees what the player
//! wants to do this frame.

use crate::engine_state::voxels::block::BlockId;

/// Which movement keys are held this frame.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MovementInput {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
}

impl MovementInput {
    /// Whether any movement key is held.
    pub fn is_active(&self) -> bool {
        self.forward || self.backward || self.left || self.right || self.up || self.down
    }

    /// Forward/backward axis: +1 forward, -1 backward, 0 for neither or both.
    pub fn forward_axis(&self) -> f32 {
        axis(self.forward, self.backward)
    }

    /// Strafe axis: +1 right, -1 left.
    pub fn right_axis(&self) -> f32 {
        axis(self.right, self.left)
    }

    /// Vertical axis: +1 up, -1 down.
    pub fn up_axis(&self) -> f32 {
        axis(self.up, self.down)
    }
}

fn axis(positive: bool, negative: bool) -> f32 {
    match (positive, negative) {
        (true, false) => 1.0,
        (false, true) => -1.0,
        _ => 0.0,
    }
}

/// One thing the player asked for during a frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlayerIntent {
    /// Move with the given keys held for the frame
    Move(MovementInput),
    /// Mouse moved by `(dx, dy)` pointer units
    Look { dx: f32, dy: f32 },
    /// Break the block under the crosshair
    Destroy,
    /// Place the selected block against the face under the crosshair
    Place,
    /// Pick the block under the crosshair as the one to place
    Select,
    /// Pick a block type directly, e.g. from a hotbar
    SelectBlock(BlockId),
}

#[cfg(test)]
mod tests {
    use super::MovementInput;

    #[test]
    fn opposite_keys_cancel() {
        let input = MovementInput {
            forward: true,
            backward: true,
            left: true,
            ..Default::default()
        };
        assert_eq!(input.forward_axis(), 0.0);
        assert_eq!(input.right_axis(), -1.0);
        assert_eq!(input.up_axis(), 0.0);
        assert!(input.is_active());
        assert!(!MovementInput::default().is_active());
    }
}
