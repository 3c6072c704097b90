use cgmath::{InnerSpace, Quaternion, Rotation, Vector3, vec3};

use crate::input_context::InputFrame;
use crate::vr_config::Handedness;

use super::RigTransform;

/// Values inside the deadzone (or non-finite) become exactly zero; the rest
/// are clamped to `[-1, 1]`.
pub fn apply_deadzone(value: f32, deadzone: f32) -> f32 {
    if !value.is_finite() || value.abs() < deadzone {
        0.0
    } else {
        value.clamp(-1.0, 1.0)
    }
}

/// Both sticks after deadzone filtering.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FilteredSticks {
    pub left_x: f32,
    pub left_y: f32,
    pub right_x: f32,
    pub right_y: f32,
}

impl FilteredSticks {
    pub fn from_frame(frame: &InputFrame, deadzone: f32) -> Self {
        let (left_x, left_y) = frame.stick(Handedness::Left);
        let (right_x, right_y) = frame.stick(Handedness::Right);
        FilteredSticks {
            left_x: apply_deadzone(left_x, deadzone),
            left_y: apply_deadzone(left_y, deadzone),
            right_x: apply_deadzone(right_x, deadzone),
            right_y: apply_deadzone(right_y, deadzone),
        }
    }

    /// Left stick outside the deadzone.
    pub fn has_horizontal_movement(&self) -> bool {
        self.left_x != 0.0 || self.left_y != 0.0
    }
}

/// Horizontal forward and right unit vectors of the view, pitch and roll removed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraBasis {
    pub forward: Vector3<f32>,
    pub right: Vector3<f32>,
}

impl CameraBasis {
    pub fn new(rig: &RigTransform, head_rotation: Quaternion<f32>) -> Self {
        let rig_rotation = rig.rotation();
        let view = rig_rotation * head_rotation;
        let look = view.rotate_vector(vec3(0.0, 0.0, -1.0));
        let flat = vec3(look.x, 0.0, look.z);

        // Looking straight up or down leaves no heading; use the rig's.
        let forward = if flat.magnitude2() > 1e-6 {
            flat.normalize()
        } else {
            rig_rotation.rotate_vector(vec3(0.0, 0.0, -1.0))
        };
        let right = forward.cross(vec3(0.0, 1.0, 0.0)).normalize();

        CameraBasis { forward, right }
    }

    /// Stick-weighted horizontal direction with its length clamped to 1.
    /// Pushing the stick forward reports negative Y.
    pub fn movement_direction(&self, stick_x: f32, stick_y: f32) -> Vector3<f32> {
        let direction = self.forward * -stick_y + self.right * stick_x;
        if direction.magnitude2() > 1.0 {
            direction.normalize()
        } else {
            direction
        }
    }
}
