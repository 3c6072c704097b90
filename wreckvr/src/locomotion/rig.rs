use cgmath::{Quaternion, Rad, Rotation3, Vector3, vec3};
use serde::{Deserialize, Serialize};

/// The player's movable origin, parent of the camera.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RigTransform {
    pub position: Vector3<f32>,
    /// Rotation about world Y in radians; positive turns left
    pub yaw: f32,
}

impl Default for RigTransform {
    fn default() -> Self {
        RigTransform {
            position: vec3(0.0, 0.0, 0.0),
            yaw: 0.0,
        }
    }
}

impl RigTransform {
    pub fn new(position: Vector3<f32>, yaw: f32) -> Self {
        RigTransform { position, yaw }
    }

    pub fn rotation(&self) -> Quaternion<f32> {
        Quaternion::from_angle_y(Rad(self.yaw))
    }
}

/// A single mutation of the rig. All rig writes in the crate are expressed
/// as one of these so they can be funnelled through one place.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RigWrite {
    Translate(Vector3<f32>),
    /// Add to the yaw, in radians
    Rotate(f32),
    /// Move to an absolute position, keeping the yaw
    Place(Vector3<f32>),
    Replace(RigTransform),
}

impl RigWrite {
    /// Apply the write. Writes carrying non-finite values are dropped and
    /// `false` is returned.
    pub fn apply(self, rig: &mut RigTransform) -> bool {
        match self {
            RigWrite::Translate(offset) => {
                if !is_finite(offset) {
                    return false;
                }
                rig.position += offset;
            }
            RigWrite::Rotate(delta) => {
                if !delta.is_finite() {
                    return false;
                }
                rig.yaw += delta;
            }
            RigWrite::Place(position) => {
                if !is_finite(position) {
                    return false;
                }
                rig.position = position;
            }
            RigWrite::Replace(transform) => {
                if !is_finite(transform.position) || !transform.yaw.is_finite() {
                    return false;
                }
                *rig = transform;
            }
        }
        true
    }
}

fn is_finite(v: Vector3<f32>) -> bool {
    v.x.is_finite() && v.y.is_finite() && v.z.is_finite()
}
