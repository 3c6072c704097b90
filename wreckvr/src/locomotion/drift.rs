use std::f32::consts::{PI, TAU};

use cgmath::Vector3;

use super::RigTransform;

/// Millimeter grid the rig position is snapped to
const POSITION_RESOLUTION: f32 = 1000.0;

/// Snap the rig position to millimeters and wrap the yaw into `(-π, π]`.
/// Applying it to its own output changes nothing.
pub fn correct_drift(rig: RigTransform) -> RigTransform {
    RigTransform {
        position: snap_position(rig.position),
        yaw: wrap_yaw(rig.yaw),
    }
}

fn snap_position(position: Vector3<f32>) -> Vector3<f32> {
    position.map(snap_to_millimeter)
}

fn snap_to_millimeter(value: f32) -> f32 {
    if !value.is_finite() {
        return value;
    }
    (value * POSITION_RESOLUTION).round() / POSITION_RESOLUTION
}

pub fn wrap_yaw(yaw: f32) -> f32 {
    if !yaw.is_finite() || (yaw > -PI && yaw <= PI) {
        return yaw;
    }
    let wrapped = (yaw + PI).rem_euclid(TAU) - PI;
    if wrapped <= -PI { PI } else { wrapped }
}
