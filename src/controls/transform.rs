//! Transform panel: position, rotation (degrees in the UI, radians in the pose), scale.

use glam::Vec3;

use crate::animation::{MAX_SCALE, MIN_SCALE, Pose};

use super::{Axis, clamp_or, parse_number};

/// Slider range for each position axis. Typed input is not clamped.
pub const POSITION_RANGE: (f32, f32) = (-10.0, 10.0);
/// Rotation range per axis in degrees.
pub const ROTATION_RANGE_DEGREES: (f32, f32) = (-180.0, 180.0);

/// Position slider moved.
pub fn set_position(pose: Pose, axis: Axis, value: f32) -> Pose {
    let value = clamp_or(value, POSITION_RANGE.0, POSITION_RANGE.1, 0.0);
    with_axis(pose, axis, |p| &mut p.position, value)
}

/// Position typed into the number field; unparsable input becomes 0.
pub fn set_position_typed(pose: Pose, axis: Axis, input: &str) -> Pose {
    with_axis(pose, axis, |p| &mut p.position, parse_number(input, 0.0))
}

/// Rotation slider moved, in degrees.
pub fn set_rotation_degrees(pose: Pose, axis: Axis, degrees: f32) -> Pose {
    let degrees = clamp_or(degrees, ROTATION_RANGE_DEGREES.0, ROTATION_RANGE_DEGREES.1, 0.0);
    with_axis(pose, axis, |p| &mut p.rotation, degrees.to_radians())
}

/// Rotation typed in whole degrees; fractions are truncated, unparsable input becomes 0.
pub fn set_rotation_typed(pose: Pose, axis: Axis, input: &str) -> Pose {
    set_rotation_degrees(pose, axis, parse_number(input, 0.0).trunc())
}

/// Rotation as shown in the panel: whole degrees.
pub fn rotation_degrees(pose: &Pose) -> Vec3 {
    Vec3::new(
        pose.rotation.x.to_degrees().round(),
        pose.rotation.y.to_degrees().round(),
        pose.rotation.z.to_degrees().round(),
    )
}

pub fn set_scale(pose: Pose, axis: Axis, value: f32) -> Pose {
    with_axis(pose, axis, |p| &mut p.scale, clamp_scale(value))
}

/// Scale typed into the number field; unparsable input becomes 1.
pub fn set_scale_typed(pose: Pose, axis: Axis, input: &str) -> Pose {
    set_scale(pose, axis, parse_number(input, 1.0))
}

/// Uniform scale slider: all three axes at once.
pub fn set_uniform_scale(mut pose: Pose, value: f32) -> Pose {
    pose.scale = Vec3::splat(clamp_scale(value));
    pose
}

pub fn set_uniform_scale_typed(pose: Pose, input: &str) -> Pose {
    set_uniform_scale(pose, parse_number(input, 1.0))
}

fn clamp_scale(value: f32) -> f32 {
    clamp_or(value, MIN_SCALE, MAX_SCALE, 1.0)
}

fn with_axis(mut pose: Pose, axis: Axis, field: impl Fn(&mut Pose) -> &mut Vec3, value: f32) -> Pose {
    field(&mut pose)[axis.index()] = value;
    pose
}
