//! Static object pose as set through the transform panel.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::scene::LocalTransform;

/// Smallest scale the transform panel accepts on any axis.
pub const MIN_SCALE: f32 = 0.1;
/// Largest scale the transform panel accepts on any axis.
pub const MAX_SCALE: f32 = 5.0;

/// Position, Euler rotation (radians, XYZ order) and per-axis scale.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Default for Pose {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

impl Pose {
    pub fn identity() -> Self {
        Self::default()
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    pub fn with_rotation(mut self, rotation: Vec3) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// A zero or negative scale axis collapses the object.
    pub fn is_degenerate(&self) -> bool {
        self.scale.cmple(Vec3::ZERO).any()
    }

    pub fn to_transform(&self) -> LocalTransform {
        LocalTransform {
            position: self.position,
            rotation: self.rotation,
            scale: self.scale,
        }
    }
}

impl From<Pose> for LocalTransform {
    fn from(pose: Pose) -> Self {
        pose.to_transform()
    }
}
