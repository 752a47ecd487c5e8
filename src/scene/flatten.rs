//! Flattened scene graph output for the renderer.
//!
//! `RenderItem` is the result of walking the scene graph: one entry per visible
//! mesh, with its world transform already resolved.

use std::sync::Arc;

use glam::Mat4;

use crate::material::StandardMaterial;

use super::mesh::MeshGeometry;
use super::node::SceneNodeId;

/// One entry in the flattened visible set.
#[derive(Clone, Debug)]
pub struct RenderItem {
    /// Node the mesh came from.
    pub node: SceneNodeId,
    /// Model-to-world matrix after propagation.
    pub world_transform: Mat4,
    pub geometry: Arc<MeshGeometry>,
    pub material: StandardMaterial,
    pub cast_shadow: bool,
    pub receive_shadow: bool,
}

impl RenderItem {
    /// World-space position of the mesh origin.
    pub fn world_origin(&self) -> glam::Vec3 {
        self.world_transform.transform_point3(glam::Vec3::ZERO)
    }
}
