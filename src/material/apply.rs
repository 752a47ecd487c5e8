//! Tree-wide material application.

use crate::scene::{NodeContent, SceneGraph, SceneNodeId};

use super::{MaterialSpec, StandardMaterial};

/// Replace the material of every mesh under `root` with one built from `spec`,
/// and mark those meshes as shadow casters and receivers.
///
/// Returns the number of meshes updated. Applying the same spec twice yields
/// identical material parameters.
pub fn apply_material(graph: &mut SceneGraph, root: SceneNodeId, spec: &MaterialSpec) -> usize {
    let mut updated = 0;
    graph.traverse_mut(root, |node| {
        if let NodeContent::Mesh(mesh) = &mut node.content {
            mesh.material = StandardMaterial::from_spec(spec);
            mesh.cast_shadow = true;
            mesh.receive_shadow = true;
            updated += 1;
        }
    });
    log::debug!("Applied material {:?} to {} meshes", spec, updated);
    updated
}
