//! Detached node tree produced by a loader, grafted into the scene graph on completion.

use std::sync::Arc;

use crate::scene::{LocalTransform, MeshContent, MeshGeometry, NodeContent, SceneGraph, SceneNodeId};

/// One node of a loaded model.
#[derive(Clone, Debug, Default)]
pub struct ModelNode {
    pub name: String,
    pub transform: LocalTransform,
    /// Mesh primitives attached to this node
    pub meshes: Vec<Arc<MeshGeometry>>,
    /// Indices into `ModelTree::nodes`
    pub children: Vec<usize>,
}

/// A loaded model as a flat node list with root indices.
#[derive(Clone, Debug, Default)]
pub struct ModelTree {
    pub name: String,
    pub nodes: Vec<ModelNode>,
    pub roots: Vec<usize>,
}

impl ModelTree {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            nodes: Vec::new(),
            roots: Vec::new(),
        }
    }

    /// Unit cube shown while no model is loaded, or after a load failed.
    pub fn placeholder_cube() -> Self {
        let mut tree = Self::new("placeholder");
        let cube = tree.push(ModelNode {
            name: "cube".to_string(),
            meshes: vec![Arc::new(MeshGeometry::unit_cube())],
            ..Default::default()
        });
        tree.roots.push(cube);
        tree
    }

    /// Append a node and return its index.
    pub fn push(&mut self, node: ModelNode) -> usize {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    pub fn mesh_count(&self) -> usize {
        self.nodes.iter().map(|n| n.meshes.len()).sum()
    }

    pub fn triangle_count(&self) -> usize {
        self.nodes
            .iter()
            .flat_map(|n| n.meshes.iter())
            .map(|m| m.triangle_count())
            .sum()
    }

    /// Create scene nodes for this tree under `parent`.
    ///
    /// Returns the ID of a new group node named after the model that holds
    /// every root. A node with one primitive becomes a mesh node; a node with
    /// several gets one mesh child per primitive. Indices that repeat or point
    /// outside the node list are skipped.
    pub fn instantiate(&self, graph: &mut SceneGraph, parent: SceneNodeId) -> SceneNodeId {
        let group = graph.add_child(parent, self.name.clone(), NodeContent::Group);
        let mut visited = vec![false; self.nodes.len()];

        let mut stack: Vec<(usize, SceneNodeId)> =
            self.roots.iter().rev().map(|&root| (root, group)).collect();

        while let Some((index, scene_parent)) = stack.pop() {
            let Some(node) = self.nodes.get(index) else {
                log::warn!("Model '{}' references missing node {}", self.name, index);
                continue;
            };
            if std::mem::replace(&mut visited[index], true) {
                continue;
            }

            let content = match node.meshes.as_slice() {
                [single] => NodeContent::Mesh(MeshContent::new(single.clone())),
                _ => NodeContent::Group,
            };
            let id = graph.add_child(scene_parent, node.name.clone(), content);
            graph.set_transform(id, node.transform);

            if node.meshes.len() > 1 {
                for (i, mesh) in node.meshes.iter().enumerate() {
                    graph.add_child(
                        id,
                        format!("{}#{}", node.name, i),
                        NodeContent::Mesh(MeshContent::new(mesh.clone())),
                    );
                }
            }

            for &child in node.children.iter().rev() {
                stack.push((child, id));
            }
        }

        group
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn test_placeholder_cube() {
        let tree = ModelTree::placeholder_cube();
        assert_eq!(tree.mesh_count(), 1);
        assert_eq!(tree.triangle_count(), 12);

        let mut graph = SceneGraph::new();
        let scene_root = graph.root();
        let group = tree.instantiate(&mut graph, scene_root);
        let items = graph.flatten();
        assert_eq!(items.len(), 1);
        assert_eq!(graph.get(group).unwrap().name, "placeholder");
    }

    #[test]
    fn test_instantiate_hierarchy_and_transforms() {
        let mesh = Arc::new(MeshGeometry::unit_cube());
        let mut tree = ModelTree::new("robot");
        let arm = tree.push(ModelNode {
            name: "arm".into(),
            transform: LocalTransform::from_position(Vec3::new(0.0, 1.0, 0.0)),
            meshes: vec![mesh.clone()],
            ..Default::default()
        });
        let body = tree.push(ModelNode {
            name: "body".into(),
            transform: LocalTransform::from_position(Vec3::new(2.0, 0.0, 0.0)),
            meshes: vec![mesh.clone(), mesh],
            children: vec![arm],
        });
        tree.roots.push(body);

        let mut graph = SceneGraph::new();
        let scene_root = graph.root();
        let group = tree.instantiate(&mut graph, scene_root);

        // group + body + 2 primitives + arm
        assert_eq!(graph.subtree(group).len(), 5);
        let items = graph.flatten();
        assert_eq!(items.len(), 3);

        let arm_item = items
            .iter()
            .find(|i| graph.get(i.node).unwrap().name == "arm")
            .unwrap();
        assert!((arm_item.world_origin() - Vec3::new(2.0, 1.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_instantiate_skips_bad_and_repeated_indices() {
        let mut tree = ModelTree::new("broken");
        let a = tree.push(ModelNode {
            name: "a".into(),
            children: vec![0, 99],
            ..Default::default()
        });
        tree.roots.extend([a, a]);

        let mut graph = SceneGraph::new();
        let scene_root = graph.root();
        let group = tree.instantiate(&mut graph, scene_root);
        assert_eq!(graph.subtree(group).len(), 2);
    }
}
