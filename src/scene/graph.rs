//! Scene graph: CPU-side hierarchy of nodes.
//!
//! The evaluator and the material pass mutate nodes in place. Each frame,
//! `flatten()` propagates world transforms and produces a flat list of
//! `RenderItem`s for the renderer.

use std::collections::HashMap;

use glam::Mat4;

use super::flatten::RenderItem;
use super::node::{LocalTransform, NodeContent, SceneNode, SceneNodeId};

/// CPU-side scene graph owned by the editing session.
pub struct SceneGraph {
    nodes: HashMap<SceneNodeId, SceneNode>,
    root: SceneNodeId,
    next_id: u64,
    dirty: bool,
}

impl SceneGraph {
    /// Create a new scene graph with a root Group node.
    pub fn new() -> Self {
        let root_id = SceneNodeId(0);
        let root_node = SceneNode::new(root_id, "root", NodeContent::Group);

        let mut nodes = HashMap::new();
        nodes.insert(root_id, root_node);

        Self {
            nodes,
            root: root_id,
            next_id: 1,
            dirty: true,
        }
    }

    /// Get the root node ID.
    pub fn root(&self) -> SceneNodeId {
        self.root
    }

    fn alloc_id(&mut self) -> SceneNodeId {
        let id = SceneNodeId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Add a child node under `parent`. Returns the new node's ID.
    pub fn add_child(
        &mut self,
        parent: SceneNodeId,
        name: impl Into<String>,
        content: NodeContent,
    ) -> SceneNodeId {
        let id = self.alloc_id();
        let mut node = SceneNode::new(id, name, content);
        node.parent = Some(parent);

        self.nodes.insert(id, node);

        if let Some(parent_node) = self.nodes.get_mut(&parent) {
            parent_node.children.push(id);
        }

        self.dirty = true;
        id
    }

    /// Remove a node and its entire subtree. Cannot remove the root.
    pub fn remove(&mut self, id: SceneNodeId) {
        if id == self.root {
            return;
        }

        let to_remove = self.subtree(id);

        // Detach from parent
        if let Some(parent_id) = self.nodes.get(&id).and_then(|n| n.parent) {
            if let Some(parent) = self.nodes.get_mut(&parent_id) {
                parent.children.retain(|c| *c != id);
            }
        }

        for nid in to_remove {
            self.nodes.remove(&nid);
        }

        self.dirty = true;
    }

    /// IDs of `id` and all of its descendants, breadth first.
    pub fn subtree(&self, id: SceneNodeId) -> Vec<SceneNodeId> {
        if !self.nodes.contains_key(&id) {
            return Vec::new();
        }
        let mut out = vec![id];
        let mut i = 0;
        while i < out.len() {
            if let Some(node) = self.nodes.get(&out[i]) {
                out.extend_from_slice(&node.children);
            }
            i += 1;
        }
        out
    }

    /// Set the local transform of a node.
    pub fn set_transform(&mut self, id: SceneNodeId, transform: LocalTransform) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.local_transform = transform;
            self.dirty = true;
        }
    }

    /// Set the visibility of a node.
    pub fn set_visible(&mut self, id: SceneNodeId, visible: bool) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.visible = visible;
            self.dirty = true;
        }
    }

    /// Get an immutable reference to a node.
    pub fn get(&self, id: SceneNodeId) -> Option<&SceneNode> {
        self.nodes.get(&id)
    }

    /// Get a mutable reference to a node.
    pub fn get_mut(&mut self, id: SceneNodeId) -> Option<&mut SceneNode> {
        self.dirty = true;
        self.nodes.get_mut(&id)
    }

    /// Iterate over the children of a node.
    pub fn children(&self, id: SceneNodeId) -> impl Iterator<Item = SceneNodeId> + '_ {
        self.nodes
            .get(&id)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
            .iter()
            .copied()
    }

    /// Visit every node in the subtree rooted at `id` mutably, parents before children.
    pub fn traverse_mut(&mut self, id: SceneNodeId, mut visit: impl FnMut(&mut SceneNode)) {
        for nid in self.subtree(id) {
            if let Some(node) = self.nodes.get_mut(&nid) {
                visit(node);
            }
        }
        self.dirty = true;
    }

    /// Total number of nodes in the graph.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Whether any node changed since the last `flatten()`.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Recompute cached world transforms for the whole tree.
    pub fn update_world_transforms(&mut self) {
        self.propagate_transforms(self.root, Mat4::IDENTITY);
    }

    /// Walk the tree, propagate transforms, and collect all visible meshes.
    pub fn flatten(&mut self) -> Vec<RenderItem> {
        self.update_world_transforms();

        let mut out = Vec::new();
        self.collect_visible(self.root, &mut out);
        self.dirty = false;
        out
    }

    fn propagate_transforms(&mut self, node_id: SceneNodeId, parent_world: Mat4) {
        let (local_mat, children) = {
            let node = match self.nodes.get(&node_id) {
                Some(n) => n,
                None => return,
            };
            (node.local_transform.to_mat4(), node.children.clone())
        };

        let world = parent_world * local_mat;

        if let Some(node) = self.nodes.get_mut(&node_id) {
            node.world_transform = world;
        }

        for child_id in children {
            self.propagate_transforms(child_id, world);
        }
    }

    fn collect_visible(&self, node_id: SceneNodeId, out: &mut Vec<RenderItem>) {
        let node = match self.nodes.get(&node_id) {
            Some(n) => n,
            None => return,
        };

        // Hidden nodes hide their whole subtree
        if !node.visible {
            return;
        }

        if let NodeContent::Mesh(mesh) = &node.content {
            out.push(RenderItem {
                node: node.id,
                world_transform: node.world_transform,
                geometry: mesh.geometry.clone(),
                material: mesh.material.clone(),
                cast_shadow: mesh.cast_shadow,
                receive_shadow: mesh.receive_shadow,
            });
        }

        for &child_id in &node.children {
            self.collect_visible(child_id, out);
        }
    }
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use glam::Vec3;

    use crate::scene::mesh::MeshGeometry;
    use crate::scene::node::MeshContent;

    fn cube() -> NodeContent {
        NodeContent::Mesh(MeshContent::new(Arc::new(MeshGeometry::unit_cube())))
    }

    #[test]
    fn test_new_scene_graph() {
        let graph = SceneGraph::new();
        assert_eq!(graph.node_count(), 1);
        assert_eq!(graph.get(graph.root()).unwrap().name, "root");
    }

    #[test]
    fn test_add_child() {
        let mut graph = SceneGraph::new();
        let root = graph.root();

        let child = graph.add_child(root, "model", NodeContent::Group);

        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.get(child).unwrap().parent, Some(root));
        assert!(graph.children(root).any(|c| c == child));
    }

    #[test]
    fn test_remove_subtree() {
        let mut graph = SceneGraph::new();
        let root = graph.root();
        let parent = graph.add_child(root, "parent", NodeContent::Group);
        let child1 = graph.add_child(parent, "c1", cube());
        let child2 = graph.add_child(parent, "c2", NodeContent::Group);
        let _grandchild = graph.add_child(child1, "gc", cube());

        assert_eq!(graph.node_count(), 5);

        graph.remove(parent);

        assert_eq!(graph.node_count(), 1);
        assert!(graph.get(child1).is_none());
        assert!(graph.get(child2).is_none());
        assert_eq!(graph.children(root).count(), 0);
    }

    #[test]
    fn test_cannot_remove_root() {
        let mut graph = SceneGraph::new();
        let root = graph.root();
        graph.remove(root);
        assert_eq!(graph.node_count(), 1);
    }

    #[test]
    fn test_subtree_order_is_parent_first() {
        let mut graph = SceneGraph::new();
        let a = graph.add_child(graph.root(), "a", NodeContent::Group);
        let b = graph.add_child(a, "b", NodeContent::Group);
        let c = graph.add_child(b, "c", cube());

        assert_eq!(graph.subtree(a), vec![a, b, c]);
        assert!(graph.subtree(SceneNodeId(999)).is_empty());
    }

    #[test]
    fn test_traverse_mut_visits_subtree_only() {
        let mut graph = SceneGraph::new();
        let a = graph.add_child(graph.root(), "a", NodeContent::Group);
        graph.add_child(a, "a1", cube());
        let b = graph.add_child(graph.root(), "b", cube());

        let mut seen = Vec::new();
        graph.traverse_mut(a, |node| seen.push(node.name.clone()));

        assert_eq!(seen, vec!["a".to_string(), "a1".to_string()]);
        assert!(graph.get(b).is_some());
    }

    #[test]
    fn test_flatten_empty_graph() {
        let mut graph = SceneGraph::new();
        assert!(graph.flatten().is_empty());
        assert!(!graph.is_dirty());
    }

    #[test]
    fn test_flatten_hidden_node_excluded() {
        let mut graph = SceneGraph::new();
        let group = graph.add_child(graph.root(), "group", NodeContent::Group);
        graph.add_child(group, "mesh", cube());

        graph.set_visible(group, false);
        assert!(graph.flatten().is_empty());

        graph.set_visible(group, true);
        assert_eq!(graph.flatten().len(), 1);
    }

    #[test]
    fn test_flatten_transform_propagation() {
        let mut graph = SceneGraph::new();
        let parent = graph.add_child(graph.root(), "parent", NodeContent::Group);
        graph.set_transform(parent, LocalTransform::from_position(Vec3::new(10.0, 0.0, 0.0)));

        let child = graph.add_child(parent, "cube", cube());
        graph.set_transform(child, LocalTransform::from_position(Vec3::new(5.0, 0.0, 0.0)));

        let items = graph.flatten();
        assert_eq!(items.len(), 1);
        let origin = items[0].world_transform.transform_point3(Vec3::ZERO);
        assert!((origin - Vec3::new(15.0, 0.0, 0.0)).length() < 1e-4);
    }

    #[test]
    fn test_parent_scale_applies_to_children() {
        let mut graph = SceneGraph::new();
        let parent = graph.add_child(graph.root(), "parent", NodeContent::Group);
        graph.set_transform(
            parent,
            LocalTransform {
                scale: Vec3::splat(2.0),
                ..Default::default()
            },
        );
        let child = graph.add_child(parent, "cube", cube());
        graph.set_transform(child, LocalTransform::from_position(Vec3::new(1.0, 0.0, 0.0)));

        graph.update_world_transforms();
        let world = graph.get(child).unwrap().world_transform;
        assert!((world.transform_point3(Vec3::ZERO) - Vec3::new(2.0, 0.0, 0.0)).length() < 1e-5);
    }
}
