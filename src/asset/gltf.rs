//! glTF 2.0 loader
//!
//! Loads `.gltf` and `.glb` using the `gltf` crate. Only geometry and the node
//! hierarchy are read; textures and file materials are skipped.

use std::path::Path;
use std::sync::Arc;

use glam::{Quat, Vec3};

use crate::core::{Error, Result};
use crate::scene::{LocalTransform, MeshGeometry, Vertex};

use super::loader::ModelLoader;
use super::tree::{ModelNode, ModelTree};

/// glTF 2.0 loader
pub struct GltfLoader;

impl GltfLoader {
    pub fn new() -> Self {
        Self
    }

    fn build_tree(
        name: &str,
        document: &gltf::Document,
        buffers: &[gltf::buffer::Data],
    ) -> Result<ModelTree> {
        let scene = document
            .default_scene()
            .or_else(|| document.scenes().next())
            .ok_or_else(|| Error::Load(format!("{}: glTF has no scene", name)))?;

        let mut tree = ModelTree::new(name);
        for node in scene.nodes() {
            let index = load_node(&node, buffers, &mut tree, 0);
            tree.roots.push(index);
        }
        Ok(tree)
    }
}

impl Default for GltfLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ModelLoader for GltfLoader {
    fn load_file(&self, path: &Path) -> Result<ModelTree> {
        let gltf = gltf::Gltf::open(path)
            .map_err(|e| Error::Load(format!("{}: {}", path.display(), e)))?;
        let base = path.parent().unwrap_or(Path::new("."));
        let buffers = gltf::import_buffers(&gltf.document, Some(base), gltf.blob.clone())
            .map_err(|e| Error::Load(format!("{}: {}", path.display(), e)))?;

        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("model");
        Self::build_tree(name, &gltf.document, &buffers)
    }

    fn load_bytes(&self, name: &str, bytes: &[u8]) -> Result<ModelTree> {
        let gltf = gltf::Gltf::from_slice(bytes)
            .map_err(|e| Error::Load(format!("{}: {}", name, e)))?;
        // Without a base directory only embedded and data-URI buffers resolve
        let buffers = gltf::import_buffers(&gltf.document, None, gltf.blob.clone())
            .map_err(|e| Error::Load(format!("{}: {}", name, e)))?;

        let stem = Path::new(name)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("model");
        Self::build_tree(stem, &gltf.document, &buffers)
    }

    fn name(&self) -> &'static str {
        "glTF 2.0 Loader"
    }
}

/// glTF forbids cycles, but a malformed file could still nest absurdly deep.
const MAX_DEPTH: usize = 128;

fn load_node(
    node: &gltf::Node,
    buffers: &[gltf::buffer::Data],
    tree: &mut ModelTree,
    depth: usize,
) -> usize {
    let (translation, rotation, scale) = node.transform().decomposed();
    let transform = LocalTransform::from_trs(
        Vec3::from_array(translation),
        Quat::from_array(rotation),
        Vec3::from_array(scale),
    );

    let meshes = node
        .mesh()
        .map(|mesh| {
            mesh.primitives()
                .filter_map(|p| load_primitive(&p, buffers))
                .map(Arc::new)
                .collect()
        })
        .unwrap_or_default();

    let index = tree.push(ModelNode {
        name: node
            .name()
            .map(str::to_string)
            .unwrap_or_else(|| format!("node{}", node.index())),
        transform,
        meshes,
        children: Vec::new(),
    });

    if depth < MAX_DEPTH {
        for child in node.children() {
            let child_index = load_node(&child, buffers, tree, depth + 1);
            tree.nodes[index].children.push(child_index);
        }
    } else {
        log::warn!("glTF node hierarchy deeper than {}; truncating", MAX_DEPTH);
    }

    index
}

/// Read one triangle-list primitive; other topologies are skipped.
fn load_primitive(primitive: &gltf::Primitive, buffers: &[gltf::buffer::Data]) -> Option<MeshGeometry> {
    if primitive.mode() != gltf::mesh::Mode::Triangles {
        log::debug!("Skipping non-triangle primitive ({:?})", primitive.mode());
        return None;
    }

    let reader = primitive.reader(|buffer| buffers.get(buffer.index()).map(|data| data.0.as_slice()));

    let positions: Vec<[f32; 3]> = reader.read_positions()?.collect();
    if positions.is_empty() {
        return None;
    }

    let normals: Option<Vec<[f32; 3]>> = reader
        .read_normals()
        .map(|n| n.collect::<Vec<_>>())
        .filter(|n| n.len() == positions.len());
    let has_normals = normals.is_some();

    let vertices = match normals {
        Some(normals) => positions
            .iter()
            .zip(normals)
            .map(|(p, n)| Vertex { position: *p, normal: n })
            .collect(),
        None => positions
            .iter()
            .map(|p| Vertex { position: *p, normal: [0.0; 3] })
            .collect(),
    };

    let indices = match reader.read_indices() {
        Some(indices) => indices.into_u32().collect(),
        None => (0..positions.len() as u32).collect(),
    };

    let mut geometry = MeshGeometry::new(vertices, indices);
    if !has_normals {
        geometry.compute_normals();
    }
    Some(geometry)
}
