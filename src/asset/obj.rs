//! Wavefront OBJ loader
//!
//! Loads OBJ files using the `tobj` crate. Materials from MTL files are
//! ignored: the editor replaces every mesh material anyway.

use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;

use glam::Vec3;

use crate::core::{Error, Result};
use crate::scene::{MeshGeometry, Vertex};

use super::loader::ModelLoader;
use super::tree::{ModelNode, ModelTree};

/// Wavefront OBJ loader
pub struct ObjLoader {
    /// Whether to generate normals if missing
    pub generate_normals: bool,
}

impl ObjLoader {
    pub fn new() -> Self {
        Self {
            generate_normals: true,
        }
    }

    fn load_options() -> tobj::LoadOptions {
        tobj::LoadOptions {
            triangulate: true,
            single_index: true,
            ..Default::default()
        }
    }

    fn build_tree(&self, name: &str, models: Vec<tobj::Model>) -> ModelTree {
        let mut tree = ModelTree::new(name);
        for model in models {
            if let Some(mesh) = convert_mesh(&model.mesh, self.generate_normals) {
                let index = tree.push(ModelNode {
                    name: model.name,
                    meshes: vec![Arc::new(mesh)],
                    ..Default::default()
                });
                tree.roots.push(index);
            }
        }
        tree
    }
}

impl Default for ObjLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ModelLoader for ObjLoader {
    fn load_file(&self, path: &Path) -> Result<ModelTree> {
        let (models, _materials) = tobj::load_obj(path, &Self::load_options())
            .map_err(|e| Error::Load(format!("{}: {}", path.display(), e)))?;

        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("model");
        Ok(self.build_tree(name, models))
    }

    fn load_bytes(&self, name: &str, bytes: &[u8]) -> Result<ModelTree> {
        let mut reader = BufReader::new(bytes);
        let (models, _materials) = tobj::load_obj_buf(&mut reader, &Self::load_options(), |_| {
            Err(tobj::LoadError::OpenFileFailed)
        })
        .map_err(|e| Error::Load(format!("{}: {}", name, e)))?;

        let stem = Path::new(name)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("model");
        Ok(self.build_tree(stem, models))
    }

    fn name(&self) -> &'static str {
        "Wavefront OBJ Loader"
    }
}

/// Convert a tobj mesh; `None` when it has no positions.
fn convert_mesh(mesh: &tobj::Mesh, generate_normals: bool) -> Option<MeshGeometry> {
    if mesh.positions.is_empty() {
        return None;
    }

    let vertex_count = mesh.positions.len() / 3;
    let has_normals = mesh.normals.len() == mesh.positions.len();

    let vertices = (0..vertex_count)
        .map(|i| {
            let position = Vec3::new(
                mesh.positions[i * 3],
                mesh.positions[i * 3 + 1],
                mesh.positions[i * 3 + 2],
            );
            let normal = if has_normals {
                Vec3::new(mesh.normals[i * 3], mesh.normals[i * 3 + 1], mesh.normals[i * 3 + 2])
            } else {
                Vec3::ZERO
            };
            Vertex::new(position, normal)
        })
        .collect();

    let mut geometry = MeshGeometry::new(vertices, mesh.indices.clone());
    if generate_normals && !has_normals {
        geometry.compute_normals();
    }
    Some(geometry)
}
