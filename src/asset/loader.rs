//! Loader trait and format dispatch.

use std::path::Path;

use crate::core::{Error, Result};

use super::format::ModelFormat;
use super::gltf::GltfLoader;
use super::obj::ObjLoader;
use super::source::ModelSource;
use super::tree::ModelTree;

/// Decoder for one family of model formats.
pub trait ModelLoader: Send + Sync {
    /// Load a model from a file on disk.
    fn load_file(&self, path: &Path) -> Result<ModelTree>;

    /// Load a model from an in-memory buffer. `name` is used for the tree name.
    fn load_bytes(&self, name: &str, bytes: &[u8]) -> Result<ModelTree>;

    /// Loader name for logging
    fn name(&self) -> &'static str;

    fn load(&self, source: &ModelSource) -> Result<ModelTree> {
        match source {
            ModelSource::File(path) => self.load_file(path),
            ModelSource::Memory { name, bytes } => self.load_bytes(name, bytes),
        }
    }
}

/// Picks a loader by `ModelFormat` and enforces the upload size limit.
pub struct LoaderRegistry {
    gltf: GltfLoader,
    obj: ObjLoader,
    max_bytes: u64,
}

impl LoaderRegistry {
    pub fn new(max_bytes: u64) -> Self {
        Self {
            gltf: GltfLoader::new(),
            obj: ObjLoader::new(),
            max_bytes,
        }
    }

    /// Loader for `format`, or `None` when no decoder exists for it.
    pub fn loader_for(&self, format: ModelFormat) -> Option<&dyn ModelLoader> {
        match format {
            ModelFormat::Gltf | ModelFormat::Glb => Some(&self.gltf),
            ModelFormat::Obj => Some(&self.obj),
            ModelFormat::Fbx => None,
        }
    }

    pub fn max_bytes(&self) -> u64 {
        self.max_bytes
    }

    /// Detect the format, check the size limit, and decode. Blocking.
    pub fn load(&self, source: &ModelSource) -> Result<ModelTree> {
        let format = source.format()?;
        let loader = self
            .loader_for(format)
            .ok_or_else(|| Error::Load(format!("no decoder available for .{} files", format)))?;

        source.check_size(self.max_bytes)?;

        log::info!("Loading '{}' with {}", source.file_name(), loader.name());
        let tree = loader.load(source)?;
        if tree.mesh_count() == 0 {
            return Err(Error::Load(format!("'{}' contains no geometry", source.file_name())));
        }

        log::info!(
            "Loaded '{}': {} nodes, {} meshes, {} triangles",
            tree.name,
            tree.nodes.len(),
            tree.mesh_count(),
            tree.triangle_count()
        );
        Ok(tree)
    }
}

impl Default for LoaderRegistry {
    fn default() -> Self {
        Self::new(crate::scene::ViewerConfig::default().max_upload_bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRIANGLE_OBJ: &str = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n";

    #[test]
    fn test_dispatch_table() {
        let registry = LoaderRegistry::default();
        assert_eq!(registry.loader_for(ModelFormat::Gltf).unwrap().name(), "glTF 2.0 Loader");
        assert_eq!(registry.loader_for(ModelFormat::Glb).unwrap().name(), "glTF 2.0 Loader");
        assert_eq!(registry.loader_for(ModelFormat::Obj).unwrap().name(), "Wavefront OBJ Loader");
        assert!(registry.loader_for(ModelFormat::Fbx).is_none());
    }

    #[test]
    fn test_fbx_is_a_load_error() {
        let registry = LoaderRegistry::default();
        let result = registry.load(&ModelSource::memory("car.fbx", vec![1u8, 2, 3]));
        assert!(matches!(result, Err(Error::Load(_))));
    }

    #[test]
    fn test_unsupported_extension() {
        let registry = LoaderRegistry::default();
        let result = registry.load(&ModelSource::memory("car.stl", vec![1u8]));
        assert!(matches!(result, Err(Error::UnsupportedFormat(_))));
    }

    #[test]
    fn test_size_limit_applies_before_decoding() {
        let registry = LoaderRegistry::new(8);
        let result = registry.load(&ModelSource::memory("tri.obj", TRIANGLE_OBJ.as_bytes().to_vec()));
        assert!(matches!(result, Err(Error::FileTooLarge { .. })));
    }

    #[test]
    fn test_loads_obj_from_memory() {
        let registry = LoaderRegistry::default();
        let tree = registry
            .load(&ModelSource::memory("tri.obj", TRIANGLE_OBJ.as_bytes().to_vec()))
            .expect("load failed");
        assert_eq!(tree.triangle_count(), 1);
    }

    #[test]
    fn test_empty_obj_is_rejected() {
        let registry = LoaderRegistry::default();
        let result = registry.load(&ModelSource::memory("empty.obj", b"# nothing\n".to_vec()));
        assert!(matches!(result, Err(Error::Load(_))));
    }
}
