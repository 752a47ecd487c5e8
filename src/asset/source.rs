//! Where a model comes from: a file on disk or an uploaded buffer.

use std::path::PathBuf;
use std::sync::Arc;

use crate::core::{Error, Result};

use super::format::ModelFormat;

/// Source identifier handed to the loader.
#[derive(Clone, Debug)]
pub enum ModelSource {
    File(PathBuf),
    /// Uploaded bytes; `name` carries the original file name for format detection.
    Memory { name: String, bytes: Arc<[u8]> },
}

impl ModelSource {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        ModelSource::File(path.into())
    }

    pub fn memory(name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        ModelSource::Memory {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    /// File name without directories.
    pub fn file_name(&self) -> String {
        match self {
            ModelSource::File(path) => path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string()),
            ModelSource::Memory { name, .. } => name.clone(),
        }
    }

    pub fn format(&self) -> Result<ModelFormat> {
        match self {
            ModelSource::File(path) => ModelFormat::from_path(path),
            ModelSource::Memory { name, .. } => ModelFormat::from_path(name),
        }
    }

    /// Size in bytes. Reads file metadata for on-disk sources.
    pub fn size(&self) -> Result<u64> {
        match self {
            ModelSource::File(path) => Ok(std::fs::metadata(path)?.len()),
            ModelSource::Memory { bytes, .. } => Ok(bytes.len() as u64),
        }
    }

    /// Reject sources larger than `limit` bytes.
    pub fn check_size(&self, limit: u64) -> Result<()> {
        let size = self.size()?;
        if size > limit {
            return Err(Error::FileTooLarge { size, limit });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_source_metadata() {
        let source = ModelSource::memory("chair.OBJ", vec![0u8; 16]);
        assert_eq!(source.file_name(), "chair.OBJ");
        assert_eq!(source.format().unwrap(), ModelFormat::Obj);
        assert_eq!(source.size().unwrap(), 16);
    }

    #[test]
    fn test_size_limit() {
        let source = ModelSource::memory("big.glb", vec![0u8; 101]);
        assert!(source.check_size(101).is_ok());
        assert!(matches!(
            source.check_size(100),
            Err(Error::FileTooLarge { size: 101, limit: 100 })
        ));
    }

    #[test]
    fn test_file_source_name() {
        let source = ModelSource::file("/tmp/assets/robot.gltf");
        assert_eq!(source.file_name(), "robot.gltf");
        assert_eq!(source.format().unwrap(), ModelFormat::Gltf);
    }

    #[test]
    fn test_missing_file_size_is_io_error() {
        let source = ModelSource::file("/definitely/not/here.glb");
        assert!(matches!(source.size(), Err(Error::Io(_))));
    }
}
