//! Supported model formats, keyed by file extension.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::{Error, Result};

/// The closed set of model formats the uploader accepts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelFormat {
    /// glTF 2.0 JSON with external or embedded buffers
    Gltf,
    /// Binary glTF container
    Glb,
    /// Wavefront OBJ
    Obj,
    /// Autodesk FBX
    Fbx,
}

/// Extension → format table. Lookups are case-insensitive.
const EXTENSIONS: &[(&str, ModelFormat)] = &[
    ("gltf", ModelFormat::Gltf),
    ("glb", ModelFormat::Glb),
    ("obj", ModelFormat::Obj),
    ("fbx", ModelFormat::Fbx),
];

impl ModelFormat {
    pub const ALL: [ModelFormat; 4] = [
        ModelFormat::Gltf,
        ModelFormat::Glb,
        ModelFormat::Obj,
        ModelFormat::Fbx,
    ];

    /// Look up a format by extension, with or without the leading dot.
    pub fn from_extension(ext: &str) -> Result<Self> {
        let ext = ext.trim_start_matches('.');
        EXTENSIONS
            .iter()
            .find(|(e, _)| e.eq_ignore_ascii_case(ext))
            .map(|(_, format)| *format)
            .ok_or_else(|| Error::UnsupportedFormat(ext.to_string()))
    }

    /// Format of a path or file name, from its last extension.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| Error::UnsupportedFormat(path.display().to_string()))?;
        Self::from_extension(ext)
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ModelFormat::Gltf => "gltf",
            ModelFormat::Glb => "glb",
            ModelFormat::Obj => "obj",
            ModelFormat::Fbx => "fbx",
        }
    }

    /// MIME type advertised to the upload picker.
    pub fn mime_type(&self) -> &'static str {
        match self {
            ModelFormat::Gltf => "model/gltf+json",
            ModelFormat::Glb => "model/gltf-binary",
            ModelFormat::Obj | ModelFormat::Fbx => "application/octet-stream",
        }
    }
}

impl fmt::Display for ModelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}
