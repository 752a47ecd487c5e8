//! Configuration export, saved models, and viewport snapshots.

use std::path::{Path, PathBuf};

use base64::Engine;
use chrono::{DateTime, Utc};
use glam::Vec3;
use image::{ExtendedColorType, ImageEncoder};
use serde::{Deserialize, Serialize};

use crate::animation::Pose;
use crate::core::{Error, Result};
use crate::material::{HexColor, MaterialSpec};

use super::storage::{self, KeyValueStore};

/// Format version written into every config export.
pub const EXPORT_VERSION: &str = "1.0";

/// Store key holding the saved-model list.
pub const SAVED_MODELS_KEY: &str = "savedModels";

/// JPEG quality used for snapshots.
const JPEG_QUALITY: u8 = 92;

/// Editable state of the current model, as exported.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelRecord {
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
    pub color: HexColor,
    pub roughness: f32,
    pub metalness: f32,
    pub emissive: HexColor,
    pub file_name: String,
}

impl ModelRecord {
    pub fn new(pose: &Pose, material: &MaterialSpec, file_name: impl Into<String>) -> Self {
        Self {
            position: pose.position,
            rotation: pose.rotation,
            scale: pose.scale,
            color: material.color,
            roughness: material.roughness,
            metalness: material.metalness,
            emissive: material.emissive,
            file_name: file_name.into(),
        }
    }

    pub fn pose(&self) -> Pose {
        Pose {
            position: self.position,
            rotation: self.rotation,
            scale: self.scale,
        }
    }

    pub fn material(&self) -> MaterialSpec {
        MaterialSpec {
            color: self.color,
            roughness: self.roughness,
            metalness: self.metalness,
            emissive: self.emissive,
        }
    }
}

/// Downloadable JSON configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConfigExport {
    pub model: ModelRecord,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl ConfigExport {
    pub fn new(model: ModelRecord, timestamp: DateTime<Utc>) -> Self {
        Self {
            model,
            timestamp,
            version: EXPORT_VERSION.to_string(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn file_name(&self) -> String {
        format!("3d-model-config-{}.json", self.timestamp.timestamp_millis())
    }

    /// Write into `dir` under `file_name()`. Returns the written path.
    pub fn write_to_dir(&self, dir: &Path) -> Result<PathBuf> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(self.file_name());
        std::fs::write(&path, self.to_json()?)?;
        log::info!("Exported configuration to {}", path.display());
        Ok(path)
    }
}

/// Entry of the saved-model list.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedModel {
    #[serde(flatten)]
    pub model: ModelRecord,
    pub saved_at: DateTime<Utc>,
}

/// Saved models currently in the store, oldest first.
pub fn saved_models(store: &dyn KeyValueStore) -> Result<Vec<SavedModel>> {
    Ok(storage::load_json(store, SAVED_MODELS_KEY)?.unwrap_or_default())
}

/// Append to the saved-model list, keeping only the newest `limit` entries.
/// Returns the list length after saving.
pub fn save_model(
    store: &mut dyn KeyValueStore,
    model: ModelRecord,
    saved_at: DateTime<Utc>,
    limit: usize,
) -> Result<usize> {
    let mut saved = saved_models(store)?;
    saved.push(SavedModel { model, saved_at });
    if saved.len() > limit {
        saved.drain(..saved.len() - limit);
    }
    storage::save_json(store, SAVED_MODELS_KEY, &saved)?;
    Ok(saved.len())
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnapshotFormat {
    Png,
    #[serde(alias = "jpeg")]
    Jpg,
}

impl SnapshotFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            SnapshotFormat::Png => "png",
            SnapshotFormat::Jpg => "jpg",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            SnapshotFormat::Png => "image/png",
            SnapshotFormat::Jpg => "image/jpeg",
        }
    }
}

/// RGBA8 capture of the viewport.
#[derive(Clone, Debug)]
pub struct Snapshot {
    width: u32,
    height: u32,
    rgba: Vec<u8>,
}

impl Snapshot {
    pub fn new(width: u32, height: u32, rgba: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize * 4;
        if width == 0 || height == 0 || rgba.len() != expected {
            return Err(Error::Snapshot(format!(
                "buffer is {} bytes, expected {} for {}x{}",
                rgba.len(),
                expected,
                width,
                height
            )));
        }
        Ok(Self { width, height, rgba })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn encode(&self, format: SnapshotFormat) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        match format {
            SnapshotFormat::Png => {
                let encoder = image::codecs::png::PngEncoder::new(&mut out);
                encoder.write_image(&self.rgba, self.width, self.height, ExtendedColorType::Rgba8)?;
            }
            SnapshotFormat::Jpg => {
                // JPEG has no alpha channel
                let rgb: Vec<u8> = self
                    .rgba
                    .chunks_exact(4)
                    .flat_map(|px| [px[0], px[1], px[2]])
                    .collect();
                let encoder =
                    image::codecs::jpeg::JpegEncoder::new_with_quality(&mut out, JPEG_QUALITY);
                encoder.write_image(&rgb, self.width, self.height, ExtendedColorType::Rgb8)?;
            }
        }
        Ok(out)
    }

    /// Encoded image as a `data:` URL.
    pub fn to_data_url(&self, format: SnapshotFormat) -> Result<String> {
        let bytes = self.encode(format)?;
        Ok(format!(
            "data:{};base64,{}",
            format.mime_type(),
            base64::engine::general_purpose::STANDARD.encode(bytes)
        ))
    }

    pub fn file_name(format: SnapshotFormat, taken_at: DateTime<Utc>) -> String {
        format!("3d-model-{}.{}", taken_at.timestamp_millis(), format.extension())
    }
}
