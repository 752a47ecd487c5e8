//! Viewer configuration

use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::core::Result;
use crate::material::HexColor;

/// Directional light as edited in the lighting panel.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LightingSettings {
    /// Intensity multiplier (0.0-3.0)
    pub intensity: f32,
    pub color: HexColor,
    /// World position the light shines from (each axis -20..20)
    pub position: Vec3,
}

impl Default for LightingSettings {
    fn default() -> Self {
        Self {
            intensity: 1.0,
            color: HexColor::WHITE,
            position: Vec3::new(10.0, 10.0, 5.0),
        }
    }
}

/// Viewport camera and orbit limits.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CameraConfig {
    pub position: Vec3,
    /// Vertical field of view in degrees
    pub fov_degrees: f32,
    pub min_distance: f32,
    pub max_distance: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: Vec3::new(5.0, 5.0, 5.0),
            fov_degrees: 50.0,
            min_distance: 2.0,
            max_distance: 50.0,
        }
    }
}

/// Configuration for an editing session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub camera: CameraConfig,
    /// Ambient fill light intensity
    pub ambient_intensity: f32,
    /// Initial directional light
    pub lighting: LightingSettings,
    /// Ground grid cell size in world units
    pub grid_cell_size: f32,
    /// Largest accepted upload in bytes
    pub max_upload_bytes: u64,
    /// How many saved models the store keeps
    pub saved_model_limit: usize,
    /// Platform reduced-motion preference; seeds the animation flag when the store has none
    pub prefers_reduced_motion: bool,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            camera: CameraConfig::default(),
            ambient_intensity: 0.4,
            lighting: LightingSettings::default(),
            grid_cell_size: 1.0,
            max_upload_bytes: 50 * 1024 * 1024,
            saved_model_limit: 10,
            prefers_reduced_motion: false,
        }
    }
}

impl ViewerConfig {
    /// Load from a JSON file. Missing fields take their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    /// Write as pretty JSON, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}
