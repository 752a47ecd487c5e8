//! Surface materials: the editable spec and the renderer-facing material built from it.

pub mod apply;
pub mod color;

use serde::{Deserialize, Serialize};

pub use apply::apply_material;
pub use color::HexColor;

/// Material parameters as edited in the material panel.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MaterialSpec {
    /// Base (albedo) color
    pub color: HexColor,
    /// 0 = mirror-like, 1 = fully diffuse
    pub roughness: f32,
    /// 0 = dielectric, 1 = pure metal
    pub metalness: f32,
    /// Glow added independent of lighting
    pub emissive: HexColor,
}

impl Default for MaterialSpec {
    fn default() -> Self {
        Self {
            color: HexColor::GRAY,
            roughness: 0.5,
            metalness: 0.5,
            emissive: HexColor::BLACK,
        }
    }
}

impl MaterialSpec {
    /// Copy with roughness and metalness clamped to [0, 1].
    pub fn clamped(mut self) -> Self {
        self.roughness = clamp_unit(self.roughness);
        self.metalness = clamp_unit(self.metalness);
        self
    }
}

fn clamp_unit(v: f32) -> f32 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }
}

/// Metallic-roughness PBR material in linear color space.
#[derive(Clone, Debug, PartialEq)]
pub struct StandardMaterial {
    pub base_color: [f32; 3],
    pub roughness: f32,
    pub metalness: f32,
    pub emissive: [f32; 3],
}

impl StandardMaterial {
    /// Build a fresh material from the editable spec.
    pub fn from_spec(spec: &MaterialSpec) -> Self {
        let spec = spec.clamped();
        Self {
            base_color: spec.color.to_linear(),
            roughness: spec.roughness,
            metalness: spec.metalness,
            emissive: spec.emissive.to_linear(),
        }
    }
}

impl Default for StandardMaterial {
    fn default() -> Self {
        Self {
            base_color: [1.0, 1.0, 1.0],
            roughness: 1.0,
            metalness: 0.0,
            emissive: [0.0, 0.0, 0.0],
        }
    }
}
