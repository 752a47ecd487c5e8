//! Material panel.

use crate::core::Result;
use crate::material::{HexColor, MaterialSpec};

use super::clamp_or;

/// Swatches offered under the base color picker.
pub const PRESET_COLORS: [HexColor; 12] = [
    HexColor::rgb(0xff, 0xff, 0xff),
    HexColor::rgb(0xff, 0x00, 0x00),
    HexColor::rgb(0x00, 0xff, 0x00),
    HexColor::rgb(0x00, 0x00, 0xff),
    HexColor::rgb(0xff, 0xff, 0x00),
    HexColor::rgb(0xff, 0x00, 0xff),
    HexColor::rgb(0x00, 0xff, 0xff),
    HexColor::rgb(0xff, 0xa5, 0x00),
    HexColor::rgb(0x80, 0x00, 0x80),
    HexColor::rgb(0xff, 0xc0, 0xcb),
    HexColor::rgb(0xa5, 0x2a, 0x2a),
    HexColor::rgb(0x80, 0x80, 0x80),
];

/// Set the base color from a hex string (`#rgb` or `#rrggbb`).
pub fn set_color(mut spec: MaterialSpec, hex: &str) -> Result<MaterialSpec> {
    spec.color = HexColor::parse(hex)?;
    Ok(spec)
}

pub fn set_emissive(mut spec: MaterialSpec, hex: &str) -> Result<MaterialSpec> {
    spec.emissive = HexColor::parse(hex)?;
    Ok(spec)
}

/// Pick a swatch by index; out-of-range indices keep the current color.
pub fn set_preset_color(mut spec: MaterialSpec, index: usize) -> MaterialSpec {
    if let Some(color) = PRESET_COLORS.get(index) {
        spec.color = *color;
    }
    spec
}

pub fn set_roughness(mut spec: MaterialSpec, roughness: f32) -> MaterialSpec {
    spec.roughness = clamp_or(roughness, 0.0, 1.0, spec.roughness);
    spec
}

pub fn set_metalness(mut spec: MaterialSpec, metalness: f32) -> MaterialSpec {
    spec.metalness = clamp_or(metalness, 0.0, 1.0, spec.metalness);
    spec
}
