//! Lighting panel: the directional light.

use crate::core::Result;
use crate::material::HexColor;
use crate::scene::LightingSettings;

use super::{Axis, clamp_or, parse_number};

pub const INTENSITY_RANGE: (f32, f32) = (0.0, 3.0);
/// Range for each axis of the light position.
pub const POSITION_RANGE: (f32, f32) = (-20.0, 20.0);

/// Warm, cool and tinted whites.
pub const PRESET_COLORS: [HexColor; 8] = [
    HexColor::rgb(0xff, 0xff, 0xff),
    HexColor::rgb(0xff, 0xf4, 0xe6),
    HexColor::rgb(0xe6, 0xf3, 0xff),
    HexColor::rgb(0xff, 0xe6, 0xe6),
    HexColor::rgb(0xe6, 0xff, 0xe6),
    HexColor::rgb(0xf3, 0xe6, 0xff),
    HexColor::rgb(0xff, 0xff, 0xe6),
    HexColor::rgb(0xe6, 0xff, 0xff),
];

pub fn set_intensity(mut light: LightingSettings, intensity: f32) -> LightingSettings {
    light.intensity = clamp_or(intensity, INTENSITY_RANGE.0, INTENSITY_RANGE.1, 0.0);
    light
}

/// Intensity typed into the number field; unparsable input becomes 0.
pub fn set_intensity_typed(light: LightingSettings, input: &str) -> LightingSettings {
    set_intensity(light, parse_number(input, 0.0))
}

pub fn set_color(mut light: LightingSettings, hex: &str) -> Result<LightingSettings> {
    light.color = HexColor::parse(hex)?;
    Ok(light)
}

pub fn set_preset_color(mut light: LightingSettings, index: usize) -> LightingSettings {
    if let Some(color) = PRESET_COLORS.get(index) {
        light.color = *color;
    }
    light
}

pub fn set_position(mut light: LightingSettings, axis: Axis, value: f32) -> LightingSettings {
    light.position[axis.index()] = clamp_or(value, POSITION_RANGE.0, POSITION_RANGE.1, 0.0);
    light
}

pub fn set_position_typed(light: LightingSettings, axis: Axis, input: &str) -> LightingSettings {
    set_position(light, axis, parse_number(input, 0.0))
}
