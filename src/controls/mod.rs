//! Control-panel actions.
//!
//! Each panel function takes the current value and returns a full
//! replacement with out-of-range and unparsable input already resolved.
//! `ControlCommand` exposes the same actions as serializable data.

pub mod animation;
pub mod command;
pub mod lighting;
pub mod material;
pub mod transform;

use serde::{Deserialize, Serialize};

pub use command::{ControlCommand, ControlResponse, ResponseData};

/// World axis addressed by a per-axis control.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    pub fn index(&self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

/// Parse a typed number field. Empty, unparsable, non-finite and zero input
/// all yield `fallback`, matching how the panels treat a cleared field.
pub fn parse_number(input: &str, fallback: f32) -> f32 {
    match input.trim().parse::<f32>() {
        Ok(v) if v.is_finite() && v != 0.0 => v,
        _ => fallback,
    }
}

/// Clamp to `[min, max]`, mapping NaN to `fallback`.
pub(crate) fn clamp_or(value: f32, min: f32, max: f32, fallback: f32) -> f32 {
    if value.is_nan() { fallback } else { value.clamp(min, max) }
}
