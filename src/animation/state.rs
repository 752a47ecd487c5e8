//! Animation toggles and speed.

use serde::{Deserialize, Serialize};

/// Slowest speed multiplier the animation panel offers.
pub const MIN_SPEED: f32 = 0.1;
/// Fastest speed multiplier the animation panel offers.
pub const MAX_SPEED: f32 = 3.0;

/// Independent animation toggles sharing one speed multiplier.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnimationState {
    /// Continuous spin around the Y axis
    pub rotate: bool,
    /// Vertical bouncing motion
    pub bounce: bool,
    /// Gentle floating motion with a slight tilt
    pub hover: bool,
    pub speed: f32,
}

impl Default for AnimationState {
    fn default() -> Self {
        Self {
            rotate: false,
            bounce: false,
            hover: false,
            speed: 1.0,
        }
    }
}

impl AnimationState {
    pub fn any_active(&self) -> bool {
        self.rotate || self.bounce || self.hover
    }

    /// Copy with speed clamped to the supported range.
    pub fn clamped(mut self) -> Self {
        self.speed = clamp_speed(self.speed);
        self
    }

    /// Human-readable list of active animations.
    pub fn summary(&self) -> Vec<&'static str> {
        let mut out = Vec::new();
        if self.rotate {
            out.push("Continuous rotation");
        }
        if self.bounce {
            out.push("Bouncing motion");
        }
        if self.hover {
            out.push("Floating effect");
        }
        if out.is_empty() {
            out.push("No animations active");
        }
        out
    }
}

pub fn clamp_speed(speed: f32) -> f32 {
    if speed.is_nan() {
        1.0
    } else {
        speed.clamp(MIN_SPEED, MAX_SPEED)
    }
}
