//! Animation panel.

use serde::{Deserialize, Serialize};

use crate::animation::{AnimationState, state::clamp_speed};

/// One of the three procedural animations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimationKind {
    Rotate,
    Bounce,
    Hover,
}

pub fn set_enabled(mut state: AnimationState, kind: AnimationKind, enabled: bool) -> AnimationState {
    match kind {
        AnimationKind::Rotate => state.rotate = enabled,
        AnimationKind::Bounce => state.bounce = enabled,
        AnimationKind::Hover => state.hover = enabled,
    }
    state
}

pub fn toggle(state: AnimationState, kind: AnimationKind) -> AnimationState {
    let current = match kind {
        AnimationKind::Rotate => state.rotate,
        AnimationKind::Bounce => state.bounce,
        AnimationKind::Hover => state.hover,
    };
    set_enabled(state, kind, !current)
}

/// Speed slider, clamped to 0.1..=3.0.
pub fn set_speed(mut state: AnimationState, speed: f32) -> AnimationState {
    state.speed = clamp_speed(speed);
    state
}

/// Status line listing the active animations.
pub fn status_text(state: &AnimationState) -> String {
    state.summary().join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggles_are_independent() {
        let state = toggle(AnimationState::default(), AnimationKind::Bounce);
        let state = toggle(state, AnimationKind::Hover);
        assert!(!state.rotate && state.bounce && state.hover);

        let state = toggle(state, AnimationKind::Bounce);
        assert!(!state.bounce && state.hover);
    }

    #[test]
    fn test_speed_clamped() {
        assert_eq!(set_speed(AnimationState::default(), 10.0).speed, 3.0);
        assert_eq!(set_speed(AnimationState::default(), 0.0).speed, 0.1);
    }

    #[test]
    fn test_status_text() {
        assert_eq!(status_text(&AnimationState::default()), "No animations active");
        let state = set_enabled(AnimationState::default(), AnimationKind::Rotate, true);
        let state = set_enabled(state, AnimationKind::Hover, true);
        assert_eq!(status_text(&state), "Continuous rotation, Floating effect");
    }
}
