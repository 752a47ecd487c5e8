//! Per-frame transform and animation evaluation.
//!
//! Each tick the evaluator re-asserts the user's pose on the target node and
//! layers the enabled animations on top, always in the same order:
//!
//! 1. pose (position, rotation, scale)
//! 2. rotate: yaw accumulator, `+0.01 * speed` per tick (f64, written modulo 2π)
//! 3. bounce: `y = base_y + sin(t * 2 * speed) * 0.5`
//! 4. hover: `y = base_y + sin(t * 3 * speed) * 0.2`, `rot.x = sin(t * 2 * speed) * 0.1`
//!
//! Bounce and hover both write Y; hover runs last and wins.

use std::f64::consts::TAU;

use crate::scene::{LocalTransform, SceneGraph, SceneNodeId};

use super::{AnimationState, Pose};

/// Yaw added per tick at speed 1.0 (radians).
pub const SPIN_STEP: f32 = 0.01;

/// Angular frequency multiplier of the bounce animation.
pub const BOUNCE_FREQUENCY: f32 = 2.0;
/// Peak vertical offset of the bounce animation (world units).
pub const BOUNCE_AMPLITUDE: f32 = 0.5;

/// Angular frequency multiplier of the hover float.
pub const HOVER_FREQUENCY: f32 = 3.0;
/// Peak vertical offset of the hover float (world units).
pub const HOVER_AMPLITUDE: f32 = 0.2;
/// Angular frequency multiplier of the hover tilt.
pub const HOVER_TILT_FREQUENCY: f32 = 2.0;
/// Peak X-axis tilt of the hover animation (radians).
pub const HOVER_TILT_AMPLITUDE: f32 = 0.1;

/// Computes the animated pose of one node per scheduler tick.
///
/// The evaluator holds only its own animation state (the vertical anchor and
/// the yaw accumulator); the node tree is borrowed for the duration of a call.
#[derive(Clone, Debug)]
pub struct TransformEvaluator {
    /// Anchor that bounce and hover oscillate around.
    base_y: f32,
    /// Pose Y the anchor was captured from.
    anchor_source: f32,
    /// Unwrapped yaw from the rotate animation. The node receives it wrapped to [0, 2π).
    spin: f64,
}

impl TransformEvaluator {
    pub fn new(pose: &Pose) -> Self {
        Self {
            base_y: pose.position.y,
            anchor_source: pose.position.y,
            spin: 0.0,
        }
    }

    pub fn base_y(&self) -> f32 {
        self.base_y
    }

    /// Yaw accumulated so far by the rotate animation, unwrapped.
    pub fn spin(&self) -> f64 {
        self.spin
    }

    /// Re-anchor bounce/hover when the pose's vertical position has moved.
    pub fn recapture(&mut self, pose: &Pose) {
        let y = pose.position.y;
        if y.to_bits() != self.anchor_source.to_bits() {
            log::trace!("Re-anchoring vertical animation: {} -> {}", self.base_y, y);
            self.base_y = y;
            self.anchor_source = y;
        }
    }

    /// Drop accumulated animation state and anchor to `pose`.
    pub fn reset(&mut self, pose: &Pose) {
        *self = Self::new(pose);
    }

    /// Compute the transform for time `t` and advance the yaw accumulator by one tick.
    pub fn step(&mut self, pose: &Pose, animation: &AnimationState, t: f32) -> LocalTransform {
        self.recapture(pose);

        let speed = animation.speed;
        let mut transform = pose.to_transform();

        if animation.rotate {
            self.spin += SPIN_STEP as f64 * speed as f64;
            transform.rotation.y += self.spin.rem_euclid(TAU) as f32;
        } else {
            self.spin = 0.0;
        }

        if animation.bounce {
            transform.position.y =
                self.base_y + (t * BOUNCE_FREQUENCY * speed).sin() * BOUNCE_AMPLITUDE;
        }

        if animation.hover {
            transform.position.y =
                self.base_y + (t * HOVER_FREQUENCY * speed).sin() * HOVER_AMPLITUDE;
            transform.rotation.x =
                (t * HOVER_TILT_FREQUENCY * speed).sin() * HOVER_TILT_AMPLITUDE;
        }

        transform
    }

    /// Evaluate one tick against `target`.
    ///
    /// With `enabled == false` the node keeps whatever transform it last had.
    /// A missing target is a silent no-op. Returns whether the node was written.
    pub fn evaluate(
        &mut self,
        graph: &mut SceneGraph,
        target: SceneNodeId,
        pose: &Pose,
        animation: &AnimationState,
        t: f32,
        enabled: bool,
    ) -> bool {
        self.recapture(pose);

        if !enabled || graph.get(target).is_none() {
            return false;
        }

        let transform = self.step(pose, animation, t);
        graph.set_transform(target, transform);
        true
    }
}

impl Default for TransformEvaluator {
    fn default() -> Self {
        Self::new(&Pose::default())
    }
}
