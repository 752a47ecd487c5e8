//! Object pose and procedural animation

pub mod evaluator;
pub mod pose;
pub mod state;

pub use evaluator::TransformEvaluator;
pub use pose::{Pose, MAX_SCALE, MIN_SCALE};
pub use state::{AnimationState, MAX_SPEED, MIN_SPEED};
