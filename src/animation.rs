use crate::control_point::ControlPoint;
use crate::vector::VectorArithmetic;
use keyframe::{CanTween, EasingFunction};

/// Cubic smoothstep, `x² (3 - 2x)`.
///
/// Monotonic on `[0, 1]` with zero slope at both ends, so a transition starts
/// and stops at rest.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Smoothstep;

impl EasingFunction for Smoothstep {
    fn y(&self, x: f64) -> f64 {
        x * x * (3.0 - 2.0 * x)
    }
}

/// Evaluates [`Smoothstep`] at `progress`, clamped to `0.0..=1.0`.
pub fn smoothstep(progress: f64) -> f64 {
    Smoothstep.y(progress.clamp(0.0, 1.0))
}

impl CanTween for ControlPoint {
    fn ease(from: Self, to: Self, time: impl keyframe::num_traits::Float) -> Self {
        let t = time.to_f64().unwrap_or(0.0);
        from + (to - from).scaled(t)
    }
}
