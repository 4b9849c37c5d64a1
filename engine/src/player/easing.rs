//! Easing curves
//!
//! Progress remapping used for capsule height transitions and the mantle arc.
//! All curves map `0 -> 0` and `1 -> 1`; inputs are clamped to `[0, 1]`.

use serde::{Deserialize, Serialize};

/// Selectable easing curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EasingCurve {
    Linear,
    /// Quadratic ease-in (slow start).
    EaseIn,
    /// Quadratic ease-out (slow finish).
    EaseOut,
    /// Cubic ease-in-out.
    #[default]
    EaseInOut,
    /// Hermite smoothstep.
    SmoothStep,
}

impl EasingCurve {
    /// Remap linear progress `t` through the curve.
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            EasingCurve::Linear => t,
            EasingCurve::EaseIn => t * t,
            EasingCurve::EaseOut => 1.0 - (1.0 - t) * (1.0 - t),
            EasingCurve::EaseInOut => ease_in_out(t),
            EasingCurve::SmoothStep => t * t * (3.0 - 2.0 * t),
        }
    }
}

/// Linear interpolation between two scalars.
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Smooth ease-in-out interpolation (cubic).
pub fn ease_in_out(t: f32) -> f32 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}
