//! Pacing curves for glyph pop-in.
//!
//! `{EASE=name}` swaps the curve used to shape the in-flight glyph's
//! reveal progress. Curves map linear progress (0.0 to 1.0) to eased
//! output using the standard CSS cubic-bezier forms.

use serde::{Deserialize, Serialize};

/// Easing function applied to reveal progress.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EasingFunction {
    /// Linear interpolation (no easing).
    Linear,
    /// Slow start, fast middle, slow end: `cubic-bezier(0.25, 0.1, 0.25, 1.0)`.
    Ease,
    /// Slow start, accelerating: `cubic-bezier(0.42, 0, 1, 1)`.
    EaseIn,
    /// Fast start, decelerating: `cubic-bezier(0, 0, 0.58, 1)`.
    EaseOut,
    /// Slow start and end: `cubic-bezier(0.42, 0, 0.58, 1)`.
    EaseInOut,
    /// Custom curve; control point x values must be in [0, 1].
    CubicBezier { x1: f32, y1: f32, x2: f32, y2: f32 },
}

impl Default for EasingFunction {
    fn default() -> Self {
        Self::Linear
    }
}

impl EasingFunction {
    /// Look up a curve by its markup vocabulary name (case-insensitive).
    /// Unknown names yield `None`; callers degrade per the error policy.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "linear" => Some(Self::Linear),
            "ease" => Some(Self::Ease),
            "easein" | "ease-in" => Some(Self::EaseIn),
            "easeout" | "ease-out" => Some(Self::EaseOut),
            "easeinout" | "ease-in-out" => Some(Self::EaseInOut),
            _ => None,
        }
    }

    /// Evaluate the curve at progress `t`, clamped to 0..=1.
    pub fn evaluate(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::Ease => cubic_bezier(0.25, 0.1, 0.25, 1.0, t),
            Self::EaseIn => cubic_bezier(0.42, 0.0, 1.0, 1.0, t),
            Self::EaseOut => cubic_bezier(0.0, 0.0, 0.58, 1.0, t),
            Self::EaseInOut => cubic_bezier(0.42, 0.0, 0.58, 1.0, t),
            Self::CubicBezier { x1, y1, x2, y2 } => cubic_bezier(*x1, *y1, *x2, *y2, t),
        }
    }
}

/// Evaluate a cubic bezier timing curve at the given progress, using
/// Newton-Raphson iteration to invert the x polynomial.
fn cubic_bezier(x1: f32, y1: f32, x2: f32, y2: f32, progress: f32) -> f32 {
    if progress <= 0.0 {
        return 0.0;
    }
    if progress >= 1.0 {
        return 1.0;
    }
    let t = solve_bezier_x(x1, x2, progress);
    bezier_axis(y1, y2, t)
}

fn solve_bezier_x(x1: f32, x2: f32, target_x: f32) -> f32 {
    let mut t = target_x;
    for _ in 0..8 {
        let x = bezier_axis(x1, x2, t) - target_x;
        if x.abs() < 1e-6 {
            break;
        }
        let dx = bezier_derivative(x1, x2, t);
        if dx.abs() < 1e-6 {
            break;
        }
        t -= x / dx;
        t = t.clamp(0.0, 1.0);
    }
    t
}

/// One bezier axis: `3(1-t)²t·p1 + 3(1-t)t²·p2 + t³`.
#[inline]
fn bezier_axis(p1: f32, p2: f32, t: f32) -> f32 {
    let t2 = t * t;
    let mt = 1.0 - t;
    3.0 * mt * mt * t * p1 + 3.0 * mt * t2 * p2 + t2 * t
}

#[inline]
fn bezier_derivative(p1: f32, p2: f32, t: f32) -> f32 {
    let mt = 1.0 - t;
    3.0 * mt * mt * p1 + 6.0 * mt * t * (p2 - p1) + 3.0 * t * t * (1.0 - p2)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 0.001;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn linear_is_identity() {
        let ease = EasingFunction::Linear;
        for t in [0.0, 0.25, 0.5, 0.75, 1.0] {
            assert!(approx_eq(ease.evaluate(t), t));
        }
    }

    #[test]
    fn curves_hit_their_endpoints() {
        for ease in [
            EasingFunction::Ease,
            EasingFunction::EaseIn,
            EasingFunction::EaseOut,
            EasingFunction::EaseInOut,
        ] {
            assert!(approx_eq(ease.evaluate(0.0), 0.0));
            assert!(approx_eq(ease.evaluate(1.0), 1.0));
        }
    }

    #[test]
    fn ease_in_starts_slow_ease_out_starts_fast() {
        assert!(EasingFunction::EaseIn.evaluate(0.25) < 0.25);
        assert!(EasingFunction::EaseOut.evaluate(0.25) > 0.25);
    }

    #[test]
    fn ease_in_out_is_symmetric() {
        let ease = EasingFunction::EaseInOut;
        let early = ease.evaluate(0.25);
        let late = ease.evaluate(0.75);
        assert!(approx_eq(early + late, 1.0));
        assert!(approx_eq(ease.evaluate(0.5), 0.5));
    }

    #[test]
    fn input_is_clamped() {
        assert!(approx_eq(EasingFunction::Ease.evaluate(-1.0), 0.0));
        assert!(approx_eq(EasingFunction::Ease.evaluate(2.0), 1.0));
    }

    #[test]
    fn name_lookup_is_case_insensitive() {
        assert_eq!(
            EasingFunction::from_name("EaseInOut"),
            Some(EasingFunction::EaseInOut)
        );
        assert_eq!(
            EasingFunction::from_name("ease-out"),
            Some(EasingFunction::EaseOut)
        );
        assert_eq!(EasingFunction::from_name("bounce"), None);
    }
}
