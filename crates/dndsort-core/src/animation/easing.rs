#![forbid(unsafe_code)]

//! Named easing curves, including CSS-style cubic Béziers.

/// Named easing curve.
///
/// The CSS keywords (`ease`, `ease-in`, `ease-out`, `ease-in-out`) use the
/// same control points as CSS transitions.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Easing {
    Linear,
    /// `cubic-bezier(0.25, 0.1, 0.25, 1.0)`.
    #[default]
    Ease,
    /// `cubic-bezier(0.42, 0, 1, 1)`.
    EaseIn,
    /// `cubic-bezier(0, 0, 0.58, 1)`.
    EaseOut,
    /// `cubic-bezier(0.42, 0, 0.58, 1)`.
    EaseInOut,
    /// `1 - (1 - t)^3`.
    EaseOutCubic,
    /// Arbitrary control points.
    CubicBezier(CubicBezier),
}

impl Easing {
    /// Map linear progress `t` to eased progress.
    #[must_use]
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::Ease => CubicBezier::EASE.solve(t),
            Self::EaseIn => CubicBezier::EASE_IN.solve(t),
            Self::EaseOut => CubicBezier::EASE_OUT.solve(t),
            Self::EaseInOut => CubicBezier::EASE_IN_OUT.solve(t),
            Self::EaseOutCubic => super::ease_out_cubic(t),
            Self::CubicBezier(curve) => curve.solve(t),
        }
    }
}

/// Cubic Bézier timing curve through `(0,0)`, `(x1,y1)`, `(x2,y2)`, `(1,1)`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CubicBezier {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

const NEWTON_ITERATIONS: usize = 8;
const BISECTION_ITERATIONS: usize = 32;
const EPSILON: f32 = 1e-6;

impl CubicBezier {
    pub const EASE: Self = Self::new(0.25, 0.1, 0.25, 1.0);
    pub const EASE_IN: Self = Self::new(0.42, 0.0, 1.0, 1.0);
    pub const EASE_OUT: Self = Self::new(0.0, 0.0, 0.58, 1.0);
    pub const EASE_IN_OUT: Self = Self::new(0.42, 0.0, 0.58, 1.0);

    #[must_use]
    pub const fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Eased output for time `t` in `[0, 1]`.
    #[must_use]
    pub fn solve(&self, t: f32) -> f32 {
        if t <= 0.0 {
            return 0.0;
        }
        if t >= 1.0 {
            return 1.0;
        }
        let x1 = self.x1.clamp(0.0, 1.0);
        let x2 = self.x2.clamp(0.0, 1.0);
        let s = solve_parameter(x1, x2, t);
        sample(self.y1, self.y2, s)
    }
}

/// Bernstein form of one coordinate with fixed endpoints 0 and 1.
#[inline]
fn sample(p1: f32, p2: f32, s: f32) -> f32 {
    let c = 3.0 * p1;
    let b = 3.0 * (p2 - p1) - c;
    let a = 1.0 - c - b;
    ((a * s + b) * s + c) * s
}

#[inline]
fn sample_derivative(p1: f32, p2: f32, s: f32) -> f32 {
    let c = 3.0 * p1;
    let b = 3.0 * (p2 - p1) - c;
    let a = 1.0 - c - b;
    (3.0 * a * s + 2.0 * b) * s + c
}

/// Find the curve parameter whose x equals `x`.
fn solve_parameter(x1: f32, x2: f32, x: f32) -> f32 {
    let mut s = x;
    for _ in 0..NEWTON_ITERATIONS {
        let err = sample(x1, x2, s) - x;
        if err.abs() < EPSILON {
            return s;
        }
        let d = sample_derivative(x1, x2, s);
        if d.abs() < EPSILON {
            break;
        }
        s -= err / d;
    }

    let (mut lo, mut hi) = (0.0_f32, 1.0_f32);
    s = x;
    for _ in 0..BISECTION_ITERATIONS {
        let value = sample(x1, x2, s);
        if (value - x).abs() < EPSILON {
            break;
        }
        if value < x {
            lo = s;
        } else {
            hi = s;
        }
        s = (lo + hi) / 2.0;
    }
    s
}
