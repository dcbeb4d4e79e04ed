use std::fmt;
use std::sync::Arc;

use crate::foundation::math::sigmoid;

/// Easing curve mapping linear time progress to eased progress.
///
/// Built-in curves satisfy `f(0) = 0`; all except the round-trip curves
/// ([`RateFunction::ThereAndBack`], [`RateFunction::ThereAndBackWithPause`],
/// [`RateFunction::Wiggle`]) also satisfy `f(1) = 1`. Monotonicity is not enforced, so
/// custom curves may oscillate.
#[derive(Clone, Default)]
pub enum RateFunction {
    /// Identity.
    Linear,
    /// Sigmoid ease in and out; the default.
    #[default]
    Smooth,
    /// Quadratic ease in.
    InQuad,
    /// Quadratic ease out.
    OutQuad,
    /// Quadratic ease in and out.
    InOutQuad,
    /// Cubic ease in.
    InCubic,
    /// Cubic ease out.
    OutCubic,
    /// Cubic ease in and out.
    InOutCubic,
    /// First half of [`RateFunction::Smooth`], stretched: slow start, full speed at the end.
    RushInto,
    /// Second half of [`RateFunction::Smooth`], stretched: full speed start, slow end.
    RushFrom,
    /// Slow start, linear finish.
    SlowInto,
    /// Two smooth halves back to back.
    DoubleSmooth,
    /// Goes to 1 at the midpoint and returns to 0.
    ThereAndBack,
    /// Like [`RateFunction::ThereAndBack`] but holds at 1 for the middle third.
    ThereAndBackWithPause,
    /// Oscillates around 0, ending at 0.
    Wiggle,
    /// Linear for the first 80% of the time, then holds at 1.
    Lingering,
    /// User supplied curve.
    Custom(Arc<dyn Fn(f64) -> f64 + Send + Sync>),
}

impl RateFunction {
    /// Wrap a closure as a rate function.
    pub fn custom(f: impl Fn(f64) -> f64 + Send + Sync + 'static) -> Self {
        Self::Custom(Arc::new(f))
    }

    /// Evaluate the curve at linear progress `t` (callers clamp `t` into `[0, 1]`).
    pub fn apply(&self, t: f64) -> f64 {
        match self {
            Self::Linear => t,
            Self::Smooth => smooth(t),
            Self::InQuad => t * t,
            Self::OutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            Self::InOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(2) / 2.0)
                }
            }
            Self::InCubic => t * t * t,
            Self::OutCubic => 1.0 - (1.0 - t).powi(3),
            Self::InOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(3) / 2.0)
                }
            }
            Self::RushInto => 2.0 * smooth(t / 2.0),
            Self::RushFrom => 2.0 * smooth(t / 2.0 + 0.5) - 1.0,
            Self::SlowInto => (1.0 - (1.0 - t) * (1.0 - t)).max(0.0).sqrt(),
            Self::DoubleSmooth => {
                if t < 0.5 {
                    0.5 * smooth(2.0 * t)
                } else {
                    0.5 * (1.0 + smooth(2.0 * t - 1.0))
                }
            }
            Self::ThereAndBack => there_and_back(t),
            Self::ThereAndBackWithPause => {
                let a = 1.0 / 3.0;
                if t < a {
                    smooth(t / a)
                } else if t < 1.0 - a {
                    1.0
                } else {
                    smooth((1.0 - t) / a)
                }
            }
            Self::Wiggle => there_and_back(t) * (2.0 * std::f64::consts::PI * t).sin(),
            Self::Lingering => (t / 0.8).clamp(0.0, 1.0),
            Self::Custom(f) => f(t),
        }
    }

    /// Stable display name (custom curves report `custom`).
    pub fn name(&self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::Smooth => "smooth",
            Self::InQuad => "in_quad",
            Self::OutQuad => "out_quad",
            Self::InOutQuad => "in_out_quad",
            Self::InCubic => "in_cubic",
            Self::OutCubic => "out_cubic",
            Self::InOutCubic => "in_out_cubic",
            Self::RushInto => "rush_into",
            Self::RushFrom => "rush_from",
            Self::SlowInto => "slow_into",
            Self::DoubleSmooth => "double_smooth",
            Self::ThereAndBack => "there_and_back",
            Self::ThereAndBackWithPause => "there_and_back_with_pause",
            Self::Wiggle => "wiggle",
            Self::Lingering => "lingering",
            Self::Custom(_) => "custom",
        }
    }

    /// Look up a built-in curve by its [`RateFunction::name`].
    pub fn from_name(name: &str) -> Option<Self> {
        Self::builtins().into_iter().find(|r| r.name() == name)
    }

    /// Every built-in curve, in declaration order.
    pub fn builtins() -> Vec<Self> {
        vec![
            Self::Linear,
            Self::Smooth,
            Self::InQuad,
            Self::OutQuad,
            Self::InOutQuad,
            Self::InCubic,
            Self::OutCubic,
            Self::InOutCubic,
            Self::RushInto,
            Self::RushFrom,
            Self::SlowInto,
            Self::DoubleSmooth,
            Self::ThereAndBack,
            Self::ThereAndBackWithPause,
            Self::Wiggle,
            Self::Lingering,
        ]
    }
}

impl fmt::Debug for RateFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn smooth(t: f64) -> f64 {
    const INFLECTION: f64 = 10.0;
    if t <= 0.0 {
        return 0.0;
    }
    if t >= 1.0 {
        return 1.0;
    }
    let error = sigmoid(-INFLECTION / 2.0);
    ((sigmoid(INFLECTION * (t - 0.5)) - error) / (1.0 - 2.0 * error)).clamp(0.0, 1.0)
}

fn there_and_back(t: f64) -> f64 {
    let t = if t < 0.5 { 2.0 * t } else { 2.0 * (1.0 - t) };
    smooth(t)
}

#[cfg(test)]
#[path = "../../tests/unit/interp/rate.rs"]
mod tests;
