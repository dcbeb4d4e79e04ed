use crate::{
    foundation::core::{Color, Point, Transform2D, Vec2},
    foundation::error::{KinescopeError, KinescopeResult},
    foundation::math::{lerp, linear_to_srgb, srgb_to_linear},
    interp::path::PathData,
};

/// Blend between two values of the same attribute type.
///
/// Contract for every implementation: `lerp(a, b, 0) == a`, `lerp(a, b, 1) == b`, and the
/// result moves continuously with `t`. Values of `t` outside `[0, 1]` extrapolate where the
/// type allows it (oscillating rate functions rely on this).
pub trait Lerp: Sized {
    /// Blend `a` towards `b` by `t`.
    fn lerp(a: &Self, b: &Self, t: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        lerp(*a, *b, t)
    }
}

impl Lerp for Vec2 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Vec2::new(lerp(a.x, b.x, t), lerp(a.y, b.y, t))
    }
}

impl Lerp for Point {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Point::new(lerp(a.x, b.x, t), lerp(a.y, b.y, t))
    }
}

impl Lerp for Transform2D {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Self {
            translate: <Vec2 as Lerp>::lerp(&a.translate, &b.translate, t),
            rotation_rad: lerp(a.rotation_rad, b.rotation_rad, t),
            scale: <Vec2 as Lerp>::lerp(&a.scale, &b.scale, t),
            anchor: <Vec2 as Lerp>::lerp(&a.anchor, &b.anchor, t),
        }
    }
}

impl Lerp for Color {
    /// Blends in linear light; alpha blends linearly.
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        if t == 0.0 {
            return *a;
        }
        if t == 1.0 {
            return *b;
        }
        let ch = |x: f64, y: f64| {
            let v = lerp(srgb_to_linear(x), srgb_to_linear(y), t).max(0.0);
            linear_to_srgb(v)
        };
        Self {
            r: ch(a.r, b.r),
            g: ch(a.g, b.g),
            b: ch(a.b, b.b),
            a: lerp(a.a, b.a, t),
        }
    }
}

impl Lerp for PathData {
    /// Resamples the shorter path to the longer vertex count, then blends point-wise.
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        if t == 0.0 {
            return a.clone();
        }
        if t == 1.0 {
            return b.clone();
        }
        let n = a.len().max(b.len());
        let ra = a.resampled(n);
        let rb = b.resampled(n);
        let points = ra
            .points
            .iter()
            .zip(rb.points.iter())
            .map(|(p, q)| <Point as Lerp>::lerp(p, q, t))
            .collect();
        Self {
            points,
            closed: if t < 1.0 { a.closed } else { b.closed },
        }
    }
}

/// Dynamically typed attribute stored in [`crate::ObjectState::attrs`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum AttrValue {
    /// Plain number.
    Scalar(f64),
    /// 2D vector.
    Vec2(Vec2),
    /// Color.
    Color(Color),
    /// Point path.
    Path(PathData),
}

impl AttrValue {
    /// Variant name used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Scalar(_) => "scalar",
            Self::Vec2(_) => "vec2",
            Self::Color(_) => "color",
            Self::Path(_) => "path",
        }
    }

    /// Fail with [`KinescopeError::TypeMismatch`] unless both values share a variant.
    pub fn check_compatible(&self, other: &Self, name: &str) -> KinescopeResult<()> {
        if std::mem::discriminant(self) == std::mem::discriminant(other) {
            return Ok(());
        }
        Err(KinescopeError::type_mismatch(format!(
            "attribute '{name}' cannot blend {} into {}",
            self.kind(),
            other.kind()
        )))
    }

    /// Blend two values; incompatible pairs (rejected earlier by
    /// [`AttrValue::check_compatible`]) switch over at `t = 1`.
    pub fn blend(a: &Self, b: &Self, t: f64) -> Self {
        match (a, b) {
            (Self::Scalar(x), Self::Scalar(y)) => Self::Scalar(<f64 as Lerp>::lerp(x, y, t)),
            (Self::Vec2(x), Self::Vec2(y)) => Self::Vec2(<Vec2 as Lerp>::lerp(x, y, t)),
            (Self::Color(x), Self::Color(y)) => Self::Color(<Color as Lerp>::lerp(x, y, t)),
            (Self::Path(x), Self::Path(y)) => Self::Path(<PathData as Lerp>::lerp(x, y, t)),
            _ if t < 1.0 => a.clone(),
            _ => b.clone(),
        }
    }
}

/// Free-function form of [`Lerp::lerp`].
pub fn interpolate<T: Lerp>(a: &T, b: &T, t: f64) -> T {
    T::lerp(a, b, t)
}

#[cfg(test)]
#[path = "../../tests/unit/interp/lerp.rs"]
mod tests;
