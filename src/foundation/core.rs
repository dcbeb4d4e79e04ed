use crate::foundation::error::{KinescopeError, KinescopeResult};

pub use kurbo::{Affine, BezPath, Point, Rect, Vec2};

/// Absolute 0-based frame index of a rendered scene.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

/// Rational frame rate `num / den`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    /// Numerator.
    pub num: u32,
    /// Denominator (must be > 0).
    pub den: u32,
}

impl Fps {
    /// Create a validated frame rate.
    pub fn new(num: u32, den: u32) -> KinescopeResult<Self> {
        if den == 0 {
            return Err(KinescopeError::validation("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(KinescopeError::validation("Fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    /// Frames per second as a float.
    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    /// Wall-clock duration of one frame (the scene tick).
    pub fn frame_duration_secs(self) -> f64 {
        f64::from(self.den) / f64::from(self.num)
    }

    /// Convert a frame count to seconds.
    pub fn frames_to_secs(self, frames: u64) -> f64 {
        (frames as f64) * self.frame_duration_secs()
    }

    /// Number of whole frames needed to cover `secs`, rounding up.
    ///
    /// A tiny tolerance keeps `1.0s @ 30fps` at exactly 30 frames despite float noise.
    pub fn secs_to_frames_ceil(self, secs: f64) -> u64 {
        let frames = secs * self.as_f64();
        (frames - 1e-9).ceil().max(0.0) as u64
    }
}

/// Output canvas dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// Width divided by height.
    pub fn aspect(self) -> f64 {
        f64::from(self.width) / f64::from(self.height.max(1))
    }
}

/// Straight-alpha color with sRGB-encoded `f64` components in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Color {
    /// Red.
    pub r: f64,
    /// Green.
    pub g: f64,
    /// Blue.
    pub b: f64,
    /// Alpha.
    pub a: f64,
}

impl Color {
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    /// Opaque black.
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 0.0,
    };
    /// Manim-style blue.
    pub const BLUE: Self = Self::rgb(0.345, 0.769, 0.867);
    /// Manim-style yellow.
    pub const YELLOW: Self = Self::rgb(1.0, 1.0, 0.0);
    /// Manim-style red.
    pub const RED: Self = Self::rgb(0.988, 0.384, 0.333);
    /// Manim-style green.
    pub const GREEN: Self = Self::rgb(0.514, 0.757, 0.404);

    /// Opaque color from sRGB components.
    pub const fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Color from sRGB components and alpha.
    pub const fn rgba(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Color from straight RGBA8 bytes.
    pub fn from_rgba8(rgba: [u8; 4]) -> Self {
        let c = |v: u8| f64::from(v) / 255.0;
        Self::rgba(c(rgba[0]), c(rgba[1]), c(rgba[2]), c(rgba[3]))
    }

    /// Parse `#rrggbb` or `#rrggbbaa`.
    pub fn from_hex(hex: &str) -> KinescopeResult<Self> {
        let s = hex.strip_prefix('#').unwrap_or(hex);
        if !(s.len() == 6 || s.len() == 8) || !s.is_ascii() {
            return Err(KinescopeError::validation(format!(
                "color '{hex}' must be #rrggbb or #rrggbbaa"
            )));
        }
        let byte = |i: usize| {
            u8::from_str_radix(&s[i..i + 2], 16)
                .map_err(|e| KinescopeError::validation(format!("color '{hex}': {e}")))
        };
        let a = if s.len() == 8 { byte(6)? } else { 255 };
        Ok(Self::from_rgba8([byte(0)?, byte(2)?, byte(4)?, a]))
    }

    /// Same color with a different alpha.
    pub fn with_alpha(self, a: f64) -> Self {
        Self { a, ..self }
    }

    /// Quantize to straight RGBA8.
    pub fn to_rgba8(self) -> [u8; 4] {
        let q = |v: f64| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b), q(self.a)]
    }
}

/// Unit vector towards the top of the frame (scene space is y-up).
pub const UP: Vec2 = Vec2::new(0.0, 1.0);
/// Unit vector towards the bottom of the frame.
pub const DOWN: Vec2 = Vec2::new(0.0, -1.0);
/// Unit vector towards the left edge of the frame.
pub const LEFT: Vec2 = Vec2::new(-1.0, 0.0);
/// Unit vector towards the right edge of the frame.
pub const RIGHT: Vec2 = Vec2::new(1.0, 0.0);

/// Local placement of a node relative to its parent.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Transform2D {
    /// Translation in parent space.
    pub translate: Vec2,
    /// Rotation in radians (counter-clockwise).
    pub rotation_rad: f64,
    /// Non-uniform scale, default (1,1).
    pub scale: Vec2,
    /// Pivot in local space.
    pub anchor: Vec2,
}

impl Default for Transform2D {
    fn default() -> Self {
        Self {
            translate: Vec2::ZERO,
            rotation_rad: 0.0,
            scale: Vec2::new(1.0, 1.0),
            anchor: Vec2::ZERO,
        }
    }
}

impl Transform2D {
    /// Pure translation.
    pub fn from_translate(translate: Vec2) -> Self {
        Self {
            translate,
            ..Self::default()
        }
    }

    /// Convert into an affine matrix.
    pub fn to_affine(self) -> Affine {
        let t_translate = Affine::translate(self.translate);
        let t_anchor = Affine::translate(self.anchor);
        let t_unanchor = Affine::translate(-self.anchor);
        let t_rotate = Affine::rotate(self.rotation_rad);
        let t_scale = Affine::scale_non_uniform(self.scale.x, self.scale.y);

        // Canonical order:
        // T(translate) * T(anchor) * R(rot) * S(scale) * T(-anchor)
        t_translate * t_anchor * t_rotate * t_scale * t_unanchor
    }

    /// Decompose an affine matrix into translate/rotate/scale with a zero anchor.
    ///
    /// Shear is not representable and is dropped; the result is exact for any product of
    /// translations, rotations and uniform scales.
    pub fn from_affine(m: Affine) -> Self {
        let [a, b, c, d, e, f] = m.as_coeffs();
        let sx = a.hypot(b);
        let rotation_rad = if sx > 0.0 { b.atan2(a) } else { 0.0 };
        let det = a * d - b * c;
        let sy = if sx > 0.0 { det / sx } else { c.hypot(d) };
        Self {
            translate: Vec2::new(e, f),
            rotation_rad,
            scale: Vec2::new(sx, sy),
            anchor: Vec2::ZERO,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
