use std::f64::consts::FRAC_PI_2;

use crate::{
    foundation::core::{Affine, Point},
    foundation::error::{KinescopeError, KinescopeResult},
    foundation::math::lerp,
    interp::lerp::Lerp,
};

/// Perspective factor used for points at or behind the eye.
const BEHIND_EYE_FACTOR: f64 = 1e6;

/// Camera state composed over the whole scene graph at compose time.
///
/// Angles are radians: `phi` is the polar angle measured from the view axis, `theta` the
/// azimuth, `gamma` a roll about the view axis. The default orientation (`phi = 0`,
/// `theta = -π/2`, `gamma = 0`) looks straight down and projects flat.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ViewTransform {
    center: Point,
    zoom: f64,
    phi: f64,
    theta: f64,
    gamma: f64,
    distance: f64,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self {
            center: Point::ORIGIN,
            zoom: 1.0,
            phi: 0.0,
            theta: -FRAC_PI_2,
            gamma: 0.0,
            distance: 20.0,
        }
    }
}

fn positive(what: &str, v: f64) -> KinescopeResult<f64> {
    if v.is_finite() && v > 0.0 {
        Ok(v)
    } else {
        Err(KinescopeError::validation(format!(
            "{what} must be finite and > 0, got {v}"
        )))
    }
}

fn finite(what: &str, v: f64) -> KinescopeResult<f64> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(KinescopeError::validation(format!(
            "{what} must be finite, got {v}"
        )))
    }
}

impl ViewTransform {
    /// Scene point at the middle of the frame.
    pub fn center(&self) -> Point {
        self.center
    }

    /// Magnification; always > 0.
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Polar angle.
    pub fn phi(&self) -> f64 {
        self.phi
    }

    /// Azimuth.
    pub fn theta(&self) -> f64 {
        self.theta
    }

    /// Roll about the view axis.
    pub fn gamma(&self) -> f64 {
        self.gamma
    }

    /// Eye distance used for perspective; always > 0.
    pub fn distance(&self) -> f64 {
        self.distance
    }

    /// Center the frame on a finite scene point.
    pub fn set_center(&mut self, center: Point) -> KinescopeResult<()> {
        finite("view center x", center.x)?;
        finite("view center y", center.y)?;
        self.center = center;
        Ok(())
    }

    /// Set the magnification (`Validation` unless finite and > 0).
    pub fn set_zoom(&mut self, zoom: f64) -> KinescopeResult<()> {
        self.zoom = positive("zoom", zoom)?;
        Ok(())
    }

    /// Set polar and azimuthal angles.
    pub fn set_orientation(&mut self, phi: f64, theta: f64) -> KinescopeResult<()> {
        self.phi = finite("phi", phi)?;
        self.theta = finite("theta", theta)?;
        Ok(())
    }

    /// Set the roll.
    pub fn set_gamma(&mut self, gamma: f64) -> KinescopeResult<()> {
        self.gamma = finite("gamma", gamma)?;
        Ok(())
    }

    /// Set the eye distance (`Validation` unless finite and > 0).
    pub fn set_distance(&mut self, distance: f64) -> KinescopeResult<()> {
        self.distance = positive("distance", distance)?;
        Ok(())
    }

    /// Apply one requested change.
    pub fn apply(&mut self, m: &ViewMutation) -> KinescopeResult<()> {
        match *m {
            ViewMutation::MoveTo(p) => self.set_center(p),
            ViewMutation::Zoom(z) => self.set_zoom(z),
            ViewMutation::Orientation { phi, theta } => self.set_orientation(phi, theta),
            ViewMutation::Gamma(g) => self.set_gamma(g),
            ViewMutation::Distance(d) => self.set_distance(d),
        }
    }

    /// Copy with every mutation applied in order.
    pub fn with_mutations(&self, mutations: &[ViewMutation]) -> KinescopeResult<Self> {
        let mut out = *self;
        for m in mutations {
            out.apply(m)?;
        }
        Ok(out)
    }

    /// Whether the orientation projects without rotation or perspective.
    pub fn is_flat(&self) -> bool {
        let r = self.rotation();
        (r[0][0] - 1.0).abs() < 1e-12
            && (r[1][1] - 1.0).abs() < 1e-12
            && (r[2][2] - 1.0).abs() < 1e-12
    }

    /// Scene-to-view affine; exact for flat orientations, the linear part of the
    /// projection otherwise.
    pub fn to_affine(&self) -> Affine {
        let r = self.rotation();
        Affine::scale(self.zoom)
            * Affine::new([r[0][0], r[1][0], r[0][1], r[1][1], 0.0, 0.0])
            * Affine::translate(-self.center.to_vec2())
    }

    /// `R = Rz(gamma) · Rx(-phi) · Rz(-theta - π/2)`.
    fn rotation(&self) -> [[f64; 3]; 3] {
        let rz = |a: f64| {
            let (s, c) = a.sin_cos();
            [[c, -s, 0.0], [s, c, 0.0], [0.0, 0.0, 1.0]]
        };
        let rx = |a: f64| {
            let (s, c) = a.sin_cos();
            [[1.0, 0.0, 0.0], [0.0, c, -s], [0.0, s, c]]
        };
        mat_mul(
            rz(self.gamma),
            mat_mul(rx(-self.phi), rz(-self.theta - FRAC_PI_2)),
        )
    }

    /// Project a scene point at `depth` into view space.
    pub fn project(&self, p: Point, depth: f64) -> Point {
        let r = self.rotation();
        let v = [p.x - self.center.x, p.y - self.center.y, depth];
        let x = r[0][0] * v[0] + r[0][1] * v[1] + r[0][2] * v[2];
        let y = r[1][0] * v[0] + r[1][1] * v[1] + r[1][2] * v[2];
        let z = r[2][0] * v[0] + r[2][1] * v[1] + r[2][2] * v[2];
        let gap = self.distance - z;
        let factor = if gap > 0.0 {
            self.distance / gap
        } else {
            BEHIND_EYE_FACTOR
        };
        Point::new(x * factor * self.zoom, y * factor * self.zoom)
    }

    /// Depth of a scene point along the view axis after rotation (larger is nearer).
    pub fn view_depth(&self, p: Point, depth: f64) -> f64 {
        let r = self.rotation();
        r[2][0] * (p.x - self.center.x) + r[2][1] * (p.y - self.center.y) + r[2][2] * depth
    }
}

fn mat_mul(a: [[f64; 3]; 3], b: [[f64; 3]; 3]) -> [[f64; 3]; 3] {
    let mut out = [[0.0; 3]; 3];
    for (i, row) in out.iter_mut().enumerate() {
        for (j, cell) in row.iter_mut().enumerate() {
            *cell = (0..3).map(|k| a[i][k] * b[k][j]).sum();
        }
    }
    out
}

impl Lerp for ViewTransform {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Self {
            center: <Point as Lerp>::lerp(&a.center, &b.center, t),
            zoom: lerp(a.zoom, b.zoom, t).max(f64::MIN_POSITIVE),
            phi: lerp(a.phi, b.phi, t),
            theta: lerp(a.theta, b.theta, t),
            gamma: lerp(a.gamma, b.gamma, t),
            distance: lerp(a.distance, b.distance, t).max(f64::MIN_POSITIVE),
        }
    }
}

impl ViewTransform {
    /// Write `lerp(a, b, t)` into `self`, touching only parameters where `a` and `b` differ.
    pub fn blend_changed(&mut self, a: &Self, b: &Self, t: f64) {
        let mid = Self::lerp(a, b, t);
        if a.center != b.center {
            self.center = mid.center;
        }
        if a.zoom != b.zoom {
            self.zoom = mid.zoom;
        }
        if a.phi != b.phi {
            self.phi = mid.phi;
        }
        if a.theta != b.theta {
            self.theta = mid.theta;
        }
        if a.gamma != b.gamma {
            self.gamma = mid.gamma;
        }
        if a.distance != b.distance {
            self.distance = mid.distance;
        }
    }
}

/// Requested camera change, recorded by [`crate::animate_view`] and applied by
/// [`ViewTransform::apply`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ViewMutation {
    /// Center the frame on a scene point.
    MoveTo(Point),
    /// Set the magnification.
    Zoom(f64),
    /// Set polar and azimuthal angles.
    Orientation {
        /// Polar angle.
        phi: f64,
        /// Azimuth.
        theta: f64,
    },
    /// Set the roll.
    Gamma(f64),
    /// Set the eye distance.
    Distance(f64),
}

#[cfg(test)]
#[path = "../../tests/unit/view/camera.rs"]
mod tests;
