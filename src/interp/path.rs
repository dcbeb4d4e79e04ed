//! Polyline path data and the resampling that makes any two paths blendable.

use crate::foundation::core::{BezPath, Point, Rect, Vec2};

/// Flattening tolerance used when converting curves into polylines.
pub const FLATTEN_TOLERANCE: f64 = 1e-3;

/// Point-path geometry in local space.
///
/// Paths are stored flattened: a sequence of vertices, optionally closed back to the first
/// vertex. An empty path carries no geometry (groups, trackers).
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PathData {
    /// Polyline vertices.
    pub points: Vec<Point>,
    /// Whether the last vertex connects back to the first.
    pub closed: bool,
}

impl PathData {
    /// Empty path.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Open polyline through `points`.
    pub fn open(points: Vec<Point>) -> Self {
        Self {
            points,
            closed: false,
        }
    }

    /// Closed polygon through `points`.
    pub fn closed(points: Vec<Point>) -> Self {
        Self {
            points,
            closed: true,
        }
    }

    /// Axis-aligned rectangle centered at the origin.
    pub fn rect(width: f64, height: f64) -> Self {
        let (hw, hh) = (width / 2.0, height / 2.0);
        Self::closed(vec![
            Point::new(-hw, -hh),
            Point::new(hw, -hh),
            Point::new(hw, hh),
            Point::new(-hw, hh),
        ])
    }

    /// Circle centered at the origin, approximated by `segments` vertices.
    pub fn circle(radius: f64, segments: usize) -> Self {
        let n = segments.max(3);
        let points = (0..n)
            .map(|i| {
                let a = std::f64::consts::TAU * (i as f64) / (n as f64);
                Point::new(radius * a.cos(), radius * a.sin())
            })
            .collect();
        Self::closed(points)
    }

    /// Straight segment.
    pub fn line(from: Point, to: Point) -> Self {
        Self::open(vec![from, to])
    }

    /// Flatten a kurbo path. Only the first subpath is kept.
    pub fn from_bez(path: &BezPath) -> Self {
        let mut points = Vec::new();
        let mut closed = false;
        let mut started = false;
        kurbo::flatten(path.iter(), FLATTEN_TOLERANCE, |el| match el {
            kurbo::PathEl::MoveTo(p) => {
                if !started {
                    points.push(p);
                    started = true;
                }
            }
            kurbo::PathEl::LineTo(p) => {
                if started && !closed {
                    points.push(p);
                }
            }
            kurbo::PathEl::ClosePath => closed = true,
            _ => {}
        });
        if closed && points.len() > 1 && points.first() == points.last() {
            points.pop();
        }
        Self { points, closed }
    }

    /// Number of vertices.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the path has no vertices.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Bounding box of the vertices, if any.
    pub fn bounds(&self) -> Option<Rect> {
        let first = *self.points.first()?;
        Some(
            self.points
                .iter()
                .fold(Rect::from_points(first, first), |r, &p| r.union_pt(p)),
        )
    }

    /// Mean of the vertices (local origin for empty paths).
    pub fn centroid(&self) -> Point {
        if self.points.is_empty() {
            return Point::ORIGIN;
        }
        let sum = self
            .points
            .iter()
            .fold(Vec2::ZERO, |acc, p| acc + p.to_vec2());
        (sum / self.points.len() as f64).to_point()
    }

    /// Total polyline length including the closing segment.
    pub fn arc_length(&self) -> f64 {
        self.segments().map(|(a, b)| a.distance(b)).sum()
    }

    fn segments(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        let n = self.points.len();
        let count = match (n, self.closed) {
            (0 | 1, _) => 0,
            (_, true) => n,
            (_, false) => n - 1,
        };
        (0..count).map(move |i| (self.points[i], self.points[(i + 1) % n]))
    }

    /// Resample to exactly `target` vertices without dropping any existing vertex.
    ///
    /// Extra vertices are inserted by subdividing segments; each segment receives a share
    /// proportional to its index span, so the shape is unchanged. Requests smaller than the
    /// current count return the path unchanged.
    pub fn resampled(&self, target: usize) -> Self {
        let n = self.points.len();
        if target <= n {
            return self.clone();
        }
        match n {
            0 => {
                return Self {
                    points: vec![Point::ORIGIN; target],
                    closed: self.closed,
                };
            }
            1 => {
                return Self {
                    points: vec![self.points[0]; target],
                    closed: self.closed,
                };
            }
            _ => {}
        }

        // Closed paths are materialized as open loops ending on their first vertex, then
        // the duplicate is dropped again.
        let (ring, ring_target) = if self.closed {
            let mut pts = self.points.clone();
            pts.push(self.points[0]);
            (pts, target + 1)
        } else {
            (self.points.clone(), target)
        };

        let segs = ring.len() - 1;
        let new_segs = ring_target - 1;
        let mut split = vec![0usize; segs];
        for j in 0..new_segs {
            split[j * segs / new_segs] += 1;
        }

        let mut out = Vec::with_capacity(ring_target);
        for (i, &pieces) in split.iter().enumerate() {
            let (a, b) = (ring[i], ring[i + 1]);
            for k in 0..pieces {
                out.push(a.lerp(b, k as f64 / pieces as f64));
            }
        }
        out.push(ring[segs]);

        if self.closed {
            out.pop();
        }
        Self {
            points: out,
            closed: self.closed,
        }
    }

    /// Sub-path covering the arc-length fraction `[start, end]` of the path.
    ///
    /// Closed paths that are not fully drawn become open.
    pub fn trimmed(&self, start: f64, end: f64) -> Self {
        let start = start.clamp(0.0, 1.0);
        let end = end.clamp(0.0, 1.0);
        if start <= 0.0 && end >= 1.0 {
            return self.clone();
        }
        if end <= start || self.points.len() < 2 {
            return Self::empty();
        }

        let total = self.arc_length();
        if total <= 0.0 {
            return Self::open(vec![self.points[0]]);
        }
        let (from, to) = (start * total, end * total);

        let mut out = Vec::new();
        let mut walked = 0.0;
        for (a, b) in self.segments() {
            let len = a.distance(b);
            let seg_start = walked;
            let seg_end = walked + len;
            walked = seg_end;
            if seg_end < from || seg_start > to || len <= 0.0 {
                continue;
            }
            let t0 = ((from - seg_start) / len).clamp(0.0, 1.0);
            let t1 = ((to - seg_start) / len).clamp(0.0, 1.0);
            if out.is_empty() {
                out.push(a.lerp(b, t0));
            }
            out.push(a.lerp(b, t1));
        }
        Self::open(out)
    }

    /// Copy with every vertex mapped through `f`.
    pub fn map_points(&self, f: impl Fn(Point) -> Point) -> Self {
        Self {
            points: self.points.iter().map(|&p| f(p)).collect(),
            closed: self.closed,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/interp/path.rs"]
mod tests;
