use std::collections::BTreeMap;
use std::fmt;

use crate::{
    foundation::core::{Color, Point, Transform2D, Vec2},
    foundation::error::{KinescopeError, KinescopeResult},
    foundation::math::lerp,
    interp::lerp::{AttrValue, Lerp},
    interp::path::PathData,
};

/// Stable handle to a node in a [`crate::SceneGraph`].
///
/// Handles are generational: once a node is destroyed its handle never resolves again,
/// even if the arena slot is reused.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct ObjectId {
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}v{}", self.index, self.generation)
    }
}

/// Geometry and style of one node. Every field has a blend rule (see [`Lerp`]).
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ObjectState {
    /// Placement relative to the parent.
    pub transform: Transform2D,
    /// Depth along the view axis; used by 3D projection and paint ordering.
    pub depth: f64,
    /// Opacity multiplier, cascaded down the tree.
    pub opacity: f64,
    /// Fill color.
    pub fill: Color,
    /// Fill opacity in `[0, 1]`.
    pub fill_opacity: f64,
    /// Stroke color.
    pub stroke: Color,
    /// Stroke width in scene units.
    pub stroke_width: f64,
    /// Stroke opacity in `[0, 1]`.
    pub stroke_opacity: f64,
    /// Local-space geometry.
    pub path: PathData,
    /// Start of the drawn arc-length window.
    pub draw_start: f64,
    /// End of the drawn arc-length window.
    pub draw_end: f64,
    /// Scalar payload (value trackers).
    pub value: f64,
    /// Extra named attributes.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attrs: BTreeMap<String, AttrValue>,
}

impl Default for ObjectState {
    fn default() -> Self {
        Self {
            transform: Transform2D::default(),
            depth: 0.0,
            opacity: 1.0,
            fill: Color::WHITE,
            fill_opacity: 0.0,
            stroke: Color::WHITE,
            stroke_width: 0.04,
            stroke_opacity: 1.0,
            path: PathData::empty(),
            draw_start: 0.0,
            draw_end: 1.0,
            value: 0.0,
            attrs: BTreeMap::new(),
        }
    }
}

impl ObjectState {
    /// Fail with [`KinescopeError::TypeMismatch`] when a shared attribute changes variant.
    pub fn check_compatible(&self, other: &Self) -> KinescopeResult<()> {
        for (name, a) in &self.attrs {
            if let Some(b) = other.attrs.get(name) {
                a.check_compatible(b, name)?;
            }
        }
        Ok(())
    }
}

impl Lerp for ObjectState {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        let mut attrs = BTreeMap::new();
        for (name, va) in &a.attrs {
            match b.attrs.get(name) {
                Some(vb) => {
                    attrs.insert(name.clone(), AttrValue::blend(va, vb, t));
                }
                None if t < 1.0 => {
                    attrs.insert(name.clone(), va.clone());
                }
                None => {}
            }
        }
        if t > 0.0 {
            for (name, vb) in &b.attrs {
                if !a.attrs.contains_key(name) {
                    attrs.insert(name.clone(), vb.clone());
                }
            }
        }

        Self {
            transform: Transform2D::lerp(&a.transform, &b.transform, t),
            depth: lerp(a.depth, b.depth, t),
            opacity: lerp(a.opacity, b.opacity, t),
            fill: Color::lerp(&a.fill, &b.fill, t),
            fill_opacity: lerp(a.fill_opacity, b.fill_opacity, t),
            stroke: Color::lerp(&a.stroke, &b.stroke, t),
            stroke_width: lerp(a.stroke_width, b.stroke_width, t),
            stroke_opacity: lerp(a.stroke_opacity, b.stroke_opacity, t),
            path: PathData::lerp(&a.path, &b.path, t),
            draw_start: lerp(a.draw_start, b.draw_start, t),
            draw_end: lerp(a.draw_end, b.draw_end, t),
            value: lerp(a.value, b.value, t),
            attrs,
        }
    }
}

impl ObjectState {
    /// Write `lerp(a, b, t)` into `self`, touching only fields where `a` and `b` differ.
    ///
    /// Leaves animating different attributes of one object therefore compose instead of
    /// overwriting each other.
    pub fn blend_changed(&mut self, a: &Self, b: &Self, t: f64) {
        let ta = &a.transform;
        let tb = &b.transform;
        // Translation only means something relative to its anchor.
        if ta.translate != tb.translate || ta.anchor != tb.anchor {
            self.transform.translate = <Vec2 as Lerp>::lerp(&ta.translate, &tb.translate, t);
            self.transform.anchor = <Vec2 as Lerp>::lerp(&ta.anchor, &tb.anchor, t);
        }
        if ta.rotation_rad != tb.rotation_rad {
            self.transform.rotation_rad = lerp(ta.rotation_rad, tb.rotation_rad, t);
        }
        if ta.scale != tb.scale {
            self.transform.scale = <Vec2 as Lerp>::lerp(&ta.scale, &tb.scale, t);
        }

        let scalar = |dst: &mut f64, x: f64, y: f64| {
            if x != y {
                *dst = lerp(x, y, t);
            }
        };
        scalar(&mut self.depth, a.depth, b.depth);
        scalar(&mut self.opacity, a.opacity, b.opacity);
        scalar(&mut self.fill_opacity, a.fill_opacity, b.fill_opacity);
        scalar(&mut self.stroke_width, a.stroke_width, b.stroke_width);
        scalar(&mut self.stroke_opacity, a.stroke_opacity, b.stroke_opacity);
        scalar(&mut self.draw_start, a.draw_start, b.draw_start);
        scalar(&mut self.draw_end, a.draw_end, b.draw_end);
        scalar(&mut self.value, a.value, b.value);

        if a.fill != b.fill {
            self.fill = Color::lerp(&a.fill, &b.fill, t);
        }
        if a.stroke != b.stroke {
            self.stroke = Color::lerp(&a.stroke, &b.stroke, t);
        }
        if a.path != b.path {
            self.path = PathData::lerp(&a.path, &b.path, t);
        }

        if a.attrs != b.attrs {
            let blended = Self::lerp(a, b, t).attrs;
            let keys: Vec<&String> = a.attrs.keys().chain(b.attrs.keys()).collect();
            for key in keys {
                if a.attrs.get(key) == b.attrs.get(key) {
                    continue;
                }
                match blended.get(key) {
                    Some(v) => {
                        self.attrs.insert(key.clone(), v.clone());
                    }
                    None => {
                        self.attrs.remove(key);
                    }
                }
            }
        }
    }
}

/// States of a subtree in pre-order (the node first, then each child's family).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FamilySnapshot {
    /// One state per family member.
    pub states: Vec<ObjectState>,
}

impl FamilySnapshot {
    /// Number of members.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Whether the snapshot is empty.
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Fail unless both snapshots describe the same family shape with blendable attributes.
    pub fn check_compatible(&self, other: &Self) -> KinescopeResult<()> {
        if self.states.len() != other.states.len() {
            return Err(KinescopeError::type_mismatch(format!(
                "family of {} members cannot blend into family of {} (align them first)",
                self.states.len(),
                other.states.len()
            )));
        }
        for (a, b) in self.states.iter().zip(other.states.iter()) {
            a.check_compatible(b)?;
        }
        Ok(())
    }
}

impl Lerp for FamilySnapshot {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Self {
            states: a
                .states
                .iter()
                .zip(b.states.iter())
                .map(|(x, y)| ObjectState::lerp(x, y, t))
                .collect(),
        }
    }
}

/// Declarative description of an object tree, turned into graph nodes by
/// [`crate::SceneGraph::insert`].
#[derive(Clone, Debug, Default)]
pub struct VisualObject {
    /// Structural-matching label.
    pub tag: Option<String>,
    /// Debug name.
    pub name: Option<String>,
    /// Initial state.
    pub state: ObjectState,
    /// Owned children in paint order.
    pub children: Vec<VisualObject>,
}

impl VisualObject {
    /// Node with the given geometry and default style.
    pub fn from_path(path: PathData) -> Self {
        Self {
            state: ObjectState {
                path,
                ..ObjectState::default()
            },
            ..Self::default()
        }
    }

    /// Geometry-less parent of `children`.
    pub fn group(children: impl IntoIterator<Item = VisualObject>) -> Self {
        Self {
            children: children.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Rectangle centered on the local origin.
    pub fn rect(width: f64, height: f64) -> Self {
        Self::from_path(PathData::rect(width, height))
    }

    /// Circle centered on the local origin.
    pub fn circle(radius: f64) -> Self {
        Self::from_path(PathData::circle(radius, 64))
    }

    /// Small filled disc.
    pub fn dot() -> Self {
        Self::circle(0.08).with_fill(Color::WHITE, 1.0)
    }

    /// Straight segment.
    pub fn line(from: Point, to: Point) -> Self {
        Self::from_path(PathData::line(from, to))
    }

    /// Closed polygon.
    pub fn polygon(points: Vec<Point>) -> Self {
        Self::from_path(PathData::closed(points))
    }

    /// Invisible holder of an animatable scalar.
    pub fn tracker(value: f64) -> Self {
        Self {
            state: ObjectState {
                value,
                ..ObjectState::default()
            },
            ..Self::default()
        }
    }

    /// Set the structural-matching tag.
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Set a debug name.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Place the local origin at `p` in parent space.
    pub fn at(mut self, p: Point) -> Self {
        self.state.transform.translate = p.to_vec2();
        self
    }

    /// Offset the placement.
    pub fn shifted(mut self, v: Vec2) -> Self {
        self.state.transform.translate += v;
        self
    }

    /// Set fill color and opacity.
    pub fn with_fill(mut self, color: Color, opacity: f64) -> Self {
        self.state.fill = color;
        self.state.fill_opacity = opacity;
        self
    }

    /// Set stroke color and width.
    pub fn with_stroke(mut self, color: Color, width: f64) -> Self {
        self.state.stroke = color;
        self.state.stroke_width = width;
        self
    }

    /// Set the cascaded opacity.
    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.state.opacity = opacity;
        self
    }

    /// Set a named extra attribute.
    pub fn with_attr(mut self, name: impl Into<String>, value: AttrValue) -> Self {
        self.state.attrs.insert(name.into(), value);
        self
    }

    /// Append a child.
    pub fn with_child(mut self, child: VisualObject) -> Self {
        self.children.push(child);
        self
    }
}

#[cfg(test)]
#[path = "../../tests/unit/graph/object.rs"]
mod tests;
