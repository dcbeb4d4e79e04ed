use crate::{
    foundation::core::{Affine, Color, Point, Rect, Vec2},
    foundation::error::KinescopeResult,
    graph::arena::SceneGraph,
    graph::object::{ObjectId, ObjectState},
    interp::lerp::AttrValue,
};

impl SceneGraph {
    /// Fluent mutator for a live node.
    pub fn object_mut(&mut self, id: ObjectId) -> KinescopeResult<ObjectMut<'_>> {
        self.node(id)?;
        Ok(ObjectMut { graph: self, id })
    }
}

/// Chaining mutators over one node (and, for style setters, its family).
///
/// Positional mutators (`shift`, `move_to`, `next_to`, `align_to`) take world-space
/// arguments. `scale` and `rotate` pivot about the center of the node's family.
pub struct ObjectMut<'a> {
    graph: &'a mut SceneGraph,
    id: ObjectId,
}

impl ObjectMut<'_> {
    /// Handle being mutated.
    pub fn id(&self) -> ObjectId {
        self.id
    }

    fn family(&self) -> Vec<ObjectId> {
        self.graph.family(self.id).unwrap_or_default()
    }

    fn each_member(&mut self, mut f: impl FnMut(&mut ObjectState)) -> &mut Self {
        for member in self.family() {
            if let Ok(state) = self.graph.state_mut(member) {
                f(state);
            }
        }
        self
    }

    fn own(&mut self, f: impl FnOnce(&mut ObjectState)) -> &mut Self {
        if let Ok(state) = self.graph.state_mut(self.id) {
            f(state);
        }
        self
    }

    /// Translate by a world-space vector.
    pub fn shift(&mut self, by: Vec2) -> &mut Self {
        let parent = self
            .graph
            .parent_world_transform(self.id)
            .unwrap_or(Affine::IDENTITY);
        let local = linear_part(parent.inverse()) * by.to_point();
        self.own(|s| s.transform.translate += local.to_vec2())
    }

    /// Move the family's bounding-box center to a world-space point.
    pub fn move_to(&mut self, to: Point) -> &mut Self {
        match self.graph.center(self.id) {
            Ok(center) => self.shift(to - center),
            Err(_) => self,
        }
    }

    /// Place the family beside `other`'s bounding box in direction `dir`, `buff` apart.
    pub fn next_to(&mut self, other: ObjectId, dir: Vec2, buff: f64) -> &mut Self {
        let (Ok(Some(target)), Ok(Some(own))) = (
            self.graph.bounding_box(other),
            self.graph.bounding_box(self.id),
        ) else {
            return self;
        };
        let anchor = critical_point(target, dir) + dir * buff;
        let from = critical_point(own, -dir);
        self.shift(anchor - from)
    }

    /// Line up the family's edge in direction `dir` with the same edge of `other`.
    pub fn align_to(&mut self, other: ObjectId, dir: Vec2) -> &mut Self {
        let (Ok(Some(target)), Ok(Some(own))) = (
            self.graph.bounding_box(other),
            self.graph.bounding_box(self.id),
        ) else {
            return self;
        };
        let mut delta = critical_point(target, dir) - critical_point(own, dir);
        if dir.x == 0.0 {
            delta.x = 0.0;
        }
        if dir.y == 0.0 {
            delta.y = 0.0;
        }
        self.shift(delta)
    }

    /// Move the anchor onto the family's local center without moving anything on screen.
    pub(crate) fn recenter_anchor(&mut self) -> &mut Self {
        let Ok(Some(bounds)) = self.graph.local_bounds(self.id) else {
            return self;
        };
        let c = bounds.center().to_vec2();
        self.own(|s| {
            let t = &mut s.transform;
            let rs =
                Affine::rotate(t.rotation_rad) * Affine::scale_non_uniform(t.scale.x, t.scale.y);
            let d = t.anchor - c;
            t.translate += d - (rs * d.to_point()).to_vec2();
            t.anchor = c;
        })
    }

    /// Uniform scale about the family center.
    pub fn scale(&mut self, factor: f64) -> &mut Self {
        self.scale_xy(Vec2::new(factor, factor))
    }

    /// Non-uniform scale about the family center.
    pub fn scale_xy(&mut self, factor: Vec2) -> &mut Self {
        self.recenter_anchor().own(|s| {
            s.transform.scale.x *= factor.x;
            s.transform.scale.y *= factor.y;
        })
    }

    /// Rotate counter-clockwise about the family center.
    pub fn rotate(&mut self, radians: f64) -> &mut Self {
        self.recenter_anchor()
            .own(|s| s.transform.rotation_rad += radians)
    }

    /// Recolor fill and stroke of every family member.
    pub fn set_color(&mut self, color: Color) -> &mut Self {
        self.each_member(|s| {
            s.fill = color;
            s.stroke = color;
        })
    }

    /// Set fill color and opacity of every family member.
    pub fn set_fill(&mut self, color: Color, opacity: f64) -> &mut Self {
        self.each_member(|s| {
            s.fill = color;
            s.fill_opacity = opacity;
        })
    }

    /// Set stroke color and width of every family member.
    pub fn set_stroke(&mut self, color: Color, width: f64) -> &mut Self {
        self.each_member(|s| {
            s.stroke = color;
            s.stroke_width = width;
        })
    }

    /// Set the node's cascaded opacity.
    pub fn set_opacity(&mut self, opacity: f64) -> &mut Self {
        self.own(|s| s.opacity = opacity)
    }

    /// Set fill opacity of every family member.
    pub fn set_fill_opacity(&mut self, opacity: f64) -> &mut Self {
        self.each_member(|s| s.fill_opacity = opacity)
    }

    /// Set stroke width of every family member.
    pub fn set_stroke_width(&mut self, width: f64) -> &mut Self {
        self.each_member(|s| s.stroke_width = width)
    }

    /// Set the scalar payload.
    pub fn set_value(&mut self, value: f64) -> &mut Self {
        self.own(|s| s.value = value)
    }

    /// Set a named attribute.
    pub fn set_attr(&mut self, name: impl Into<String>, value: AttrValue) -> &mut Self {
        let name = name.into();
        self.own(|s| {
            s.attrs.insert(name, value);
        })
    }

    /// Set the view-axis depth.
    pub fn set_depth(&mut self, depth: f64) -> &mut Self {
        self.own(|s| s.depth = depth)
    }

    /// Set the drawn arc-length window of every family member.
    pub fn set_draw_window(&mut self, start: f64, end: f64) -> &mut Self {
        self.each_member(|s| {
            s.draw_start = start;
            s.draw_end = end;
        })
    }

    /// Set the structural-matching tag.
    pub fn tag(&mut self, tag: impl Into<String>) -> &mut Self {
        if let Ok(node) = self.graph.node_mut(self.id) {
            node.tag = Some(tag.into());
        }
        self
    }
}

fn linear_part(m: Affine) -> Affine {
    let [a, b, c, d, _, _] = m.as_coeffs();
    Affine::new([a, b, c, d, 0.0, 0.0])
}

/// Point of `r` furthest in direction `dir` (per axis: edge, or center when the component
/// is zero).
pub(crate) fn critical_point(r: Rect, dir: Vec2) -> Point {
    let c = r.center();
    let pick = |lo: f64, hi: f64, mid: f64, d: f64| {
        if d > 0.0 {
            hi
        } else if d < 0.0 {
            lo
        } else {
            mid
        }
    };
    Point::new(pick(r.x0, r.x1, c.x, dir.x), pick(r.y0, r.y1, c.y, dir.y))
}

#[cfg(test)]
#[path = "../../tests/unit/graph/handle.rs"]
mod tests;
