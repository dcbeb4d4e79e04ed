//! Explicit `.animate`-style builders: record mutator intents, turn them into atomic leaves.

use crate::{
    foundation::core::{Color, Point, Vec2},
    foundation::error::{KinescopeError, KinescopeResult},
    graph::arena::SceneGraph,
    graph::handle::ObjectMut,
    graph::object::{FamilySnapshot, ObjectId},
    interp::lerp::AttrValue,
    interp::rate::RateFunction,
    timeline::atomic::{AnimTarget, AtomicAnim, Endpoints},
    timeline::node::Timeline,
    view::camera::{ViewMutation, ViewTransform},
};

/// Default run time of a built animation, in seconds.
pub const DEFAULT_RUN_TIME: f64 = 1.0;

/// One animatable mutator, replayed against the live state when a leaf begins.
///
/// Each variant maps onto the [`ObjectMut`] method of the same name.
#[derive(Clone, Debug, PartialEq)]
pub enum Mutation {
    /// World-space translation.
    Shift(Vec2),
    /// Move the family center to a world point.
    MoveTo(Point),
    /// Uniform scale about the family center.
    Scale(f64),
    /// Non-uniform scale about the family center.
    ScaleXY(Vec2),
    /// Rotation about the family center.
    Rotate(f64),
    /// Fill and stroke color of the family.
    SetColor(Color),
    /// Fill color and opacity of the family.
    SetFill(Color, f64),
    /// Stroke color and width of the family.
    SetStroke(Color, f64),
    /// Cascaded opacity of the node.
    SetOpacity(f64),
    /// Fill opacity of the family.
    SetFillOpacity(f64),
    /// Stroke width of the family.
    SetStrokeWidth(f64),
    /// Scalar payload.
    SetValue(f64),
    /// View-axis depth.
    SetDepth(f64),
    /// Named attribute.
    SetAttr(String, AttrValue),
    /// Drawn arc-length window of the family.
    SetDrawWindow(f64, f64),
}

impl Mutation {
    pub(crate) fn apply(&self, obj: &mut ObjectMut<'_>) {
        match self {
            Self::Shift(v) => obj.shift(*v),
            Self::MoveTo(p) => obj.move_to(*p),
            Self::Scale(f) => obj.scale(*f),
            Self::ScaleXY(f) => obj.scale_xy(*f),
            Self::Rotate(a) => obj.rotate(*a),
            Self::SetColor(c) => obj.set_color(*c),
            Self::SetFill(c, o) => obj.set_fill(*c, *o),
            Self::SetStroke(c, w) => obj.set_stroke(*c, *w),
            Self::SetOpacity(o) => obj.set_opacity(*o),
            Self::SetFillOpacity(o) => obj.set_fill_opacity(*o),
            Self::SetStrokeWidth(w) => obj.set_stroke_width(*w),
            Self::SetValue(v) => obj.set_value(*v),
            Self::SetDepth(d) => obj.set_depth(*d),
            Self::SetAttr(name, value) => obj.set_attr(name.clone(), value.clone()),
            Self::SetDrawWindow(s, e) => obj.set_draw_window(*s, *e),
        };
    }

    fn moves(&self) -> bool {
        matches!(
            self,
            Self::Shift(_) | Self::MoveTo(_) | Self::Scale(_) | Self::ScaleXY(_) | Self::Rotate(_)
        )
    }

    fn numbers(&self) -> Vec<f64> {
        match self {
            Self::Shift(v) | Self::ScaleXY(v) => vec![v.x, v.y],
            Self::MoveTo(p) => vec![p.x, p.y],
            Self::Scale(x)
            | Self::Rotate(x)
            | Self::SetOpacity(x)
            | Self::SetFillOpacity(x)
            | Self::SetStrokeWidth(x)
            | Self::SetValue(x)
            | Self::SetDepth(x) => vec![*x],
            Self::SetFill(_, x) | Self::SetStroke(_, x) => vec![*x],
            Self::SetDrawWindow(s, e) => vec![*s, *e],
            Self::SetColor(_) | Self::SetAttr(..) => Vec::new(),
        }
    }

    /// Reject non-finite arguments and attribute writes that change an attribute's type.
    pub(crate) fn check(&self, graph: &SceneGraph, id: ObjectId) -> KinescopeResult<()> {
        if self.numbers().iter().any(|x| !x.is_finite()) {
            return Err(KinescopeError::validation(format!(
                "non-finite argument in {self:?}"
            )));
        }
        if let Self::SetAttr(name, value) = self
            && let Some(current) = graph.state(id)?.attrs.get(name)
        {
            current.check_compatible(value, name)?;
        }
        Ok(())
    }
}

/// Replay `mutations` on the live family of `id` and return `(live, mutated)` snapshots.
///
/// The live state is restored before returning. When a mutation touches the transform, the
/// anchor is moved onto the family center first (which does not move anything on screen).
/// Every positional leaf over the object then agrees on the anchor, so concurrent leaves
/// writing `translate` and `rotation` compose.
pub(crate) fn replay(
    graph: &mut SceneGraph,
    id: ObjectId,
    mutations: &[Mutation],
) -> KinescopeResult<(FamilySnapshot, FamilySnapshot)> {
    for m in mutations {
        m.check(graph, id)?;
    }
    if mutations.iter().any(Mutation::moves) {
        graph.object_mut(id)?.recenter_anchor();
    }
    let members = graph.family(id)?;
    let live = graph.family_snapshot(id)?;
    {
        let mut obj = graph.object_mut(id)?;
        for m in mutations {
            m.apply(&mut obj);
        }
    }
    let mutated = graph.family_snapshot(id)?;
    graph.write_family(&members, &live)?;
    live.check_compatible(&mutated)?;
    Ok((live, mutated))
}

/// Start recording an animation of `id`'s family.
pub fn animate(id: ObjectId) -> AnimateBuilder {
    AnimateBuilder {
        id,
        mutations: Vec::new(),
        run_time: DEFAULT_RUN_TIME,
        rate: RateFunction::default(),
    }
}

/// Records mutator intents for one object; see [`animate`].
#[derive(Clone, Debug)]
pub struct AnimateBuilder {
    id: ObjectId,
    mutations: Vec<Mutation>,
    run_time: f64,
    rate: RateFunction,
}

impl AnimateBuilder {
    /// Record any mutation.
    pub fn mutate(mut self, m: Mutation) -> Self {
        self.mutations.push(m);
        self
    }

    /// See [`ObjectMut::shift`].
    pub fn shift(self, by: Vec2) -> Self {
        self.mutate(Mutation::Shift(by))
    }

    /// See [`ObjectMut::move_to`].
    pub fn move_to(self, to: Point) -> Self {
        self.mutate(Mutation::MoveTo(to))
    }

    /// See [`ObjectMut::scale`].
    pub fn scale(self, factor: f64) -> Self {
        self.mutate(Mutation::Scale(factor))
    }

    /// See [`ObjectMut::scale_xy`].
    pub fn scale_xy(self, factor: Vec2) -> Self {
        self.mutate(Mutation::ScaleXY(factor))
    }

    /// See [`ObjectMut::rotate`].
    pub fn rotate(self, radians: f64) -> Self {
        self.mutate(Mutation::Rotate(radians))
    }

    /// See [`ObjectMut::set_color`].
    pub fn set_color(self, color: Color) -> Self {
        self.mutate(Mutation::SetColor(color))
    }

    /// See [`ObjectMut::set_fill`].
    pub fn set_fill(self, color: Color, opacity: f64) -> Self {
        self.mutate(Mutation::SetFill(color, opacity))
    }

    /// See [`ObjectMut::set_stroke`].
    pub fn set_stroke(self, color: Color, width: f64) -> Self {
        self.mutate(Mutation::SetStroke(color, width))
    }

    /// See [`ObjectMut::set_opacity`].
    pub fn set_opacity(self, opacity: f64) -> Self {
        self.mutate(Mutation::SetOpacity(opacity))
    }

    /// See [`ObjectMut::set_value`].
    pub fn set_value(self, value: f64) -> Self {
        self.mutate(Mutation::SetValue(value))
    }

    /// See [`ObjectMut::set_attr`].
    pub fn set_attr(self, name: impl Into<String>, value: AttrValue) -> Self {
        self.mutate(Mutation::SetAttr(name.into(), value))
    }

    /// Duration in seconds (default [`DEFAULT_RUN_TIME`]).
    pub fn run_time(mut self, secs: f64) -> Self {
        self.run_time = secs;
        self
    }

    /// Easing curve (default [`RateFunction::Smooth`]).
    pub fn rate(mut self, rate: RateFunction) -> Self {
        self.rate = rate;
        self
    }

    fn validate(&self, graph: &SceneGraph) -> KinescopeResult<()> {
        graph.node(self.id)?;
        if self.mutations.is_empty() {
            return Err(KinescopeError::malformed(format!(
                "animation of {} records no mutations",
                self.id
            )));
        }
        for m in &self.mutations {
            m.check(graph, self.id)?;
        }
        Ok(())
    }

    /// Leaf whose start is the live state when it begins and whose end replays the recorded
    /// mutations on top of it.
    pub fn build(self, graph: &SceneGraph) -> KinescopeResult<Timeline> {
        self.validate(graph)?;
        let anim = AtomicAnim::new(
            AnimTarget::Object {
                id: self.id,
                endpoints: Endpoints::Relative(self.mutations),
            },
            self.rate,
        );
        Timeline::atomic(anim, self.run_time)
    }

    /// Leaf with both endpoints captured now, from the current state.
    pub fn snapshot(self, graph: &mut SceneGraph) -> KinescopeResult<Timeline> {
        self.validate(graph)?;
        let (start, end) = replay(graph, self.id, &self.mutations)?;
        let anim = AtomicAnim::new(
            AnimTarget::Object {
                id: self.id,
                endpoints: Endpoints::Fixed { start, end },
            },
            self.rate,
        );
        Timeline::atomic(anim, self.run_time)
    }
}

/// Start recording a camera move.
pub fn animate_view() -> ViewAnimateBuilder {
    ViewAnimateBuilder {
        mutations: Vec::new(),
        run_time: DEFAULT_RUN_TIME,
        rate: RateFunction::default(),
    }
}

/// Records camera changes; see [`animate_view`].
#[derive(Clone, Debug)]
pub struct ViewAnimateBuilder {
    mutations: Vec<ViewMutation>,
    run_time: f64,
    rate: RateFunction,
}

impl ViewAnimateBuilder {
    /// Pan so the view is centered on `center`.
    pub fn move_to(mut self, center: Point) -> Self {
        self.mutations.push(ViewMutation::MoveTo(center));
        self
    }

    /// Target magnification (> 0).
    pub fn zoom(mut self, zoom: f64) -> Self {
        self.mutations.push(ViewMutation::Zoom(zoom));
        self
    }

    /// Target polar and azimuthal angles, in radians.
    pub fn orientation(mut self, phi: f64, theta: f64) -> Self {
        self.mutations.push(ViewMutation::Orientation { phi, theta });
        self
    }

    /// Target roll, in radians.
    pub fn gamma(mut self, gamma: f64) -> Self {
        self.mutations.push(ViewMutation::Gamma(gamma));
        self
    }

    /// Target eye distance (> 0).
    pub fn distance(mut self, distance: f64) -> Self {
        self.mutations.push(ViewMutation::Distance(distance));
        self
    }

    /// Duration in seconds.
    pub fn run_time(mut self, secs: f64) -> Self {
        self.run_time = secs;
        self
    }

    /// Easing of the move.
    pub fn rate(mut self, rate: RateFunction) -> Self {
        self.rate = rate;
        self
    }

    /// Leaf over the camera, relative to the camera state when it begins.
    pub fn build(self) -> KinescopeResult<Timeline> {
        if self.mutations.is_empty() {
            return Err(KinescopeError::malformed("camera move records no changes"));
        }
        ViewTransform::default().with_mutations(&self.mutations)?;
        let anim = AtomicAnim::new(
            AnimTarget::View(Endpoints::Relative(self.mutations)),
            self.rate,
        );
        Timeline::atomic(anim, self.run_time)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/animate.rs"]
mod tests;
