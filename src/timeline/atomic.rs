use crate::{
    foundation::core::Transform2D,
    foundation::error::{KinescopeError, KinescopeResult},
    graph::align::align_families,
    graph::arena::SceneGraph,
    graph::object::{FamilySnapshot, ObjectId},
    interp::rate::RateFunction,
    timeline::animate::{Mutation, replay},
    timeline::node::ApplyCtx,
    view::camera::{ViewMutation, ViewTransform},
};

/// Where the two ends of an atomic animation come from.
#[derive(Clone, Debug)]
pub enum Endpoints<S, M> {
    /// Both states captured when the animation was built.
    Fixed {
        /// State at progress 0.
        start: S,
        /// State at progress 1.
        end: S,
    },
    /// Start is the live state when the leaf begins; end replays the mutations on it.
    Relative(Vec<M>),
    /// End is the live state when the leaf begins; start replays the mutations on it.
    RelativeFrom(Vec<M>),
}

/// What an atomic animation drives.
#[derive(Clone, Debug)]
pub enum AnimTarget {
    /// The family of one object.
    Object {
        /// Family root.
        id: ObjectId,
        /// Endpoint source.
        endpoints: Endpoints<FamilySnapshot, Mutation>,
    },
    /// Morph `source`'s family into the shape and placement of `target`'s.
    ///
    /// Both families are aligned when the leaf begins; `target` itself is left untouched.
    Morph {
        /// Object that moves.
        source: ObjectId,
        /// Object whose state is the end point.
        target: ObjectId,
    },
    /// The camera.
    View(Endpoints<ViewTransform, ViewMutation>),
}

#[derive(Clone, Debug)]
enum Resolved {
    Object {
        members: Vec<ObjectId>,
        start: FamilySnapshot,
        end: FamilySnapshot,
    },
    View {
        start: ViewTransform,
        end: ViewTransform,
    },
}

/// Leaf payload: a target, its endpoints and an easing curve.
#[derive(Clone, Debug)]
pub struct AtomicAnim {
    target: AnimTarget,
    rate: RateFunction,
    reset_after: bool,
    resolved: Option<Resolved>,
}

impl AtomicAnim {
    /// Animation of `target` eased by `rate`.
    pub fn new(target: AnimTarget, rate: RateFunction) -> Self {
        Self {
            target,
            rate,
            reset_after: false,
            resolved: None,
        }
    }

    /// Write the start state back once the leaf finishes (used by removers such as
    /// fade-out, whose object leaves the scene in its original state).
    pub fn reset_after(mut self) -> Self {
        self.reset_after = true;
        self
    }

    /// Easing curve.
    pub fn rate(&self) -> &RateFunction {
        &self.rate
    }

    /// Driven object, if any.
    pub fn target_id(&self) -> Option<ObjectId> {
        match &self.target {
            AnimTarget::Object { id, .. } => Some(*id),
            AnimTarget::Morph { source, .. } => Some(*source),
            AnimTarget::View(_) => None,
        }
    }

    /// Graph-independent checks on the endpoints themselves.
    pub(crate) fn check_endpoints(&self) -> KinescopeResult<()> {
        match &self.target {
            AnimTarget::Object {
                endpoints: Endpoints::Fixed { start, end },
                ..
            } => start.check_compatible(end),
            _ => Ok(()),
        }
    }

    /// Construction-time checks against the current graph.
    pub(crate) fn validate(&self, graph: &SceneGraph) -> KinescopeResult<()> {
        match &self.target {
            AnimTarget::Object { id, endpoints } => {
                graph.node(*id)?;
                match endpoints {
                    Endpoints::Fixed { start, end } => {
                        start.check_compatible(end)?;
                        let members = graph.family(*id)?.len();
                        if members != start.len() {
                            return Err(KinescopeError::type_mismatch(format!(
                                "{id} has {members} family members, endpoints describe {}",
                                start.len()
                            )));
                        }
                    }
                    Endpoints::Relative(ms) | Endpoints::RelativeFrom(ms) => {
                        for m in ms {
                            m.check(graph, *id)?;
                        }
                    }
                }
            }
            AnimTarget::Morph { source, target } => {
                graph.node(*source)?;
                graph.node(*target)?;
                if graph.is_ancestor_or_self(*source, *target)
                    || graph.is_ancestor_or_self(*target, *source)
                {
                    return Err(KinescopeError::validation(format!(
                        "cannot morph {source} into {target}: one contains the other"
                    )));
                }
            }
            AnimTarget::View(Endpoints::Relative(ms) | Endpoints::RelativeFrom(ms)) => {
                ViewTransform::default().with_mutations(ms)?;
            }
            AnimTarget::View(Endpoints::Fixed { .. }) => {}
        }
        Ok(())
    }

    /// Capture endpoints against the live state. Runs once, when the leaf begins.
    pub(crate) fn resolve(&mut self, ctx: &mut ApplyCtx<'_>) -> KinescopeResult<()> {
        let resolved = match &self.target {
            AnimTarget::Object { id, endpoints } => {
                let members = ctx.graph.family(*id)?;
                let (start, end) = match endpoints {
                    Endpoints::Fixed { start, end } => {
                        if members.len() != start.len() {
                            return Err(KinescopeError::evaluation(format!(
                                "{id} changed shape before its animation began"
                            )));
                        }
                        start.check_compatible(end)?;
                        (start.clone(), end.clone())
                    }
                    Endpoints::Relative(ms) => replay(ctx.graph, *id, ms)?,
                    Endpoints::RelativeFrom(ms) => {
                        let (live, mutated) = replay(ctx.graph, *id, ms)?;
                        (mutated, live)
                    }
                };
                Resolved::Object {
                    members,
                    start,
                    end,
                }
            }
            AnimTarget::Morph { source, target } => {
                let (start, end) = morph_endpoints(ctx.graph, *source, *target)?;
                Resolved::Object {
                    members: ctx.graph.family(*source)?,
                    start,
                    end,
                }
            }
            AnimTarget::View(endpoints) => {
                let live = *ctx.view;
                let (start, end) = match endpoints {
                    Endpoints::Fixed { start, end } => (*start, *end),
                    Endpoints::Relative(ms) => (live, live.with_mutations(ms)?),
                    Endpoints::RelativeFrom(ms) => (live.with_mutations(ms)?, live),
                };
                Resolved::View { start, end }
            }
        };
        self.resolved = Some(resolved);
        Ok(())
    }

    /// Write the state at linear progress `t` (eased through the rate function).
    ///
    /// With `lenient`, members that no longer exist are skipped instead of failing.
    pub(crate) fn apply(
        &self,
        ctx: &mut ApplyCtx<'_>,
        t: f64,
        lenient: bool,
    ) -> KinescopeResult<()> {
        self.write(ctx, self.rate.apply(t), lenient)
    }

    /// Runs once the leaf is terminal, after its final state was applied.
    pub(crate) fn finish(&self, ctx: &mut ApplyCtx<'_>) -> KinescopeResult<()> {
        if self.reset_after {
            self.write(ctx, 0.0, true)?;
        }
        Ok(())
    }

    fn write(&self, ctx: &mut ApplyCtx<'_>, eased: f64, lenient: bool) -> KinescopeResult<()> {
        match &self.resolved {
            Some(Resolved::Object {
                members,
                start,
                end,
            }) => {
                for ((id, a), b) in members.iter().zip(&start.states).zip(&end.states) {
                    match ctx.graph.state_mut(*id) {
                        Ok(live) => live.blend_changed(a, b, eased),
                        Err(_) if lenient => {}
                        Err(e) => return Err(e),
                    }
                }
                Ok(())
            }
            Some(Resolved::View { start, end }) => {
                ctx.view.blend_changed(start, end, eased);
                Ok(())
            }
            None if lenient => Ok(()),
            None => Err(KinescopeError::evaluation(
                "atomic animation applied before it began",
            )),
        }
    }
}

/// Align `source` with a copy of `target` placed in `source`'s parent space, then snapshot
/// both. The copy is freed again.
fn morph_endpoints(
    graph: &mut SceneGraph,
    source: ObjectId,
    target: ObjectId,
) -> KinescopeResult<(FamilySnapshot, FamilySnapshot)> {
    let world = graph.world_transform(target)?;
    let parent = graph.parent_world_transform(source)?;
    let copy = graph.clone_subtree(target)?;
    graph.state_mut(copy)?.transform = Transform2D::from_affine(parent.inverse() * world);

    align_families(graph, source, copy)?;
    let start = graph.family_snapshot(source)?;
    let end = graph.family_snapshot(copy)?;
    graph.destroy(copy)?;
    start.check_compatible(&end)?;
    Ok((start, end))
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/atomic.rs"]
mod tests;
