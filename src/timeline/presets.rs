//! Ready-made animations built from atomic leaves and graph-edit hooks.

use crate::{
    foundation::core::{Color, Vec2},
    foundation::error::{KinescopeError, KinescopeResult},
    graph::arena::SceneGraph,
    graph::edit::GraphEdit,
    graph::object::{FamilySnapshot, ObjectId, VisualObject},
    interp::rate::RateFunction,
    timeline::animate::{DEFAULT_RUN_TIME, Mutation},
    timeline::atomic::{AnimTarget, AtomicAnim, Endpoints},
    timeline::node::Timeline,
};

/// Scale factor used by [`indicate`].
pub const INDICATE_SCALE: f64 = 1.2;
/// Gap between an object and the outline drawn by [`circumscribe`].
pub const CIRCUMSCRIBE_BUFF: f64 = 0.2;

fn leaf(graph: &SceneGraph, anim: AtomicAnim, run_time: f64) -> KinescopeResult<Timeline> {
    anim.validate(graph)?;
    Timeline::atomic(anim, run_time)
}

fn object_anim(
    id: ObjectId,
    endpoints: Endpoints<FamilySnapshot, Mutation>,
    rate: RateFunction,
) -> AtomicAnim {
    AtomicAnim::new(AnimTarget::Object { id, endpoints }, rate)
}

fn fade_mutations(shift: Vec2) -> Vec<Mutation> {
    let mut ms = vec![Mutation::SetOpacity(0.0)];
    if shift != Vec2::ZERO {
        ms.push(Mutation::Shift(shift));
    }
    ms
}

/// Bring `id` into the scene from transparent, travelling along `shift` on the way in.
pub fn fade_in(graph: &SceneGraph, id: ObjectId, shift: Vec2) -> KinescopeResult<Timeline> {
    let anim = object_anim(
        id,
        Endpoints::RelativeFrom(fade_mutations(-shift)),
        RateFunction::default(),
    );
    Ok(leaf(graph, anim, DEFAULT_RUN_TIME)?.with_on_begin(GraphEdit::Introduce(id)))
}

/// Fade `id` to transparent while moving by `shift`, then take it out of the scene.
///
/// The detached object keeps its pre-fade state.
pub fn fade_out(graph: &SceneGraph, id: ObjectId, shift: Vec2) -> KinescopeResult<Timeline> {
    let anim = object_anim(
        id,
        Endpoints::Relative(fade_mutations(shift)),
        RateFunction::default(),
    )
    .reset_after();
    Ok(leaf(graph, anim, DEFAULT_RUN_TIME)?.with_on_finish(GraphEdit::Detach(id)))
}

/// Draw the family's outlines from nothing.
pub fn create(graph: &SceneGraph, id: ObjectId) -> KinescopeResult<Timeline> {
    let anim = object_anim(
        id,
        Endpoints::RelativeFrom(vec![Mutation::SetDrawWindow(0.0, 0.0)]),
        RateFunction::default(),
    );
    Ok(leaf(graph, anim, DEFAULT_RUN_TIME)?.with_on_begin(GraphEdit::Introduce(id)))
}

/// Reverse of [`create`]; the object leaves the scene afterwards.
pub fn uncreate(graph: &SceneGraph, id: ObjectId) -> KinescopeResult<Timeline> {
    let anim = object_anim(
        id,
        Endpoints::Relative(vec![Mutation::SetDrawWindow(0.0, 0.0)]),
        RateFunction::default(),
    )
    .reset_after();
    Ok(leaf(graph, anim, DEFAULT_RUN_TIME)?.with_on_finish(GraphEdit::Detach(id)))
}

/// Handwriting effect: each drawable leaf is drawn and filled in turn, overlapping.
///
/// Lasts one second for fewer than 15 leaves and two seconds otherwise.
pub fn write(graph: &SceneGraph, id: ObjectId) -> KinescopeResult<Timeline> {
    let leaves: Vec<ObjectId> = graph
        .leaves(id)?
        .into_iter()
        .filter(|&l| graph.state(l).is_ok_and(|s| !s.path.is_empty()))
        .collect();
    if leaves.is_empty() {
        return create(graph, id);
    }

    let n = leaves.len() as f64;
    let lag_ratio = (4.0 / n.max(1.0)).min(0.2);
    let run_time = if leaves.len() < 15 { 1.0 } else { 2.0 };
    let unit = run_time / ((n - 1.0) * lag_ratio + 1.0);

    let children = leaves
        .into_iter()
        .map(|l| {
            let anim = object_anim(
                l,
                Endpoints::RelativeFrom(vec![
                    Mutation::SetDrawWindow(0.0, 0.0),
                    Mutation::SetFillOpacity(0.0),
                ]),
                RateFunction::Linear,
            );
            leaf(graph, anim, unit)
        })
        .collect::<KinescopeResult<Vec<_>>>()?;
    Ok(Timeline::lagged(children, lag_ratio)?.with_on_begin(GraphEdit::Introduce(id)))
}

/// Grow from a point at the family center.
pub fn grow_from_center(graph: &SceneGraph, id: ObjectId) -> KinescopeResult<Timeline> {
    let anim = object_anim(
        id,
        Endpoints::RelativeFrom(vec![Mutation::Scale(0.0)]),
        RateFunction::default(),
    );
    Ok(leaf(graph, anim, DEFAULT_RUN_TIME)?.with_on_begin(GraphEdit::Introduce(id)))
}

/// Shrink into the family center, then leave the scene.
pub fn shrink_to_center(graph: &SceneGraph, id: ObjectId) -> KinescopeResult<Timeline> {
    let anim = object_anim(
        id,
        Endpoints::Relative(vec![Mutation::Scale(0.0)]),
        RateFunction::default(),
    )
    .reset_after();
    Ok(leaf(graph, anim, DEFAULT_RUN_TIME)?.with_on_finish(GraphEdit::Detach(id)))
}

/// Morph `source` into the shape, style and placement of `target`. `target` is not added
/// to the scene.
pub fn transform(
    graph: &SceneGraph,
    source: ObjectId,
    target: ObjectId,
) -> KinescopeResult<Timeline> {
    let anim = AtomicAnim::new(AnimTarget::Morph { source, target }, RateFunction::default());
    leaf(graph, anim, DEFAULT_RUN_TIME)
}

/// Like [`transform`], but `target` takes `source`'s place in the tree once finished and
/// `source` is destroyed.
pub fn replacement_transform(
    graph: &SceneGraph,
    source: ObjectId,
    target: ObjectId,
) -> KinescopeResult<Timeline> {
    Ok(transform(graph, source, target)?.with_on_finish(GraphEdit::Replace {
        old: source,
        new: target,
    }))
}

/// Briefly enlarge and highlight, then return to the original state.
pub fn indicate(graph: &SceneGraph, id: ObjectId) -> KinescopeResult<Timeline> {
    let anim = object_anim(
        id,
        Endpoints::Relative(vec![
            Mutation::Scale(INDICATE_SCALE),
            Mutation::SetColor(Color::YELLOW),
        ]),
        RateFunction::ThereAndBack,
    );
    leaf(graph, anim, DEFAULT_RUN_TIME)
}

/// Trace an outline around the object's bounding box and retract it again.
///
/// The outline is a temporary object destroyed when the animation finishes.
pub fn circumscribe(graph: &mut SceneGraph, id: ObjectId) -> KinescopeResult<Timeline> {
    let Some(bounds) = graph.bounding_box(id)? else {
        return Err(KinescopeError::validation(format!(
            "{id} has no geometry to circumscribe"
        )));
    };
    let outline = graph.insert(
        VisualObject::rect(
            bounds.width() + 2.0 * CIRCUMSCRIBE_BUFF,
            bounds.height() + 2.0 * CIRCUMSCRIBE_BUFF,
        )
        .with_stroke(Color::YELLOW, 0.04)
        .at(bounds.center())
        .named("circumscribe"),
    );

    let half = DEFAULT_RUN_TIME / 2.0;
    let draw = leaf(
        graph,
        object_anim(
            outline,
            Endpoints::RelativeFrom(vec![Mutation::SetDrawWindow(0.0, 0.0)]),
            RateFunction::default(),
        ),
        half,
    )?;
    let retract = leaf(
        graph,
        object_anim(
            outline,
            Endpoints::Relative(vec![Mutation::SetDrawWindow(1.0, 1.0)]),
            RateFunction::default(),
        ),
        half,
    )?;
    Ok(Timeline::sequential(vec![draw, retract])?
        .with_on_begin(GraphEdit::Introduce(outline))
        .with_on_finish(GraphEdit::Destroy(outline)))
}

/// Hold the scene for `secs` seconds.
pub fn wait(secs: f64) -> KinescopeResult<Timeline> {
    Timeline::wait(secs)
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/presets.rs"]
mod tests;
