use crate::{
    foundation::core::Transform2D,
    foundation::error::KinescopeResult,
    graph::arena::SceneGraph,
    graph::edit::GraphEdit,
    graph::object::ObjectId,
    matcher::structural::{MatchOptions, match_trees},
    timeline::animate::Mutation,
    timeline::atomic::{AnimTarget, AtomicAnim, Endpoints},
    timeline::node::Timeline,
};

fn leaf(graph: &SceneGraph, anim: AtomicAnim, opts: &MatchOptions) -> KinescopeResult<Timeline> {
    anim.validate(graph)?;
    Timeline::atomic(anim, opts.run_time)
}

/// Transition from the tree at `source` to the tree at `destination`, part by part.
///
/// Matched parts morph into their partners, unmatched source parts fade out and unmatched
/// destination parts fade in as copies attached under `source`. When the transition
/// finishes, `destination` takes `source`'s place in the tree and `source` is freed.
/// `destination` is usually a detached tree built for the purpose.
#[tracing::instrument(skip(graph, opts))]
pub fn transform_matching(
    graph: &mut SceneGraph,
    source: ObjectId,
    destination: ObjectId,
    opts: &MatchOptions,
) -> KinescopeResult<Timeline> {
    graph.node(source)?;
    graph.node(destination)?;
    let record = match_trees(graph, source, destination, opts);
    tracing::debug!(
        pairs = record.pairs.len(),
        source_only = record.source_only.len(),
        destination_only = record.destination_only.len(),
        "matched trees"
    );

    let mut children = Vec::new();
    for &(src, dst) in &record.pairs {
        let anim = AtomicAnim::new(
            AnimTarget::Morph {
                source: src,
                target: dst,
            },
            opts.rate.clone(),
        );
        children.push(leaf(graph, anim, opts)?);
    }

    for &id in &record.source_only {
        let mut out = vec![Mutation::SetOpacity(0.0)];
        if opts.shrink_residuals {
            out.push(Mutation::Scale(0.0));
        }
        let anim = AtomicAnim::new(
            AnimTarget::Object {
                id,
                endpoints: Endpoints::Relative(out),
            },
            opts.rate.clone(),
        );
        children.push(leaf(graph, anim, opts)?);
    }

    let source_world = graph.world_transform(source)?;
    for &id in &record.destination_only {
        let world = graph.world_transform(id)?;
        let copy = graph.clone_subtree(id)?;
        graph.state_mut(copy)?.transform = Transform2D::from_affine(source_world.inverse() * world);

        let mut from = vec![Mutation::SetOpacity(0.0)];
        if opts.grow_residuals {
            from.push(Mutation::Scale(0.0));
        }
        let anim = AtomicAnim::new(
            AnimTarget::Object {
                id: copy,
                endpoints: Endpoints::RelativeFrom(from),
            },
            opts.rate.clone(),
        );
        children.push(leaf(graph, anim, opts)?.with_on_begin(GraphEdit::Attach {
            parent: Some(source),
            child: copy,
            index: None,
        }));
    }

    let body = if children.is_empty() {
        Timeline::wait(opts.run_time)?
    } else {
        Timeline::parallel(children)?
    };
    Ok(body.with_on_finish(GraphEdit::Replace {
        old: source,
        new: destination,
    }))
}

#[cfg(test)]
#[path = "../../tests/unit/matcher/transition.rs"]
mod tests;
