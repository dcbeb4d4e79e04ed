use crate::{
    foundation::error::KinescopeResult,
    graph::arena::SceneGraph,
    graph::object::{ObjectId, ObjectState, VisualObject},
    interp::path::PathData,
};

/// Pad two subtrees until their families have the same shape, so their snapshots blend
/// member by member.
///
/// At every level the node with fewer children grows new ones: existing children are
/// repeated as invisible copies spread evenly across the list, and a childless node
/// receives collapsed single-point children at its own centroid.
pub fn align_families(graph: &mut SceneGraph, a: ObjectId, b: ObjectId) -> KinescopeResult<()> {
    let na = graph.node(a)?.children().len();
    let nb = graph.node(b)?.children().len();
    if na < nb {
        pad_children(graph, a, nb)?;
    } else if nb < na {
        pad_children(graph, b, na)?;
    }

    let ca = graph.node(a)?.children().to_vec();
    let cb = graph.node(b)?.children().to_vec();
    for (x, y) in ca.into_iter().zip(cb) {
        align_families(graph, x, y)?;
    }
    Ok(())
}

fn pad_children(graph: &mut SceneGraph, id: ObjectId, target: usize) -> KinescopeResult<()> {
    let children = graph.node(id)?.children().to_vec();
    let current = children.len();
    if current >= target {
        return Ok(());
    }

    if current == 0 {
        let state = graph.state(id)?;
        let point = ObjectState {
            path: PathData::open(vec![state.path.centroid()]),
            transform: Default::default(),
            ..state.clone()
        };
        for _ in 0..target {
            let child = graph.insert(VisualObject {
                state: point.clone(),
                ..VisualObject::default()
            });
            graph.add_child(id, child)?;
        }
        return Ok(());
    }

    // Child i is repeated once per slot that maps onto it.
    let mut split = vec![0usize; current];
    for slot in 0..target {
        split[slot * current / target] += 1;
    }
    let mut index = 0;
    for (child, copies) in children.into_iter().zip(split) {
        index += 1;
        for _ in 1..copies {
            let copy = graph.clone_subtree(child)?;
            graph.state_mut(copy)?.opacity = 0.0;
            graph.insert_child(id, index, copy)?;
            index += 1;
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/graph/align.rs"]
mod tests;
