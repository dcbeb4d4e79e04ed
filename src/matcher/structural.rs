use std::collections::{BTreeMap, VecDeque};

use crate::{
    graph::arena::SceneGraph, graph::object::ObjectId, interp::rate::RateFunction,
    timeline::animate::DEFAULT_RUN_TIME,
};

/// Knobs for [`match_trees`] and [`crate::transform_matching`].
#[derive(Clone, Debug)]
pub struct MatchOptions {
    /// Source tag to destination tag aliases, applied before indexing.
    pub key_map: BTreeMap<String, String>,
    /// Run time of the whole transition.
    pub run_time: f64,
    /// Easing shared by every leaf.
    pub rate: RateFunction,
    /// Shrink unmatched source parts into their centers while they fade.
    pub shrink_residuals: bool,
    /// Grow unmatched destination parts from their centers while they fade in.
    pub grow_residuals: bool,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            key_map: BTreeMap::new(),
            run_time: DEFAULT_RUN_TIME,
            rate: RateFunction::default(),
            shrink_residuals: false,
            grow_residuals: false,
        }
    }
}

impl MatchOptions {
    /// Match source parts tagged `from` with destination parts tagged `to`.
    pub fn alias(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.key_map.insert(from.into(), to.into());
        self
    }
}

/// Pairing of matching units between two trees.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MatchRecord {
    /// `(source, destination)` pairs, in destination document order.
    pub pairs: Vec<(ObjectId, ObjectId)>,
    /// Source units with no partner, in document order.
    pub source_only: Vec<ObjectId>,
    /// Destination units with no partner, in document order.
    pub destination_only: Vec<ObjectId>,
}

/// Matching units below `root`, in document order.
///
/// A tagged node is a unit as a whole. Untagged nodes with children are descended into;
/// untagged leaves are units that can never pair. A childless root with a tag or geometry
/// is its own unit.
pub fn matching_units(graph: &SceneGraph, root: ObjectId) -> Vec<ObjectId> {
    let Some(node) = graph.get(root) else {
        return Vec::new();
    };
    if node.children().is_empty() {
        if node.tag().is_some() || !node.state().path.is_empty() {
            return vec![root];
        }
        return Vec::new();
    }
    let mut out = Vec::new();
    collect_units(graph, node.children(), &mut out);
    out
}

fn collect_units(graph: &SceneGraph, children: &[ObjectId], out: &mut Vec<ObjectId>) {
    for &child in children {
        let Some(node) = graph.get(child) else {
            continue;
        };
        if node.tag().is_some() || node.children().is_empty() {
            out.push(child);
        } else {
            collect_units(graph, node.children(), out);
        }
    }
}

/// Pair units of `source` and `destination` by tag.
///
/// Each destination unit, in document order, takes the first unused source unit carrying
/// the same tag. Extra occurrences on either side end up unmatched. Dead roots yield an
/// empty side.
pub fn match_trees(
    graph: &SceneGraph,
    source: ObjectId,
    destination: ObjectId,
    opts: &MatchOptions,
) -> MatchRecord {
    let src_units = matching_units(graph, source);
    let dst_units = matching_units(graph, destination);

    let mut by_key: BTreeMap<&str, VecDeque<usize>> = BTreeMap::new();
    for (i, &id) in src_units.iter().enumerate() {
        if let Some(tag) = graph.get(id).and_then(|n| n.tag()) {
            let key = opts.key_map.get(tag).map(String::as_str).unwrap_or(tag);
            by_key.entry(key).or_default().push_back(i);
        }
    }

    let mut used = vec![false; src_units.len()];
    let mut record = MatchRecord::default();
    for &dst in &dst_units {
        let hit = graph
            .get(dst)
            .and_then(|n| n.tag())
            .and_then(|tag| by_key.get_mut(tag))
            .and_then(VecDeque::pop_front);
        match hit {
            Some(i) => {
                used[i] = true;
                record.pairs.push((src_units[i], dst));
            }
            None => record.destination_only.push(dst),
        }
    }
    record.source_only = src_units
        .iter()
        .zip(&used)
        .filter(|(_, used)| !**used)
        .map(|(&id, _)| id)
        .collect();
    record
}

#[cfg(test)]
#[path = "../../tests/unit/matcher/structural.rs"]
mod tests;
