use super::*;
use crate::foundation::core::Point;
use crate::graph::object::VisualObject;

fn glyph(tag: &str, x: f64) -> VisualObject {
    VisualObject::rect(0.5, 0.5)
        .at(Point::new(x, 0.0))
        .with_tag(tag)
}

fn row(g: &mut SceneGraph, tags: &[&str]) -> ObjectId {
    g.insert(VisualObject::group(
        tags.iter()
            .enumerate()
            .map(|(i, t)| glyph(t, i as f64)),
    ))
}

fn tags(g: &SceneGraph, ids: &[ObjectId]) -> Vec<String> {
    ids.iter()
        .map(|&id| g.node(id).unwrap().tag().unwrap_or("-").to_string())
        .collect()
}

#[test]
fn identical_trees_pair_everything() {
    let mut g = SceneGraph::new();
    let a = row(&mut g, &["x", "^2", "+", "y"]);
    let b = g.clone_subtree(a).unwrap();
    let rec = match_trees(&g, a, b, &MatchOptions::default());
    assert_eq!(rec.pairs.len(), 4);
    assert!(rec.source_only.is_empty());
    assert!(rec.destination_only.is_empty());
    for (s, d) in &rec.pairs {
        assert_eq!(g.node(*s).unwrap().tag(), g.node(*d).unwrap().tag());
    }
}

#[test]
fn repeated_tags_are_consumed_left_to_right() {
    let mut g = SceneGraph::new();
    let a = row(&mut g, &["x", "x", "x"]);
    let b = row(&mut g, &["x", "x"]);
    let rec = match_trees(&g, a, b, &MatchOptions::default());
    let src = g.node(a).unwrap().children().to_vec();
    let dst = g.node(b).unwrap().children().to_vec();
    assert_eq!(rec.pairs, vec![(src[0], dst[0]), (src[1], dst[1])]);
    assert_eq!(rec.source_only, vec![src[2]]);
}

#[test]
fn disjoint_tags_never_pair() {
    let mut g = SceneGraph::new();
    let a = row(&mut g, &["p", "q"]);
    let b = row(&mut g, &["r"]);
    let rec = match_trees(&g, a, b, &MatchOptions::default());
    assert!(rec.pairs.is_empty());
    assert_eq!(tags(&g, &rec.source_only), ["p", "q"]);
    assert_eq!(tags(&g, &rec.destination_only), ["r"]);
}

#[test]
fn tagged_groups_are_single_units_and_untagged_groups_are_descended() {
    let mut g = SceneGraph::new();
    let a = g.insert(VisualObject::group([
        VisualObject::group([glyph("a", 0.0), glyph("b", 1.0)]).with_tag("frac"),
        VisualObject::group([glyph("c", 2.0), VisualObject::dot()]),
    ]));
    let units = matching_units(&g, a);
    assert_eq!(tags(&g, &units), ["frac", "c", "-"]);

    let leaf = g.insert(VisualObject::dot());
    assert_eq!(matching_units(&g, leaf), vec![leaf]);
}

#[test]
fn untagged_leaves_stay_residual() {
    let mut g = SceneGraph::new();
    let a = g.insert(VisualObject::group([VisualObject::dot(), glyph("x", 1.0)]));
    let b = g.clone_subtree(a).unwrap();
    let rec = match_trees(&g, a, b, &MatchOptions::default());
    assert_eq!(rec.pairs.len(), 1);
    assert_eq!(rec.source_only.len(), 1);
    assert_eq!(rec.destination_only.len(), 1);
}

#[test]
fn key_map_aliases_source_tags() {
    let mut g = SceneGraph::new();
    let a = row(&mut g, &["y"]);
    let b = row(&mut g, &["z"]);
    let opts = MatchOptions::default().alias("y", "z");
    let rec = match_trees(&g, a, b, &opts);
    assert_eq!(rec.pairs.len(), 1);
}

#[test]
fn dead_roots_match_nothing() {
    let mut g = SceneGraph::new();
    let a = row(&mut g, &["x"]);
    let b = row(&mut g, &["x"]);
    g.destroy(b).unwrap();
    let rec = match_trees(&g, a, b, &MatchOptions::default());
    assert!(rec.pairs.is_empty());
    assert_eq!(rec.source_only.len(), 1);
    assert!(rec.destination_only.is_empty());
}
