use super::*;
use crate::foundation::core::Point;
use crate::graph::object::VisualObject;
use crate::timeline::node::ApplyCtx;
use crate::view::camera::ViewTransform;

fn glyph(tag: &str, x: f64) -> VisualObject {
    VisualObject::rect(0.5, 0.5)
        .at(Point::new(x, 0.0))
        .with_tag(tag)
}

fn run(graph: &mut SceneGraph, tl: &mut Timeline, dt: f64) {
    let mut view = ViewTransform::default();
    let mut ctx = ApplyCtx {
        graph,
        view: &mut view,
    };
    tl.advance(dt, &mut ctx).unwrap();
}

#[test]
fn destination_replaces_source_when_finished() {
    let mut g = SceneGraph::new();
    let src = g.add(VisualObject::group([glyph("a", 0.0), glyph("b", 1.0)]));
    let dst = g.insert(
        VisualObject::group([glyph("b", 0.0), glyph("c", 1.0)]).at(Point::new(0.0, 2.0)),
    );
    let mut tl = transform_matching(&mut g, src, dst, &MatchOptions::default()).unwrap();
    assert_eq!(tl.kind_name(), "parallel");
    assert_eq!(tl.children().len(), 3);

    run(&mut g, &mut tl, 0.0);
    // The unmatched destination glyph enters as a copy under the source.
    assert_eq!(g.node(src).unwrap().children().len(), 3);

    run(&mut g, &mut tl, 1.0);
    assert!(tl.is_terminal());
    assert!(!g.contains(src));
    assert_eq!(g.node(g.root()).unwrap().children(), &[dst]);
    let c = g.center(dst).unwrap();
    assert!((c.y - 2.0).abs() < 1e-9);
}

#[test]
fn matched_parts_end_on_their_partners() {
    let mut g = SceneGraph::new();
    let src = g.add(VisualObject::group([glyph("a", 0.0), glyph("b", 1.0)]));
    let dst = g.insert(VisualObject::group([glyph("b", 4.0), glyph("a", 5.0)]));
    let src_b = g.find_by_tag(src, "b").unwrap()[0];
    let mut tl = transform_matching(&mut g, src, dst, &MatchOptions::default()).unwrap();

    run(&mut g, &mut tl, 0.999_999);
    let c = g.center(src_b).unwrap();
    assert!((c.x - 4.0).abs() < 1e-3);
}

#[test]
fn identical_trees_only_morph() {
    let mut g = SceneGraph::new();
    let src = g.add(VisualObject::group([glyph("x", 0.0), glyph("y", 1.0)]));
    let dst = g.clone_subtree(src).unwrap();
    let before = g.bounding_box(src).unwrap().unwrap();
    let mut tl = transform_matching(&mut g, src, dst, &MatchOptions::default()).unwrap();
    assert_eq!(tl.children().len(), 2);

    run(&mut g, &mut tl, 0.5);
    let mid = g.bounding_box(src).unwrap().unwrap();
    assert!((mid.x0 - before.x0).abs() < 1e-9 && (mid.x1 - before.x1).abs() < 1e-9);
    run(&mut g, &mut tl, 0.5);
    assert!(g.contains(dst) && !g.contains(src));
}

#[test]
fn disjoint_trees_fade_across() {
    let mut g = SceneGraph::new();
    let src = g.add(VisualObject::group([glyph("p", 0.0)]));
    let dst = g.insert(VisualObject::group([glyph("q", 0.0)]));
    let opts = MatchOptions {
        shrink_residuals: true,
        grow_residuals: true,
        ..MatchOptions::default()
    };
    let mut tl = transform_matching(&mut g, src, dst, &opts).unwrap();
    let p = g.node(src).unwrap().children()[0];

    run(&mut g, &mut tl, 0.5);
    let copy = g.node(src).unwrap().children()[1];
    assert!(g.state(p).unwrap().opacity < 1.0);
    assert!(g.state(copy).unwrap().opacity > 0.0);
    run(&mut g, &mut tl, 0.5);
    assert!(!g.contains(p) && !g.contains(copy));
}

#[test]
fn empty_trees_still_swap() {
    let mut g = SceneGraph::new();
    let src = g.add(VisualObject::group([]));
    let dst = g.insert(VisualObject::group([]));
    let mut tl = transform_matching(&mut g, src, dst, &MatchOptions::default()).unwrap();
    assert_eq!(tl.kind_name(), "wait");
    run(&mut g, &mut tl, 1.0);
    assert!(g.is_attached(dst));
}
