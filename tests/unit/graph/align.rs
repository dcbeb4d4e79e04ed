use super::*;
use crate::foundation::core::Point;

#[test]
fn groups_of_different_sizes_end_up_shape_compatible() {
    let mut g = SceneGraph::new();
    let a = g.add(VisualObject::group([
        VisualObject::dot(),
        VisualObject::rect(1.0, 1.0),
    ]));
    let b = g.add(VisualObject::group([
        VisualObject::dot(),
        VisualObject::dot(),
        VisualObject::dot(),
        VisualObject::group([VisualObject::dot(), VisualObject::dot()]),
        VisualObject::dot(),
    ]));

    align_families(&mut g, a, b).unwrap();
    let sa = g.family_snapshot(a).unwrap();
    let sb = g.family_snapshot(b).unwrap();
    sa.check_compatible(&sb).unwrap();
    assert_eq!(g.node(a).unwrap().children().len(), 5);
}

#[test]
fn repeated_children_are_invisible_copies_next_to_their_source() {
    let mut g = SceneGraph::new();
    let a = g.add(VisualObject::group([
        VisualObject::dot().with_tag("p"),
        VisualObject::rect(1.0, 1.0).with_tag("q"),
    ]));
    let b = g.add(VisualObject::group([
        VisualObject::dot(),
        VisualObject::dot(),
        VisualObject::dot(),
        VisualObject::dot(),
    ]));
    align_families(&mut g, a, b).unwrap();

    let kids = g.node(a).unwrap().children().to_vec();
    let tags: Vec<_> = kids
        .iter()
        .map(|&k| g.node(k).unwrap().tag().map(str::to_string))
        .collect();
    assert_eq!(
        tags,
        ["p", "p", "q", "q"].map(|t| Some(t.to_string())).to_vec()
    );
    let opacity: Vec<_> = kids
        .iter()
        .map(|&k| g.state(k).unwrap().opacity)
        .collect();
    assert_eq!(opacity, vec![1.0, 0.0, 1.0, 0.0]);
}

#[test]
fn leaves_grow_collapsed_point_children() {
    let mut g = SceneGraph::new();
    let a = g.add(VisualObject::rect(2.0, 2.0).at(Point::new(3.0, 0.0)));
    let b = g.add(VisualObject::group([VisualObject::dot(), VisualObject::dot()]));
    align_families(&mut g, a, b).unwrap();

    let kids = g.node(a).unwrap().children().to_vec();
    assert_eq!(kids.len(), 2);
    for k in kids {
        let s = g.state(k).unwrap();
        assert_eq!(s.path.points, vec![Point::ORIGIN]);
        assert_eq!(g.center(k).unwrap(), Point::new(3.0, 0.0));
    }
}
