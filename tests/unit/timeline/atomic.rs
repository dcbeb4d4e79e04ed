use super::*;
use crate::foundation::core::{Color, Point};
use crate::graph::object::{ObjectState, VisualObject};
use crate::timeline::node::Timeline;

#[test]
fn fixed_endpoints_must_match_the_family_shape() {
    let mut g = SceneGraph::new();
    let id = g.add(VisualObject::group([VisualObject::dot(), VisualObject::dot()]));
    let one = FamilySnapshot {
        states: vec![ObjectState::default()],
    };
    let anim = AtomicAnim::new(
        AnimTarget::Object {
            id,
            endpoints: Endpoints::Fixed {
                start: one.clone(),
                end: one,
            },
        },
        RateFunction::Linear,
    );
    assert!(matches!(
        anim.validate(&g),
        Err(KinescopeError::TypeMismatch(_))
    ));
}

#[test]
fn morphs_reject_nested_pairs() {
    let mut g = SceneGraph::new();
    let outer = g.add(VisualObject::group([VisualObject::dot().with_tag("in")]));
    let inner = g.find_by_tag(outer, "in").unwrap()[0];
    let anim = AtomicAnim::new(
        AnimTarget::Morph {
            source: outer,
            target: inner,
        },
        RateFunction::Linear,
    );
    assert!(matches!(
        anim.validate(&g),
        Err(KinescopeError::Validation(_))
    ));
}

#[test]
fn morph_lands_on_the_target_without_touching_it() {
    let mut g = SceneGraph::new();
    let mut view = ViewTransform::default();
    let source = g.add(VisualObject::rect(1.0, 1.0));
    let target = g.insert(
        VisualObject::group([
            VisualObject::circle(1.0).with_fill(Color::RED, 1.0),
            VisualObject::circle(1.0).at(Point::new(3.0, 0.0)),
        ])
        .at(Point::new(0.0, 2.0)),
    );
    let target_before = g.family_snapshot(target).unwrap();

    let anim = AtomicAnim::new(
        AnimTarget::Morph { source, target },
        RateFunction::Linear,
    );
    anim.validate(&g).unwrap();
    let mut tl = Timeline::atomic(anim, 1.0).unwrap();
    let mut ctx = ApplyCtx {
        graph: &mut g,
        view: &mut view,
    };
    tl.advance(1.0, &mut ctx).unwrap();

    assert_eq!(g.family_snapshot(target).unwrap(), target_before);
    assert_eq!(g.family(source).unwrap().len(), 3);
    let b1 = g.bounding_box(source).unwrap().unwrap();
    let b2 = g.bounding_box(target).unwrap().unwrap();
    assert!((b1.x0 - b2.x0).abs() < 1e-9 && (b1.y1 - b2.y1).abs() < 1e-9);
    let first = g.node(source).unwrap().children()[0];
    assert_eq!(g.state(first).unwrap().fill, Color::RED);
}

fn attr_state(value: crate::interp::lerp::AttrValue) -> FamilySnapshot {
    let mut state = ObjectState::default();
    state.attrs.insert("k".to_owned(), value);
    FamilySnapshot {
        states: vec![state],
    }
}

#[test]
fn fixed_endpoints_with_clashing_attr_types_fail_at_construction() {
    use crate::interp::lerp::AttrValue;
    let mut g = SceneGraph::new();
    let id = g.add(VisualObject::group(Vec::new()));
    let anim = AtomicAnim::new(
        AnimTarget::Object {
            id,
            endpoints: Endpoints::Fixed {
                start: attr_state(AttrValue::Scalar(1.0)),
                end: attr_state(AttrValue::Color(Color::RED)),
            },
        },
        RateFunction::Linear,
    );
    assert!(matches!(
        Timeline::atomic(anim.clone(), 1.0),
        Err(KinescopeError::TypeMismatch(_))
    ));

    // Resolution repeats the check for leaves assembled without the constructor.
    let mut view = ViewTransform::default();
    let mut ctx = ApplyCtx {
        graph: &mut g,
        view: &mut view,
    };
    let mut anim = anim;
    assert!(matches!(
        anim.resolve(&mut ctx),
        Err(KinescopeError::TypeMismatch(_))
    ));
}
