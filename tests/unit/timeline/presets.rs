use super::*;
use crate::foundation::core::Point;
use crate::timeline::node::ApplyCtx;
use crate::view::camera::ViewTransform;

struct Harness {
    graph: SceneGraph,
    view: ViewTransform,
}

impl Harness {
    fn new() -> Self {
        Self {
            graph: SceneGraph::new(),
            view: ViewTransform::default(),
        }
    }

    fn run(&mut self, tl: &mut Timeline, dt: f64) {
        let mut ctx = ApplyCtx {
            graph: &mut self.graph,
            view: &mut self.view,
        };
        tl.advance(dt, &mut ctx).unwrap();
    }
}

#[test]
fn fade_in_introduces_and_ends_opaque() {
    let mut h = Harness::new();
    let id = h.graph.insert(VisualObject::circle(1.0));
    let mut tl = fade_in(&h.graph, id, Vec2::new(0.0, 1.0)).unwrap();
    assert!(!h.graph.is_attached(id));

    h.run(&mut tl, 0.0);
    assert!(h.graph.is_attached(id));
    let s = h.graph.state(id).unwrap();
    assert_eq!(s.opacity, 0.0);
    assert_eq!(s.transform.translate, Vec2::new(0.0, -1.0));

    h.run(&mut tl, 1.0);
    let s = h.graph.state(id).unwrap();
    assert_eq!(s.opacity, 1.0);
    assert_eq!(s.transform.translate, Vec2::ZERO);
}

#[test]
fn fade_out_detaches_in_the_original_state() {
    let mut h = Harness::new();
    let id = h.graph.add(VisualObject::circle(1.0));
    let before = h.graph.state(id).unwrap().clone();
    let mut tl = fade_out(&h.graph, id, Vec2::new(2.0, 0.0)).unwrap();

    h.run(&mut tl, 0.5);
    assert!(h.graph.state(id).unwrap().opacity < 1.0);
    h.run(&mut tl, 0.5);
    assert!(tl.is_terminal());
    assert!(h.graph.contains(id));
    assert!(!h.graph.is_attached(id));
    assert_eq!(h.graph.state(id).unwrap(), &before);
}

#[test]
fn create_and_uncreate_drive_the_draw_window() {
    let mut h = Harness::new();
    let id = h.graph.insert(VisualObject::rect(2.0, 1.0));
    let mut tl = create(&h.graph, id).unwrap();
    h.run(&mut tl, 0.0);
    assert_eq!(h.graph.state(id).unwrap().draw_end, 0.0);
    h.run(&mut tl, 1.0);
    assert_eq!(h.graph.state(id).unwrap().draw_end, 1.0);

    let mut tl = uncreate(&h.graph, id).unwrap();
    h.run(&mut tl, 1.0);
    assert!(!h.graph.is_attached(id));
    assert_eq!(h.graph.state(id).unwrap().draw_end, 1.0);
}

#[test]
fn write_staggers_leaves_over_one_second() {
    let mut h = Harness::new();
    let id = h.graph.insert(VisualObject::group([
        VisualObject::rect(1.0, 1.0),
        VisualObject::circle(0.5),
        VisualObject::line(Point::ORIGIN, Point::new(1.0, 0.0)),
    ]));
    let tl = write(&h.graph, id).unwrap();
    assert_eq!(tl.kind_name(), "lagged");
    assert_eq!(tl.children().len(), 3);
    assert_eq!(tl.lag_ratio(), Some(0.2));
    assert!((tl.duration() - 1.0).abs() < 1e-12);

    let many = h.graph.insert(VisualObject::group(
        (0..20).map(|i| VisualObject::dot().at(Point::new(i as f64, 0.0))),
    ));
    let tl = write(&h.graph, many).unwrap();
    assert!((tl.duration() - 2.0).abs() < 1e-12);
}

#[test]
fn grow_and_shrink_pivot_about_the_center() {
    let mut h = Harness::new();
    let id = h
        .graph
        .insert(VisualObject::rect(2.0, 2.0).at(Point::new(3.0, 1.0)));
    let mut tl = grow_from_center(&h.graph, id).unwrap();
    h.run(&mut tl, 0.5);
    let c = h.graph.center(id).unwrap();
    assert!((c.x - 3.0).abs() < 1e-9 && (c.y - 1.0).abs() < 1e-9);
    h.run(&mut tl, 0.5);
    let b = h.graph.bounding_box(id).unwrap().unwrap();
    assert!((b.width() - 2.0).abs() < 1e-9);

    let mut tl = shrink_to_center(&h.graph, id).unwrap();
    h.run(&mut tl, 1.0);
    assert!(!h.graph.is_attached(id));
    let b = h.graph.bounding_box(id).unwrap().unwrap();
    assert!((b.width() - 2.0).abs() < 1e-9);
}

#[test]
fn indicate_returns_to_the_start() {
    let mut h = Harness::new();
    let id = h
        .graph
        .add(VisualObject::rect(2.0, 2.0).with_fill(Color::BLUE, 1.0));
    let before = h.graph.bounding_box(id).unwrap().unwrap();
    let mut tl = indicate(&h.graph, id).unwrap();

    h.run(&mut tl, 0.5);
    let mid = h.graph.bounding_box(id).unwrap().unwrap();
    assert!((mid.width() - 2.0 * INDICATE_SCALE).abs() < 1e-9);

    h.run(&mut tl, 0.5);
    let after = h.graph.bounding_box(id).unwrap().unwrap();
    assert!((after.x0 - before.x0).abs() < 1e-9);
    assert!((after.width() - before.width()).abs() < 1e-9);
    let fill = h.graph.state(id).unwrap().fill;
    assert!((fill.g - Color::BLUE.g).abs() < 1e-9);
}

#[test]
fn circumscribe_cleans_up_its_outline() {
    let mut h = Harness::new();
    let id = h.graph.add(VisualObject::rect(2.0, 1.0));
    let count = h.graph.len();
    let mut tl = circumscribe(&mut h.graph, id).unwrap();
    assert_eq!(tl.duration(), 1.0);

    h.run(&mut tl, 0.25);
    assert_eq!(h.graph.len(), count + 1);
    assert_eq!(h.graph.node(h.graph.root()).unwrap().children().len(), 2);
    h.run(&mut tl, 0.75);
    assert!(tl.is_terminal());
    assert_eq!(h.graph.len(), count);

    let empty = h.graph.add(VisualObject::group([]));
    assert!(matches!(
        circumscribe(&mut h.graph, empty),
        Err(KinescopeError::Validation(_))
    ));
}

#[test]
fn replacement_transform_swaps_objects() {
    let mut h = Harness::new();
    let source = h.graph.add(VisualObject::rect(1.0, 1.0));
    let target = h
        .graph
        .insert(VisualObject::circle(1.0).at(Point::new(2.0, 0.0)));
    let mut tl = replacement_transform(&h.graph, source, target).unwrap();
    h.run(&mut tl, 1.0);

    assert!(!h.graph.contains(source));
    assert_eq!(h.graph.node(h.graph.root()).unwrap().children(), &[target]);
    let c = h.graph.center(target).unwrap();
    assert!((c.x - 2.0).abs() < 1e-9);
}

#[test]
fn wait_only_holds() {
    assert_eq!(wait(2.5).unwrap().duration(), 2.5);
    assert!(wait(0.0).is_err());
}
