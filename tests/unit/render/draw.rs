use super::*;
use crate::foundation::core::Vec2;
use crate::graph::object::VisualObject;

fn info() -> FrameInfo {
    FrameInfo {
        frame: FrameIndex(3),
        time: 0.1,
        canvas: Canvas {
            width: 1280,
            height: 720,
        },
        frame_width: 16.0,
        background: Color::BLACK,
    }
}

#[test]
fn flat_view_keeps_world_coordinates() {
    let mut g = SceneGraph::new();
    let id = g.add(VisualObject::rect(2.0, 1.0).at(Point::new(1.0, 0.0)));
    let list = compose(&g, &ViewTransform::default(), &info()).unwrap();
    assert_eq!(list.frame, FrameIndex(3));
    assert_eq!(list.items.len(), 1);
    let item = list.item(id).unwrap();
    assert!(item.closed);
    let p = item.points[0];
    assert!((p.x - 0.0).abs() < 1e-12 && (p.y + 0.5).abs() < 1e-12);

    let px = list.to_pixels * Point::new(0.0, 0.0);
    assert_eq!(px, Point::new(640.0, 360.0));
    let px = list.to_pixels * Point::new(8.0, 1.0);
    assert_eq!(px, Point::new(1280.0, 280.0));
}

#[test]
fn groups_detached_and_invisible_nodes_emit_nothing() {
    let mut g = SceneGraph::new();
    let group = g.add(VisualObject::group([
        VisualObject::rect(1.0, 1.0).with_tag("a"),
        VisualObject::rect(1.0, 1.0).with_opacity(0.0),
    ]));
    g.insert(VisualObject::circle(1.0));
    let undrawn = g.add(VisualObject::circle(1.0));
    g.object_mut(undrawn).unwrap().set_draw_window(0.0, 0.0);

    let list = compose(&g, &ViewTransform::default(), &info()).unwrap();
    assert_eq!(list.items.len(), 1);
    assert!(list.item(group).is_none());
    assert_eq!(list.tagged("a").count(), 1);
}

#[test]
fn opacity_cascades_into_the_style() {
    let mut g = SceneGraph::new();
    let group = g.add(
        VisualObject::group([VisualObject::rect(1.0, 1.0).with_fill(Color::RED, 0.8)])
            .with_opacity(0.5),
    );
    let child = g.node(group).unwrap().children()[0];
    let list = compose(&g, &ViewTransform::default(), &info()).unwrap();
    let style = list.item(child).unwrap().style;
    assert!((style.fill_opacity - 0.4).abs() < 1e-12);
    assert!((style.stroke_opacity - 0.5).abs() < 1e-12);
}

#[test]
fn items_sort_back_to_front_and_keep_tree_order_on_ties() {
    let mut g = SceneGraph::new();
    let near = g.add(VisualObject::circle(1.0));
    g.object_mut(near).unwrap().set_depth(1.0);
    let a = g.add(VisualObject::circle(1.0));
    let b = g.add(VisualObject::circle(1.0).shifted(Vec2::new(0.5, 0.0)));
    let far = g.add(VisualObject::circle(1.0));
    g.object_mut(far).unwrap().set_depth(-1.0);

    let list = compose(&g, &ViewTransform::default(), &info()).unwrap();
    let order: Vec<ObjectId> = list.items.iter().map(|it| it.id).collect();
    assert_eq!(order, vec![far, a, b, near]);
}

#[test]
fn draw_windows_trim_the_outline() {
    let mut g = SceneGraph::new();
    let id = g.add(VisualObject::line(Point::new(0.0, 0.0), Point::new(4.0, 0.0)));
    g.object_mut(id).unwrap().set_draw_window(0.0, 0.5);
    let list = compose(&g, &ViewTransform::default(), &info()).unwrap();
    let last = *list.item(id).unwrap().points.last().unwrap();
    assert!((last.x - 2.0).abs() < 1e-12);
}

#[test]
fn serializes_to_json() {
    let mut g = SceneGraph::new();
    g.add(VisualObject::dot().with_tag("x"));
    let list = compose(&g, &ViewTransform::default(), &info()).unwrap();
    let v = serde_json::to_value(&list).unwrap();
    assert_eq!(v["frame"], 3);
    assert_eq!(v["items"][0]["tag"], "x");
    assert!(v["items"][0]["points"].is_array());
}
