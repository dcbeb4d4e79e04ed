use super::*;
use crate::foundation::core::Color;
use crate::graph::arena::SceneGraph;
use crate::graph::object::VisualObject;
use crate::render::draw::{FrameInfo, compose};
use crate::view::camera::ViewTransform;

fn cfg() -> SinkConfig {
    SinkConfig {
        canvas: Canvas {
            width: 64,
            height: 36,
        },
        fps: Fps::new(30, 1).unwrap(),
        frame_width: 8.0,
    }
}

fn frame(idx: u64) -> DrawList {
    let mut g = SceneGraph::new();
    g.add(VisualObject::dot());
    let info = FrameInfo {
        frame: FrameIndex(idx),
        time: idx as f64 / 30.0,
        canvas: cfg().canvas,
        frame_width: 8.0,
        background: Color::BLACK,
    };
    compose(&g, &ViewTransform::default(), &info).unwrap()
}

#[test]
fn in_memory_sink_keeps_frames_until_the_next_begin() {
    let mut sink = InMemorySink::new();
    sink.begin(cfg()).unwrap();
    sink.push_frame(FrameIndex(0), &frame(0)).unwrap();
    sink.push_frame(FrameIndex(1), &frame(1)).unwrap();
    sink.end().unwrap();
    assert!(sink.is_ended());
    assert_eq!(sink.frames().len(), 2);
    assert_eq!(sink.config(), Some(cfg()));

    sink.begin(cfg()).unwrap();
    assert!(sink.frames().is_empty());
    assert!(!sink.is_ended());
}

#[test]
fn json_lines_sink_writes_header_then_frames() {
    let mut sink = JsonLinesSink::new(Vec::new());
    sink.begin(cfg()).unwrap();
    sink.push_frame(FrameIndex(0), &frame(0)).unwrap();
    sink.push_frame(FrameIndex(1), &frame(1)).unwrap();
    sink.end().unwrap();

    let text = String::from_utf8(sink.into_inner()).unwrap();
    let lines: Vec<serde_json::Value> = text
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0]["canvas"]["width"], 64);
    assert_eq!(lines[2]["frame"], 1);
    assert_eq!(lines[1]["items"].as_array().unwrap().len(), 1);
}

#[test]
fn json_lines_sink_rejects_out_of_order_frames() {
    let mut sink = JsonLinesSink::new(Vec::new());
    sink.begin(cfg()).unwrap();
    sink.push_frame(FrameIndex(4), &frame(4)).unwrap();
    assert!(matches!(
        sink.push_frame(FrameIndex(4), &frame(4)),
        Err(KinescopeError::Evaluation(_))
    ));
}
