//! kinescope is a scene-graph animation engine.
//!
//! Objects live in a [`SceneGraph`]. Animations are [`Timeline`]s built with [`animate`],
//! [`animate_view`] or the [`presets`], queued on a [`Scene`] and advanced one frame at a
//! time:
//!
//! - every tick advances the active timeline, then runs the [`UpdaterRegistry`]
//! - the frame is composed into a [`DrawList`] for a renderer or a [`FrameSink`]
//! - [`transform_matching`] morphs one tagged tree (for example a laid-out equation) into
//!   another, part by part
#![forbid(unsafe_code)]
#![deny(missing_docs)]

/// Frame sinks.
pub mod encode;
/// Shared primitives and the error taxonomy.
pub mod foundation;
/// The scene graph.
pub mod graph;
/// Interpolation and easing.
pub mod interp;
/// Markup layout.
pub mod layout;
/// Structural matching.
pub mod matcher;
/// Draw-list composition.
pub mod render;
/// Scene driver and configuration.
pub mod scene;
/// Timelines and animation builders.
pub mod timeline;
/// Reactive updaters.
pub mod updater;
/// Camera.
pub mod view;

pub use crate::foundation::core::{
    Affine, BezPath, Canvas, Color, DOWN, Fps, FrameIndex, LEFT, Point, RIGHT, Rect,
    Transform2D, UP, Vec2,
};
pub use crate::foundation::error::{KinescopeError, KinescopeResult};

pub use crate::encode::sink::{FrameSink, InMemorySink, JsonLinesSink, SinkConfig};
pub use crate::graph::align::align_families;
pub use crate::graph::arena::{Node, SceneGraph};
pub use crate::graph::edit::GraphEdit;
pub use crate::graph::handle::ObjectMut;
pub use crate::graph::object::{FamilySnapshot, ObjectId, ObjectState, VisualObject};
pub use crate::interp::lerp::{AttrValue, Lerp, interpolate};
pub use crate::interp::path::PathData;
pub use crate::interp::rate::RateFunction;
pub use crate::layout::markup::{BoxLayout, MarkupLayout, Segment, split_markup};
pub use crate::matcher::structural::{MatchOptions, MatchRecord, match_trees, matching_units};
pub use crate::matcher::transition::transform_matching;
pub use crate::render::draw::{DrawItem, DrawList, DrawStyle, FrameInfo, compose};
pub use crate::scene::config::{Quality, SceneConfig};
pub use crate::scene::scene::Scene;
pub use crate::timeline::animate::{
    AnimateBuilder, DEFAULT_RUN_TIME, Mutation, ViewAnimateBuilder, animate, animate_view,
};
pub use crate::timeline::atomic::{AnimTarget, AtomicAnim, Endpoints};
pub use crate::timeline::node::{ApplyCtx, Phase, Timeline};
pub use crate::timeline::presets;
pub use crate::updater::registry::{
    UpdateCtx, UpdateReport, UpdaterFn, UpdaterId, UpdaterRegistry, UpdaterTarget,
};
pub use crate::view::camera::{ViewMutation, ViewTransform};
