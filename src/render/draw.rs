use crate::{
    foundation::core::{Affine, Canvas, Color, FrameIndex, Point},
    foundation::error::KinescopeResult,
    graph::arena::SceneGraph,
    graph::object::ObjectId,
    view::camera::ViewTransform,
};

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
/// Paint attributes of a [`DrawItem`], with the cascaded opacity already folded in.
pub struct DrawStyle {
    /// Fill color.
    pub fill: Color,
    /// Fill opacity in `[0, 1]`, multiplied by the node's world opacity.
    pub fill_opacity: f64,
    /// Stroke color.
    pub stroke: Color,
    /// Stroke width in scene units.
    pub stroke_width: f64,
    /// Stroke opacity in `[0, 1]`, multiplied by the node's world opacity.
    pub stroke_opacity: f64,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
/// One drawable node, flattened and projected.
pub struct DrawItem {
    /// Source node.
    pub id: ObjectId,
    /// Source node's matching tag, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    /// Outline in view space (scene units, y up), trimmed to the draw window.
    pub points: Vec<Point>,
    /// Whether the outline closes back on its first point.
    pub closed: bool,
    /// Paint attributes.
    pub style: DrawStyle,
    /// Local-to-world transform of the node.
    pub transform: Affine,
    /// View-axis depth of the outline's center; larger is nearer.
    pub depth: f64,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
/// Renderer-facing description of one frame.
///
/// Items are ordered back to front. Items at equal depth keep tree order.
pub struct DrawList {
    /// Frame number.
    pub frame: FrameIndex,
    /// Scene time in seconds.
    pub time: f64,
    /// Output canvas.
    pub canvas: Canvas,
    /// Maps view space onto canvas pixels (origin top-left, y down).
    pub to_pixels: Affine,
    /// Clear color.
    pub background: Color,
    /// Drawables, back to front.
    pub items: Vec<DrawItem>,
}

impl DrawList {
    /// Items carrying `tag`.
    pub fn tagged<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a DrawItem> + 'a {
        self.items
            .iter()
            .filter(move |it| it.tag.as_deref() == Some(tag))
    }

    /// Item drawn for `id`, if it produced one.
    pub fn item(&self, id: ObjectId) -> Option<&DrawItem> {
        self.items.iter().find(|it| it.id == id)
    }
}

/// Frame-level inputs of [`compose`] that do not come from the graph or camera.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameInfo {
    /// Frame number.
    pub frame: FrameIndex,
    /// Scene time in seconds.
    pub time: f64,
    /// Output canvas.
    pub canvas: Canvas,
    /// Visible frame width in scene units at zoom 1.
    pub frame_width: f64,
    /// Clear color.
    pub background: Color,
}

impl FrameInfo {
    /// View space to pixels: scene units scaled to the canvas, y flipped, origin centered.
    pub fn to_pixels(&self) -> Affine {
        let s = f64::from(self.canvas.width) / self.frame_width;
        Affine::new([
            s,
            0.0,
            0.0,
            -s,
            f64::from(self.canvas.width) / 2.0,
            f64::from(self.canvas.height) / 2.0,
        ])
    }
}

struct Walk {
    world: Affine,
    opacity: f64,
    depth: f64,
}

/// Flatten the attached part of `graph` into a [`DrawList`] as seen through `view`.
///
/// Groups and nodes without visible geometry emit nothing; fully transparent nodes are
/// skipped.
pub fn compose(
    graph: &SceneGraph,
    view: &ViewTransform,
    info: &FrameInfo,
) -> KinescopeResult<DrawList> {
    let mut items = Vec::new();
    let root = graph.root();
    let top = Walk {
        world: graph.state(root)?.transform.to_affine(),
        opacity: graph.state(root)?.opacity,
        depth: graph.state(root)?.depth,
    };
    walk(graph, view, root, top, &mut items)?;
    items.sort_by(|a, b| a.depth.total_cmp(&b.depth));

    Ok(DrawList {
        frame: info.frame,
        time: info.time,
        canvas: info.canvas,
        to_pixels: info.to_pixels(),
        background: info.background,
        items,
    })
}

fn walk(
    graph: &SceneGraph,
    view: &ViewTransform,
    id: ObjectId,
    at: Walk,
    items: &mut Vec<DrawItem>,
) -> KinescopeResult<()> {
    let node = graph.node(id)?;
    let state = node.state();

    if !state.path.is_empty() && at.opacity > 0.0 {
        let trimmed = state.path.trimmed(state.draw_start, state.draw_end);
        if !trimmed.is_empty() {
            let world_pts: Vec<Point> = trimmed.points.iter().map(|&p| at.world * p).collect();
            let n = world_pts.len() as f64;
            let centroid = world_pts
                .iter()
                .fold(Point::ORIGIN, |acc, p| acc + p.to_vec2() / n);
            items.push(DrawItem {
                id,
                tag: node.tag().map(str::to_owned),
                points: world_pts
                    .iter()
                    .map(|&p| view.project(p, at.depth))
                    .collect(),
                closed: trimmed.closed,
                style: DrawStyle {
                    fill: state.fill,
                    fill_opacity: state.fill_opacity * at.opacity,
                    stroke: state.stroke,
                    stroke_width: state.stroke_width,
                    stroke_opacity: state.stroke_opacity * at.opacity,
                },
                transform: at.world,
                depth: view.view_depth(centroid, at.depth),
            });
        }
    }

    for &child in node.children() {
        let cs = graph.state(child)?;
        let next = Walk {
            world: at.world * cs.transform.to_affine(),
            opacity: at.opacity * cs.opacity,
            depth: at.depth + cs.depth,
        };
        walk(graph, view, child, next, items)?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/render/draw.rs"]
mod tests;
