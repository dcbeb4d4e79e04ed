use crate::{
    foundation::core::{Color, Point},
    foundation::error::{KinescopeError, KinescopeResult},
    graph::arena::SceneGraph,
    graph::object::{ObjectId, VisualObject},
};

/// Turns markup into a tagged object tree. Typesetting engines plug in here.
pub trait MarkupLayout {
    /// Build a detached tree for `markup` and return its root.
    fn layout(&self, graph: &mut SceneGraph, markup: &str) -> KinescopeResult<ObjectId>;
}

/// One piece of split markup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Segment {
    /// Text drawn for the segment.
    pub text: String,
    /// Whether it came from an `{{isolated}}` marker.
    pub isolated: bool,
}

/// Split `markup` into `{{isolated}}` parts and the literal runs between them.
pub fn split_markup(markup: &str) -> KinescopeResult<Vec<Segment>> {
    let mut out = Vec::new();
    let mut rest = markup;
    while let Some(open) = rest.find("{{") {
        if open > 0 {
            out.push(Segment {
                text: rest[..open].to_owned(),
                isolated: false,
            });
        }
        let after = &rest[open + 2..];
        let Some(close) = after.find("}}") else {
            return Err(KinescopeError::validation(format!(
                "unclosed '{{{{' in markup {markup:?}"
            )));
        };
        let inner = &after[..close];
        if inner.trim().is_empty() {
            return Err(KinescopeError::validation(format!(
                "empty isolated part in markup {markup:?}"
            )));
        }
        out.push(Segment {
            text: inner.to_owned(),
            isolated: true,
        });
        rest = &after[close + 2..];
    }
    if !rest.is_empty() {
        out.push(Segment {
            text: rest.to_owned(),
            isolated: false,
        });
    }
    Ok(out)
}

/// Placeholder typesetter: every visible character becomes a filled box on one baseline.
///
/// Each segment becomes a group tagged with its text, so isolated parts and literal runs
/// are matching units. The whole row is centered on the origin.
#[derive(Clone, Debug, PartialEq)]
pub struct BoxLayout {
    /// Horizontal distance between character cells.
    pub advance: f64,
    /// Box width.
    pub glyph_width: f64,
    /// Box height.
    pub glyph_height: f64,
    /// Box fill.
    pub color: Color,
}

impl Default for BoxLayout {
    fn default() -> Self {
        Self {
            advance: 0.5,
            glyph_width: 0.4,
            glyph_height: 0.6,
            color: Color::WHITE,
        }
    }
}

impl MarkupLayout for BoxLayout {
    fn layout(&self, graph: &mut SceneGraph, markup: &str) -> KinescopeResult<ObjectId> {
        let segments = split_markup(markup)?;
        let cells = segments
            .iter()
            .map(|s| s.text.chars().count())
            .sum::<usize>();
        if cells == 0 {
            return Err(KinescopeError::validation("markup has nothing to lay out"));
        }

        let left = -(cells as f64 - 1.0) * self.advance / 2.0;
        let mut cell = 0usize;
        let mut groups = Vec::with_capacity(segments.len());
        for seg in &segments {
            let mut glyphs = Vec::new();
            for ch in seg.text.chars() {
                let x = left + cell as f64 * self.advance;
                cell += 1;
                if ch.is_whitespace() {
                    continue;
                }
                glyphs.push(
                    VisualObject::rect(self.glyph_width, self.glyph_height)
                        .with_fill(self.color, 1.0)
                        .with_stroke(self.color, 0.0)
                        .at(Point::new(x, 0.0))
                        .named(ch.to_string()),
                );
            }
            if glyphs.is_empty() {
                continue;
            }
            groups.push(VisualObject::group(glyphs).with_tag(seg.text.trim()));
        }
        Ok(graph.insert(VisualObject::group(groups).named(markup)))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/markup.rs"]
mod tests;
