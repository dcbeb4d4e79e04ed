use std::io::Write;

use crate::foundation::core::{Canvas, Fps, FrameIndex};
use crate::foundation::error::{KinescopeError, KinescopeResult};
use crate::render::draw::DrawList;

/// Configuration provided to a [`FrameSink`] before the first frame of a recording.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct SinkConfig {
    /// Output canvas in pixels.
    pub canvas: Canvas,
    /// Output frames-per-second.
    pub fps: Fps,
    /// Visible frame width in scene units at zoom 1.
    pub frame_width: f64,
}

/// Consumer of composed frames, in timeline order.
///
/// Ordering contract: `push_frame` is called in strictly increasing `FrameIndex` order
/// between one `begin` and the matching `end`.
pub trait FrameSink: Send {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: SinkConfig) -> KinescopeResult<()>;
    /// Push one frame.
    fn push_frame(&mut self, idx: FrameIndex, frame: &DrawList) -> KinescopeResult<()>;
    /// Called once after the last frame is pushed.
    fn end(&mut self) -> KinescopeResult<()>;
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    frames: Vec<(FrameIndex, DrawList)>,
    ended: bool,
}

impl InMemorySink {
    /// Create a new in-memory sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<SinkConfig> {
        self.cfg
    }

    /// Captured frames.
    pub fn frames(&self) -> &[(FrameIndex, DrawList)] {
        &self.frames
    }

    /// Whether `end` was called after the last `begin`.
    pub fn is_ended(&self) -> bool {
        self.ended
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> KinescopeResult<()> {
        self.cfg = Some(cfg);
        self.frames.clear();
        self.ended = false;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &DrawList) -> KinescopeResult<()> {
        self.frames.push((idx, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> KinescopeResult<()> {
        self.ended = true;
        Ok(())
    }
}

/// Writes one JSON document per line: the [`SinkConfig`] header, then every frame.
#[derive(Debug)]
pub struct JsonLinesSink<W: Write + Send> {
    out: W,
    last: Option<FrameIndex>,
}

impl<W: Write + Send> JsonLinesSink<W> {
    /// Wrap a writer. Buffer it yourself if it is unbuffered.
    pub fn new(out: W) -> Self {
        Self { out, last: None }
    }

    /// Give the writer back.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn line<T: serde::Serialize>(&mut self, value: &T) -> KinescopeResult<()> {
        serde_json::to_writer(&mut self.out, value)
            .map_err(|e| KinescopeError::serde(e.to_string()))?;
        self.out
            .write_all(b"\n")
            .map_err(|e| KinescopeError::Other(e.into()))
    }
}

impl<W: Write + Send> FrameSink for JsonLinesSink<W> {
    fn begin(&mut self, cfg: SinkConfig) -> KinescopeResult<()> {
        self.last = None;
        self.line(&cfg)
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &DrawList) -> KinescopeResult<()> {
        if let Some(last) = self.last
            && idx <= last
        {
            return Err(KinescopeError::evaluation(format!(
                "frame {} pushed after frame {}",
                idx.0, last.0
            )));
        }
        self.last = Some(idx);
        self.line(frame)
    }

    fn end(&mut self) -> KinescopeResult<()> {
        self.out
            .flush()
            .map_err(|e| KinescopeError::Other(e.into()))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sink.rs"]
mod tests;
