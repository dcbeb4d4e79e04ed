use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::foundation::core::{Canvas, Color, Fps};
use crate::foundation::error::{KinescopeError, KinescopeResult};

/// Render presets, from quick previews to final output.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Quality {
    /// 854x480 at 15 fps.
    Low,
    /// 1280x720 at 30 fps.
    Medium,
    /// 1920x1080 at 60 fps.
    High,
}

impl Quality {
    /// Canvas and frame rate of the preset.
    pub fn canvas_and_fps(self) -> (Canvas, Fps) {
        let (width, height, fps) = match self {
            Self::Low => (854, 480, 15),
            Self::Medium => (1280, 720, 30),
            Self::High => (1920, 1080, 60),
        };
        (Canvas { width, height }, Fps { num: fps, den: 1 })
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ColorRepr {
    Hex(String),
    Rgba { r: f64, g: f64, b: f64, a: Option<f64> },
}

fn deserialize_color<'de, D>(deserializer: D) -> Result<Color, D::Error>
where
    D: serde::Deserializer<'de>,
{
    match ColorRepr::deserialize(deserializer)? {
        ColorRepr::Hex(s) => Color::from_hex(&s).map_err(serde::de::Error::custom),
        ColorRepr::Rgba { r, g, b, a } => Ok(Color::rgba(r, g, b, a.unwrap_or(1.0))),
    }
}

fn default_fps() -> Fps {
    Fps { num: 30, den: 1 }
}

fn default_canvas() -> Canvas {
    Canvas {
        width: 1280,
        height: 720,
    }
}

fn default_frame_width() -> f64 {
    14.222
}

fn default_background() -> Color {
    Color::BLACK
}

/// Output settings of a [`crate::Scene`], loadable from JSON.
///
/// Every field is optional in JSON; `background` accepts `"#rrggbb[aa]"` or an
/// `{r, g, b, a}` object.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SceneConfig {
    /// Frames per second of `play`/`wait`.
    #[serde(default = "default_fps")]
    pub fps: Fps,
    /// Output canvas in pixels.
    #[serde(default = "default_canvas")]
    pub canvas: Canvas,
    /// Visible frame width in scene units at zoom 1.
    #[serde(default = "default_frame_width")]
    pub frame_width: f64,
    /// Clear color.
    #[serde(
        default = "default_background",
        deserialize_with = "deserialize_color"
    )]
    pub background: Color,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            fps: default_fps(),
            canvas: default_canvas(),
            frame_width: default_frame_width(),
            background: default_background(),
        }
    }
}

impl SceneConfig {
    /// Parse and validate a config from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> KinescopeResult<Self> {
        let cfg: Self = serde_json::from_reader(r)
            .map_err(|e| KinescopeError::validation(format!("parse scene config JSON: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Parse and validate a config from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> KinescopeResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            KinescopeError::validation(format!("open scene config '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Config of a render preset.
    pub fn with_quality(mut self, quality: Quality) -> Self {
        (self.canvas, self.fps) = quality.canvas_and_fps();
        self
    }

    /// Check ranges that serde cannot express.
    pub fn validate(&self) -> KinescopeResult<()> {
        Fps::new(self.fps.num, self.fps.den)?;
        if self.canvas.width == 0 || self.canvas.height == 0 {
            return Err(KinescopeError::validation(format!(
                "canvas must be non-empty, got {}x{}",
                self.canvas.width, self.canvas.height
            )));
        }
        if !(self.frame_width.is_finite() && self.frame_width > 0.0) {
            return Err(KinescopeError::validation(format!(
                "frame_width must be finite and > 0, got {}",
                self.frame_width
            )));
        }
        Ok(())
    }

    /// Seconds per frame.
    pub fn frame_duration(&self) -> f64 {
        self.fps.frame_duration_secs()
    }

    /// Visible frame height in scene units at zoom 1.
    pub fn frame_height(&self) -> f64 {
        self.frame_width / self.canvas.aspect()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/config.rs"]
mod tests;
