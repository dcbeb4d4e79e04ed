use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use kinescope::{
    BoxLayout, Color, FrameSink, JsonLinesSink, MarkupLayout, MatchOptions, Point, Quality,
    Scene, SceneConfig, UP, VisualObject, animate, animate_view, presets, transform_matching,
};

/// Play the equation demo and dump every frame's draw list as JSON lines.
#[derive(Parser, Debug)]
#[command(name = "kinescope", version)]
struct Cli {
    /// Scene config JSON (defaults apply when omitted).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output path for the JSON-lines dump; stdout when omitted.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Render preset overriding the config's canvas and frame rate.
    #[arg(long, value_enum)]
    quality: Option<Quality>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    let mut cfg = match &cli.config {
        Some(path) => SceneConfig::from_path(path)?,
        None => SceneConfig::default(),
    };
    if let Some(q) = cli.quality {
        cfg = cfg.with_quality(q);
    }

    let out: Box<dyn Write + Send> = match &cli.out {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("create output dir '{}'", parent.display()))?;
            }
            let f = File::create(path)
                .with_context(|| format!("create output '{}'", path.display()))?;
            Box::new(BufWriter::new(f))
        }
        None => Box::new(BufWriter::new(std::io::stdout())),
    };
    let mut sink = JsonLinesSink::new(out);

    let mut scene = Scene::new(cfg)?;
    let mut frames = 0u64;
    scene.record(&mut sink, |scene, sink| {
        frames = equation_demo(scene, sink)?;
        Ok(())
    })?;

    if let Some(path) = &cli.out {
        eprintln!("wrote {frames} frames to {}", path.display());
    }
    Ok(())
}

fn equation_demo(scene: &mut Scene, sink: &mut dyn FrameSink) -> kinescope::KinescopeResult<u64> {
    let layout = BoxLayout {
        color: Color::BLUE,
        ..BoxLayout::default()
    };
    let mut frames = 0;

    let first = layout.layout(scene.graph_mut(), "{{x}}^2+{{y}}^2")?;
    let tl = presets::write(scene.graph(), first)?;
    frames += scene.play(tl, sink)?;

    // A marker that keeps floating above whatever the equation becomes.
    let marker = scene.insert(VisualObject::dot().with_fill(Color::YELLOW, 1.0));
    let root = scene.graph().root();
    scene
        .updaters_mut()
        .add_object(marker, [], move |ctx| {
            let graph = ctx.graph();
            let Some(eq) = graph.node(root)?.children().first().copied() else {
                return Ok(());
            };
            let top = graph
                .bounding_box(eq)?
                .map(|b| Point::new(b.center().x, b.y1))
                .unwrap_or(Point::ORIGIN);
            ctx.target()?.move_to(top + UP * 0.5);
            Ok(())
        });
    frames += scene.play(presets::fade_in(scene.graph(), marker, UP)?, sink)?;

    let second = layout.layout(scene.graph_mut(), "{{x}}^2+{{z}}^2")?;
    let opts = MatchOptions {
        run_time: 1.5,
        grow_residuals: true,
        ..MatchOptions::default()
    };
    let tl = transform_matching(scene.graph_mut(), first, second, &opts)?;
    frames += scene.play(tl, sink)?;

    let z = scene.graph().find_by_tag(second, "z")?;
    if let Some(&z) = z.first() {
        frames += scene.play(presets::indicate(scene.graph(), z)?, sink)?;
    }

    let tl = animate_view().zoom(1.5).orientation(1.0, -1.2).run_time(2.0).build()?;
    frames += scene.play(tl, sink)?;
    scene.begin_ambient_rotation(0.3)?;
    frames += scene.wait(2.0, sink)?;
    scene.stop_ambient_rotation();

    let tl = animate(second).scale(0.5).shift(UP * -1.0).build(scene.graph())?;
    frames += scene.play(tl, sink)?;
    frames += scene.play(presets::fade_out(scene.graph(), second, UP)?, sink)?;
    Ok(frames)
}
