use std::collections::VecDeque;

use crate::{
    encode::sink::{FrameSink, SinkConfig},
    foundation::core::FrameIndex,
    foundation::error::{KinescopeError, KinescopeResult},
    graph::arena::SceneGraph,
    graph::handle::ObjectMut,
    graph::object::{ObjectId, VisualObject},
    render::draw::{DrawList, FrameInfo, compose},
    scene::config::SceneConfig,
    timeline::node::{ApplyCtx, Timeline},
    updater::registry::{UpdateCtx, UpdateReport, UpdaterId, UpdaterRegistry},
    view::camera::ViewTransform,
};

/// Frame-stepped driver owning the graph, the camera, queued timelines and updaters.
///
/// Each [`Scene::tick`] advances the active timeline first, then runs updaters, then
/// composes a [`DrawList`].
pub struct Scene {
    config: SceneConfig,
    graph: SceneGraph,
    view: ViewTransform,
    updaters: UpdaterRegistry,
    queue: VecDeque<Timeline>,
    current: Option<Timeline>,
    cancel_requested: bool,
    time: f64,
    frame: u64,
    ambient: Option<UpdaterId>,
    last_report: UpdateReport,
}

impl std::fmt::Debug for Scene {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scene")
            .field("time", &self.time)
            .field("frame", &self.frame)
            .field("objects", &self.graph.len())
            .field("queued", &self.queue.len())
            .field("playing", &self.current.is_some())
            .finish()
    }
}

impl Scene {
    /// Empty scene with a validated config.
    pub fn new(config: SceneConfig) -> KinescopeResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            graph: SceneGraph::new(),
            view: ViewTransform::default(),
            updaters: UpdaterRegistry::new(),
            queue: VecDeque::new(),
            current: None,
            cancel_requested: false,
            time: 0.0,
            frame: 0,
            ambient: None,
            last_report: UpdateReport::default(),
        })
    }

    /// Output settings.
    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    /// Scene graph.
    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    /// Scene graph, for direct edits between ticks.
    pub fn graph_mut(&mut self) -> &mut SceneGraph {
        &mut self.graph
    }

    /// Camera.
    pub fn view(&self) -> &ViewTransform {
        &self.view
    }

    /// Camera, for direct edits between ticks.
    pub fn view_mut(&mut self) -> &mut ViewTransform {
        &mut self.view
    }

    /// Reactive bindings.
    pub fn updaters(&self) -> &UpdaterRegistry {
        &self.updaters
    }

    /// Reactive bindings, to add or remove updaters.
    pub fn updaters_mut(&mut self) -> &mut UpdaterRegistry {
        &mut self.updaters
    }

    /// Scene time in seconds.
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Index the next composed frame will carry.
    pub fn frame(&self) -> FrameIndex {
        FrameIndex(self.frame)
    }

    /// Whether nothing is playing or queued.
    pub fn is_idle(&self) -> bool {
        self.current.is_none() && self.queue.is_empty()
    }

    /// Outcome of the updaters in the last tick.
    pub fn last_update_report(&self) -> &UpdateReport {
        &self.last_report
    }

    /// Insert `obj` and attach it to the root.
    pub fn add(&mut self, obj: VisualObject) -> ObjectId {
        self.graph.add(obj)
    }

    /// Insert `obj` detached, for objects a timeline introduces later.
    pub fn insert(&mut self, obj: VisualObject) -> ObjectId {
        self.graph.insert(obj)
    }

    /// Take `id` out of the drawn tree. The object stays alive and can be re-added.
    pub fn remove(&mut self, id: ObjectId) -> KinescopeResult<()> {
        self.graph.detach(id)
    }

    /// Fluent mutators for `id`.
    pub fn object_mut(&mut self, id: ObjectId) -> KinescopeResult<ObjectMut<'_>> {
        self.graph.object_mut(id)
    }

    /// Queue a timeline behind the ones already waiting.
    pub fn enqueue(&mut self, timeline: Timeline) -> KinescopeResult<()> {
        timeline.validate(&self.graph)?;
        self.queue.push_back(timeline);
        Ok(())
    }

    /// Snap the playing timeline to its end at the start of the next tick.
    pub fn cancel_current(&mut self) {
        if self.current.is_some() {
            self.cancel_requested = true;
        }
    }

    /// Advance by `dt` seconds and compose the resulting frame.
    ///
    /// A timeline that fails while advancing is dropped, so the next tick moves on to the
    /// rest of the queue.
    #[tracing::instrument(skip(self), fields(frame = self.frame))]
    pub fn tick(&mut self, dt: f64) -> KinescopeResult<DrawList> {
        if !(dt.is_finite() && dt >= 0.0) {
            return Err(KinescopeError::evaluation(format!(
                "tick step must be finite and >= 0, got {dt}"
            )));
        }

        let mut ctx = ApplyCtx {
            graph: &mut self.graph,
            view: &mut self.view,
        };
        if std::mem::take(&mut self.cancel_requested)
            && let Some(mut tl) = self.current.take()
        {
            tl.cancel(&mut ctx)?;
        }

        let mut remaining = dt;
        loop {
            if self.current.is_none() {
                self.current = self.queue.pop_front();
            }
            let Some(tl) = self.current.as_mut() else {
                break;
            };
            remaining = match tl.advance(remaining, &mut ctx) {
                Ok(rest) => rest,
                Err(e) => {
                    tracing::warn!(kind = tl.kind_name(), error = %e, "timeline failed, dropped");
                    self.current = None;
                    return Err(e);
                }
            };
            if !tl.is_terminal() {
                break;
            }
            self.current = None;
        }

        self.time += dt;
        self.last_report = self
            .updaters
            .run(dt, self.time, &mut self.graph, &mut self.view)?;

        let list = compose(&self.graph, &self.view, &self.frame_info())?;
        self.frame += 1;
        Ok(list)
    }

    fn frame_info(&self) -> FrameInfo {
        FrameInfo {
            frame: FrameIndex(self.frame),
            time: self.time,
            canvas: self.config.canvas,
            frame_width: self.config.frame_width,
            background: self.config.background,
        }
    }

    /// Config handed to sinks by [`Scene::record`].
    pub fn sink_config(&self) -> SinkConfig {
        SinkConfig {
            canvas: self.config.canvas,
            fps: self.config.fps,
            frame_width: self.config.frame_width,
        }
    }

    /// Queue `timeline` and tick at the configured frame rate until the scene is idle,
    /// pushing every frame into `sink`. Returns the number of frames pushed.
    pub fn play(&mut self, timeline: Timeline, sink: &mut dyn FrameSink) -> KinescopeResult<u64> {
        self.enqueue(timeline)?;
        let dt = self.config.frame_duration();
        let mut pushed = 0;
        while !self.is_idle() {
            let list = self.tick(dt)?;
            sink.push_frame(list.frame, &list)?;
            pushed += 1;
        }
        Ok(pushed)
    }

    /// Hold the scene for `secs` seconds while updaters keep running.
    pub fn wait(&mut self, secs: f64, sink: &mut dyn FrameSink) -> KinescopeResult<u64> {
        self.play(Timeline::wait(secs)?, sink)
    }

    /// Run `script` between `sink.begin` and `sink.end`.
    pub fn record<S: FrameSink>(
        &mut self,
        sink: &mut S,
        script: impl FnOnce(&mut Self, &mut S) -> KinescopeResult<()>,
    ) -> KinescopeResult<()> {
        sink.begin(self.sink_config())?;
        script(self, sink)?;
        sink.end()
    }

    /// Turn the camera about the vertical axis at `rate` radians per second until stopped.
    ///
    /// Replaces a rotation that is already running.
    pub fn begin_ambient_rotation(&mut self, rate: f64) -> KinescopeResult<()> {
        if !rate.is_finite() {
            return Err(KinescopeError::validation(format!(
                "ambient rotation rate must be finite, got {rate}"
            )));
        }
        self.stop_ambient_rotation();
        let id = self.updaters.add_view(move |ctx: &mut UpdateCtx<'_>| {
            let dt = ctx.dt;
            let view = ctx.target_view()?;
            let (phi, theta) = (view.phi(), view.theta());
            view.set_orientation(phi, theta + rate * dt)?;
            Ok(())
        });
        self.ambient = Some(id);
        Ok(())
    }

    /// Stop the camera rotation started by [`Scene::begin_ambient_rotation`].
    pub fn stop_ambient_rotation(&mut self) {
        if let Some(id) = self.ambient.take() {
            self.updaters.remove(id);
        }
    }

    /// Point the camera: polar angle `phi`, azimuth `theta` and roll `gamma`, in radians.
    pub fn set_camera_orientation(
        &mut self,
        phi: f64,
        theta: f64,
        gamma: f64,
    ) -> KinescopeResult<()> {
        let mut next = self.view;
        next.set_orientation(phi, theta)?;
        next.set_gamma(gamma)?;
        self.view = next;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/scene.rs"]
mod tests;
