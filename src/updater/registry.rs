use crate::{
    foundation::error::{KinescopeError, KinescopeResult},
    graph::arena::SceneGraph,
    graph::handle::ObjectMut,
    graph::object::{FamilySnapshot, ObjectId},
    view::camera::ViewTransform,
};

/// Handle returned when an updater is registered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UpdaterId(u64);

impl std::fmt::Display for UpdaterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "updater#{}", self.0)
    }
}

/// What an updater is allowed to write.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpdaterTarget {
    /// The family of one object.
    Object(ObjectId),
    /// The camera.
    View,
}

/// Per-frame callback. Errors deactivate the binding.
pub type UpdaterFn = Box<dyn FnMut(&mut UpdateCtx<'_>) -> anyhow::Result<()>>;

/// Arguments handed to an updater callback.
///
/// Reads see the live graph and camera. Writes go through [`UpdateCtx::target`] or
/// [`UpdateCtx::target_view`] and are rolled back when the callback returns `Err`.
pub struct UpdateCtx<'a> {
    /// Seconds since the previous frame.
    pub dt: f64,
    /// Scene time at this frame.
    pub time: f64,
    graph: &'a mut SceneGraph,
    view: &'a mut ViewTransform,
    target: UpdaterTarget,
}

impl UpdateCtx<'_> {
    /// Live scene graph, including commits of updaters registered earlier.
    pub fn graph(&self) -> &SceneGraph {
        &*self.graph
    }

    /// Live camera.
    pub fn view(&self) -> &ViewTransform {
        &*self.view
    }

    /// Mutators over the target object. Tags and states of its family are both tracked.
    pub fn target(&mut self) -> KinescopeResult<ObjectMut<'_>> {
        match self.target {
            UpdaterTarget::Object(id) => self.graph.object_mut(id),
            UpdaterTarget::View => Err(KinescopeError::updater(
                "view updater has no object target",
            )),
        }
    }

    /// The camera, for view updaters.
    pub fn target_view(&mut self) -> KinescopeResult<&mut ViewTransform> {
        match self.target {
            UpdaterTarget::View => Ok(&mut *self.view),
            UpdaterTarget::Object(id) => Err(KinescopeError::updater(format!(
                "updater targets {id}, not the camera"
            ))),
        }
    }
}

/// What a target looked like before its callback ran.
enum Checkpoint {
    Family {
        members: Vec<ObjectId>,
        states: FamilySnapshot,
        tags: Vec<Option<String>>,
    },
    View(ViewTransform),
}

impl Checkpoint {
    fn take(
        target: UpdaterTarget,
        graph: &SceneGraph,
        view: &ViewTransform,
    ) -> KinescopeResult<Self> {
        match target {
            UpdaterTarget::Object(id) => {
                let members = graph.family(id)?;
                let tags = members
                    .iter()
                    .map(|&m| Ok(graph.node(m)?.tag().map(str::to_owned)))
                    .collect::<KinescopeResult<Vec<_>>>()?;
                Ok(Self::Family {
                    states: graph.family_snapshot(id)?,
                    members,
                    tags,
                })
            }
            UpdaterTarget::View => Ok(Self::View(*view)),
        }
    }

    fn restore(self, graph: &mut SceneGraph, view: &mut ViewTransform) -> KinescopeResult<()> {
        match self {
            Self::Family {
                members,
                states,
                tags,
            } => {
                graph.write_family(&members, &states)?;
                for (id, tag) in members.into_iter().zip(tags) {
                    graph.set_tag(id, tag)?;
                }
                Ok(())
            }
            Self::View(saved) => {
                *view = saved;
                Ok(())
            }
        }
    }
}

struct Binding {
    id: UpdaterId,
    target: UpdaterTarget,
    deps: Vec<ObjectId>,
    callback: UpdaterFn,
    active: bool,
}

/// Outcome of one [`UpdaterRegistry::run`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UpdateReport {
    /// Callbacks that ran and committed.
    pub committed: Vec<UpdaterId>,
    /// Bindings deactivated during this run, with the reason.
    pub deactivated: Vec<(UpdaterId, String)>,
}

impl UpdateReport {
    /// Whether every active binding committed.
    pub fn is_clean(&self) -> bool {
        self.deactivated.is_empty()
    }
}

/// Reactive bindings run once per frame, after the timeline, in registration order.
#[derive(Default)]
pub struct UpdaterRegistry {
    bindings: Vec<Binding>,
    pending_removals: Vec<UpdaterId>,
    pending_clears: Vec<ObjectId>,
    next_id: u64,
}

impl std::fmt::Debug for UpdaterRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpdaterRegistry")
            .field("bindings", &self.bindings.len())
            .field("active", &self.active_count())
            .finish()
    }
}

impl UpdaterRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    fn push(
        &mut self,
        target: UpdaterTarget,
        deps: Vec<ObjectId>,
        callback: UpdaterFn,
    ) -> UpdaterId {
        let id = UpdaterId(self.next_id);
        self.next_id += 1;
        self.bindings.push(Binding {
            id,
            target,
            deps,
            callback,
            active: true,
        });
        id
    }

    /// Bind a callback that rewrites `target`'s family every frame.
    ///
    /// The binding is deactivated once `target` or any of `deps` is destroyed.
    pub fn add_object(
        &mut self,
        target: ObjectId,
        deps: impl IntoIterator<Item = ObjectId>,
        callback: impl FnMut(&mut UpdateCtx<'_>) -> anyhow::Result<()> + 'static,
    ) -> UpdaterId {
        self.push(
            UpdaterTarget::Object(target),
            deps.into_iter().collect(),
            Box::new(callback),
        )
    }

    /// Bind a callback that rewrites the camera every frame.
    pub fn add_view(
        &mut self,
        callback: impl FnMut(&mut UpdateCtx<'_>) -> anyhow::Result<()> + 'static,
    ) -> UpdaterId {
        self.push(UpdaterTarget::View, Vec::new(), Box::new(callback))
    }

    /// Drop a binding. Takes effect at the start of the next run.
    pub fn remove(&mut self, id: UpdaterId) {
        self.pending_removals.push(id);
    }

    /// Drop every binding targeting `target`. Takes effect at the start of the next run.
    pub fn clear_target(&mut self, target: ObjectId) {
        self.pending_clears.push(target);
    }

    /// Whether `id` is registered and active.
    pub fn is_active(&self, id: UpdaterId) -> bool {
        self.bindings.iter().any(|b| b.id == id && b.active)
    }

    /// Number of bindings still running.
    pub fn active_count(&self) -> usize {
        self.bindings.iter().filter(|b| b.active).count()
    }

    /// Number of registered bindings, active or not.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Whether nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    fn apply_pending(&mut self) {
        if self.pending_removals.is_empty() && self.pending_clears.is_empty() {
            return;
        }
        let removals = std::mem::take(&mut self.pending_removals);
        let clears = std::mem::take(&mut self.pending_clears);
        self.bindings.retain(|b| {
            let cleared = matches!(b.target, UpdaterTarget::Object(t) if clears.contains(&t));
            !cleared && !removals.contains(&b.id)
        });
    }

    /// Run every active binding once.
    ///
    /// A binding whose callback fails, or whose target or dependencies are gone, is
    /// deactivated and its target keeps the state it had before the call. Only the target's
    /// family is checkpointed, never the whole graph.
    pub fn run(
        &mut self,
        dt: f64,
        time: f64,
        graph: &mut SceneGraph,
        view: &mut ViewTransform,
    ) -> KinescopeResult<UpdateReport> {
        self.apply_pending();
        let mut report = UpdateReport::default();
        if self.active_count() == 0 {
            return Ok(report);
        }

        for binding in self.bindings.iter_mut().filter(|b| b.active) {
            let missing = binding
                .deps
                .iter()
                .chain(match &binding.target {
                    UpdaterTarget::Object(id) => Some(id),
                    UpdaterTarget::View => None,
                })
                .find(|id| !graph.contains(**id));
            if let Some(id) = missing {
                let reason = format!("{id} no longer exists");
                tracing::warn!(updater = %binding.id, %reason, "updater deactivated");
                binding.active = false;
                report.deactivated.push((binding.id, reason));
                continue;
            }

            let checkpoint = Checkpoint::take(binding.target, graph, view)?;
            let mut ctx = UpdateCtx {
                dt,
                time,
                graph: &mut *graph,
                view: &mut *view,
                target: binding.target,
            };
            let outcome = (binding.callback)(&mut ctx);
            if outcome.is_err() {
                checkpoint.restore(graph, view)?;
            }

            match outcome {
                Ok(()) => report.committed.push(binding.id),
                Err(e) => {
                    let reason = format!("{e:#}");
                    tracing::warn!(updater = %binding.id, %reason, "updater failed, deactivated");
                    binding.active = false;
                    report.deactivated.push((binding.id, reason));
                }
            }
        }
        Ok(report)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/updater/registry.rs"]
mod tests;
