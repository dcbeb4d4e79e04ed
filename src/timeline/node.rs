use crate::{
    foundation::error::{KinescopeError, KinescopeResult},
    foundation::math::{TIME_EPSILON, clamp01},
    graph::arena::SceneGraph,
    graph::edit::GraphEdit,
    timeline::atomic::AtomicAnim,
    view::camera::ViewTransform,
};

/// Everything a timeline may write while it advances.
pub struct ApplyCtx<'a> {
    /// Scene graph.
    pub graph: &'a mut SceneGraph,
    /// Camera.
    pub view: &'a mut ViewTransform,
}

/// Lifecycle of a timeline node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Not begun: hooks have not run and endpoints are not captured.
    Pending,
    /// Begun and not yet terminal.
    Running,
    /// Finished or cancelled; further advances return their whole step as overflow.
    Terminal,
}

#[derive(Debug)]
enum TimelineKind {
    Atomic(AtomicAnim),
    Parallel(Vec<Timeline>),
    Sequential {
        children: Vec<Timeline>,
        active: usize,
    },
    Lagged {
        children: Vec<Timeline>,
        lag_ratio: f64,
        offsets: Vec<f64>,
    },
    Wait,
}

/// Scheduling tree converting elapsed time into per-leaf progress.
///
/// Built once per play request, advanced until terminal, then dropped. Durations are in
/// seconds and every node's `elapsed` is the local time it has consumed so far.
#[derive(Debug)]
pub struct Timeline {
    kind: TimelineKind,
    on_begin: Vec<GraphEdit>,
    on_finish: Vec<GraphEdit>,
    phase: Phase,
    elapsed: f64,
    duration: f64,
}

fn leaf_duration(duration: f64) -> KinescopeResult<f64> {
    if duration.is_finite() && duration > 0.0 {
        Ok(duration)
    } else {
        Err(KinescopeError::malformed(format!(
            "leaf duration must be finite and > 0, got {duration}"
        )))
    }
}

fn non_empty(what: &str, children: &[Timeline]) -> KinescopeResult<()> {
    if children.is_empty() {
        return Err(KinescopeError::malformed(format!("empty {what} group")));
    }
    Ok(())
}

impl Timeline {
    fn with_kind(kind: TimelineKind, duration: f64) -> Self {
        Self {
            kind,
            on_begin: Vec::new(),
            on_finish: Vec::new(),
            phase: Phase::Pending,
            elapsed: 0.0,
            duration,
        }
    }

    /// Leaf animating `anim` over `duration` seconds.
    pub fn atomic(anim: AtomicAnim, duration: f64) -> KinescopeResult<Self> {
        let duration = leaf_duration(duration)?;
        anim.check_endpoints()?;
        Ok(Self::with_kind(TimelineKind::Atomic(anim), duration))
    }

    /// Target-less leaf that only consumes time.
    pub fn wait(duration: f64) -> KinescopeResult<Self> {
        let duration = leaf_duration(duration)?;
        Ok(Self::with_kind(TimelineKind::Wait, duration))
    }

    /// Children run together; lasts as long as the longest.
    pub fn parallel(children: Vec<Timeline>) -> KinescopeResult<Self> {
        non_empty("parallel", &children)?;
        let duration = children.iter().map(|c| c.duration).fold(0.0, f64::max);
        Ok(Self::with_kind(TimelineKind::Parallel(children), duration))
    }

    /// Children run one after another; lasts the sum of their durations.
    pub fn sequential(children: Vec<Timeline>) -> KinescopeResult<Self> {
        non_empty("sequential", &children)?;
        let duration = children.iter().map(|c| c.duration).sum();
        Ok(Self::with_kind(
            TimelineKind::Sequential {
                children,
                active: 0,
            },
            duration,
        ))
    }

    /// Child `i` starts `i * lag_ratio * unit` seconds in, where `unit` is the longest child
    /// duration.
    pub fn lagged(children: Vec<Timeline>, lag_ratio: f64) -> KinescopeResult<Self> {
        non_empty("lagged", &children)?;
        if !(lag_ratio.is_finite() && lag_ratio >= 0.0) {
            return Err(KinescopeError::malformed(format!(
                "lag ratio must be finite and >= 0, got {lag_ratio}"
            )));
        }
        let unit = children.iter().map(|c| c.duration).fold(0.0, f64::max);
        let offsets: Vec<f64> = (0..children.len())
            .map(|i| i as f64 * lag_ratio * unit)
            .collect();
        let duration = children
            .iter()
            .zip(&offsets)
            .map(|(c, off)| off + c.duration)
            .fold(0.0, f64::max);
        Ok(Self::with_kind(
            TimelineKind::Lagged {
                children,
                lag_ratio,
                offsets,
            },
            duration,
        ))
    }

    /// Graph edit to run when this node begins.
    pub fn with_on_begin(mut self, edit: GraphEdit) -> Self {
        self.on_begin.push(edit);
        self
    }

    /// Graph edit to run when this node finishes or is cancelled.
    pub fn with_on_finish(mut self, edit: GraphEdit) -> Self {
        self.on_finish.push(edit);
        self
    }

    /// Total duration in seconds.
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Local time consumed so far.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Lifecycle phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Whether the node finished or was cancelled.
    pub fn is_terminal(&self) -> bool {
        self.phase == Phase::Terminal
    }

    /// Linear progress `elapsed / duration` in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        if self.is_terminal() {
            return 1.0;
        }
        clamp01(self.elapsed / self.duration)
    }

    /// Progress after easing; equal to [`Timeline::progress`] for non-leaf nodes.
    pub fn eased_progress(&self) -> f64 {
        match &self.kind {
            TimelineKind::Atomic(anim) => anim.rate().apply(self.progress()),
            _ => self.progress(),
        }
    }

    /// Direct children, in document order.
    pub fn children(&self) -> &[Timeline] {
        match &self.kind {
            TimelineKind::Parallel(children)
            | TimelineKind::Sequential { children, .. }
            | TimelineKind::Lagged { children, .. } => children,
            TimelineKind::Atomic(_) | TimelineKind::Wait => &[],
        }
    }

    /// Start offsets of a lagged node's children.
    pub fn lag_offsets(&self) -> Option<&[f64]> {
        match &self.kind {
            TimelineKind::Lagged { offsets, .. } => Some(offsets),
            _ => None,
        }
    }

    /// Lag ratio of a lagged node.
    pub fn lag_ratio(&self) -> Option<f64> {
        match self.kind {
            TimelineKind::Lagged { lag_ratio, .. } => Some(lag_ratio),
            _ => None,
        }
    }

    /// Payload of a leaf.
    pub fn atomic_anim(&self) -> Option<&AtomicAnim> {
        match &self.kind {
            TimelineKind::Atomic(anim) => Some(anim),
            _ => None,
        }
    }

    /// Short node kind name for logs.
    pub fn kind_name(&self) -> &'static str {
        match self.kind {
            TimelineKind::Atomic(_) => "atomic",
            TimelineKind::Parallel(_) => "parallel",
            TimelineKind::Sequential { .. } => "sequential",
            TimelineKind::Lagged { .. } => "lagged",
            TimelineKind::Wait => "wait",
        }
    }

    /// Check every leaf against the current graph (dead targets, attribute types).
    pub fn validate(&self, graph: &SceneGraph) -> KinescopeResult<()> {
        match &self.kind {
            TimelineKind::Atomic(anim) => anim.validate(graph),
            TimelineKind::Wait => Ok(()),
            _ => self.children().iter().try_for_each(|c| c.validate(graph)),
        }
    }

    /// Run begin hooks and capture endpoints.
    ///
    /// Parallel and lagged nodes begin all children at once (a lagged child then holds
    /// progress 0 until its offset); sequential nodes begin only their first child.
    fn begin(&mut self, ctx: &mut ApplyCtx<'_>, lenient: bool) -> KinescopeResult<()> {
        self.phase = Phase::Running;
        tracing::debug!(
            kind = self.kind_name(),
            duration = self.duration,
            "timeline begin"
        );
        for edit in &self.on_begin {
            ctx.graph.apply_edit(edit)?;
        }
        match &mut self.kind {
            TimelineKind::Atomic(anim) => match anim.resolve(ctx) {
                Ok(()) => anim.apply(ctx, 0.0, lenient)?,
                Err(KinescopeError::UnknownObject(_)) if lenient => {}
                Err(e) => return Err(e),
            },
            TimelineKind::Parallel(children) | TimelineKind::Lagged { children, .. } => {
                for child in children {
                    child.begin(ctx, lenient)?;
                }
            }
            TimelineKind::Sequential { children, .. } => {
                if let Some(first) = children.first_mut() {
                    first.begin(ctx, lenient)?;
                }
            }
            TimelineKind::Wait => {}
        }
        Ok(())
    }

    fn finish(&mut self, ctx: &mut ApplyCtx<'_>) -> KinescopeResult<()> {
        self.phase = Phase::Terminal;
        self.elapsed = self.duration;
        if let TimelineKind::Atomic(anim) = &self.kind {
            anim.finish(ctx)?;
        }
        for edit in &self.on_finish {
            ctx.graph.apply_edit(edit)?;
        }
        tracing::debug!(
            kind = self.kind_name(),
            duration = self.duration,
            "timeline finish"
        );
        Ok(())
    }

    /// Advance by `dt` seconds and return the unused remainder (overflow).
    ///
    /// A pending node begins first, even when `dt` is zero. Terminal nodes return `dt`
    /// untouched.
    pub fn advance(&mut self, dt: f64, ctx: &mut ApplyCtx<'_>) -> KinescopeResult<f64> {
        if !(dt.is_finite() && dt >= 0.0) {
            return Err(KinescopeError::evaluation(format!(
                "time step must be finite and >= 0, got {dt}"
            )));
        }
        match self.phase {
            Phase::Terminal => return Ok(dt),
            Phase::Pending => self.begin(ctx, false)?,
            Phase::Running => {}
        }

        let overflow = match &mut self.kind {
            TimelineKind::Atomic(anim) => {
                let remaining = self.duration - self.elapsed;
                if dt + TIME_EPSILON >= remaining {
                    anim.apply(ctx, 1.0, false)?;
                    Some((dt - remaining).max(0.0))
                } else {
                    self.elapsed += dt;
                    anim.apply(ctx, self.elapsed / self.duration, false)?;
                    None
                }
            }
            TimelineKind::Wait => {
                let remaining = self.duration - self.elapsed;
                if dt + TIME_EPSILON >= remaining {
                    Some((dt - remaining).max(0.0))
                } else {
                    self.elapsed += dt;
                    None
                }
            }
            TimelineKind::Parallel(children) => {
                for child in children.iter_mut() {
                    child.advance(dt, ctx)?;
                }
                self.elapsed += dt;
                children
                    .iter()
                    .all(Timeline::is_terminal)
                    .then(|| (self.elapsed - self.duration).max(0.0))
            }
            TimelineKind::Sequential { children, active } => {
                let mut remaining = dt;
                while *active < children.len() {
                    let child = &mut children[*active];
                    let over = child.advance(remaining, ctx)?;
                    if !child.is_terminal() {
                        remaining = 0.0;
                        break;
                    }
                    // The next child begins in this same call, even with nothing left over.
                    remaining = over;
                    *active += 1;
                }
                self.elapsed += dt - remaining;
                (*active >= children.len()).then_some(remaining)
            }
            TimelineKind::Lagged {
                children, offsets, ..
            } => {
                let clock = self.elapsed + dt;
                for (child, &offset) in children.iter_mut().zip(offsets.iter()) {
                    if child.is_terminal() || clock + TIME_EPSILON < offset {
                        continue;
                    }
                    let step = ((clock - offset).max(0.0) - child.elapsed).max(0.0);
                    child.advance(step, ctx)?;
                }
                self.elapsed = clock;
                children
                    .iter()
                    .all(Timeline::is_terminal)
                    .then(|| (clock - self.duration).max(0.0))
            }
        };

        match overflow {
            Some(over) => {
                self.finish(ctx)?;
                Ok(over)
            }
            None => Ok(0.0),
        }
    }

    /// Abort: snap every unfinished leaf, in document order, to the state it holds at
    /// completion (`lerp(start, end, rate(1))`) and run finish hooks. Idempotent.
    ///
    /// Pending nodes are begun first so their hooks and endpoints are consistent with a
    /// full playthrough. Leaves whose targets no longer exist are skipped.
    pub fn cancel(&mut self, ctx: &mut ApplyCtx<'_>) -> KinescopeResult<()> {
        match self.phase {
            Phase::Terminal => return Ok(()),
            Phase::Pending => self.begin(ctx, true)?,
            Phase::Running => {}
        }
        match &mut self.kind {
            TimelineKind::Atomic(anim) => anim.apply(ctx, 1.0, true)?,
            TimelineKind::Parallel(children)
            | TimelineKind::Sequential { children, .. }
            | TimelineKind::Lagged { children, .. } => {
                for child in children.iter_mut() {
                    child.cancel(ctx)?;
                }
            }
            TimelineKind::Wait => {}
        }
        tracing::debug!(kind = self.kind_name(), "timeline cancelled");
        self.finish(ctx)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/node.rs"]
mod tests;
