// File: crates/storyline-core/src/controller.rs
// Summary: Narrative controller. Owns the position, the mount, and the reveal schedule; every
//          transition clears the mount, renders the target scene, and schedules its callouts.

use std::time::Duration;

use crate::annotate::{AnnotationPlacer, CalloutPlacer};
use crate::clock::{Clock, SystemClock};
use crate::config::StoryConfig;
use crate::dataset::{Catalog, DatasetProvider};
use crate::error::{FailureKind, SceneError, TransitionError};
use crate::mount::Mount;
use crate::render::{RenderOptions, Renderers, Scales};
use crate::schedule::{RevealScheduler, VisitTag};
use crate::scene::{Narrative, Scene};
use crate::state::{self, NarrativeState};

/// Outcome of one navigation request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    /// Boundary or same-index request; nothing was touched.
    Unchanged,
    Moved { from: usize, to: usize, render: RenderStatus },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderStatus {
    Drawn { pending_reveals: usize },
    Failed(FailureKind),
}

/// Why the active scene shows an error notice instead of a chart.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SceneFailure {
    pub scene: usize,
    pub kind: FailureKind,
    pub message: String,
}

/// Header/footer projection of the current state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Panel<'a> {
    pub narrative: &'a str,
    pub title: &'a str,
    pub description: &'a str,
    pub index: usize,
    pub total: usize,
    pub progress_percent: f64,
    pub prev_enabled: bool,
    pub next_enabled: bool,
}

/// Navigation commands a front end can issue.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Advance,
    Retreat,
    JumpTo(usize),
}

pub struct ControllerBuilder {
    narrative: Narrative,
    provider: Option<Box<dyn DatasetProvider>>,
    config: StoryConfig,
    clock: Option<Box<dyn Clock>>,
    renderers: Option<Renderers>,
    placer: Option<Box<dyn AnnotationPlacer>>,
}

impl ControllerBuilder {
    pub fn provider(mut self, p: impl DatasetProvider + 'static) -> Self {
        self.provider = Some(Box::new(p));
        self
    }

    pub fn config(mut self, c: StoryConfig) -> Self {
        self.config = c;
        self
    }

    pub fn clock(mut self, c: impl Clock + 'static) -> Self {
        self.clock = Some(Box::new(c));
        self
    }

    pub fn renderers(mut self, r: Renderers) -> Self {
        self.renderers = Some(r);
        self
    }

    pub fn placer(mut self, p: impl AnnotationPlacer + 'static) -> Self {
        self.placer = Some(Box::new(p));
        self
    }

    /// Build and render scene 0. A failing first scene still yields a controller (showing a notice).
    pub fn build(self) -> NarrativeController {
        let config = self.config;
        let (w, h) = config.chart_area();
        let placer = self
            .placer
            .unwrap_or_else(|| Box::new(CalloutPlacer::new(config.theme(), config.reveal.fade())));
        let total = self.narrative.len();
        let mut c = NarrativeController {
            options: config.render_options(),
            provider: self.provider.unwrap_or_else(|| Box::new(Catalog::with_samples())),
            clock: self.clock.unwrap_or_else(|| Box::new(SystemClock::new())),
            renderers: self.renderers.unwrap_or_default(),
            placer,
            state: NarrativeState::for_narrative(&self.narrative),
            narrative: self.narrative,
            config,
            mount: Mount::new(w, h),
            scales: None,
            failure: None,
            scheduler: RevealScheduler::new(),
            visit: VisitTag { scene: 0, epoch: 0 },
            revealed: Vec::new(),
        };
        tracing::info!(narrative = c.narrative.title(), scenes = total, "narrative started");
        c.show();
        c
    }
}

pub struct NarrativeController {
    narrative: Narrative,
    provider: Box<dyn DatasetProvider>,
    clock: Box<dyn Clock>,
    renderers: Renderers,
    placer: Box<dyn AnnotationPlacer>,
    config: StoryConfig,
    options: RenderOptions,
    state: NarrativeState,
    mount: Mount,
    scales: Option<Scales>,
    failure: Option<SceneFailure>,
    scheduler: RevealScheduler,
    visit: VisitTag,
    /// Ordinals placed during the current visit, in reveal order.
    revealed: Vec<usize>,
}

impl NarrativeController {
    pub fn builder(narrative: Narrative) -> ControllerBuilder {
        ControllerBuilder { narrative, provider: None, config: StoryConfig::default(), clock: None, renderers: None, placer: None }
    }

    /// Go to the next scene; a no-op on the last one.
    pub fn advance(&mut self) -> Step {
        if !state::is_next_enabled(&self.state) {
            return Step::Unchanged;
        }
        self.transition(self.state.current() + 1)
    }

    /// Go to the previous scene; a no-op on the first one.
    pub fn retreat(&mut self) -> Step {
        if !state::is_prev_enabled(&self.state) {
            return Step::Unchanged;
        }
        self.transition(self.state.current() - 1)
    }

    pub fn jump_to(&mut self, index: usize) -> Result<Step, TransitionError> {
        if index >= self.state.total() {
            return Err(TransitionError::OutOfRange { requested: index, total: self.state.total() });
        }
        if index == self.state.current() {
            return Ok(Step::Unchanged);
        }
        Ok(self.transition(index))
    }

    pub fn apply(&mut self, cmd: Command) -> Result<Step, TransitionError> {
        match cmd {
            Command::Advance => Ok(self.advance()),
            Command::Retreat => Ok(self.retreat()),
            Command::JumpTo(i) => self.jump_to(i),
        }
    }

    fn transition(&mut self, to: usize) -> Step {
        let from = self.state.current();
        self.state.set(to);
        let scene = self.current_scene();
        tracing::info!(from, to, chart = scene.chart.name(), title = %scene.title, "scene transition");
        let render = self.show();
        Step::Moved { from, to, render }
    }

    /// Clear, render the active scene into a staging mount, commit, and schedule its callouts.
    fn show(&mut self) -> RenderStatus {
        let index = self.state.current();
        let now = self.clock.now();
        self.visit = self.scheduler.begin_visit(index);
        self.revealed.clear();
        self.mount.clear();
        self.scales = None;

        let (w, h) = (self.mount.width(), self.mount.height());
        match self.draw_scene(w, h, now, self.options.animation) {
            Ok((mount, scales)) => {
                self.mount = mount;
                self.scales = Some(scales);
                self.failure = None;
                let count = self.narrative.scene(index).map(|s| s.annotations.len()).unwrap_or(0);
                for ordinal in 0..count {
                    self.scheduler.schedule(self.visit, ordinal, now.saturating_add(self.config.reveal.offset(ordinal)));
                }
                RenderStatus::Drawn { pending_reveals: count }
            }
            Err(e) => RenderStatus::Failed(self.fail(index, e, now)),
        }
    }

    fn draw_scene(&self, width: i32, height: i32, now: Duration, animation: Duration) -> Result<(Mount, Scales), SceneError> {
        let scene = self.current_scene();
        let view = self.provider.view(&scene.dataset)?;
        let renderer = self.renderers.get(scene.chart)?;
        let mut staging = Mount::new(width, height);
        staging.begin_chart(scene.chart, now, animation);
        let mut opts = self.options.clone();
        opts.animation = animation;
        let scales = renderer.render(&mut staging, &view, scene, &opts)?;
        Ok((staging, scales))
    }

    fn fail(&mut self, index: usize, e: SceneError, now: Duration) -> FailureKind {
        let kind = e.kind();
        let message = e.to_string();
        tracing::error!(scene = index, error = %message, "scene could not be drawn");
        self.mount.notice(&format!("Unable to display this chart: {message}"), self.options.theme.notice, now);
        self.failure = Some(SceneFailure { scene: index, kind, message });
        kind
    }

    /// Place every callout whose reveal is due. Returns how many were placed.
    pub fn pump(&mut self) -> usize {
        // nothing to anchor against; due reveals wait for the next successful render
        let Some(scales) = &self.scales else { return 0 };
        let Some(scene) = self.narrative.scene(self.state.current()) else { return 0 };
        let now = self.clock.now();
        let due = self.scheduler.drain_due(now, self.visit);
        let mut placed = 0;
        for task in due {
            let Some(a) = scene.annotations.get(task.ordinal) else { continue };
            if self.placer.place(&mut self.mount, scales, task.ordinal, a, task.due) {
                tracing::debug!(scene = task.tag.scene, ordinal = task.ordinal, "annotation revealed");
                self.revealed.push(task.ordinal);
                placed += 1;
            }
        }
        placed
    }

    /// Earliest pending reveal, on the controller clock. `None` while the scene shows a notice.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.scales.as_ref()?;
        self.scheduler.next_deadline()
    }

    /// Re-render the active scene for a new mount size without entrance animation.
    /// Revealed callouts are placed again; pending reveals stay scheduled.
    pub fn resize(&mut self, width: i32, height: i32) -> Option<RenderStatus> {
        if (width.max(1), height.max(1)) == (self.mount.width(), self.mount.height()) {
            return None;
        }
        let index = self.state.current();
        let now = self.clock.now();
        self.mount = Mount::new(width, height);
        self.scales = None;
        tracing::debug!(width, height, scene = index, "mount resized");
        match self.draw_scene(width, height, now, Duration::ZERO) {
            Ok((mount, scales)) => {
                self.mount = mount;
                let settled = now.saturating_sub(self.config.reveal.fade());
                if let Some(scene) = self.narrative.scene(index) {
                    for &ordinal in &self.revealed {
                        if let Some(a) = scene.annotations.get(ordinal) {
                            self.placer.place(&mut self.mount, &scales, ordinal, a, settled);
                        }
                    }
                    // callouts lost to an earlier failed render start a fresh schedule
                    let missing: Vec<usize> = (0..scene.annotations.len())
                        .filter(|o| !self.revealed.contains(o) && !self.scheduler.is_pending(self.visit, *o))
                        .collect();
                    for (rank, ordinal) in missing.into_iter().enumerate() {
                        self.scheduler.schedule(self.visit, ordinal, now.saturating_add(self.config.reveal.offset(rank)));
                    }
                }
                self.scales = Some(scales);
                self.failure = None;
                Some(RenderStatus::Drawn { pending_reveals: self.scheduler.pending() })
            }
            Err(e) => Some(RenderStatus::Failed(self.fail(index, e, now))),
        }
    }

    pub fn state(&self) -> &NarrativeState { &self.state }
    pub fn narrative(&self) -> &Narrative { &self.narrative }
    pub fn config(&self) -> &StoryConfig { &self.config }
    pub fn mount(&self) -> &Mount { &self.mount }
    pub fn scales(&self) -> Option<&Scales> { self.scales.as_ref() }
    pub fn failure(&self) -> Option<&SceneFailure> { self.failure.as_ref() }
    pub fn pending_reveals(&self) -> usize { self.scheduler.pending() }
    pub fn revealed(&self) -> &[usize] { &self.revealed }
    pub fn now(&self) -> Duration { self.clock.now() }

    pub fn current_scene(&self) -> &Scene {
        // state and narrative share the same length
        &self.narrative.scenes()[self.state.current()]
    }

    /// True while marks or callouts are still mid-entrance.
    pub fn is_animating(&self) -> bool { !self.mount.is_settled(self.clock.now()) }

    pub fn panel(&self) -> Panel<'_> {
        let scene = self.current_scene();
        Panel {
            narrative: self.narrative.title(),
            title: &scene.title,
            description: &scene.description,
            index: self.state.current(),
            total: self.state.total(),
            progress_percent: state::progress_percent(&self.state),
            prev_enabled: state::is_prev_enabled(&self.state),
            next_enabled: state::is_next_enabled(&self.state),
        }
    }
}
