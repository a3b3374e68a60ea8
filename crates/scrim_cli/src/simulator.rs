//! Scenario replay over the in-memory host

use std::rc::Rc;

use serde::Serialize;

use scrim_core::capability::{
    HIGH_CONTRAST_QUERIES, NO_MOTION_PREFERENCE_QUERY, REDUCED_MOTION_QUERY,
};
use scrim_core::sim::{SimEnvironment, SimSurface, SimViewport};
use scrim_core::{
    AxisMetrics, EdgeVisibility, ManualFrameScheduler, PageContext, Rect, ScrollMetrics,
    ScrollSurface, Viewport, WheelEvent,
};
use scrim_fade::FadeController;
use scrim_wheel::{HijackHandle, WheelArbiter, WheelOutcome};

use crate::scenario::{ContainerSpec, EnvironmentSpec, Scenario, ScenarioError, Step};

struct SimContainer {
    name: String,
    surface: Rc<SimSurface>,
    fades: FadeController,
    hijack: HijackHandle,
}

/// Live page built from a scenario
pub struct Simulation {
    scheduler: Rc<ManualFrameScheduler>,
    env: Rc<SimEnvironment>,
    viewport: Rc<SimViewport>,
    arbiter: WheelArbiter,
    containers: Vec<SimContainer>,
    steps_run: usize,
}

/// Page state after one step
#[derive(Debug, Serialize)]
pub struct StepReport {
    pub step: usize,
    pub action: &'static str,
    /// Container that captured the wheel gesture, for wheel steps
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intercepted_by: Option<String>,
    pub owner: Option<String>,
    pub page_scroll_y: f32,
    pub page_progress: f32,
    pub containers: Vec<ContainerReport>,
}

#[derive(Debug, Serialize)]
pub struct ContainerReport {
    pub name: String,
    pub offset_x: f32,
    pub offset_y: f32,
    pub progress: f32,
    pub visibility: EdgeVisibility,
    pub suppressed: bool,
    pub owner: bool,
}

impl Simulation {
    pub fn new(scenario: &Scenario) -> Result<Self, ScenarioError> {
        scenario.validate()?;

        let scheduler = Rc::new(ManualFrameScheduler::new());
        let env = Rc::new(environment(&scenario.environment));
        let viewport = Rc::new(SimViewport::new(
            scenario.viewport.height,
            scenario.viewport.document_height,
        ));
        viewport.set_scroll_y(scenario.viewport.scroll_y);

        let ctx = PageContext::new(scheduler.clone(), env.clone(), viewport.clone());
        let arbiter = WheelArbiter::with_registry(&ctx);
        let containers = scenario
            .containers
            .iter()
            .map(|spec| build_container(spec, &ctx, &arbiter))
            .collect();

        tracing::debug!(containers = scenario.containers.len(), "simulation ready");

        Ok(Self {
            scheduler,
            env,
            viewport,
            arbiter,
            containers,
            steps_run: 0,
        })
    }

    /// Replay every step of `scenario`
    pub fn run(scenario: &Scenario) -> Result<Vec<StepReport>, ScenarioError> {
        let mut simulation = Self::new(scenario)?;
        scenario
            .steps
            .iter()
            .map(|step| simulation.apply(step))
            .collect()
    }

    /// Apply one step and report the resulting page state
    pub fn apply(&mut self, step: &Step) -> Result<StepReport, ScenarioError> {
        self.steps_run += 1;
        let mut intercepted_by = None;

        match step {
            Step::Wheel { delta_x, delta_y } => {
                let mut event = WheelEvent::new(*delta_x, *delta_y);
                match self.arbiter.dispatch(&mut event) {
                    WheelOutcome::Intercepted(id) => {
                        intercepted_by = self
                            .containers
                            .iter()
                            .find(|c| c.hijack.id() == id)
                            .map(|c| c.name.clone());
                    }
                    WheelOutcome::PassThrough => self.scroll_page_by(*delta_y),
                }
            }
            Step::Scroll { container, x, y } => {
                self.container(container)?.surface.scroll_to(*x, *y)
            }
            Step::Resize {
                container,
                width,
                height,
            } => self.container(container)?.surface.resize(*width, *height),
            Step::Content {
                container,
                width,
                height,
            } => self.container(container)?.surface.set_content(*width, *height),
            Step::PageScroll { y } => {
                let delta = *y - self.viewport.scroll_y();
                self.scroll_page_by(delta);
            }
            Step::Frame => {
                self.scheduler.run_frame();
            }
            Step::SetReducedMotion { value } => self.env.set_reduced_motion(*value),
        }

        tracing::trace!(step = self.steps_run, action = step.name(), "step applied");
        Ok(self.report(step.name(), intercepted_by))
    }

    fn container(&self, name: &str) -> Result<&SimContainer, ScenarioError> {
        self.containers
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| ScenarioError::UnknownContainer {
                step: self.steps_run,
                name: name.to_string(),
            })
    }

    /// Scroll the page, moving every container on screen accordingly
    fn scroll_page_by(&self, delta: f32) {
        let before = self.viewport.scroll_y();
        self.viewport.set_scroll_y(before + delta);
        let moved = self.viewport.scroll_y() - before;
        if moved == 0.0 {
            return;
        }
        for container in &self.containers {
            if let Ok(bounds) = container.surface.bounds() {
                container.surface.set_bounds(bounds.translated_y(-moved));
            }
        }
    }

    fn report(&self, action: &'static str, intercepted_by: Option<String>) -> StepReport {
        let mut owner = None;
        let containers = self
            .containers
            .iter()
            .map(|c| {
                let metrics = c.surface.metrics().unwrap_or_default();
                let is_owner = c.hijack.is_owner();
                if is_owner {
                    owner = Some(c.name.clone());
                }
                ContainerReport {
                    name: c.name.clone(),
                    offset_x: metrics.horizontal.offset,
                    offset_y: metrics.vertical.offset,
                    progress: c.hijack.progress(),
                    visibility: c.fades.visibility(),
                    suppressed: !c.fades.accessibility().should_apply_effects,
                    owner: is_owner,
                }
            })
            .collect();

        StepReport {
            step: self.steps_run,
            action,
            intercepted_by,
            owner,
            page_scroll_y: self.viewport.scroll_y(),
            page_progress: self.viewport.page_progress(),
            containers,
        }
    }
}

fn environment(spec: &EnvironmentSpec) -> SimEnvironment {
    let env = SimEnvironment::new();
    env.set_has_match_media(spec.match_media);
    env.set_has_css_supports(spec.css_supports);
    env.set_media(REDUCED_MOTION_QUERY, spec.reduced_motion);
    env.set_media(NO_MOTION_PREFERENCE_QUERY, !spec.reduced_motion);
    env.set_media(HIGH_CONTRAST_QUERIES[0], spec.high_contrast);
    env.set_css_support("mask-image", spec.mask_image);
    env.set_css_support("-webkit-mask-image", spec.mask_image);
    env.set_css_support("transition", spec.transitions);
    env
}

fn build_container(
    spec: &ContainerSpec,
    ctx: &PageContext,
    arbiter: &WheelArbiter,
) -> SimContainer {
    let rect = spec.rect;
    let content = spec.content.map_or((rect.width, rect.height), |c| (c.width, c.height));
    let surface = Rc::new(SimSurface::new(
        Rect::new(rect.x, rect.y, rect.width, rect.height),
        ScrollMetrics::new(
            AxisMetrics::new(0.0, content.1, rect.height),
            AxisMetrics::new(0.0, content.0, rect.width),
        ),
    ));
    surface.scroll_to(spec.offset.x, spec.offset.y);

    let fades = FadeController::attach(surface.clone(), spec.fade.clone(), ctx);
    let hijack = arbiter.attach(surface.clone(), spec.mode.into(), spec.hijack);
    SimContainer {
        name: spec.name.clone(),
        surface,
        fades,
        hijack,
    }
}
