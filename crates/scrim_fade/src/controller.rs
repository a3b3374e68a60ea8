//! Fade controller
//!
//! Binds one scroll surface to its edge visibility. Geometry notifications are
//! coalesced into at most one measurement per animation frame, and the
//! visibility only changes when a measurement actually differs.
//!
//! ```text
//!            scroll / resize / mutation
//!   Idle ───────────────────────────────▶ Scheduled ──┐ (further changes
//!    ▲                                        │      ◀─┘  are coalesced)
//!    │ measured                          frame │
//!    └──────────────── Measuring ◀────────────┘
//! ```

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use scrim_core::capability::CapabilityProbe;
use scrim_core::context::PageContext;
use scrim_core::events::{event_types, EventType, GeometryChange};
use scrim_core::frame::{FrameRequestId, SharedScheduler};
use scrim_core::geometry::{compute_edge_visibility, Edge, EdgeVisibility};
use scrim_core::surface::{SharedSurface, Subscription};

use crate::config::FadeConfig;
use crate::gate::{effects_suppressed, transitions_allowed, AccessibilityReport, StyleGates};
use crate::gradient::{resolve_gradients, EdgeGradients, COLORED_FADE_CLASS};
use crate::style::{mask_directive, MaskParams, StyleDirective, StyleVersion};

// ============================================================================
// Measurement state
// ============================================================================

/// Measurement scheduling state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MeasureState {
    #[default]
    Idle,
    /// A frame callback is pending
    Scheduled,
    /// The frame callback is reading geometry
    Measuring,
    /// The controller was torn down
    Detached,
}

impl MeasureState {
    /// Handle an event and return the new state, or None if no transition
    pub fn on_event(&self, event: EventType) -> Option<Self> {
        use scrim_core::events::event_types::*;
        match (self, event) {
            (MeasureState::Detached, _) => None,
            (_, TEARDOWN) => Some(MeasureState::Detached),
            (MeasureState::Idle, SCROLL | RESIZE | MUTATION) => Some(MeasureState::Scheduled),
            (MeasureState::Scheduled, FRAME) => Some(MeasureState::Measuring),
            (MeasureState::Measuring, MEASURED) => Some(MeasureState::Idle),
            _ => None,
        }
    }
}

/// Which style surface to render
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleRequest {
    /// Mask styles for the container itself
    Container { visibility: Option<EdgeVisibility> },
    /// Retired per-edge overlay styles
    Overlay {
        edge: Edge,
        visibility: Option<EdgeVisibility>,
    },
}

// ============================================================================
// Controller
// ============================================================================

struct FadeInner {
    surface: SharedSurface,
    scheduler: SharedScheduler,
    threshold: f32,
    state: MeasureState,
    pending: Option<FrameRequestId>,
    visibility: EdgeVisibility,
    /// Gates the last directive was rendered under
    gates: StyleGates,
    revision: u64,
    measurements: u64,
}

impl FadeInner {
    fn notify(weak: &Weak<RefCell<FadeInner>>, change: GeometryChange) {
        let Some(inner) = weak.upgrade() else {
            return;
        };
        let mut this = inner.borrow_mut();
        let Some(next) = this.state.on_event(change.event_type()) else {
            tracing::trace!(?change, state = ?this.state, "geometry change coalesced");
            return;
        };
        this.state = next;

        let target = weak.clone();
        let id = this
            .scheduler
            .request_frame(Box::new(move || FadeInner::on_frame(&target)));
        this.pending = Some(id);
    }

    fn on_frame(weak: &Weak<RefCell<FadeInner>>) {
        let Some(inner) = weak.upgrade() else {
            return;
        };
        let mut this = inner.borrow_mut();
        this.pending = None;
        let Some(measuring) = this.state.on_event(event_types::FRAME) else {
            return;
        };
        this.state = measuring;
        this.measure();
        if let Some(idle) = this.state.on_event(event_types::MEASURED) {
            this.state = idle;
        }
    }

    fn measure(&mut self) {
        let metrics = match self.surface.metrics() {
            Ok(metrics) => metrics,
            Err(err) => {
                tracing::trace!("skipping fade measurement: {}", err);
                return;
            }
        };
        self.measurements += 1;

        let next = compute_edge_visibility(&metrics, self.threshold);
        if next != self.visibility {
            tracing::trace!(?next, "edge visibility changed");
            self.visibility = next;
            self.revision += 1;
        }
    }
}

/// Edge-fade controller for one scroll container
///
/// Dropping the controller tears it down: pending frames are cancelled and
/// geometry listeners removed.
pub struct FadeController {
    inner: Rc<RefCell<FadeInner>>,
    config: FadeConfig,
    probe: Rc<CapabilityProbe>,
    geometry: Option<Subscription>,
    motion: Option<Subscription>,
    overlay_warned: Cell<bool>,
}

impl FadeController {
    /// Attach to `surface` and measure it immediately
    pub fn attach(surface: SharedSurface, config: FadeConfig, ctx: &PageContext) -> Self {
        let config = config.normalized();
        let inner = Rc::new(RefCell::new(FadeInner {
            surface: surface.clone(),
            scheduler: ctx.scheduler().clone(),
            threshold: config.threshold,
            state: MeasureState::Idle,
            pending: None,
            visibility: EdgeVisibility::NONE,
            gates: StyleGates::evaluate(&config, &ctx.probe().capabilities()),
            revision: 0,
            measurements: 0,
        }));
        inner.borrow_mut().measure();

        let weak = Rc::downgrade(&inner);
        let geometry = surface.observe_geometry(Rc::new(move |change| {
            FadeInner::notify(&weak, change);
        }));

        let weak = Rc::downgrade(&inner);
        let probe = Rc::downgrade(ctx.probe());
        let gate_config = config.clone();
        let motion = ctx.probe().watch_reduced_motion(move |_| {
            let (Some(inner), Some(probe)) = (weak.upgrade(), probe.upgrade()) else {
                return;
            };
            let gates = StyleGates::evaluate(&gate_config, &probe.capabilities());
            let mut inner = inner.borrow_mut();
            if gates != inner.gates {
                inner.gates = gates;
                inner.revision += 1;
            }
        });

        tracing::debug!(
            threshold = config.threshold,
            fade_size = config.fade_size,
            "fade controller attached"
        );

        Self {
            inner,
            config,
            probe: ctx.probe().clone(),
            geometry: Some(geometry),
            motion: Some(motion),
            overlay_warned: Cell::new(false),
        }
    }

    /// Current edge visibility
    pub fn visibility(&self) -> EdgeVisibility {
        self.inner.borrow().visibility
    }

    /// Advances whenever the rendered output may have changed
    pub fn revision(&self) -> u64 {
        self.inner.borrow().revision
    }

    /// Number of completed measurements
    pub fn measurement_count(&self) -> u64 {
        self.inner.borrow().measurements
    }

    pub fn state(&self) -> MeasureState {
        self.inner.borrow().state
    }

    pub fn has_pending_frame(&self) -> bool {
        self.inner.borrow().pending.is_some()
    }

    /// The normalized config in effect
    pub fn config(&self) -> &FadeConfig {
        &self.config
    }

    /// Measure synchronously, bypassing frame scheduling
    pub fn measure_now(&self) {
        self.inner.borrow_mut().measure();
    }

    /// Mask styles for the container
    ///
    /// `visibility` overrides the measured state. Empty when effects are
    /// suppressed.
    pub fn container_style(&self, visibility: Option<EdgeVisibility>) -> StyleDirective {
        self.render(StyleRequest::Container { visibility })
    }

    /// Per-edge overlay styles
    #[deprecated(
        note = "fades are applied by `container_style`; this always returns an empty directive"
    )]
    pub fn overlay_style(&self, edge: Edge, visibility: Option<EdgeVisibility>) -> StyleDirective {
        self.render(StyleRequest::Overlay { edge, visibility })
    }

    /// Render a style directive
    pub fn render(&self, request: StyleRequest) -> StyleDirective {
        match request {
            StyleRequest::Overlay { edge, .. } => {
                if !self.overlay_warned.replace(true) {
                    tracing::warn!(
                        edge = edge.name(),
                        "overlay styles are retired, use container_style instead"
                    );
                }
                StyleDirective::empty(StyleVersion::LegacyOverlay)
            }
            StyleRequest::Container { visibility } => {
                let caps = self.probe.capabilities();
                if effects_suppressed(&self.config, &caps) {
                    return StyleDirective::empty(StyleVersion::Mask);
                }

                let visibility = visibility.unwrap_or_else(|| self.visibility());
                let gradients = resolve_gradients(&visibility, &self.config.colors);
                let transition = &self.config.transition;
                mask_directive(MaskParams {
                    visibility,
                    fade_size: self.config.fade_size,
                    transition: transitions_allowed(&self.config, &caps)
                        .then_some((transition.duration_ms, &transition.timing)),
                    gradients: &gradients,
                })
            }
        }
    }

    /// Gradient custom properties for colored fades
    pub fn gradient_properties(&self, visibility: Option<EdgeVisibility>) -> EdgeGradients {
        if effects_suppressed(&self.config, &self.probe.capabilities()) {
            return EdgeGradients::empty();
        }
        let visibility = visibility.unwrap_or_else(|| self.visibility());
        resolve_gradients(&visibility, &self.config.colors)
    }

    pub fn colored_fade_class(&self) -> &'static str {
        COLORED_FADE_CLASS
    }

    pub fn accessibility(&self) -> AccessibilityReport {
        AccessibilityReport::evaluate(&self.config, self.probe.capabilities())
    }

    pub fn is_torn_down(&self) -> bool {
        self.state() == MeasureState::Detached
    }

    /// Cancel pending work and stop observing; safe to call twice
    pub fn teardown(&mut self) {
        self.geometry.take();
        self.motion.take();

        let mut inner = self.inner.borrow_mut();
        if let Some(id) = inner.pending.take() {
            inner.scheduler.cancel_frame(id);
        }
        if let Some(next) = inner.state.on_event(event_types::TEARDOWN) {
            inner.state = next;
            tracing::debug!("fade controller torn down");
        }
    }
}

impl Drop for FadeController {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scrim_core::geometry::{Rect, ScrollMetrics};
    use scrim_core::sim::SimSurface;

    fn setup(
        offset: f32,
    ) -> (FadeController, Rc<SimSurface>, Rc<scrim_core::ManualFrameScheduler>) {
        let (ctx, scheduler, _, _) = PageContext::simulated(800.0, 800.0);
        let surface = Rc::new(SimSurface::new(
            Rect::new(0.0, 0.0, 300.0, 200.0),
            ScrollMetrics::vertical(offset, 1000.0, 200.0),
        ));
        let controller = FadeController::attach(surface.clone(), FadeConfig::default(), &ctx);
        (controller, surface, scheduler)
    }

    #[test]
    fn test_state_transitions() {
        use scrim_core::events::event_types::*;
        assert_eq!(MeasureState::Idle.on_event(SCROLL), Some(MeasureState::Scheduled));
        assert_eq!(MeasureState::Scheduled.on_event(RESIZE), None);
        assert_eq!(MeasureState::Scheduled.on_event(FRAME), Some(MeasureState::Measuring));
        assert_eq!(MeasureState::Measuring.on_event(MEASURED), Some(MeasureState::Idle));
        assert_eq!(MeasureState::Scheduled.on_event(TEARDOWN), Some(MeasureState::Detached));
        assert_eq!(MeasureState::Detached.on_event(SCROLL), None);
        assert_eq!(MeasureState::Idle.on_event(FRAME), None);
    }

    #[test]
    fn test_initial_measurement() {
        let (controller, _, scheduler) = setup(0.0);
        assert_eq!(controller.visibility(), EdgeVisibility::new(false, true, false, false));
        assert_eq!(controller.measurement_count(), 1);
        assert_eq!(scheduler.pending_count(), 0);
    }

    #[test]
    fn test_scroll_schedules_one_frame() {
        let (controller, surface, scheduler) = setup(0.0);
        surface.scroll_to(0.0, 100.0);
        surface.scroll_to(0.0, 200.0);
        assert_eq!(scheduler.pending_count(), 1);
        assert_eq!(controller.state(), MeasureState::Scheduled);

        scheduler.run_frame();
        assert_eq!(controller.state(), MeasureState::Idle);
        assert!(!controller.has_pending_frame());
        assert_eq!(controller.visibility(), EdgeVisibility::new(true, true, false, false));
    }

    #[test]
    fn test_unchanged_visibility_keeps_revision() {
        let (controller, surface, scheduler) = setup(100.0);
        let revision = controller.revision();
        surface.scroll_to(0.0, 300.0);
        scheduler.run_frame();
        assert_eq!(controller.measurement_count(), 2);
        assert_eq!(controller.revision(), revision);
    }

    #[test]
    fn test_detached_surface_is_skipped() {
        let (controller, surface, scheduler) = setup(0.0);
        surface.scroll_to(0.0, 400.0);
        surface.detach();
        scheduler.run_frame();
        assert_eq!(controller.measurement_count(), 1);
        assert_eq!(controller.visibility(), EdgeVisibility::new(false, true, false, false));
        assert_eq!(controller.state(), MeasureState::Idle);
    }

    #[test]
    fn test_teardown_cancels_pending_frame() {
        let (mut controller, surface, scheduler) = setup(0.0);
        surface.scroll_to(0.0, 400.0);
        controller.teardown();

        assert_eq!(scheduler.cancelled_count(), 1);
        assert_eq!(scheduler.pending_count(), 0);
        assert_eq!(surface.listener_count(), 0);
        assert!(controller.is_torn_down());

        controller.teardown();
        assert_eq!(scheduler.cancelled_count(), 1);
    }

    #[test]
    fn test_drop_releases_surface() {
        let (controller, surface, scheduler) = setup(0.0);
        surface.scroll_to(0.0, 400.0);
        drop(controller);
        assert_eq!(surface.listener_count(), 0);
        assert_eq!(scheduler.run_frame(), 0);
    }

    #[test]
    #[allow(deprecated)]
    fn test_overlay_style_is_empty() {
        let (controller, _, _) = setup(400.0);
        let style = controller.overlay_style(Edge::Top, None);
        assert!(style.is_empty());
        assert_eq!(style.version(), StyleVersion::LegacyOverlay);
        assert!(controller.overlay_style(Edge::Bottom, None).is_empty());
        assert!(controller.overlay_warned.get());
    }

    #[test]
    fn test_override_visibility() {
        let (controller, _, _) = setup(0.0);
        let style = controller.container_style(Some(EdgeVisibility::NONE));
        let mask = style.get("mask-image").unwrap();
        assert!(!mask.contains("calc("));
        assert!(controller.gradient_properties(Some(EdgeVisibility::NONE)).is_empty());
    }
}
