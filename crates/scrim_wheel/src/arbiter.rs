//! Wheel arbiter
//!
//! The capture-phase wheel interceptor. The host hands every wheel gesture to
//! [`WheelArbiter::dispatch`] before any other handler sees it. At most one
//! container intercepts a gesture: the eligible container with the lowest
//! priority value that can still scroll in the gesture's direction.

use std::rc::{Rc, Weak};

use scrim_core::context::PageContext;
use scrim_core::events::WheelEvent;
use scrim_core::surface::{SharedSurface, SharedViewport, Subscription};
use scrim_core::GeometryChange;

use crate::policy::{is_eligible, plan_scroll, ScrollIntent};
use crate::registry::{
    ContainerId, HijackState, OwnershipRegistry, RegistryEntry, SharedRegistry, WheelMode,
};

/// What happened to a wheel gesture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WheelOutcome {
    /// A container captured the gesture; default and propagation are stopped
    Intercepted(ContainerId),
    /// The gesture continues to the page
    PassThrough,
}

impl WheelOutcome {
    pub fn is_intercepted(&self) -> bool {
        matches!(self, WheelOutcome::Intercepted(_))
    }
}

/// Routes wheel gestures to registered containers
pub struct WheelArbiter {
    registry: SharedRegistry,
    viewport: SharedViewport,
}

impl WheelArbiter {
    pub fn new(registry: SharedRegistry, ctx: &PageContext) -> Self {
        Self {
            registry,
            viewport: ctx.viewport().clone(),
        }
    }

    /// Arbiter over a fresh registry
    pub fn with_registry(ctx: &PageContext) -> Self {
        Self::new(OwnershipRegistry::shared(), ctx)
    }

    pub fn registry(&self) -> &SharedRegistry {
        &self.registry
    }

    /// Current owner, if any
    pub fn active(&self) -> Option<ContainerId> {
        self.registry.borrow().active()
    }

    /// Register `surface` for wheel capture
    pub fn attach(&self, surface: SharedSurface, mode: WheelMode, enabled: bool) -> HijackHandle {
        HijackHandle::attach(surface, mode, enabled, &self.registry, &self.viewport)
    }

    /// Route one wheel gesture
    pub fn dispatch(&self, event: &mut WheelEvent) -> WheelOutcome {
        let candidates = self.registry.borrow().by_priority();
        let viewport_height = self.viewport.height();
        let mut outcome = WheelOutcome::PassThrough;

        for (id, entry) in candidates {
            let Some(intent) = self.evaluate(id, &entry, event, viewport_height) else {
                entry.state.set_hijacked(false);
                self.registry.borrow_mut().release(id);
                continue;
            };

            let granted = self.registry.borrow_mut().request_activation(id);
            if !granted || outcome.is_intercepted() {
                entry.state.set_hijacked(false);
                continue;
            }

            event.prevent_default();
            event.stop_propagation();
            self.apply(id, &entry, intent);
            outcome = WheelOutcome::Intercepted(id);
        }

        tracing::trace!(
            dx = event.delta_x,
            dy = event.delta_y,
            ?outcome,
            "wheel gesture dispatched"
        );
        outcome
    }

    fn evaluate(
        &self,
        id: ContainerId,
        entry: &RegistryEntry,
        event: &WheelEvent,
        viewport_height: f32,
    ) -> Option<ScrollIntent> {
        let (bounds, metrics) = match (entry.surface.bounds(), entry.surface.metrics()) {
            (Ok(bounds), Ok(metrics)) => (bounds, metrics),
            (Err(err), _) | (_, Err(err)) => {
                tracing::trace!(%id, "container unavailable: {}", err);
                return None;
            }
        };
        if !is_eligible(&bounds, viewport_height) {
            return None;
        }
        plan_scroll(entry.mode, event, &metrics.limits())
    }

    fn apply(&self, id: ContainerId, entry: &RegistryEntry, intent: ScrollIntent) {
        entry.state.set_hijacked(true);

        let (dx, dy) = intent.as_offsets();
        if let Err(err) = entry.surface.scroll_by(dx, dy) {
            tracing::trace!(%id, "scroll_by failed: {}", err);
            return;
        }
        if let Ok(metrics) = entry.surface.metrics() {
            entry.state.set_progress(metrics.axis(intent.axis).progress());
        }
    }
}

// ============================================================================
// Handle
// ============================================================================

/// A container's registration with the wheel arbiter
///
/// Dropping the handle unregisters the container, releasing ownership if it
/// held it.
pub struct HijackHandle {
    id: ContainerId,
    surface: SharedSurface,
    mode: WheelMode,
    registry: SharedRegistry,
    viewport: SharedViewport,
    state: Rc<HijackState>,
    enabled: bool,
    _progress_watch: Subscription,
}

impl HijackHandle {
    /// Register `surface` unless `enabled` is false
    ///
    /// The priority is the container's document-space top edge, measured once
    /// here.
    pub fn attach(
        surface: SharedSurface,
        mode: WheelMode,
        enabled: bool,
        registry: &SharedRegistry,
        viewport: &SharedViewport,
    ) -> Self {
        let state = Rc::new(HijackState::default());
        let progress_watch = watch_progress(&surface, &state);
        let id = registry.borrow_mut().allocate_id();

        let handle = Self {
            id,
            surface,
            mode,
            registry: registry.clone(),
            viewport: viewport.clone(),
            state,
            enabled,
            _progress_watch: progress_watch,
        };
        if enabled {
            handle.register();
        }
        handle
    }

    fn register(&self) {
        let bounds = match self.surface.bounds() {
            Ok(bounds) => bounds,
            Err(err) => {
                tracing::trace!(id = %self.id, "not registering: {}", err);
                return;
            }
        };
        let priority = bounds.top() + self.viewport.scroll_y();
        self.registry.borrow_mut().register(
            self.id,
            RegistryEntry {
                surface: self.surface.clone(),
                priority,
                mode: self.mode,
                state: self.state.clone(),
            },
        );
    }

    pub fn id(&self) -> ContainerId {
        self.id
    }

    pub fn mode(&self) -> WheelMode {
        self.mode
    }

    /// Whether this container currently owns the wheel
    pub fn is_owner(&self) -> bool {
        self.registry.borrow().is_active(self.id)
    }

    /// Whether the last gesture that reached this container was captured
    pub fn is_hijacked(&self) -> bool {
        self.state.is_hijacked()
    }

    /// Scroll progress in 0-1
    pub fn progress(&self) -> f32 {
        self.state.progress()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Registered priority, if registered
    pub fn priority(&self) -> Option<f32> {
        self.registry.borrow().priority(self.id)
    }

    /// Opt in or out of wheel capture
    ///
    /// Re-enabling measures the priority again.
    pub fn set_enabled(&mut self, enabled: bool) {
        if enabled == self.enabled {
            return;
        }
        self.enabled = enabled;
        if enabled {
            self.register();
        } else {
            self.registry.borrow_mut().unregister(self.id);
            self.state.set_hijacked(false);
        }
    }
}

impl Drop for HijackHandle {
    fn drop(&mut self) {
        match self.registry.try_borrow_mut() {
            Ok(mut registry) => {
                registry.unregister(self.id);
            }
            Err(_) => {
                tracing::warn!(id = %self.id, "registry busy on drop, deferring unregister");
                self.state.retire();
            }
        }
    }
}

/// Keep `state`'s progress in sync with the surface's own scroll events
fn watch_progress(surface: &SharedSurface, state: &Rc<HijackState>) -> Subscription {
    let weak_surface = Rc::downgrade(surface);
    let weak_state: Weak<HijackState> = Rc::downgrade(state);
    let sync = move || {
        if let (Some(surface), Some(state)) = (weak_surface.upgrade(), weak_state.upgrade()) {
            if let Ok(metrics) = surface.metrics() {
                state.set_progress(metrics.progress());
            }
        }
    };
    sync();
    surface.observe_geometry(Rc::new(move |change| {
        if change == GeometryChange::Scroll {
            sync();
        }
    }))
}
