//! In-memory host
//!
//! A deterministic implementation of every host trait. It backs the `scrim`
//! simulator and the test suites, standing in for a browser document.
//!
//! ```rust
//! use scrim_core::geometry::{Rect, ScrollMetrics};
//! use scrim_core::sim::SimSurface;
//! use scrim_core::surface::ScrollSurface;
//!
//! let surface = SimSurface::new(
//!     Rect::new(0.0, 100.0, 300.0, 200.0),
//!     ScrollMetrics::vertical(0.0, 1000.0, 200.0),
//! );
//! surface.scroll_by(0.0, 5000.0).unwrap();
//! assert_eq!(surface.metrics().unwrap().vertical.offset, 800.0);
//! ```

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use rustc_hash::FxHashMap;
use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;

use crate::capability::{
    HostEnvironment, MediaListener, NO_MOTION_PREFERENCE_QUERY, REDUCED_MOTION_QUERY,
};
use crate::error::{Result, SurfaceError};
use crate::events::GeometryChange;
use crate::geometry::{AxisMetrics, Rect, ScrollMetrics};
use crate::surface::{GeometryListener, ScrollSurface, Subscription, Viewport};

new_key_type! {
    struct ListenerId;
    struct WatchId;
}

// ============================================================================
// Surface
// ============================================================================

#[derive(Debug, Clone, Copy)]
struct SurfaceState {
    bounds: Rect,
    metrics: ScrollMetrics,
    attached: bool,
}

type ListenerMap = RefCell<SlotMap<ListenerId, GeometryListener>>;

/// A scroll container living in memory
///
/// Scroll offsets are clamped to the valid range, and listeners are notified
/// synchronously, like a browser firing `scroll` after a programmatic change.
pub struct SimSurface {
    state: RefCell<SurfaceState>,
    listeners: Rc<ListenerMap>,
    scroll_calls: Cell<u64>,
}

impl SimSurface {
    pub fn new(bounds: Rect, metrics: ScrollMetrics) -> Self {
        Self {
            state: RefCell::new(SurfaceState {
                bounds,
                metrics,
                attached: true,
            }),
            listeners: Rc::new(RefCell::new(SlotMap::with_key())),
            scroll_calls: Cell::new(0),
        }
    }

    /// Jump to an absolute offset, notifying observers if it changed
    pub fn scroll_to(&self, x: f32, y: f32) {
        let changed = {
            let mut state = self.state.borrow_mut();
            let before = state.metrics;
            clamp_offset(&mut state.metrics.horizontal, x);
            clamp_offset(&mut state.metrics.vertical, y);
            before != state.metrics
        };
        if changed {
            self.emit(GeometryChange::Scroll);
        }
    }

    /// Change the content extents (children added or removed)
    pub fn set_content(&self, content_width: f32, content_height: f32) {
        {
            let mut state = self.state.borrow_mut();
            state.metrics.horizontal.content = content_width;
            state.metrics.vertical.content = content_height;
            let (x, y) = (state.metrics.horizontal.offset, state.metrics.vertical.offset);
            clamp_offset(&mut state.metrics.horizontal, x);
            clamp_offset(&mut state.metrics.vertical, y);
        }
        self.emit(GeometryChange::Mutation);
    }

    /// Change the visible extents (container resized)
    pub fn resize(&self, visible_width: f32, visible_height: f32) {
        {
            let mut state = self.state.borrow_mut();
            state.metrics.horizontal.visible = visible_width;
            state.metrics.vertical.visible = visible_height;
            state.bounds.width = visible_width;
            state.bounds.height = visible_height;
            let (x, y) = (state.metrics.horizontal.offset, state.metrics.vertical.offset);
            clamp_offset(&mut state.metrics.horizontal, x);
            clamp_offset(&mut state.metrics.vertical, y);
        }
        self.emit(GeometryChange::Resize);
    }

    /// Move the element on screen (e.g. the page scrolled)
    pub fn set_bounds(&self, bounds: Rect) {
        self.state.borrow_mut().bounds = bounds;
    }

    /// Remove the element from the document
    pub fn detach(&self) {
        self.state.borrow_mut().attached = false;
    }

    pub fn is_attached(&self) -> bool {
        self.state.borrow().attached
    }

    /// Number of live geometry listeners
    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    /// Number of `scroll_by` calls received
    pub fn scroll_calls(&self) -> u64 {
        self.scroll_calls.get()
    }

    /// Notify observers without changing anything
    pub fn emit(&self, change: GeometryChange) {
        let listeners: SmallVec<[GeometryListener; 4]> =
            self.listeners.borrow().values().cloned().collect();
        for listener in listeners {
            listener(change);
        }
    }
}

fn clamp_offset(axis: &mut AxisMetrics, offset: f32) {
    axis.offset = offset.clamp(0.0, axis.max_offset());
}

impl ScrollSurface for SimSurface {
    fn metrics(&self) -> Result<ScrollMetrics> {
        let state = self.state.borrow();
        if !state.attached {
            return Err(SurfaceError::Detached);
        }
        Ok(state.metrics)
    }

    fn bounds(&self) -> Result<Rect> {
        let state = self.state.borrow();
        if !state.attached {
            return Err(SurfaceError::Detached);
        }
        Ok(state.bounds)
    }

    fn scroll_by(&self, delta_x: f32, delta_y: f32) -> Result<()> {
        let (x, y) = {
            let state = self.state.borrow();
            if !state.attached {
                return Err(SurfaceError::Detached);
            }
            (
                state.metrics.horizontal.offset + delta_x,
                state.metrics.vertical.offset + delta_y,
            )
        };
        self.scroll_calls.set(self.scroll_calls.get() + 1);
        self.scroll_to(x, y);
        Ok(())
    }

    fn observe_geometry(&self, listener: GeometryListener) -> Subscription {
        let id = self.listeners.borrow_mut().insert(listener);
        let listeners: Weak<ListenerMap> = Rc::downgrade(&self.listeners);
        Subscription::new(move || {
            if let Some(listeners) = listeners.upgrade() {
                listeners.borrow_mut().remove(id);
            }
        })
    }
}

// ============================================================================
// Viewport
// ============================================================================

/// Page viewport with settable dimensions
#[derive(Debug)]
pub struct SimViewport {
    height: Cell<f32>,
    scroll_y: Cell<f32>,
    document_height: Cell<f32>,
}

impl SimViewport {
    pub fn new(height: f32, document_height: f32) -> Self {
        Self {
            height: Cell::new(height),
            scroll_y: Cell::new(0.0),
            document_height: Cell::new(document_height),
        }
    }

    pub fn set_height(&self, height: f32) {
        self.height.set(height);
    }

    /// Set the page scroll offset, clamped to the document
    pub fn set_scroll_y(&self, scroll_y: f32) {
        let max = (self.document_height.get() - self.height.get()).max(0.0);
        self.scroll_y.set(scroll_y.clamp(0.0, max));
    }
}

impl Viewport for SimViewport {
    fn height(&self) -> f32 {
        self.height.get()
    }

    fn scroll_y(&self) -> f32 {
        self.scroll_y.get()
    }

    fn document_height(&self) -> f32 {
        self.document_height.get()
    }
}

// ============================================================================
// Environment
// ============================================================================

type WatchMap = RefCell<SlotMap<WatchId, (String, MediaListener)>>;

/// Feature-detection host with settable answers
pub struct SimEnvironment {
    has_match_media: Cell<bool>,
    has_css_supports: Cell<bool>,
    media: RefCell<FxHashMap<String, bool>>,
    css: RefCell<FxHashMap<String, bool>>,
    watchers: Rc<WatchMap>,
}

impl SimEnvironment {
    /// Detection APIs present, nothing matches or is supported yet
    pub fn new() -> Self {
        Self {
            has_match_media: Cell::new(true),
            has_css_supports: Cell::new(true),
            media: RefCell::new(FxHashMap::default()),
            css: RefCell::new(FxHashMap::default()),
            watchers: Rc::new(RefCell::new(SlotMap::with_key())),
        }
    }

    /// A current browser: masks and transitions supported, no motion preference
    pub fn modern() -> Self {
        let env = Self::new();
        for property in ["mask-image", "-webkit-mask-image", "transition"] {
            env.set_css_support(property, true);
        }
        env.set_media(NO_MOTION_PREFERENCE_QUERY, true);
        env.set_media(REDUCED_MOTION_QUERY, false);
        env
    }

    /// Toggle the media-query API
    pub fn set_has_match_media(&self, present: bool) {
        self.has_match_media.set(present);
    }

    /// Toggle the CSS feature-query API
    pub fn set_has_css_supports(&self, present: bool) {
        self.has_css_supports.set(present);
    }

    /// Set a media query result without notifying watchers
    pub fn set_media(&self, query: &str, matches: bool) {
        self.media.borrow_mut().insert(query.to_string(), matches);
    }

    /// Set whether a CSS property is supported (any value)
    pub fn set_css_support(&self, property: &str, supported: bool) {
        self.css.borrow_mut().insert(property.to_string(), supported);
    }

    /// Flip the reduced-motion preference and notify watchers
    pub fn set_reduced_motion(&self, reduce: bool) {
        self.set_media(NO_MOTION_PREFERENCE_QUERY, !reduce);
        self.emit_media(REDUCED_MOTION_QUERY, reduce);
    }

    /// Set a media query result and notify its watchers
    pub fn emit_media(&self, query: &str, matches: bool) {
        self.set_media(query, matches);
        let listeners: SmallVec<[MediaListener; 4]> = self
            .watchers
            .borrow()
            .values()
            .filter(|(watched, _)| watched == query)
            .map(|(_, listener)| listener.clone())
            .collect();
        for listener in listeners {
            listener(matches);
        }
    }

    /// Number of live media watchers
    pub fn watcher_count(&self) -> usize {
        self.watchers.borrow().len()
    }
}

impl Default for SimEnvironment {
    fn default() -> Self {
        Self::new()
    }
}

impl HostEnvironment for SimEnvironment {
    fn has_match_media(&self) -> bool {
        self.has_match_media.get()
    }

    fn has_css_supports(&self) -> bool {
        self.has_css_supports.get()
    }

    fn match_media(&self, query: &str) -> Option<bool> {
        if !self.has_match_media.get() {
            return None;
        }
        Some(self.media.borrow().get(query).copied().unwrap_or(false))
    }

    fn css_supports(&self, property: &str, _value: &str) -> Option<bool> {
        if !self.has_css_supports.get() {
            return None;
        }
        Some(self.css.borrow().get(property).copied().unwrap_or(false))
    }

    fn watch_media(&self, query: &str, listener: MediaListener) -> Option<Subscription> {
        if !self.has_match_media.get() {
            return None;
        }
        let id = self
            .watchers
            .borrow_mut()
            .insert((query.to_string(), listener));
        let watchers: Weak<WatchMap> = Rc::downgrade(&self.watchers);
        Some(Subscription::new(move || {
            if let Some(watchers) = watchers.upgrade() {
                watchers.borrow_mut().remove(id);
            }
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn surface() -> SimSurface {
        SimSurface::new(
            Rect::new(0.0, 0.0, 300.0, 200.0),
            ScrollMetrics::vertical(0.0, 1000.0, 200.0),
        )
    }

    #[test]
    fn test_scroll_is_clamped() {
        let s = surface();
        s.scroll_to(0.0, -50.0);
        assert_eq!(s.metrics().unwrap().vertical.offset, 0.0);
        s.scroll_to(0.0, 5000.0);
        assert_eq!(s.metrics().unwrap().vertical.offset, 800.0);
    }

    #[test]
    fn test_listeners_notified_only_on_change() {
        let s = surface();
        let hits = Rc::new(Cell::new(0));
        let h = hits.clone();
        let sub = s.observe_geometry(Rc::new(move |_| h.set(h.get() + 1)));

        s.scroll_to(0.0, 100.0);
        s.scroll_to(0.0, 100.0);
        assert_eq!(hits.get(), 1);

        s.set_content(0.0, 2000.0);
        assert_eq!(hits.get(), 2);

        drop(sub);
        assert_eq!(s.listener_count(), 0);
        s.scroll_to(0.0, 300.0);
        assert_eq!(hits.get(), 2);
    }

    #[test]
    fn test_detached_surface_errors() {
        let s = surface();
        s.detach();
        assert_eq!(s.metrics(), Err(SurfaceError::Detached));
        assert_eq!(s.scroll_by(0.0, 10.0), Err(SurfaceError::Detached));
    }

    #[test]
    fn test_shrinking_content_reclamps_offset() {
        let s = surface();
        s.scroll_to(0.0, 800.0);
        s.set_content(0.0, 500.0);
        assert_eq!(s.metrics().unwrap().vertical.offset, 300.0);
    }

    #[test]
    fn test_viewport_page_progress() {
        let viewport = SimViewport::new(800.0, 2400.0);
        viewport.set_scroll_y(800.0);
        assert_eq!(viewport.page_progress(), 0.5);
        viewport.set_scroll_y(10_000.0);
        assert_eq!(viewport.scroll_y(), 1600.0);
    }

    #[test]
    fn test_environment_without_apis() {
        let env = SimEnvironment::modern();
        env.set_has_match_media(false);
        env.set_has_css_supports(false);
        assert_eq!(env.match_media(REDUCED_MOTION_QUERY), None);
        assert_eq!(env.css_supports("mask-image", "x"), None);
        assert!(env.watch_media(REDUCED_MOTION_QUERY, Rc::new(|_| {})).is_none());
    }
}
