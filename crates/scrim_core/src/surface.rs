//! Host abstractions for scroll containers and the page viewport
//!
//! The core never talks to a concrete UI toolkit. A rendering layer implements
//! [`ScrollSurface`] for each scrollable element and [`Viewport`] for the page,
//! and reports geometry changes through the listener registered with
//! [`ScrollSurface::observe_geometry`].

use std::fmt;
use std::rc::Rc;

use crate::error::Result;
use crate::events::GeometryChange;
use crate::geometry::{Rect, ScrollMetrics};

/// Callback invoked by a surface whenever its geometry changes
pub type GeometryListener = Rc<dyn Fn(GeometryChange)>;

/// A scrollable element owned by the host
///
/// Methods take `&self`: hosts are expected to use interior mutability, the
/// same way DOM element handles behave.
pub trait ScrollSurface {
    /// Current scroll metrics, or an error if the element is detached
    fn metrics(&self) -> Result<ScrollMetrics>;

    /// Bounding rectangle relative to the viewport
    fn bounds(&self) -> Result<Rect>;

    /// Move the scroll position by the given deltas (no smoothing)
    fn scroll_by(&self, delta_x: f32, delta_y: f32) -> Result<()>;

    /// Register for scroll/resize/mutation notifications
    ///
    /// Dropping the returned subscription stops the notifications.
    fn observe_geometry(&self, listener: GeometryListener) -> Subscription;
}

/// Shared handle to a host surface
pub type SharedSurface = Rc<dyn ScrollSurface>;

/// The page viewport
pub trait Viewport {
    /// Visible height of the page (innerHeight)
    fn height(&self) -> f32;

    /// Current page scroll offset (pageYOffset)
    fn scroll_y(&self) -> f32;

    /// Total height of the document
    fn document_height(&self) -> f32 {
        self.height()
    }

    /// Page scroll as a 0-1 ratio
    fn page_progress(&self) -> f32 {
        let range = self.document_height() - self.height();
        if range <= 0.0 {
            return 0.0;
        }
        (self.scroll_y() / range).clamp(0.0, 1.0)
    }
}

/// Shared handle to the page viewport
pub type SharedViewport = Rc<dyn Viewport>;

/// Guard that undoes a registration when dropped
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    /// Create a subscription that runs `cancel` exactly once
    pub fn new<F: FnOnce() + 'static>(cancel: F) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// A subscription with nothing to undo
    pub fn noop() -> Self {
        Self { cancel: None }
    }

    /// Whether dropping this subscription does anything
    pub fn is_active(&self) -> bool {
        self.cancel.is_some()
    }

    /// Cancel now instead of waiting for drop
    pub fn unsubscribe(mut self) {
        self.run();
    }

    fn run(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.run();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}
