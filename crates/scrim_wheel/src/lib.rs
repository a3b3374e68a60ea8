//! Scrim Wheel
//!
//! Wheel ownership for pages with several scrollable regions. Each region
//! registers through a [`HijackHandle`]; the [`WheelArbiter`] sees every wheel
//! gesture first and lets at most one region capture it, so inner scrolling
//! and page scrolling never fight.
//!
//! Ownership rules:
//!
//! - A region must be well inside the viewport (see [`policy::is_eligible`])
//! - It must still have room to scroll in the gesture's direction
//! - Among those, the region highest on the page wins
//! - Losing eligibility or capacity releases ownership immediately
//!
//! # Example
//!
//! ```rust
//! use std::rc::Rc;
//! use scrim_core::{PageContext, Rect, ScrollMetrics, WheelEvent};
//! use scrim_core::sim::SimSurface;
//! use scrim_wheel::{WheelArbiter, WheelMode, WheelOutcome};
//!
//! let (ctx, ..) = PageContext::simulated(800.0, 3000.0);
//! let arbiter = WheelArbiter::with_registry(&ctx);
//!
//! let gallery = Rc::new(SimSurface::new(
//!     Rect::new(0.0, 200.0, 600.0, 300.0),
//!     ScrollMetrics::horizontal(0.0, 2400.0, 600.0),
//! ));
//! let handle = arbiter.attach(gallery.clone(), WheelMode::HorizontalOnly, true);
//!
//! let mut event = WheelEvent::vertical(120.0);
//! assert_eq!(arbiter.dispatch(&mut event), WheelOutcome::Intercepted(handle.id()));
//! assert!(event.default_prevented());
//! ```

pub mod arbiter;
pub mod policy;
pub mod registry;

pub use arbiter::{HijackHandle, WheelArbiter, WheelOutcome};
pub use policy::{is_eligible, plan_scroll, ScrollIntent};
pub use registry::{
    ContainerId, HijackState, OwnershipRegistry, RegistryEntry, SharedRegistry, WheelMode,
};
