//! Scrim Core
//!
//! Foundations shared by the fade controller and the wheel arbiter:
//!
//! - **Geometry**: edge visibility and exhaustion from scroll metrics
//! - **Host traits**: scroll surfaces, the viewport, frame scheduling, and
//!   feature detection, implemented by whatever renders the page
//! - **Capability probe**: cached reduced-motion / mask-image / transition answers
//! - **Simulator**: an in-memory host for tests and the `scrim` tool
//!
//! # Example
//!
//! ```rust
//! use scrim_core::{compute_edge_visibility, EdgeVisibility, ScrollMetrics};
//!
//! let at_top = ScrollMetrics::vertical(0.0, 1000.0, 200.0);
//! assert_eq!(
//!     compute_edge_visibility(&at_top, 8.0),
//!     EdgeVisibility::new(false, true, false, false)
//! );
//! ```

pub mod capability;
pub mod context;
pub mod error;
pub mod events;
pub mod frame;
pub mod geometry;
pub mod sim;
pub mod surface;

pub use capability::{
    BrowserCapabilities, CapabilityProbe, CapabilitySnapshot, HeadlessEnvironment,
    HostEnvironment, MotionPreference,
};
pub use context::PageContext;
pub use error::SurfaceError;
pub use events::{GeometryChange, WheelEvent};
pub use frame::{FrameRequestId, FrameScheduler, ManualFrameScheduler, SharedScheduler};
pub use geometry::{
    compute_edge_visibility, Axis, AxisMetrics, Edge, EdgeVisibility, Rect, ScrollLimits,
    ScrollMetrics,
};
pub use surface::{ScrollSurface, SharedSurface, SharedViewport, Subscription, Viewport};
