//! Eligibility and capacity tests
//!
//! A container may only capture a gesture while it is well inside the
//! viewport and still has room to scroll in the gesture's direction.

use scrim_core::events::WheelEvent;
use scrim_core::geometry::{Axis, Rect, ScrollLimits};

use crate::registry::WheelMode;

/// Minimum fraction of the container height that must be on screen
pub const MIN_VISIBLE_RATIO: f32 = 0.3;
/// The container top must sit above this fraction of the viewport height
pub const TOP_LIMIT_RATIO: f32 = 0.8;
/// The container bottom must sit below this fraction of the viewport height
pub const BOTTOM_LIMIT_RATIO: f32 = 0.2;

/// Whether a container at `bounds` is focused enough to capture the wheel
pub fn is_eligible(bounds: &Rect, viewport_height: f32) -> bool {
    if bounds.height <= 0.0 {
        return false;
    }
    let visible = bounds.bottom().min(viewport_height) - bounds.top().max(0.0);
    let ratio = visible / bounds.height;
    ratio >= MIN_VISIBLE_RATIO
        && bounds.top() < viewport_height * TOP_LIMIT_RATIO
        && bounds.bottom() > viewport_height * BOTTOM_LIMIT_RATIO
}

/// Where an intercepted gesture scrolls the container
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollIntent {
    pub axis: Axis,
    pub delta: f32,
}

impl ScrollIntent {
    /// `(dx, dy)` for `ScrollSurface::scroll_by`
    pub fn as_offsets(&self) -> (f32, f32) {
        match self.axis {
            Axis::Vertical => (0.0, self.delta),
            Axis::Horizontal => (self.delta, 0.0),
        }
    }
}

/// The scroll a gesture would cause, or `None` when the container is
/// exhausted in that direction (or the gesture has no usable motion)
pub fn plan_scroll(
    mode: WheelMode,
    event: &WheelEvent,
    limits: &ScrollLimits,
) -> Option<ScrollIntent> {
    let (axis, delta) = match mode {
        WheelMode::HorizontalOnly => (Axis::Horizontal, event.delta_y),
        WheelMode::Natural if event.is_vertical_dominant() => (Axis::Vertical, event.delta_y),
        WheelMode::Natural => (Axis::Horizontal, event.delta_x),
    };

    let has_room = match axis {
        Axis::Vertical => (delta > 0.0 && !limits.at_bottom) || (delta < 0.0 && !limits.at_top),
        Axis::Horizontal => (delta > 0.0 && !limits.at_right) || (delta < 0.0 && !limits.at_left),
    };
    has_room.then_some(ScrollIntent { axis, delta })
}
