//! Scroll geometry
//!
//! Pure functions and value types describing where a scroll container sits
//! within its content. Everything here is side-effect free: the same metrics
//! always produce the same answer.
//!
//! # Example
//!
//! ```rust
//! use scrim_core::geometry::{compute_edge_visibility, ScrollMetrics};
//!
//! // 1000px of content in a 200px tall container, scrolled 400px down
//! let metrics = ScrollMetrics::vertical(400.0, 1000.0, 200.0);
//! let visibility = compute_edge_visibility(&metrics, 8.0);
//!
//! assert!(visibility.top);
//! assert!(visibility.bottom);
//! assert!(!visibility.left && !visibility.right);
//! ```

use serde::Serialize;

/// Default distance (px) from an edge within which its fade stays hidden
pub const DEFAULT_EDGE_THRESHOLD: f32 = 8.0;

/// Slack (px) used when deciding whether a container is exhausted in a direction
pub const EXHAUSTION_SLACK: f32 = 1.0;

// ============================================================================
// Edges and Axes
// ============================================================================

/// Scroll axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    /// Block axis (top/bottom)
    Vertical,
    /// Inline axis (left/right)
    Horizontal,
}

/// One of the four edges of a scroll container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Edge {
    Top,
    Bottom,
    Left,
    Right,
}

impl Edge {
    /// All edges in declaration order
    pub const ALL: [Edge; 4] = [Edge::Top, Edge::Bottom, Edge::Left, Edge::Right];

    /// Lowercase name, used for CSS custom property names
    pub fn name(&self) -> &'static str {
        match self {
            Edge::Top => "top",
            Edge::Bottom => "bottom",
            Edge::Left => "left",
            Edge::Right => "right",
        }
    }

    /// Axis the edge belongs to
    pub fn axis(&self) -> Axis {
        match self {
            Edge::Top | Edge::Bottom => Axis::Vertical,
            Edge::Left | Edge::Right => Axis::Horizontal,
        }
    }

    /// CSS gradient direction pointing from this edge into the container
    pub fn gradient_direction(&self) -> &'static str {
        match self {
            Edge::Top => "to bottom",
            Edge::Bottom => "to top",
            Edge::Left => "to right",
            Edge::Right => "to left",
        }
    }
}

// ============================================================================
// Metrics
// ============================================================================

/// Measurements of a single scroll axis
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct AxisMetrics {
    /// Current scroll offset (scrollTop / scrollLeft)
    pub offset: f32,
    /// Total extent of the content (scrollHeight / scrollWidth)
    pub content: f32,
    /// Visible extent of the container (clientHeight / clientWidth)
    pub visible: f32,
}

impl AxisMetrics {
    pub const fn new(offset: f32, content: f32, visible: f32) -> Self {
        Self {
            offset,
            content,
            visible,
        }
    }

    /// Whether the content is larger than the container on this axis
    pub fn overflows(&self) -> bool {
        self.content > self.visible
    }

    /// Largest valid scroll offset
    pub fn max_offset(&self) -> f32 {
        (self.content - self.visible).max(0.0)
    }

    /// Scroll position as a 0-1 ratio (0 when the axis does not overflow)
    pub fn progress(&self) -> f32 {
        let range = self.content - self.visible;
        if range <= 0.0 {
            return 0.0;
        }
        (self.offset / range).clamp(0.0, 1.0)
    }

    /// Returns (show_near, show_far) for a fade threshold
    fn fade_edges(&self, threshold: f32) -> (bool, bool) {
        if !self.overflows() {
            return (false, false);
        }
        let at_near = self.offset <= threshold;
        let at_far = self.offset + self.visible >= self.content - threshold;
        (!at_near, !at_far)
    }

    /// Returns (at_near, at_far) with the fixed exhaustion slack
    fn limits(&self) -> (bool, bool) {
        let at_near = self.offset <= EXHAUSTION_SLACK;
        let at_far = self.offset >= self.content - self.visible - EXHAUSTION_SLACK;
        (at_near, at_far)
    }
}

/// Snapshot of a scroll container on both axes
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ScrollMetrics {
    pub vertical: AxisMetrics,
    pub horizontal: AxisMetrics,
}

impl ScrollMetrics {
    pub const fn new(vertical: AxisMetrics, horizontal: AxisMetrics) -> Self {
        Self {
            vertical,
            horizontal,
        }
    }

    /// Metrics for a container that only scrolls vertically
    pub const fn vertical(offset: f32, content: f32, visible: f32) -> Self {
        Self {
            vertical: AxisMetrics::new(offset, content, visible),
            horizontal: AxisMetrics::new(0.0, 0.0, 0.0),
        }
    }

    /// Metrics for a container that only scrolls horizontally
    pub const fn horizontal(offset: f32, content: f32, visible: f32) -> Self {
        Self {
            vertical: AxisMetrics::new(0.0, 0.0, 0.0),
            horizontal: AxisMetrics::new(offset, content, visible),
        }
    }

    pub fn axis(&self, axis: Axis) -> &AxisMetrics {
        match axis {
            Axis::Vertical => &self.vertical,
            Axis::Horizontal => &self.horizontal,
        }
    }

    pub fn axis_mut(&mut self, axis: Axis) -> &mut AxisMetrics {
        match axis {
            Axis::Vertical => &mut self.vertical,
            Axis::Horizontal => &mut self.horizontal,
        }
    }

    /// Larger of the two axis progress ratios
    pub fn progress(&self) -> f32 {
        self.vertical.progress().max(self.horizontal.progress())
    }

    /// Exhaustion flags used by wheel arbitration
    pub fn limits(&self) -> ScrollLimits {
        let (at_top, at_bottom) = self.vertical.limits();
        let (at_left, at_right) = self.horizontal.limits();
        ScrollLimits {
            at_top,
            at_bottom,
            at_left,
            at_right,
        }
    }
}

// ============================================================================
// Derived state
// ============================================================================

/// Which edges currently have hidden content beyond them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct EdgeVisibility {
    pub top: bool,
    pub bottom: bool,
    pub left: bool,
    pub right: bool,
}

impl EdgeVisibility {
    /// No fades anywhere
    pub const NONE: EdgeVisibility = EdgeVisibility {
        top: false,
        bottom: false,
        left: false,
        right: false,
    };

    pub const fn new(top: bool, bottom: bool, left: bool, right: bool) -> Self {
        Self {
            top,
            bottom,
            left,
            right,
        }
    }

    pub fn get(&self, edge: Edge) -> bool {
        match edge {
            Edge::Top => self.top,
            Edge::Bottom => self.bottom,
            Edge::Left => self.left,
            Edge::Right => self.right,
        }
    }

    /// Edges that show a fade, in `Edge::ALL` order
    pub fn visible_edges(&self) -> impl Iterator<Item = Edge> + '_ {
        Edge::ALL.into_iter().filter(|edge| self.get(*edge))
    }

    pub fn any(&self) -> bool {
        self.top || self.bottom || self.left || self.right
    }
}

/// Per-edge exhaustion: `true` means nothing more to reveal in that direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ScrollLimits {
    pub at_top: bool,
    pub at_bottom: bool,
    pub at_left: bool,
    pub at_right: bool,
}

/// Compute which edges should show a fade.
///
/// Per axis, the near edge is hidden while `offset <= threshold` and the far
/// edge is hidden while `offset + visible >= content - threshold`. An axis
/// without overflow never shows a fade. Negative thresholds are treated as 0.
pub fn compute_edge_visibility(metrics: &ScrollMetrics, threshold: f32) -> EdgeVisibility {
    let threshold = threshold.max(0.0);
    let (top, bottom) = metrics.vertical.fade_edges(threshold);
    let (left, right) = metrics.horizontal.fade_edges(threshold);
    EdgeVisibility {
        top,
        bottom,
        left,
        right,
    }
}

// ============================================================================
// Rectangles
// ============================================================================

/// Axis-aligned rectangle in viewport coordinates (like getBoundingClientRect)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Same rectangle moved vertically by `dy`
    pub fn translated_y(&self, dy: f32) -> Self {
        Self {
            y: self.y + dy,
            ..*self
        }
    }
}
