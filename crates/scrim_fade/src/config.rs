//! Fade configuration
//!
//! Every field is optional when deserializing; missing fields take the
//! defaults below. A config is fixed for the lifetime of its controller.
//!
//! ```toml
//! threshold = 16.0
//! fade_size = 24.0
//! fallback = "ignore"
//!
//! [transition]
//! duration_ms = 300.0
//! timing = "cubic-bezier(0.4, 0, 0.2, 1)"
//!
//! [colors]
//! fade_color = "rgba(255, 0, 0, 0.3)"
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use scrim_core::geometry::{Edge, DEFAULT_EDGE_THRESHOLD};

/// Default fade band (px)
pub const DEFAULT_FADE_SIZE: f32 = 20.0;
/// Default transition duration (ms)
pub const DEFAULT_TRANSITION_MS: f32 = 200.0;
/// Default gradient start color
pub const DEFAULT_GRADIENT_FROM: &str = "rgba(0,0,0,0.15)";
/// Default gradient end color
pub const DEFAULT_GRADIENT_TO: &str = "transparent";

// ============================================================================
// Top-level config
// ============================================================================

/// Per-container fade configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FadeConfig {
    /// Distance (px) from an edge within which its fade stays hidden
    pub threshold: f32,
    /// Width (px) of the fade band
    pub fade_size: f32,
    /// Gradient colors for colored fades
    pub colors: FadeColors,
    /// Transition settings
    pub transition: TransitionConfig,
    /// Suppress all effects when the user prefers reduced motion
    pub respect_reduced_motion: bool,
    /// Apply `fallback` when the host lacks mask-image support
    pub respect_browser_support: bool,
    /// What to do when mask-image is unsupported
    pub fallback: FallbackPolicy,
}

impl Default for FadeConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_EDGE_THRESHOLD,
            fade_size: DEFAULT_FADE_SIZE,
            colors: FadeColors::default(),
            transition: TransitionConfig::default(),
            respect_reduced_motion: true,
            respect_browser_support: true,
            fallback: FallbackPolicy::Disable,
        }
    }
}

impl FadeConfig {
    /// Config with transitions turned off
    pub fn without_transitions() -> Self {
        Self {
            transition: TransitionConfig {
                disabled: true,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_fade_size(mut self, fade_size: f32) -> Self {
        self.fade_size = fade_size;
        self
    }

    /// Use one color for every edge
    pub fn with_fade_color(mut self, color: impl Into<String>) -> Self {
        self.colors.fade_color = Some(color.into());
        self
    }

    /// Set the colors of a single edge
    pub fn with_edge_colors(mut self, edge: Edge, colors: GradientColors) -> Self {
        *self.colors.slot_mut(edge) = Some(colors);
        self
    }

    pub fn with_transition(mut self, duration_ms: f32, timing: TimingFunction) -> Self {
        self.transition.duration_ms = duration_ms;
        self.transition.timing = timing;
        self
    }

    pub fn with_respect_reduced_motion(mut self, respect: bool) -> Self {
        self.respect_reduced_motion = respect;
        self
    }

    pub fn with_fallback(mut self, fallback: FallbackPolicy) -> Self {
        self.fallback = fallback;
        self
    }

    /// Clamp out-of-range values instead of rejecting them
    pub fn normalized(mut self) -> Self {
        clamp_non_negative("threshold", &mut self.threshold);
        clamp_non_negative("fade_size", &mut self.fade_size);
        clamp_non_negative("transition.duration_ms", &mut self.transition.duration_ms);
        self
    }
}

fn clamp_non_negative(field: &str, value: &mut f32) {
    if *value < 0.0 || value.is_nan() {
        tracing::warn!("fade config `{}` = {} is invalid, using 0", field, value);
        *value = 0.0;
    }
}

/// Behavior when the host cannot render mask-image fades
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FallbackPolicy {
    /// Render nothing
    #[default]
    Disable,
    /// Emit mask styles anyway
    Ignore,
}

// ============================================================================
// Colors
// ============================================================================

/// Two-stop gradient colors (any CSS color syntax)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradientColors {
    pub from: String,
    pub to: String,
}

impl GradientColors {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }

    /// A single color fading to transparent
    pub fn solid(color: impl Into<String>) -> Self {
        Self::new(color, DEFAULT_GRADIENT_TO)
    }
}

impl Default for GradientColors {
    fn default() -> Self {
        Self::new(DEFAULT_GRADIENT_FROM, DEFAULT_GRADIENT_TO)
    }
}

/// Color settings: a global override or per-edge pairs
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FadeColors {
    /// Applied to every visible edge, overriding per-edge colors
    pub fade_color: Option<String>,
    pub top: Option<GradientColors>,
    pub bottom: Option<GradientColors>,
    pub left: Option<GradientColors>,
    pub right: Option<GradientColors>,
}

impl FadeColors {
    /// Colors in effect for `edge` after applying the override and defaults
    pub fn resolve(&self, edge: Edge) -> GradientColors {
        if let Some(color) = &self.fade_color {
            return GradientColors::solid(color.clone());
        }
        self.slot(edge).clone().unwrap_or_default()
    }

    fn slot(&self, edge: Edge) -> &Option<GradientColors> {
        match edge {
            Edge::Top => &self.top,
            Edge::Bottom => &self.bottom,
            Edge::Left => &self.left,
            Edge::Right => &self.right,
        }
    }

    fn slot_mut(&mut self, edge: Edge) -> &mut Option<GradientColors> {
        match edge {
            Edge::Top => &mut self.top,
            Edge::Bottom => &mut self.bottom,
            Edge::Left => &mut self.left,
            Edge::Right => &mut self.right,
        }
    }
}

// ============================================================================
// Transitions
// ============================================================================

/// Transition settings for mask changes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransitionConfig {
    pub duration_ms: f32,
    pub timing: TimingFunction,
    /// Never emit transition declarations
    pub disabled: bool,
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            duration_ms: DEFAULT_TRANSITION_MS,
            timing: TimingFunction::EaseOut,
            disabled: false,
        }
    }
}

/// Where a `steps()` jump happens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StepPosition {
    Start,
    #[default]
    End,
}

/// CSS timing function
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TimingFunction {
    Linear,
    Ease,
    EaseIn,
    #[default]
    EaseOut,
    EaseInOut,
    CubicBezier(f32, f32, f32, f32),
    Steps(u32, StepPosition),
    /// Passed through verbatim; an empty string means "no timing token"
    Custom(String),
}

impl TimingFunction {
    /// Whether rendering produces no text
    pub fn is_empty(&self) -> bool {
        matches!(self, TimingFunction::Custom(s) if s.trim().is_empty())
    }
}

impl fmt::Display for TimingFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimingFunction::Linear => f.write_str("linear"),
            TimingFunction::Ease => f.write_str("ease"),
            TimingFunction::EaseIn => f.write_str("ease-in"),
            TimingFunction::EaseOut => f.write_str("ease-out"),
            TimingFunction::EaseInOut => f.write_str("ease-in-out"),
            TimingFunction::CubicBezier(x1, y1, x2, y2) => {
                write!(f, "cubic-bezier({}, {}, {}, {})", x1, y1, x2, y2)
            }
            TimingFunction::Steps(n, StepPosition::End) => write!(f, "steps({}, end)", n),
            TimingFunction::Steps(n, StepPosition::Start) => write!(f, "steps({}, start)", n),
            TimingFunction::Custom(raw) => f.write_str(raw.trim()),
        }
    }
}

impl FromStr for TimingFunction {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let parsed = match trimmed {
            "linear" => TimingFunction::Linear,
            "ease" => TimingFunction::Ease,
            "ease-in" => TimingFunction::EaseIn,
            "ease-out" => TimingFunction::EaseOut,
            "ease-in-out" => TimingFunction::EaseInOut,
            _ => parse_function(trimmed).unwrap_or_else(|| TimingFunction::Custom(trimmed.into())),
        };
        Ok(parsed)
    }
}

fn parse_function(s: &str) -> Option<TimingFunction> {
    let (name, rest) = s.split_once('(')?;
    let args: Vec<&str> = rest.strip_suffix(')')?.split(',').map(str::trim).collect();
    match (name.trim(), args.as_slice()) {
        ("cubic-bezier", [x1, y1, x2, y2]) => Some(TimingFunction::CubicBezier(
            x1.parse().ok()?,
            y1.parse().ok()?,
            x2.parse().ok()?,
            y2.parse().ok()?,
        )),
        ("steps", [n]) => Some(TimingFunction::Steps(n.parse().ok()?, StepPosition::End)),
        ("steps", [n, position]) => {
            let position = match *position {
                "end" | "jump-end" => StepPosition::End,
                "start" | "jump-start" => StepPosition::Start,
                _ => return None,
            };
            Some(TimingFunction::Steps(n.parse().ok()?, position))
        }
        _ => None,
    }
}

impl From<String> for TimingFunction {
    fn from(s: String) -> Self {
        match s.parse() {
            Ok(timing) => timing,
            Err(never) => match never {},
        }
    }
}

impl From<&str> for TimingFunction {
    fn from(s: &str) -> Self {
        TimingFunction::from(s.to_string())
    }
}

impl From<TimingFunction> for String {
    fn from(timing: TimingFunction) -> Self {
        timing.to_string()
    }
}
