//! Colored fade gradients
//!
//! Colored fades are painted by pseudo-element overlays that read one CSS
//! custom property per edge. Only visible edges get a property; an absent
//! property leaves that overlay transparent.

use smallvec::SmallVec;

use scrim_core::geometry::{Edge, EdgeVisibility};

use crate::config::{FadeColors, GradientColors};

/// Class that enables the overlay stylesheet on a container
pub const COLORED_FADE_CLASS: &str = "scroll-fades-colored";

/// Custom property carrying the gradient for `edge`
pub fn gradient_property(edge: Edge) -> &'static str {
    match edge {
        Edge::Top => "--fade-top-gradient",
        Edge::Bottom => "--fade-bottom-gradient",
        Edge::Left => "--fade-left-gradient",
        Edge::Right => "--fade-right-gradient",
    }
}

/// `linear-gradient(<direction>, <from>, <to>)` pointing inward from `edge`
pub fn linear_gradient(edge: Edge, colors: &GradientColors) -> String {
    format!(
        "linear-gradient({}, {}, {})",
        edge.gradient_direction(),
        colors.from,
        colors.to
    )
}

/// Gradients for the visible edges, in top/bottom/left/right order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EdgeGradients {
    entries: SmallVec<[(Edge, String); 4]>,
}

impl EdgeGradients {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn get(&self, edge: Edge) -> Option<&str> {
        self.entries
            .iter()
            .find(|(e, _)| *e == edge)
            .map(|(_, gradient)| gradient.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Edge, &str)> + '_ {
        self.entries.iter().map(|(edge, gradient)| (*edge, gradient.as_str()))
    }

    /// `(custom property, gradient)` pairs
    pub fn custom_properties(&self) -> impl Iterator<Item = (&'static str, &str)> + '_ {
        self.iter().map(|(edge, gradient)| (gradient_property(edge), gradient))
    }
}

/// Resolve gradients for every visible edge
///
/// `colors.fade_color`, when set, wins over per-edge colors and fades to
/// transparent. Edges without colors use the default translucent black.
pub fn resolve_gradients(visibility: &EdgeVisibility, colors: &FadeColors) -> EdgeGradients {
    let entries = visibility
        .visible_edges()
        .map(|edge| (edge, linear_gradient(edge, &colors.resolve(edge))))
        .collect();
    EdgeGradients { entries }
}

/// Overlay stylesheet for colored fades under `class_name`
///
/// `::before` stacks the top and bottom gradients, `::after` the left and
/// right ones. Both layers cover the whole container and never intercept
/// pointer events.
pub fn colored_fade_css(class_name: &str) -> String {
    let class = class_name.trim_start_matches('.');
    let mut css = format!(
        ".{class} {{\n  position: relative;\n}}\n\
         .{class}::before,\n.{class}::after {{\n  content: \"\";\n  position: absolute;\n  \
         pointer-events: none;\n  z-index: 1;\n}}\n"
    );
    for (pseudo, first, second) in [
        ("before", Edge::Top, Edge::Bottom),
        ("after", Edge::Left, Edge::Right),
    ] {
        css.push_str(&format!(
            ".{class}::{pseudo} {{\n  top: 0;\n  left: 0;\n  right: 0;\n  bottom: 0;\n  \
             background: var({}, transparent),\n              var({}, transparent);\n  \
             background-size: 100% 100%;\n  background-repeat: no-repeat;\n}}\n",
            gradient_property(first),
            gradient_property(second)
        ));
    }
    css
}
