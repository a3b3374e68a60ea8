//! Style directives
//!
//! A [`StyleDirective`] is an ordered map of CSS property names to values that
//! the host applies to a container. Fades are expressed as a two-layer mask:
//! one vertical gradient, one horizontal, intersected so that each visible
//! edge fades to transparent over `fade_size` pixels.

use indexmap::IndexMap;
use serde::Serialize;

use scrim_core::geometry::EdgeVisibility;

use crate::config::TimingFunction;
use crate::gradient::EdgeGradients;

/// Which style surface produced a directive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum StyleVersion {
    /// Mask-based container styles
    Mask,
    /// Retired per-edge overlay styles; always empty
    LegacyOverlay,
}

/// Ordered CSS declarations for one element
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StyleDirective {
    version: StyleVersion,
    properties: IndexMap<String, String>,
}

impl StyleDirective {
    /// A directive with no declarations
    pub fn empty(version: StyleVersion) -> Self {
        Self {
            version,
            properties: IndexMap::new(),
        }
    }

    pub fn version(&self) -> StyleVersion {
        self.version
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn get(&self, property: &str) -> Option<&str> {
        self.properties.get(property).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.properties
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// Render as an inline `style` attribute value
    pub fn to_inline_css(&self) -> String {
        self.iter()
            .map(|(name, value)| format!("{}: {};", name, value))
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub(crate) fn insert(&mut self, property: impl Into<String>, value: impl Into<String>) {
        self.properties.insert(property.into(), value.into());
    }
}

// ============================================================================
// Mask construction
// ============================================================================

/// Two-layer mask image for the given visibility
///
/// Hidden edges collapse their fade band to zero so the content is fully
/// opaque there.
pub fn mask_image(visibility: &EdgeVisibility, fade_size: f32) -> String {
    format!(
        "{}, {}",
        mask_layer("to bottom", visibility.top, visibility.bottom, fade_size),
        mask_layer("to right", visibility.left, visibility.right, fade_size),
    )
}

fn mask_layer(direction: &str, near: bool, far: bool, fade_size: f32) -> String {
    let start = if near {
        format!("{}px", fade_size)
    } else {
        "0px".to_string()
    };
    let end = if far {
        format!("calc(100% - {}px)", fade_size)
    } else {
        "100%".to_string()
    };
    format!(
        "linear-gradient({}, transparent 0px, black {}, black {}, transparent 100%)",
        direction, start, end
    )
}

/// Transition value covering both mask properties
pub fn transition_value(duration_ms: f32, timing: &TimingFunction) -> String {
    if timing.is_empty() {
        format!("mask {0}ms, -webkit-mask {0}ms", duration_ms)
    } else {
        format!(
            "mask {0}ms {1}, -webkit-mask {0}ms {1}",
            duration_ms, timing
        )
    }
}

/// Inputs for a mask directive
#[derive(Debug, Clone, Copy)]
pub struct MaskParams<'a> {
    pub visibility: EdgeVisibility,
    pub fade_size: f32,
    /// `None` omits every transition declaration
    pub transition: Option<(f32, &'a TimingFunction)>,
    pub gradients: &'a EdgeGradients,
}

/// Build the container directive for a mask fade
pub fn mask_directive(params: MaskParams<'_>) -> StyleDirective {
    let mut style = StyleDirective::empty(StyleVersion::Mask);
    let image = mask_image(&params.visibility, params.fade_size);

    style.insert("mask-image", image.clone());
    style.insert("-webkit-mask-image", image);
    style.insert("mask-composite", "intersect");
    style.insert("-webkit-mask-composite", "source-in");
    style.insert("mask-repeat", "no-repeat");
    style.insert("-webkit-mask-repeat", "no-repeat");
    style.insert("mask-size", "100% 100%, 100% 100%");
    style.insert("-webkit-mask-size", "100% 100%, 100% 100%");
    style.insert("mask-position", "0 0, 0 0");
    style.insert("-webkit-mask-position", "0 0, 0 0");

    if let Some((duration_ms, timing)) = params.transition {
        let transition = transition_value(duration_ms, timing);
        for prefix in ["", "-webkit-", "-moz-", "-ms-"] {
            style.insert(format!("{}transition", prefix), transition.clone());
        }
    }

    for (property, gradient) in params.gradients.custom_properties() {
        style.insert(property, gradient);
    }

    style
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FadeColors;
    use crate::gradient::resolve_gradients;

    fn params<'a>(
        visibility: EdgeVisibility,
        transition: Option<(f32, &'a TimingFunction)>,
        gradients: &'a EdgeGradients,
    ) -> MaskParams<'a> {
        MaskParams {
            visibility,
            fade_size: 20.0,
            transition,
            gradients,
        }
    }

    #[test]
    fn test_mask_image_bottom_only() {
        let image = mask_image(&EdgeVisibility::new(false, true, false, false), 20.0);
        assert_eq!(
            image,
            "linear-gradient(to bottom, transparent 0px, black 0px, black calc(100% - 20px), transparent 100%), \
             linear-gradient(to right, transparent 0px, black 0px, black 100%, transparent 100%)"
        );
    }

    #[test]
    fn test_mask_image_all_edges() {
        let image = mask_image(&EdgeVisibility::new(true, true, true, true), 12.0);
        assert!(image.contains("to bottom, transparent 0px, black 12px, black calc(100% - 12px)"));
        assert!(image.contains("to right, transparent 0px, black 12px, black calc(100% - 12px)"));
    }

    #[test]
    fn test_mask_image_no_edges_is_opaque() {
        let image = mask_image(&EdgeVisibility::NONE, 20.0);
        assert_eq!(image.matches("black 0px, black 100%").count(), 2);
    }

    #[test]
    fn test_directive_declarations() {
        let gradients = EdgeGradients::empty();
        let timing = TimingFunction::EaseOut;
        let style = mask_directive(params(
            EdgeVisibility::new(true, false, false, false),
            Some((200.0, &timing)),
            &gradients,
        ));

        assert_eq!(style.version(), StyleVersion::Mask);
        assert_eq!(style.get("mask-image"), style.get("-webkit-mask-image"));
        assert_eq!(style.get("mask-composite"), Some("intersect"));
        assert_eq!(style.get("-webkit-mask-composite"), Some("source-in"));
        assert_eq!(style.get("mask-size"), Some("100% 100%, 100% 100%"));
        assert_eq!(
            style.get("transition"),
            Some("mask 200ms ease-out, -webkit-mask 200ms ease-out")
        );
        assert_eq!(style.get("-ms-transition"), style.get("transition"));
    }

    #[test]
    fn test_transition_omitted() {
        let gradients = EdgeGradients::empty();
        let style = mask_directive(params(EdgeVisibility::NONE, None, &gradients));
        assert!(style.get("transition").is_none());
        assert!(style.get("-webkit-transition").is_none());
        assert!(style.get("mask-image").is_some());
    }

    #[test]
    fn test_custom_timing_function() {
        let timing = TimingFunction::from("cubic-bezier(0.4, 0, 0.2, 1)");
        assert_eq!(
            transition_value(300.0, &timing),
            "mask 300ms cubic-bezier(0.4, 0, 0.2, 1), -webkit-mask 300ms cubic-bezier(0.4, 0, 0.2, 1)"
        );
        assert_eq!(
            transition_value(150.0, &TimingFunction::from("")),
            "mask 150ms, -webkit-mask 150ms"
        );
    }

    #[test]
    fn test_gradient_properties_included() {
        let visibility = EdgeVisibility::new(false, true, false, false);
        let gradients = resolve_gradients(&visibility, &FadeColors::default());
        let style = mask_directive(params(visibility, None, &gradients));
        assert_eq!(
            style.get("--fade-bottom-gradient"),
            Some("linear-gradient(to top, rgba(0,0,0,0.15), transparent)")
        );
        assert!(style.get("--fade-top-gradient").is_none());
    }

    #[test]
    fn test_inline_css_preserves_order() {
        let mut style = StyleDirective::empty(StyleVersion::Mask);
        style.insert("b", "2");
        style.insert("a", "1");
        assert_eq!(style.to_inline_css(), "b: 2; a: 1;");
    }
}
