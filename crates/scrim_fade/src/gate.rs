//! Accessibility and capability gating
//!
//! Decides whether a container gets any fade styling at all, and whether
//! transitions may animate it.

use serde::Serialize;

use scrim_core::capability::CapabilitySnapshot;

use crate::config::{FadeConfig, FallbackPolicy};

/// Whether the container should receive no fade styling
pub fn effects_suppressed(config: &FadeConfig, caps: &CapabilitySnapshot) -> bool {
    let motion = config.respect_reduced_motion && caps.prefers_reduced_motion;
    let unsupported = config.respect_browser_support
        && !caps.supports_mask_image
        && config.fallback == FallbackPolicy::Disable;
    motion || unsupported
}

/// Whether transition declarations may be emitted
///
/// Reduced motion always removes transitions, even when the config opts out
/// of suppressing the fades themselves.
pub fn transitions_allowed(config: &FadeConfig, caps: &CapabilitySnapshot) -> bool {
    !config.transition.disabled && !caps.prefers_reduced_motion && caps.supports_transitions
}

/// The capability-dependent parts of a container directive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleGates {
    pub suppressed: bool,
    pub transitions: bool,
}

impl StyleGates {
    pub fn evaluate(config: &FadeConfig, caps: &CapabilitySnapshot) -> Self {
        let suppressed = effects_suppressed(config, caps);
        Self {
            suppressed,
            transitions: !suppressed && transitions_allowed(config, caps),
        }
    }
}

/// Accessibility summary exposed to the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AccessibilityReport {
    pub capabilities: CapabilitySnapshot,
    pub reduced_motion_preferred: bool,
    pub should_apply_effects: bool,
}

impl AccessibilityReport {
    pub fn evaluate(config: &FadeConfig, caps: CapabilitySnapshot) -> Self {
        Self {
            capabilities: caps,
            reduced_motion_preferred: caps.prefers_reduced_motion,
            should_apply_effects: !effects_suppressed(config, &caps),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn modern() -> CapabilitySnapshot {
        CapabilitySnapshot {
            prefers_reduced_motion: false,
            prefers_high_contrast: false,
            supports_mask_image: true,
            supports_transitions: true,
        }
    }

    #[test]
    fn test_modern_host_applies_everything() {
        let config = FadeConfig::default();
        assert!(!effects_suppressed(&config, &modern()));
        assert!(transitions_allowed(&config, &modern()));
    }

    #[test]
    fn test_reduced_motion_suppresses() {
        let caps = CapabilitySnapshot {
            prefers_reduced_motion: true,
            ..modern()
        };
        assert!(effects_suppressed(&FadeConfig::default(), &caps));

        let opted_out = FadeConfig::default().with_respect_reduced_motion(false);
        assert!(!effects_suppressed(&opted_out, &caps));
        assert!(!transitions_allowed(&opted_out, &caps));
    }

    #[test]
    fn test_missing_mask_support() {
        let caps = CapabilitySnapshot {
            supports_mask_image: false,
            ..modern()
        };
        assert!(effects_suppressed(&FadeConfig::default(), &caps));

        let ignore = FadeConfig::default().with_fallback(FallbackPolicy::Ignore);
        assert!(!effects_suppressed(&ignore, &caps));

        let mut no_check = FadeConfig::default();
        no_check.respect_browser_support = false;
        assert!(!effects_suppressed(&no_check, &caps));
    }

    #[test]
    fn test_transition_gates() {
        assert!(!transitions_allowed(&FadeConfig::without_transitions(), &modern()));

        let caps = CapabilitySnapshot {
            supports_transitions: false,
            ..modern()
        };
        assert!(!transitions_allowed(&FadeConfig::default(), &caps));
    }

    #[test]
    fn test_report() {
        let caps = CapabilitySnapshot {
            prefers_reduced_motion: true,
            ..modern()
        };
        let report = AccessibilityReport::evaluate(&FadeConfig::default(), caps);
        assert!(report.reduced_motion_preferred);
        assert!(!report.should_apply_effects);
    }

    #[test]
    fn test_style_gates() {
        let config = FadeConfig::default();
        let reduced = CapabilitySnapshot {
            prefers_reduced_motion: true,
            ..modern()
        };
        assert_eq!(
            StyleGates::evaluate(&config, &modern()),
            StyleGates {
                suppressed: false,
                transitions: true,
            }
        );
        assert_eq!(
            StyleGates::evaluate(&config, &reduced),
            StyleGates {
                suppressed: true,
                transitions: false,
            }
        );

        // Already blanked by missing mask support, so reduced motion changes nothing
        let bare = CapabilitySnapshot {
            supports_mask_image: false,
            ..modern()
        };
        let bare_reduced = CapabilitySnapshot {
            prefers_reduced_motion: true,
            ..bare
        };
        assert_eq!(
            StyleGates::evaluate(&config, &bare),
            StyleGates::evaluate(&config, &bare_reduced)
        );
    }
}
