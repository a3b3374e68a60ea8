//! Capability and preference probing
//!
//! Answers two questions about the host: what the user prefers (reduced
//! motion, high contrast) and what the renderer supports (mask-image,
//! transitions). Detection is synchronous and best-effort. A host without
//! feature-detection APIs (headless or offline rendering) yields a snapshot
//! where every flag is `false`.

use std::cell::Cell;
use std::rc::Rc;

use serde::Serialize;

use crate::surface::Subscription;

/// Media query for the reduced-motion preference
pub const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";
/// Media query for an explicit "no preference" motion setting
pub const NO_MOTION_PREFERENCE_QUERY: &str = "(prefers-reduced-motion: no-preference)";
/// Media queries that indicate a high-contrast mode
pub const HIGH_CONTRAST_QUERIES: [&str; 4] = [
    "(prefers-contrast: high)",
    "(-ms-high-contrast: active)",
    "(-ms-high-contrast: white-on-black)",
    "(-ms-high-contrast: black-on-white)",
];

/// Callback invoked with the new `matches` value of a media query
pub type MediaListener = Rc<dyn Fn(bool)>;

/// Host feature-detection APIs
///
/// `None` from a query method means the API is missing or failed for that
/// query; the probe maps it to "not supported / no preference".
pub trait HostEnvironment {
    /// Whether a media-query API (matchMedia) exists at all
    fn has_match_media(&self) -> bool;

    /// Whether a CSS feature-query API (CSS.supports) exists at all
    fn has_css_supports(&self) -> bool;

    /// Evaluate a media query
    fn match_media(&self, query: &str) -> Option<bool>;

    /// Evaluate a CSS `property: value` feature query
    fn css_supports(&self, property: &str, value: &str) -> Option<bool>;

    /// Subscribe to changes of a media query
    fn watch_media(&self, query: &str, listener: MediaListener) -> Option<Subscription>;
}

/// Environment with no detection APIs (server-side or offline rendering)
#[derive(Debug, Clone, Copy, Default)]
pub struct HeadlessEnvironment;

impl HostEnvironment for HeadlessEnvironment {
    fn has_match_media(&self) -> bool {
        false
    }

    fn has_css_supports(&self) -> bool {
        false
    }

    fn match_media(&self, _query: &str) -> Option<bool> {
        None
    }

    fn css_supports(&self, _property: &str, _value: &str) -> Option<bool> {
        None
    }

    fn watch_media(&self, _query: &str, _listener: MediaListener) -> Option<Subscription> {
        None
    }
}

// ============================================================================
// Snapshots
// ============================================================================

/// User preferences and renderer support, as seen once per session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CapabilitySnapshot {
    pub prefers_reduced_motion: bool,
    pub prefers_high_contrast: bool,
    pub supports_mask_image: bool,
    pub supports_transitions: bool,
}

/// The user's motion setting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum MotionPreference {
    Reduce,
    NoPreference,
    #[default]
    Unknown,
}

/// Full capability report, including how the answers were obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BrowserCapabilities {
    #[serde(flatten)]
    pub snapshot: CapabilitySnapshot,
    pub motion_preference: MotionPreference,
    pub is_headless: bool,
    pub has_match_media: bool,
    pub has_css_supports: bool,
}

// ============================================================================
// Individual probes
// ============================================================================

pub fn prefers_reduced_motion(env: &dyn HostEnvironment) -> bool {
    env.has_match_media() && env.match_media(REDUCED_MOTION_QUERY).unwrap_or(false)
}

pub fn prefers_high_contrast(env: &dyn HostEnvironment) -> bool {
    env.has_match_media()
        && HIGH_CONTRAST_QUERIES
            .iter()
            .any(|query| env.match_media(query).unwrap_or(false))
}

/// Standard or `-webkit-` prefixed mask-image support
pub fn supports_mask_image(env: &dyn HostEnvironment) -> bool {
    const PROBE_VALUE: &str = "linear-gradient(black, transparent)";
    env.has_css_supports()
        && ["mask-image", "-webkit-mask-image"]
            .iter()
            .any(|property| env.css_supports(property, PROBE_VALUE).unwrap_or(false))
}

pub fn supports_transitions(env: &dyn HostEnvironment) -> bool {
    env.has_css_supports()
        && env
            .css_supports("transition", "opacity 0.3s ease")
            .unwrap_or(false)
}

pub fn motion_preference(env: &dyn HostEnvironment) -> MotionPreference {
    if !env.has_match_media() {
        return MotionPreference::Unknown;
    }
    match (
        env.match_media(REDUCED_MOTION_QUERY),
        env.match_media(NO_MOTION_PREFERENCE_QUERY),
    ) {
        (Some(true), _) => MotionPreference::Reduce,
        (_, Some(true)) => MotionPreference::NoPreference,
        _ => MotionPreference::Unknown,
    }
}

// ============================================================================
// Cached probe
// ============================================================================

/// Lazily computed, cached capability snapshot for one page
///
/// The snapshot is computed on first access. Only the reduced-motion flag is
/// ever refreshed afterwards, through [`CapabilityProbe::watch_reduced_motion`].
pub struct CapabilityProbe {
    env: Rc<dyn HostEnvironment>,
    cached: Rc<Cell<Option<CapabilitySnapshot>>>,
}

impl CapabilityProbe {
    pub fn new(env: Rc<dyn HostEnvironment>) -> Self {
        Self {
            env,
            cached: Rc::new(Cell::new(None)),
        }
    }

    /// Probe for a host without detection APIs
    pub fn headless() -> Self {
        Self::new(Rc::new(HeadlessEnvironment))
    }

    /// The cached snapshot, computing it on first use
    pub fn capabilities(&self) -> CapabilitySnapshot {
        if let Some(snapshot) = self.cached.get() {
            return snapshot;
        }
        let snapshot = self.detect();
        tracing::debug!(?snapshot, "capabilities detected");
        self.cached.set(Some(snapshot));
        snapshot
    }

    /// Whether the snapshot has been computed yet
    pub fn is_cached(&self) -> bool {
        self.cached.get().is_some()
    }

    /// Full report for callers that branch their UI on capabilities
    pub fn browser_capabilities(&self) -> BrowserCapabilities {
        let env = self.env.as_ref();
        let has_match_media = env.has_match_media();
        let has_css_supports = env.has_css_supports();
        BrowserCapabilities {
            snapshot: self.capabilities(),
            motion_preference: motion_preference(env),
            is_headless: !has_match_media && !has_css_supports,
            has_match_media,
            has_css_supports,
        }
    }

    /// Subscribe to live reduced-motion changes
    ///
    /// The cached snapshot is updated before `callback` runs. Returns a no-op
    /// subscription when the host cannot report changes.
    pub fn watch_reduced_motion<F>(&self, callback: F) -> Subscription
    where
        F: Fn(bool) + 'static,
    {
        if !self.env.has_match_media() {
            return Subscription::noop();
        }

        let cached = self.cached.clone();
        let listener: MediaListener = Rc::new(move |prefers_reduced| {
            if let Some(mut snapshot) = cached.get() {
                snapshot.prefers_reduced_motion = prefers_reduced;
                cached.set(Some(snapshot));
            }
            tracing::debug!(prefers_reduced, "reduced-motion preference changed");
            callback(prefers_reduced);
        });

        self.env
            .watch_media(REDUCED_MOTION_QUERY, listener)
            .unwrap_or_else(Subscription::noop)
    }

    fn detect(&self) -> CapabilitySnapshot {
        let env = self.env.as_ref();
        CapabilitySnapshot {
            prefers_reduced_motion: prefers_reduced_motion(env),
            prefers_high_contrast: prefers_high_contrast(env),
            supports_mask_image: supports_mask_image(env),
            supports_transitions: supports_transitions(env),
        }
    }
}

impl Default for CapabilityProbe {
    fn default() -> Self {
        Self::headless()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SimEnvironment;

    #[test]
    fn test_headless_defaults_to_unsupported() {
        let probe = CapabilityProbe::headless();
        assert_eq!(probe.capabilities(), CapabilitySnapshot::default());

        let report = probe.browser_capabilities();
        assert!(report.is_headless);
        assert!(!report.has_match_media);
        assert_eq!(report.motion_preference, MotionPreference::Unknown);

        let sub = probe.watch_reduced_motion(|_| panic!("headless hosts never notify"));
        assert!(!sub.is_active());
    }

    #[test]
    fn test_detects_browser_support() {
        let env = SimEnvironment::modern();
        let probe = CapabilityProbe::new(Rc::new(env));
        let snapshot = probe.capabilities();
        assert!(snapshot.supports_mask_image);
        assert!(snapshot.supports_transitions);
        assert!(!snapshot.prefers_reduced_motion);
        assert!(!snapshot.prefers_high_contrast);
        assert_eq!(
            probe.browser_capabilities().motion_preference,
            MotionPreference::NoPreference
        );
    }

    #[test]
    fn test_webkit_prefixed_mask_counts() {
        let env = SimEnvironment::modern();
        env.set_css_support("mask-image", false);
        env.set_css_support("-webkit-mask-image", true);
        assert!(supports_mask_image(&env));

        env.set_css_support("-webkit-mask-image", false);
        assert!(!supports_mask_image(&env));
    }

    #[test]
    fn test_legacy_high_contrast_query() {
        let env = SimEnvironment::modern();
        env.set_media("(-ms-high-contrast: active)", true);
        assert!(prefers_high_contrast(&env));
    }

    #[test]
    fn test_snapshot_is_cached_until_watch_update() {
        let env = Rc::new(SimEnvironment::modern());
        let probe = CapabilityProbe::new(env.clone());
        assert!(!probe.is_cached());
        assert!(!probe.capabilities().prefers_reduced_motion);
        assert!(probe.is_cached());

        // A silent change is not picked up by the cache
        env.set_media(REDUCED_MOTION_QUERY, true);
        assert!(!probe.capabilities().prefers_reduced_motion);

        let seen = Rc::new(Cell::new(None));
        let s = seen.clone();
        let _sub = probe.watch_reduced_motion(move |reduced| s.set(Some(reduced)));

        env.set_reduced_motion(true);
        assert_eq!(seen.get(), Some(true));
        assert!(probe.capabilities().prefers_reduced_motion);

        env.set_reduced_motion(false);
        assert_eq!(seen.get(), Some(false));
        assert!(!probe.capabilities().prefers_reduced_motion);
    }

    #[test]
    fn test_dropping_watch_unsubscribes() {
        let env = Rc::new(SimEnvironment::modern());
        let probe = CapabilityProbe::new(env.clone());
        let hits = Rc::new(Cell::new(0));
        let h = hits.clone();
        let sub = probe.watch_reduced_motion(move |_| h.set(h.get() + 1));

        env.set_reduced_motion(true);
        drop(sub);
        env.set_reduced_motion(false);
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn test_report_serializes_flat() {
        let probe = CapabilityProbe::new(Rc::new(SimEnvironment::modern()));
        let json = serde_json::to_value(probe.browser_capabilities()).unwrap();
        assert_eq!(json["supports_mask_image"], true);
        assert_eq!(json["motion_preference"], "no-preference");
        assert_eq!(json["is_headless"], false);
    }
}
