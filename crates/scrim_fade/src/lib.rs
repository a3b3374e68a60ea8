//! Scrim Fade
//!
//! Edge fades for scroll containers. A [`FadeController`] watches one scroll
//! surface, decides which edges still have hidden content, and renders mask
//! styles that fade those edges out.
//!
//! # Example
//!
//! ```rust
//! use std::rc::Rc;
//! use scrim_core::{PageContext, Rect, ScrollMetrics};
//! use scrim_core::sim::SimSurface;
//! use scrim_fade::{FadeConfig, FadeController};
//!
//! let (ctx, scheduler, _env, _viewport) = PageContext::simulated(800.0, 2000.0);
//! let surface = Rc::new(SimSurface::new(
//!     Rect::new(0.0, 0.0, 300.0, 200.0),
//!     ScrollMetrics::vertical(0.0, 1000.0, 200.0),
//! ));
//!
//! let fades = FadeController::attach(surface.clone(), FadeConfig::default(), &ctx);
//! assert!(fades.visibility().bottom);
//!
//! surface.scroll_to(0.0, 400.0);
//! scheduler.run_frame();
//! assert!(fades.visibility().top);
//!
//! let style = fades.container_style(None);
//! assert!(style.get("mask-image").is_some());
//! ```

pub mod config;
pub mod controller;
pub mod gate;
pub mod gradient;
pub mod style;

pub use config::{
    FadeColors, FadeConfig, FallbackPolicy, GradientColors, StepPosition, TimingFunction,
    TransitionConfig,
};
pub use controller::{FadeController, MeasureState, StyleRequest};
pub use gate::{effects_suppressed, transitions_allowed, AccessibilityReport, StyleGates};
pub use gradient::{colored_fade_css, resolve_gradients, EdgeGradients, COLORED_FADE_CLASS};
pub use style::{mask_directive, mask_image, MaskParams, StyleDirective, StyleVersion};
