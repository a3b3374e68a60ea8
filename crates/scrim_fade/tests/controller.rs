//! Integration tests for the fade controller against the simulated host
//!
//! These tests verify that:
//! - Scrolling drives edge visibility through frame-coalesced measurements
//! - Content and size changes are picked up like scrolls
//! - Reduced motion and missing mask support blank the styles
//! - Teardown leaves nothing behind on the page

use std::rc::Rc;

use scrim_core::capability::REDUCED_MOTION_QUERY;
use scrim_core::sim::{SimEnvironment, SimSurface};
use scrim_core::{
    AxisMetrics, EdgeVisibility, ManualFrameScheduler, PageContext, Rect, ScrollMetrics,
};
use scrim_fade::{FadeConfig, FadeController, FallbackPolicy, TimingFunction};

struct Page {
    ctx: PageContext,
    scheduler: Rc<ManualFrameScheduler>,
    env: Rc<SimEnvironment>,
}

fn page() -> Page {
    let (ctx, scheduler, env, _) = PageContext::simulated(800.0, 2000.0);
    Page {
        ctx,
        scheduler,
        env,
    }
}

fn list_surface() -> Rc<SimSurface> {
    Rc::new(SimSurface::new(
        Rect::new(0.0, 100.0, 300.0, 200.0),
        ScrollMetrics::new(
            AxisMetrics::new(0.0, 1000.0, 200.0),
            AxisMetrics::new(0.0, 300.0, 300.0),
        ),
    ))
}

const BOTTOM: EdgeVisibility = EdgeVisibility::new(false, true, false, false);
const BOTH: EdgeVisibility = EdgeVisibility::new(true, true, false, false);
const TOP: EdgeVisibility = EdgeVisibility::new(true, false, false, false);

#[test]
fn test_scroll_through_list() {
    let page = page();
    let surface = list_surface();
    let fades = FadeController::attach(surface.clone(), FadeConfig::default(), &page.ctx);
    assert_eq!(fades.visibility(), BOTTOM);

    surface.scroll_to(0.0, 400.0);
    page.scheduler.run_frame();
    assert_eq!(fades.visibility(), BOTH);

    // 8px from the end is still inside the threshold
    surface.scroll_to(0.0, 792.0);
    page.scheduler.run_frame();
    assert_eq!(fades.visibility(), TOP);

    surface.scroll_to(0.0, 800.0);
    page.scheduler.run_frame();
    assert_eq!(fades.visibility(), TOP);
}

#[test]
fn test_changes_within_one_frame_measure_once() {
    let page = page();
    let surface = list_surface();
    let fades = FadeController::attach(surface.clone(), FadeConfig::default(), &page.ctx);
    let before = fades.measurement_count();

    let initial_style = fades.container_style(None);

    surface.scroll_to(0.0, 400.0);
    surface.scroll_to(0.0, 800.0);
    assert_eq!(page.scheduler.pending_count(), 1);
    assert_eq!(fades.visibility(), BOTTOM);
    assert_eq!(fades.container_style(None), initial_style);

    page.scheduler.run_frame();
    assert_eq!(fades.measurement_count(), before + 1);
    assert_eq!(fades.visibility(), TOP);

    let style = fades.container_style(None);
    assert_eq!(style, fades.container_style(Some(TOP)));
    assert_ne!(style, fades.container_style(Some(BOTH)));
}

#[test]
fn test_content_and_size_changes() {
    let page = page();
    let surface = list_surface();
    let fades = FadeController::attach(surface.clone(), FadeConfig::default(), &page.ctx);

    surface.set_content(300.0, 150.0);
    page.scheduler.run_frame();
    assert_eq!(fades.visibility(), EdgeVisibility::NONE);

    surface.set_content(300.0, 600.0);
    page.scheduler.run_frame();
    assert_eq!(fades.visibility(), BOTTOM);

    surface.resize(300.0, 600.0);
    page.scheduler.run_frame();
    assert_eq!(fades.visibility(), EdgeVisibility::NONE);
}

#[test]
fn test_mask_style_follows_visibility() {
    let page = page();
    let surface = list_surface();
    let fades = FadeController::attach(surface.clone(), FadeConfig::default(), &page.ctx);

    let style = fades.container_style(None);
    let mask = style.get("mask-image").unwrap();
    assert!(mask.starts_with(
        "linear-gradient(to bottom, transparent 0px, black 0px, black calc(100% - 20px)"
    ));
    assert_eq!(
        style.get("transition"),
        Some("mask 200ms ease-out, -webkit-mask 200ms ease-out")
    );
    assert!(style.get("--fade-bottom-gradient").is_some());
    assert!(style.get("--fade-top-gradient").is_none());

    surface.scroll_to(0.0, 400.0);
    page.scheduler.run_frame();
    let mask = fades.container_style(None);
    assert!(mask.get("mask-image").unwrap().contains("black 20px"));
}

#[test]
fn test_reduced_motion_blanks_styles() {
    let page = page();
    page.env.set_media(REDUCED_MOTION_QUERY, true);
    let fades = FadeController::attach(list_surface(), FadeConfig::default(), &page.ctx);

    assert!(fades.container_style(None).is_empty());
    assert!(fades.gradient_properties(None).is_empty());

    let report = fades.accessibility();
    assert!(report.reduced_motion_preferred);
    assert!(!report.should_apply_effects);

    // Visibility is still tracked
    assert_eq!(fades.visibility(), BOTTOM);
}

#[test]
fn test_reduced_motion_opt_out_keeps_mask_without_transition() {
    let page = page();
    page.env.set_media(REDUCED_MOTION_QUERY, true);
    let config = FadeConfig::default().with_respect_reduced_motion(false);
    let fades = FadeController::attach(list_surface(), config, &page.ctx);

    let style = fades.container_style(None);
    assert!(style.get("mask-image").is_some());
    assert!(style.get("transition").is_none());
}

#[test]
fn test_live_preference_change() {
    let page = page();
    let fades = FadeController::attach(list_surface(), FadeConfig::default(), &page.ctx);
    assert!(!fades.container_style(None).is_empty());
    let revision = fades.revision();

    page.env.set_reduced_motion(true);
    assert!(fades.revision() > revision);
    assert!(fades.container_style(None).is_empty());

    page.env.set_reduced_motion(false);
    assert!(!fades.container_style(None).is_empty());
}

#[test]
fn test_preference_change_without_style_change_keeps_revision() {
    let page = page();
    page.env.set_css_support("mask-image", false);
    page.env.set_css_support("-webkit-mask-image", false);
    let fades = FadeController::attach(list_surface(), FadeConfig::default(), &page.ctx);
    assert!(fades.container_style(None).is_empty());
    let revision = fades.revision();

    page.env.set_reduced_motion(true);
    assert!(fades.container_style(None).is_empty());
    assert_eq!(fades.revision(), revision);
}

#[test]
fn test_preference_change_drops_transition() {
    let page = page();
    let config = FadeConfig::default().with_respect_reduced_motion(false);
    let fades = FadeController::attach(list_surface(), config, &page.ctx);
    assert!(fades.container_style(None).get("transition").is_some());
    let revision = fades.revision();

    page.env.set_reduced_motion(true);
    let style = fades.container_style(None);
    assert!(style.get("mask-image").is_some());
    assert!(style.get("transition").is_none());
    assert_eq!(fades.revision(), revision + 1);
}

#[test]
fn test_missing_mask_support() {
    let page = page();
    page.env.set_css_support("mask-image", false);
    page.env.set_css_support("-webkit-mask-image", false);

    let disabled = FadeController::attach(list_surface(), FadeConfig::default(), &page.ctx);
    assert!(disabled.container_style(None).is_empty());

    let ignored = FadeController::attach(
        list_surface(),
        FadeConfig::default().with_fallback(FallbackPolicy::Ignore),
        &page.ctx,
    );
    assert!(ignored.container_style(None).get("mask-image").is_some());
}

#[test]
fn test_prefixed_mask_support_is_enough() {
    let page = page();
    page.env.set_css_support("mask-image", false);
    let fades = FadeController::attach(list_surface(), FadeConfig::default(), &page.ctx);
    assert!(!fades.container_style(None).is_empty());
}

#[test]
fn test_custom_transition() {
    let page = page();
    let config = FadeConfig::default()
        .with_transition(300.0, TimingFunction::from("cubic-bezier(0.4, 0, 0.2, 1)"))
        .with_fade_size(32.0);
    let fades = FadeController::attach(list_surface(), config, &page.ctx);

    let style = fades.container_style(None);
    assert_eq!(
        style.get("-webkit-transition"),
        Some("mask 300ms cubic-bezier(0.4, 0, 0.2, 1), -webkit-mask 300ms cubic-bezier(0.4, 0, 0.2, 1)")
    );
    assert!(style.get("mask-image").unwrap().contains("calc(100% - 32px)"));

    let still =
        FadeController::attach(list_surface(), FadeConfig::without_transitions(), &page.ctx);
    assert!(still.container_style(None).get("transition").is_none());
}

#[test]
fn test_controllers_are_independent() {
    let page = page();
    let first = list_surface();
    let second = list_surface();
    let a = FadeController::attach(first.clone(), FadeConfig::default(), &page.ctx);
    let strict = FadeConfig::default().with_threshold(500.0);
    let b = FadeController::attach(second.clone(), strict, &page.ctx);

    first.scroll_to(0.0, 400.0);
    second.scroll_to(0.0, 400.0);
    page.scheduler.run_frame();

    assert_eq!(a.visibility(), BOTH);
    assert_eq!(b.visibility(), EdgeVisibility::NONE);
}

#[test]
fn test_teardown_leaves_page_clean() {
    let page = page();
    let surface = list_surface();
    let fades = FadeController::attach(surface.clone(), FadeConfig::default(), &page.ctx);
    assert_eq!(surface.listener_count(), 1);
    assert_eq!(page.env.watcher_count(), 1);

    surface.scroll_to(0.0, 400.0);
    drop(fades);

    assert_eq!(surface.listener_count(), 0);
    assert_eq!(page.env.watcher_count(), 0);
    assert_eq!(page.scheduler.pending_count(), 0);
    assert_eq!(page.scheduler.run_frame(), 0);
}

#[test]
fn test_config_from_toml() {
    let config: FadeConfig = toml::from_str(
        r#"
        fade_size = 12.0

        [colors]
        fade_color = "rgba(255, 0, 0, 0.3)"
        "#,
    )
    .unwrap();

    let page = page();
    let fades = FadeController::attach(list_surface(), config, &page.ctx);
    assert_eq!(
        fades.gradient_properties(None).get(scrim_core::Edge::Bottom),
        Some("linear-gradient(to top, rgba(255, 0, 0, 0.3), transparent)")
    );
    assert!(fades
        .container_style(None)
        .get("mask-image")
        .unwrap()
        .contains("calc(100% - 12px)"));
}
