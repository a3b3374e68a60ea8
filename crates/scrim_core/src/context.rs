//! Page-level services shared by every controller on a page
//!
//! One `PageContext` exists per page (or per test). It is passed explicitly to
//! fade controllers and the wheel arbiter, so two pages never share state.

use std::rc::Rc;

use crate::capability::{CapabilityProbe, HostEnvironment};
use crate::frame::{ManualFrameScheduler, SharedScheduler};
use crate::sim::{SimEnvironment, SimViewport};
use crate::surface::SharedViewport;

/// Shared services for one page
#[derive(Clone)]
pub struct PageContext {
    scheduler: SharedScheduler,
    probe: Rc<CapabilityProbe>,
    viewport: SharedViewport,
}

impl PageContext {
    pub fn new(
        scheduler: SharedScheduler,
        env: Rc<dyn HostEnvironment>,
        viewport: SharedViewport,
    ) -> Self {
        Self {
            scheduler,
            probe: Rc::new(CapabilityProbe::new(env)),
            viewport,
        }
    }

    /// Context over the in-memory host
    ///
    /// Returns the concrete handles alongside so callers can drive frames,
    /// preferences, and the viewport directly.
    pub fn simulated(
        viewport_height: f32,
        document_height: f32,
    ) -> (
        Self,
        Rc<ManualFrameScheduler>,
        Rc<SimEnvironment>,
        Rc<SimViewport>,
    ) {
        let scheduler = Rc::new(ManualFrameScheduler::new());
        let env = Rc::new(SimEnvironment::modern());
        let viewport = Rc::new(SimViewport::new(viewport_height, document_height));
        let ctx = Self::new(scheduler.clone(), env.clone(), viewport.clone());
        (ctx, scheduler, env, viewport)
    }

    pub fn scheduler(&self) -> &SharedScheduler {
        &self.scheduler
    }

    pub fn probe(&self) -> &Rc<CapabilityProbe> {
        &self.probe
    }

    pub fn viewport(&self) -> &SharedViewport {
        &self.viewport
    }
}
