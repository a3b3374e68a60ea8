//! Animation frame scheduling
//!
//! The only deferral primitive the core uses: run a callback on the next
//! animation frame (requestAnimationFrame), or cancel it before it fires.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Handle for a pending frame callback
    pub struct FrameRequestId;
}

/// Callback run when a frame fires
pub type FrameCallback = Box<dyn FnOnce()>;

/// Host-provided frame scheduler
pub trait FrameScheduler {
    /// Run `callback` on the next animation frame
    fn request_frame(&self, callback: FrameCallback) -> FrameRequestId;

    /// Cancel a pending callback; unknown or already-fired ids are ignored
    fn cancel_frame(&self, id: FrameRequestId);
}

/// Shared handle to a frame scheduler
pub type SharedScheduler = Rc<dyn FrameScheduler>;

/// Frame scheduler driven explicitly by the caller
///
/// Callbacks queue up until [`ManualFrameScheduler::run_frame`] is called.
/// Used by headless hosts and tests.
#[derive(Default)]
pub struct ManualFrameScheduler {
    pending: RefCell<SlotMap<FrameRequestId, FrameCallback>>,
    requested: Cell<u64>,
    cancelled: Cell<u64>,
    frames: Cell<u64>,
}

impl ManualFrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire every callback queued before this call
    ///
    /// Callbacks requested while the frame runs wait for the next frame.
    /// Returns the number of callbacks that ran.
    pub fn run_frame(&self) -> usize {
        let due: Vec<FrameCallback> = {
            let mut pending = self.pending.borrow_mut();
            pending.drain().map(|(_, callback)| callback).collect()
        };
        self.frames.set(self.frames.get() + 1);

        let count = due.len();
        for callback in due {
            callback();
        }
        tracing::trace!("frame {} ran {} callbacks", self.frames.get(), count);
        count
    }

    /// Number of callbacks waiting for the next frame
    pub fn pending_count(&self) -> usize {
        self.pending.borrow().len()
    }

    /// Total number of `request_frame` calls
    pub fn requested_count(&self) -> u64 {
        self.requested.get()
    }

    /// Total number of successful cancellations
    pub fn cancelled_count(&self) -> u64 {
        self.cancelled.get()
    }

    /// Number of frames run so far
    pub fn frame_count(&self) -> u64 {
        self.frames.get()
    }

    pub fn is_pending(&self, id: FrameRequestId) -> bool {
        self.pending.borrow().contains_key(id)
    }
}

impl FrameScheduler for ManualFrameScheduler {
    fn request_frame(&self, callback: FrameCallback) -> FrameRequestId {
        self.requested.set(self.requested.get() + 1);
        self.pending.borrow_mut().insert(callback)
    }

    fn cancel_frame(&self, id: FrameRequestId) {
        if self.pending.borrow_mut().remove(id).is_some() {
            self.cancelled.set(self.cancelled.get() + 1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_frame_fires_pending() {
        let scheduler = ManualFrameScheduler::new();
        let hits = Rc::new(Cell::new(0));

        for _ in 0..3 {
            let hits = hits.clone();
            scheduler.request_frame(Box::new(move || hits.set(hits.get() + 1)));
        }
        assert_eq!(scheduler.pending_count(), 3);
        assert_eq!(scheduler.run_frame(), 3);
        assert_eq!(hits.get(), 3);
        assert_eq!(scheduler.pending_count(), 0);
        assert_eq!(scheduler.frame_count(), 1);
    }

    #[test]
    fn test_cancel_frame() {
        let scheduler = ManualFrameScheduler::new();
        let hits = Rc::new(Cell::new(0));
        let h = hits.clone();
        let id = scheduler.request_frame(Box::new(move || h.set(h.get() + 1)));

        assert!(scheduler.is_pending(id));
        scheduler.cancel_frame(id);
        scheduler.cancel_frame(id);
        assert!(!scheduler.is_pending(id));
        assert_eq!(scheduler.cancelled_count(), 1);

        scheduler.run_frame();
        assert_eq!(hits.get(), 0);
    }

    #[test]
    fn test_requests_during_frame_wait_for_next() {
        let scheduler = Rc::new(ManualFrameScheduler::new());
        let hits = Rc::new(Cell::new(0));

        let inner_scheduler = scheduler.clone();
        let h = hits.clone();
        scheduler.request_frame(Box::new(move || {
            let h2 = h.clone();
            inner_scheduler.request_frame(Box::new(move || h2.set(h2.get() + 10)));
            h.set(h.get() + 1);
        }));

        assert_eq!(scheduler.run_frame(), 1);
        assert_eq!(hits.get(), 1);
        assert_eq!(scheduler.run_frame(), 1);
        assert_eq!(hits.get(), 11);
    }
}
