//! Events delivered to the core by the host
//!
//! The host translates its native notifications (scroll listeners, resize and
//! mutation observers, wheel listeners) into these types.

/// Event type identifier
pub type EventType = u32;

/// Event types driving the controller state machines
pub mod event_types {
    use super::EventType;

    /// Container scrolled
    pub const SCROLL: EventType = 30;
    /// Container or content resized
    pub const RESIZE: EventType = 40;
    /// Content subtree changed
    pub const MUTATION: EventType = 41;
    /// Scheduled animation frame fired
    pub const FRAME: EventType = 90;
    /// Measurement finished
    pub const MEASURED: EventType = 91;
    /// Controller torn down
    pub const TEARDOWN: EventType = 99;
}

/// Kind of geometry change reported by a surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeometryChange {
    Scroll,
    Resize,
    Mutation,
}

impl GeometryChange {
    pub fn event_type(&self) -> EventType {
        match self {
            GeometryChange::Scroll => event_types::SCROLL,
            GeometryChange::Resize => event_types::RESIZE,
            GeometryChange::Mutation => event_types::MUTATION,
        }
    }
}

/// A wheel gesture as seen by the capture-phase interceptor
#[derive(Debug, Clone, PartialEq)]
pub struct WheelEvent {
    pub delta_x: f32,
    pub delta_y: f32,
    default_prevented: bool,
    propagation_stopped: bool,
}

impl WheelEvent {
    pub fn new(delta_x: f32, delta_y: f32) -> Self {
        Self {
            delta_x,
            delta_y,
            default_prevented: false,
            propagation_stopped: false,
        }
    }

    /// Vertical-only wheel tick
    pub fn vertical(delta_y: f32) -> Self {
        Self::new(0.0, delta_y)
    }

    /// Horizontal-only wheel tick
    pub fn horizontal(delta_x: f32) -> Self {
        Self::new(delta_x, 0.0)
    }

    /// Suppress the page's native scroll for this gesture
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    /// Keep downstream handlers from observing this gesture
    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }

    pub fn propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }

    /// True when vertical motion strictly dominates horizontal motion
    pub fn is_vertical_dominant(&self) -> bool {
        self.delta_y.abs() > self.delta_x.abs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wheel_flags() {
        let mut event = WheelEvent::vertical(120.0);
        assert!(!event.default_prevented());
        assert!(!event.propagation_stopped());

        event.prevent_default();
        event.stop_propagation();
        assert!(event.default_prevented());
        assert!(event.propagation_stopped());
    }

    #[test]
    fn test_dominant_axis() {
        assert!(WheelEvent::new(3.0, -40.0).is_vertical_dominant());
        assert!(!WheelEvent::new(40.0, 40.0).is_vertical_dominant());
        assert!(!WheelEvent::horizontal(10.0).is_vertical_dominant());
    }
}
