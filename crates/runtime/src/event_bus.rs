use crate::frame::Frame;

/// A frame-stamped trace event.
///
/// The bus records state-machine transitions (drag, focus, resize, lifecycle)
/// as structured text so tests and the CLI driver can assert on exactly what
/// happened, and when, without a debugger attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub frame_index: u64,
    pub kind: &'static str,
    pub message: String,
}

#[derive(Debug, Default)]
pub struct EventBus {
    events: Vec<Event>,
}

impl EventBus {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn emit(&mut self, frame: Frame, kind: &'static str, message: impl Into<String>) {
        self.events.push(Event {
            frame_index: frame.index,
            kind,
            message: message.into(),
        });
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Events of one kind, in emission order.
    pub fn events_of_kind(&self, kind: &str) -> Vec<&Event> {
        self.events.iter().filter(|e| e.kind == kind).collect()
    }

    pub fn drain(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::EventBus;
    use crate::frame::Frame;

    #[test]
    fn records_events_with_frame_index() {
        let mut bus = EventBus::new();
        let f = Frame::first(0.1).next(0.1).next(0.1);
        bus.emit(f, "drag", "start");
        assert_eq!(bus.events().len(), 1);
        assert_eq!(bus.events()[0].frame_index, 2);
    }

    #[test]
    fn filters_by_kind() {
        let mut bus = EventBus::new();
        let f = Frame::first(1.0);
        bus.emit(f, "drag", "start");
        bus.emit(f, "focus", "tile 2");
        bus.emit(f, "drag", "release");

        let drags = bus.events_of_kind("drag");
        assert_eq!(drags.len(), 2);
        assert_eq!(drags[1].message, "release");
        assert_eq!(bus.events_of_kind("resize").len(), 0);
    }

    #[test]
    fn drain_clears_events() {
        let mut bus = EventBus::new();
        bus.emit(Frame::first(1.0), "k", "m");
        let drained = bus.drain();
        assert_eq!(drained.len(), 1);
        assert!(bus.events().is_empty());
    }
}
