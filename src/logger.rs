use crate::event::ChangeEvent;
use crate::eventbus::EventSink;

/// Sink that traces every event at `debug` level under the given label.
pub struct Logger {
    label: String,
}

impl Logger {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new("input")
    }
}

impl EventSink for Logger {
    fn on_event(&mut self, event: &ChangeEvent) {
        tracing::debug!(source = %self.label, ?event, "input event");
    }
}
