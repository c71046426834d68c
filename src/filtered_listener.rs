use crate::event::ChangeEvent;
use crate::eventbus::EventSink;

/// Wraps a sink and forwards only the events a predicate accepts.
pub struct FilteredSink {
    predicate: Box<dyn Fn(&ChangeEvent) -> bool>,
    inner: Box<dyn EventSink>,
}

impl FilteredSink {
    pub fn new(
        predicate: impl Fn(&ChangeEvent) -> bool + 'static,
        inner: impl EventSink + 'static,
    ) -> Self {
        Self {
            predicate: Box::new(predicate),
            inner: Box::new(inner),
        }
    }
}

impl EventSink for FilteredSink {
    fn on_event(&mut self, event: &ChangeEvent) {
        if (self.predicate)(event) {
            self.inner.on_event(event);
        }
    }
}
