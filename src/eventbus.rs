//! Event delivery.
//!
//! Pollers hand every [`ChangeEvent`] to an [`EventSink`] synchronously, in the
//! order the transitions were detected. [`EventBus`] is a sink that fans events
//! out to a list of registered listeners, in registration order.
//!
//! Listeners must not poll the device that is currently dispatching to them.

use crate::event::ChangeEvent;

/// Receiver of change notifications.
pub trait EventSink {
    fn on_event(&mut self, event: &ChangeEvent);
}

impl<F: FnMut(&ChangeEvent)> EventSink for F {
    fn on_event(&mut self, event: &ChangeEvent) {
        self(event)
    }
}

/// Which events a listener wants.
#[derive(Clone, Copy, Debug)]
pub enum EventFilter {
    All,
    ButtonsOnly,
    DirectionalOnly,
    AnalogOnly,
    ModeOnly,
    Custom(fn(&ChangeEvent) -> bool),
}

impl EventFilter {
    pub fn accepts(&self, event: &ChangeEvent) -> bool {
        match self {
            EventFilter::All => true,
            EventFilter::ButtonsOnly => matches!(event, ChangeEvent::ButtonChanged { .. }),
            EventFilter::DirectionalOnly => {
                matches!(event, ChangeEvent::DirectionalChanged { .. })
            }
            EventFilter::AnalogOnly => {
                matches!(event, ChangeEvent::AnalogPositionChanged { .. })
            }
            EventFilter::ModeOnly => matches!(event, ChangeEvent::ModeChanged { .. }),
            EventFilter::Custom(f) => f(event),
        }
    }
}

/// Identifier returned by [`EventBus::add_listener`].
pub type ListenerId = u64;

struct ListenerEntry {
    id: ListenerId,
    listener: Box<dyn EventSink>,
    enabled: bool,
    filter: EventFilter,
}

/// Ordered set of listeners.
#[derive(Default)]
pub struct EventBus {
    next_id: ListenerId,
    listeners: Vec<ListenerEntry>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a listener; it will be called after every listener registered before it.
    pub fn add_listener(
        &mut self,
        listener: impl EventSink + 'static,
        filter: EventFilter,
    ) -> ListenerId {
        let id = self.next_id;
        self.next_id += 1;
        self.listeners.push(ListenerEntry {
            id,
            listener: Box::new(listener),
            enabled: true,
            filter,
        });
        id
    }

    pub fn enable(&mut self, id: ListenerId) {
        if let Some(entry) = self.entry_mut(id) {
            entry.enabled = true;
        }
    }

    /// Mutes a listener without removing it.
    pub fn disable(&mut self, id: ListenerId) {
        if let Some(entry) = self.entry_mut(id) {
            entry.enabled = false;
        }
    }

    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|e| e.id != id);
        self.listeners.len() != before
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    pub fn emit_all(&mut self, events: &[ChangeEvent]) {
        for event in events {
            self.on_event(event);
        }
    }

    fn entry_mut(&mut self, id: ListenerId) -> Option<&mut ListenerEntry> {
        self.listeners.iter_mut().find(|e| e.id == id)
    }
}

impl EventSink for EventBus {
    fn on_event(&mut self, event: &ChangeEvent) {
        for entry in self.listeners.iter_mut() {
            if entry.enabled && entry.filter.accepts(event) {
                entry.listener.on_event(event);
            }
        }
    }
}
