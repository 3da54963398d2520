use crate::event::{EngineEvent, EventCategory};
use std::collections::BTreeMap;

/// Trait for reacting to engine notifications.
pub trait EngineListener {
    fn on_event(&mut self, event: &EngineEvent);
}

impl<F: FnMut(&EngineEvent)> EngineListener for F {
    fn on_event(&mut self, event: &EngineEvent) {
        self(event)
    }
}

/// Determines which kinds of events a listener wants to receive.
#[derive(Debug, Clone, Copy)]
pub enum EventFilter {
    All,
    DevicesOnly,
    LearningOnly,
    MappingsOnly,
    Custom(fn(&EngineEvent) -> bool),
}

impl EventFilter {
    fn accepts(&self, event: &EngineEvent) -> bool {
        match self {
            EventFilter::All => true,
            EventFilter::DevicesOnly => event.category() == EventCategory::Device,
            EventFilter::LearningOnly => event.category() == EventCategory::Learning,
            EventFilter::MappingsOnly => event.category() == EventCategory::Mappings,
            EventFilter::Custom(f) => f(event),
        }
    }
}

/// Listener with its filter and mute flag.
struct ListenerEntry {
    listener: Box<dyn EngineListener>,
    enabled: bool,
    filter: EventFilter,
}

/// Fan-out of [`EngineEvent`]s to registered listeners, in registration order.
#[derive(Default)]
pub struct EventBus {
    next_id: u64,
    listeners: BTreeMap<u64, ListenerEntry>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a listener and returns its id.
    pub fn add_listener(
        &mut self,
        listener: impl EngineListener + 'static,
        filter: EventFilter,
    ) -> u64 {
        let id = self.next_id;
        self.listeners.insert(
            id,
            ListenerEntry {
                listener: Box::new(listener),
                enabled: true,
                filter,
            },
        );
        self.next_id += 1;
        id
    }

    /// Enables a previously registered listener.
    pub fn enable(&mut self, id: u64) {
        if let Some(entry) = self.listeners.get_mut(&id) {
            entry.enabled = true;
        }
    }

    /// Disables (mutes) a listener without removing it.
    pub fn disable(&mut self, id: u64) {
        if let Some(entry) = self.listeners.get_mut(&id) {
            entry.enabled = false;
        }
    }

    /// Unregisters a listener entirely.
    pub fn remove_listener(&mut self, id: u64) {
        self.listeners.remove(&id);
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Emits one event to all active and matching listeners.
    pub fn emit(&mut self, event: &EngineEvent) {
        for entry in self.listeners.values_mut() {
            if entry.enabled && entry.filter.accepts(event) {
                entry.listener.on_event(event);
            }
        }
    }

    /// Emits a batch of events to matching listeners.
    pub fn emit_all(&mut self, events: &[EngineEvent]) {
        for event in events {
            self.emit(event);
        }
    }
}
