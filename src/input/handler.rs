use crate::input::events::{EventKind, MapEvent};
use fxhash::FxHashSet as HashSet;
use std::collections::VecDeque;

/// Event queue for a map backend.
///
/// Only subscribed kinds are queued; everything else is dropped at the door,
/// the way an engine only calls listeners that were registered.
#[derive(Debug, Default)]
pub struct EventQueue {
    subscriptions: HashSet<EventKind>,
    event_queue: VecDeque<MapEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register interest in an event kind; repeated calls are harmless
    pub fn subscribe(&mut self, kind: EventKind) {
        self.subscriptions.insert(kind);
    }

    pub fn is_subscribed(&self, kind: EventKind) -> bool {
        self.subscriptions.contains(&kind)
    }

    /// Queue an event; returns false when nobody listens for its kind
    pub fn emit(&mut self, event: MapEvent) -> bool {
        if !self.is_subscribed(event.kind()) {
            return false;
        }
        self.event_queue.push_back(event);
        true
    }

    /// Next event in arrival order
    pub fn poll(&mut self) -> Option<MapEvent> {
        self.event_queue.pop_front()
    }

    /// Get number of pending events
    pub fn pending_events(&self) -> usize {
        self.event_queue.len()
    }
}
