//! Bounded activity feed

use chrono::Utc;
use roast_core::{new_entity_id, FeedEvent, FeedEventKind};
use std::collections::VecDeque;
use std::sync::Mutex;

/// Newest-first log of platform events, capped at `capacity`.
/// Recording never fails: a poisoned lock drops the event.
pub struct ActivityFeed {
    events: Mutex<VecDeque<FeedEvent>>,
    capacity: usize,
}

impl ActivityFeed {
    pub fn new(capacity: usize) -> Self {
        Self {
            events: Mutex::new(VecDeque::with_capacity(capacity.min(1024))),
            capacity: capacity.max(1),
        }
    }

    pub fn record(&self, kind: FeedEventKind, payload: serde_json::Value) {
        let event = FeedEvent {
            event_id: new_entity_id(),
            kind,
            payload,
            created_at: Utc::now(),
        };
        if let Ok(mut events) = self.events.lock() {
            events.push_front(event);
            events.truncate(self.capacity);
        }
    }

    /// Up to `limit` events, newest first.
    pub fn recent(&self, limit: usize) -> Vec<FeedEvent> {
        self.events
            .lock()
            .map(|events| events.iter().take(limit).cloned().collect())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.events.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl std::fmt::Debug for ActivityFeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActivityFeed")
            .field("capacity", &self.capacity)
            .field("len", &self.len())
            .finish()
    }
}
