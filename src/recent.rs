use parking_lot::Mutex;
use std::collections::VecDeque;

use crate::models::RecentEvent;

// Most-recent-first log of served requests, bounded by `capacity`.
pub struct RecentEventLog {
    capacity: usize,
    events: Mutex<VecDeque<RecentEvent>>,
}

impl RecentEventLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            events: Mutex::new(VecDeque::with_capacity(capacity)),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn push(&self, event: RecentEvent) {
        let mut events = self.events.lock();
        events.push_front(event);
        events.truncate(self.capacity);
    }

    /// Owned copy, newest first. Later pushes do not affect it.
    pub fn snapshot(&self) -> Vec<RecentEvent> {
        self.events.lock().iter().cloned().collect()
    }
}
