//! Bounded in-memory settlement event log.
//!
//! The event stream is the engine's sole audit trail. The log is bounded so
//! memory stays predictable in long-running hosts: when capacity is reached,
//! the oldest event is evicted.

use std::collections::VecDeque;

use opensettle_types::SettlementEvent;

/// Append-only, capacity-bounded log of [`SettlementEvent`]s.
#[derive(Debug, Clone)]
pub struct EventLog {
    events: VecDeque<SettlementEvent>,
    capacity: usize,
}

impl EventLog {
    /// Create a log holding at most `capacity` events.
    ///
    /// # Panics
    /// Panics if `capacity` is zero.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "EventLog capacity must be > 0");
        Self {
            events: VecDeque::with_capacity(capacity.min(1024)),
            capacity,
        }
    }

    /// Record an event, evicting the oldest if at capacity.
    pub fn record(&mut self, event: SettlementEvent) {
        if self.events.len() >= self.capacity {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }

    /// Iterate events oldest-first.
    pub fn iter(&self) -> impl Iterator<Item = &SettlementEvent> {
        self.events.iter()
    }

    /// The most recently recorded event.
    #[must_use]
    pub fn last(&self) -> Option<&SettlementEvent> {
        self.events.back()
    }

    /// Number of events currently retained.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
