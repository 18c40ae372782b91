//! Deduplication filter for inbound message identifiers
//!
//! Bounded by a time window instead of growing for the process lifetime:
//! entries older than the configured duplicate window are purged on insert
//! and by the periodic refresh loop.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Clone)]
pub struct DedupFilter {
    seen: Arc<DashMap<String, Instant>>,
    window: Duration,
}

impl DedupFilter {
    pub fn new(window: Duration) -> Self {
        Self {
            seen: Arc::new(DashMap::new()),
            window,
        }
    }

    /// Returns true if this id was already handled inside the window.
    /// Records the id on first sight; the entry API keeps check-and-record
    /// atomic under concurrent webhook calls.
    pub fn seen(&self, message_id: &str) -> bool {
        self.purge_expired();
        match self.seen.entry(message_id.to_string()) {
            Entry::Occupied(_) => true,
            Entry::Vacant(slot) => {
                slot.insert(Instant::now());
                false
            }
        }
    }

    /// Drop entries older than the duplicate window (called periodically)
    pub fn purge_expired(&self) {
        let window = self.window;
        self.seen.retain(|_, inserted| inserted.elapsed() <= window);
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
