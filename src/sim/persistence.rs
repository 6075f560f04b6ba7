//! Phosphor persistence trail
//!
//! A bounded FIFO of past impact points. The capacity is an operator setting
//! that may change every frame; shrinking it drops the oldest points at once.

use std::collections::VecDeque;

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// One recorded impact on the screen
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrailEntry {
    /// Normalized screen position (x horizontal, y vertical, ±1 = nominal full scale)
    pub screen: DVec2,
    /// Acceleration voltage the impact was simulated under (drives trail color)
    pub accel_voltage: f64,
}

/// Fixed-capacity ring of trail entries, oldest first
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "RawBuffer")]
pub struct PersistenceBuffer {
    entries: VecDeque<TrailEntry>,
    capacity: usize,
}

impl PersistenceBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Change the capacity, evicting the oldest entries if now over it
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity;
        self.evict();
    }

    /// Append an entry, evicting from the front while over capacity
    pub fn push(&mut self, entry: TrailEntry) {
        self.entries.push_back(entry);
        self.evict();
    }

    /// Entries oldest first
    pub fn entries(&self) -> impl ExactSizeIterator<Item = &TrailEntry> + DoubleEndedIterator {
        self.entries.iter()
    }

    /// Most recent entry
    pub fn latest(&self) -> Option<&TrailEntry> {
        self.entries.back()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    fn evict(&mut self) {
        let excess = self.entries.len().saturating_sub(self.capacity);
        if excess > 0 {
            self.entries.drain(..excess);
        }
    }
}

/// Serialized form; trimmed to capacity on the way in
#[derive(Deserialize)]
struct RawBuffer {
    entries: VecDeque<TrailEntry>,
    capacity: usize,
}

impl From<RawBuffer> for PersistenceBuffer {
    fn from(raw: RawBuffer) -> Self {
        let mut buf = Self {
            entries: raw.entries,
            capacity: raw.capacity,
        };
        buf.evict();
        buf
    }
}
