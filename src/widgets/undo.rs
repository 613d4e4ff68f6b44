//! Bounded undo history.

use std::collections::VecDeque;

/// A history of snapshots that forgets the oldest entry once full.
#[derive(Debug, Clone)]
pub struct UndoStack<T> {
    entries: VecDeque<T>,
    capacity: usize,
}

impl<T> UndoStack<T> {
    /// Snapshots kept by the pixel editing widgets.
    pub const DEFAULT_CAPACITY: usize = 5;

    /// Create an empty history holding at most `capacity` snapshots.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Save a snapshot, dropping the oldest one if the history is full.
    pub fn push(&mut self, snapshot: T) {
        if self.capacity == 0 {
            return;
        }
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(snapshot);
    }

    /// Take the most recent snapshot.
    ///
    /// An empty history is not an error: it logs and returns `None`.
    pub fn pop(&mut self) -> Option<T> {
        let snapshot = self.entries.pop_back();
        if snapshot.is_none() {
            tracing::warn!("nothing to undo");
        }
        snapshot
    }

    /// Forget every snapshot.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of snapshots held.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there is nothing to undo.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of snapshots.
    pub const fn capacity(&self) -> usize {
        self.capacity
    }
}

impl<T> Default for UndoStack<T> {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}
