//! Propagation Queue
//!
//! The queue holds the properties waiting to be recomputed in the current
//! propagation cycle.
//!
//! # Invariants
//!
//! - Entries are sorted by ascending depth at all times. Insertion uses a
//!   binary search and goes after every entry of equal depth.
//! - A property is present at most once (set semantics).
//!
//! Popping always yields the shallowest pending property. Since a changed
//! property only ever enqueues its dependents, which are strictly deeper,
//! every dependency of a popped property has already settled for the cycle.

use std::collections::VecDeque;

use super::node::PropertyId;

/// Depth-ordered set of properties pending recomputation.
#[derive(Debug, Default)]
pub struct PropagationQueue {
    entries: VecDeque<(usize, PropertyId)>,

    /// Membership flags indexed by property id.
    queued: Vec<bool>,
}

impl PropagationQueue {
    /// Create a queue for a graph of `len` properties.
    pub fn with_len(len: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            queued: vec![false; len],
        }
    }

    /// Insert `id` at its depth. Returns `false` if it was already queued.
    pub fn push(&mut self, id: PropertyId, depth: usize) -> bool {
        if self.queued.len() <= id.index() {
            self.queued.resize(id.index() + 1, false);
        }
        if self.queued[id.index()] {
            return false;
        }
        self.queued[id.index()] = true;

        let at = self.entries.partition_point(|&(d, _)| d <= depth);
        self.entries.insert(at, (depth, id));
        true
    }

    /// Remove and return the shallowest entry.
    pub fn pop(&mut self) -> Option<PropertyId> {
        let (_, id) = self.entries.pop_front()?;
        self.queued[id.index()] = false;
        Some(id)
    }

    pub fn contains(&self, id: PropertyId) -> bool {
        self.queued.get(id.index()).copied().unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every pending entry, returning the queue to idle.
    pub fn clear(&mut self) {
        for (_, id) in self.entries.drain(..) {
            self.queued[id.index()] = false;
        }
    }
}
