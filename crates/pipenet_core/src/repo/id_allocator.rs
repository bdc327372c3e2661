//! Reusable integer ID allocation.
//!
//! # Responsibility
//! - Issue positive IDs that are never held by a live record.
//! - Make released IDs available again, lowest first.
//!
//! # Invariants
//! - `next_candidate >= 1`.
//! - An ID in `in_use` is never returned by `allocate`.

use crate::model::record::RecordId;
use std::collections::BTreeSet;

const FIRST_ID: RecordId = 1;

/// Per-kind ID allocator with an advancing candidate and an in-use set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdAllocator {
    next_candidate: RecordId,
    in_use: BTreeSet<RecordId>,
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdAllocator {
    pub fn new() -> Self {
        Self {
            next_candidate: FIRST_ID,
            in_use: BTreeSet::new(),
        }
    }

    /// Rebuilds allocator state exactly as persisted.
    ///
    /// A zero candidate is clamped to the first valid ID.
    pub fn from_parts(next_candidate: RecordId, in_use: BTreeSet<RecordId>) -> Self {
        Self {
            next_candidate: next_candidate.max(FIRST_ID),
            in_use,
        }
    }

    /// Issues the first free ID at or after the candidate counter.
    ///
    /// The search wraps back to the first ID once it passes
    /// `RecordId::MAX`, so a restored counter at the top of the range never
    /// overflows.
    ///
    /// # Panics
    /// - When every positive `RecordId` is already in use.
    pub fn allocate(&mut self) -> RecordId {
        let id = self
            .first_free(self.next_candidate..=RecordId::MAX)
            .or_else(|| self.first_free(FIRST_ID..self.next_candidate))
            .expect("record id space exhausted");
        self.in_use.insert(id);
        self.next_candidate = id.checked_add(1).unwrap_or(FIRST_ID);
        id
    }

    fn first_free(&self, mut candidates: impl Iterator<Item = RecordId>) -> Option<RecordId> {
        candidates.find(|id| !self.in_use.contains(id))
    }

    /// Returns `id` to the pool.
    ///
    /// The candidate counter moves back to `id` when it is lower, so the
    /// next allocation reuses the lowest released ID.
    pub fn release(&mut self, id: RecordId) {
        if self.in_use.remove(&id) && id >= FIRST_ID && id < self.next_candidate {
            self.next_candidate = id;
        }
    }

    /// Marks an externally chosen ID as taken without moving the counter.
    pub fn reserve(&mut self, id: RecordId) {
        self.in_use.insert(id);
    }

    pub fn is_in_use(&self, id: RecordId) -> bool {
        self.in_use.contains(&id)
    }

    pub fn next_candidate(&self) -> RecordId {
        self.next_candidate
    }

    /// In-use IDs in ascending order.
    pub fn in_use(&self) -> impl Iterator<Item = RecordId> + '_ {
        self.in_use.iter().copied()
    }

    pub fn clear(&mut self) {
        *self = Self::new();
    }
}
