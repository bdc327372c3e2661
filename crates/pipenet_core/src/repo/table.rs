//! Keyed record table paired with its ID allocator.

use crate::model::record::{Record, RecordId, RecordValidationError};
use crate::repo::id_allocator::IdAllocator;
use crate::repo::{StoreError, StoreResult};
use crate::search::filter::NameMatcher;
use log::debug;
use std::collections::BTreeMap;

/// Records of one kind keyed by ID.
///
/// Iteration follows ascending ID order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordTable<T> {
    ids: IdAllocator,
    records: BTreeMap<RecordId, T>,
}

impl<T: Record> Default for RecordTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Record> RecordTable<T> {
    pub fn new() -> Self {
        Self {
            ids: IdAllocator::new(),
            records: BTreeMap::new(),
        }
    }

    /// Rebuilds a table from persisted allocator state and records.
    ///
    /// IDs of `records` are reserved so they can never be reissued.
    pub fn from_parts(mut ids: IdAllocator, records: BTreeMap<RecordId, T>) -> Self {
        for id in records.keys() {
            ids.reserve(*id);
        }
        Self { ids, records }
    }

    /// Stores `record` under a freshly allocated ID and returns that ID.
    pub fn insert(&mut self, mut record: T) -> RecordId {
        let id = self.ids.allocate();
        record.set_id(id);
        self.records.insert(id, record);
        debug!(
            "event=record_create module=repo status=ok kind={} id={id}",
            T::KIND
        );
        id
    }

    pub fn get(&self, id: RecordId) -> StoreResult<&T> {
        self.records.get(&id).ok_or(StoreError::NotFound {
            kind: T::KIND,
            id,
        })
    }

    pub fn contains(&self, id: RecordId) -> bool {
        self.records.contains_key(&id)
    }

    /// Applies `mutator` to a copy and commits it only when still valid.
    ///
    /// The record ID cannot be changed by the mutator.
    pub fn update<F>(&mut self, id: RecordId, mutator: F) -> StoreResult<()>
    where
        F: FnOnce(&mut T) -> Result<(), RecordValidationError>,
    {
        let current = self.records.get_mut(&id).ok_or(StoreError::NotFound {
            kind: T::KIND,
            id,
        })?;
        let mut draft = current.clone();
        mutator(&mut draft)?;
        draft.set_id(id);
        draft.validate()?;
        *current = draft;
        debug!(
            "event=record_update module=repo status=ok kind={} id={id}",
            T::KIND
        );
        Ok(())
    }

    /// Mutable access for in-place edits that cannot break record invariants.
    pub(crate) fn get_mut(&mut self, id: RecordId) -> StoreResult<&mut T> {
        self.records.get_mut(&id).ok_or(StoreError::NotFound {
            kind: T::KIND,
            id,
        })
    }

    /// Removes the record and releases its ID.
    pub fn remove(&mut self, id: RecordId) -> StoreResult<T> {
        let record = self.records.remove(&id).ok_or(StoreError::NotFound {
            kind: T::KIND,
            id,
        })?;
        self.ids.release(id);
        debug!(
            "event=record_delete module=repo status=ok kind={} id={id}",
            T::KIND
        );
        Ok(record)
    }

    /// Removes every listed record that exists; returns how many were removed.
    pub fn remove_many(&mut self, ids: &[RecordId]) -> usize {
        ids.iter().filter(|id| self.remove(**id).is_ok()).count()
    }

    /// IDs of records satisfying `predicate`, in iteration order.
    pub fn find_ids<P>(&self, predicate: P) -> Vec<RecordId>
    where
        P: Fn(&T) -> bool,
    {
        self.records
            .iter()
            .filter_map(|(id, record)| predicate(record).then_some(*id))
            .collect()
    }

    /// IDs of records whose name contains `text`, ignoring case.
    pub fn find_by_name(&self, text: &str) -> Vec<RecordId> {
        let matcher = NameMatcher::new(text);
        self.find_ids(|record| matcher.matches(record.name()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.records.values()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn allocator(&self) -> &IdAllocator {
        &self.ids
    }

    pub fn clear(&mut self) {
        self.records.clear();
        self.ids.clear();
    }
}
