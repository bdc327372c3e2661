//! Record store for pipes and compressor stations.
//!
//! # Responsibility
//! - Provide the single mutable state object the shell drives.
//! - Implement search, batch edit, batch delete and workshop adjustment.
//!
//! # Invariants
//! - `0 <= active_workshops <= total_workshops` for every stored station.
//! - Batch operations skip IDs that are no longer present.

use crate::model::pipe::Pipe;
use crate::model::record::{EntityKind, RecordId, RecordValidationError};
use crate::model::station::CompressorStation;
use crate::repo::id_allocator::IdAllocator;
use crate::repo::table::RecordTable;
use crate::repo::{StoreError, StoreResult, WorkshopDirection};
use crate::search::filter::{PipeFilter, StationFilter};
use crate::storage::format::{self, ParseError};
use log::{debug, info};
use std::collections::BTreeSet;

/// Batch action applied to the repair flag of pipes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepairAction {
    MarkUnderRepair,
    MarkOperational,
    ToggleRepair,
}

impl RepairAction {
    /// Flag value after applying this action to `current`.
    pub fn apply(self, current: bool) -> bool {
        match self {
            Self::MarkUnderRepair => true,
            Self::MarkOperational => false,
            Self::ToggleRepair => !current,
        }
    }
}

/// In-memory store of all pipes and stations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordStore {
    pipes: RecordTable<Pipe>,
    stations: RecordTable<CompressorStation>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_tables(
        pipes: RecordTable<Pipe>,
        stations: RecordTable<CompressorStation>,
    ) -> Self {
        Self { pipes, stations }
    }

    pub(crate) fn pipe_table(&self) -> &RecordTable<Pipe> {
        &self.pipes
    }

    pub(crate) fn station_table(&self) -> &RecordTable<CompressorStation> {
        &self.stations
    }

    /// ID allocator state for `kind`.
    pub fn allocator(&self, kind: EntityKind) -> &IdAllocator {
        match kind {
            EntityKind::Pipe => self.pipes.allocator(),
            EntityKind::Station => self.stations.allocator(),
        }
    }

    /// Stores a new pipe and returns its allocated ID.
    pub fn add_pipe(&mut self, pipe: Pipe) -> RecordId {
        self.pipes.insert(pipe)
    }

    /// Stores a new station and returns its allocated ID.
    pub fn add_station(&mut self, station: CompressorStation) -> RecordId {
        self.stations.insert(station)
    }

    pub fn pipe(&self, id: RecordId) -> StoreResult<&Pipe> {
        self.pipes.get(id)
    }

    pub fn station(&self, id: RecordId) -> StoreResult<&CompressorStation> {
        self.stations.get(id)
    }

    /// Edits a pipe through `mutator`; rejected edits leave the pipe unchanged.
    pub fn update_pipe<F>(&mut self, id: RecordId, mutator: F) -> StoreResult<()>
    where
        F: FnOnce(&mut Pipe) -> Result<(), RecordValidationError>,
    {
        self.pipes.update(id, mutator)
    }

    /// Edits a station through `mutator`; rejected edits leave the station unchanged.
    pub fn update_station<F>(&mut self, id: RecordId, mutator: F) -> StoreResult<()>
    where
        F: FnOnce(&mut CompressorStation) -> Result<(), RecordValidationError>,
    {
        self.stations.update(id, mutator)
    }

    pub fn delete_pipe(&mut self, id: RecordId) -> StoreResult<Pipe> {
        self.pipes.remove(id)
    }

    pub fn delete_station(&mut self, id: RecordId) -> StoreResult<CompressorStation> {
        self.stations.remove(id)
    }

    /// Flips the repair flag of one pipe and returns the new value.
    pub fn toggle_repair(&mut self, id: RecordId) -> StoreResult<bool> {
        let pipe = self.pipes.get_mut(id)?;
        pipe.under_repair = !pipe.under_repair;
        Ok(pipe.under_repair)
    }

    /// Case-insensitive substring search over names of one record kind.
    pub fn find_by_name(&self, kind: EntityKind, text: &str) -> Vec<RecordId> {
        match kind {
            EntityKind::Pipe => self.pipes.find_by_name(text),
            EntityKind::Station => self.stations.find_by_name(text),
        }
    }

    pub fn find_pipes_by_repair_status(&self, under_repair: bool) -> Vec<RecordId> {
        self.select_pipes(&PipeFilter::RepairStatus(under_repair))
    }

    /// Stations whose unused-workshop percentage lies in `min..=max`.
    ///
    /// Stations without workshops are never matched.
    pub fn find_stations_by_unused_percentage(&self, min: f64, max: f64) -> Vec<RecordId> {
        self.select_stations(&StationFilter::UnusedPercentage { min, max })
    }

    pub fn select_pipes(&self, filter: &PipeFilter) -> Vec<RecordId> {
        self.pipes.find_ids(filter.predicate())
    }

    pub fn select_stations(&self, filter: &StationFilter) -> Vec<RecordId> {
        self.stations.find_ids(filter.predicate())
    }

    /// Applies `action` to every listed pipe that still exists.
    ///
    /// Returns the number of pipes whose flag actually changed; marking a
    /// pipe with the state it already has does not count.
    pub fn batch_mutate(&mut self, ids: &[RecordId], action: RepairAction) -> usize {
        let unique: BTreeSet<RecordId> = ids.iter().copied().collect();
        let mut changed = 0;
        for id in unique {
            let Ok(pipe) = self.pipes.get_mut(id) else {
                continue;
            };
            let before = pipe.under_repair;
            pipe.under_repair = action.apply(before);
            if pipe.under_repair != before {
                changed += 1;
            }
        }
        info!(
            "event=batch_mutate module=repo status=ok action={action:?} requested={} changed={changed}",
            ids.len()
        );
        changed
    }

    /// Deletes every listed record of `kind` that exists; returns the count.
    pub fn batch_delete(&mut self, kind: EntityKind, ids: &[RecordId]) -> usize {
        let deleted = match kind {
            EntityKind::Pipe => self.pipes.remove_many(ids),
            EntityKind::Station => self.stations.remove_many(ids),
        };
        info!(
            "event=batch_delete module=repo status=ok kind={kind} requested={} deleted={deleted}",
            ids.len()
        );
        deleted
    }

    /// Starts or stops `delta` workshops and returns the new active count.
    ///
    /// # Errors
    /// - `NotFound` when the station does not exist.
    /// - `InvalidRange` when the result would leave `0..=total`; nothing changes.
    pub fn adjust_workshops(
        &mut self,
        station_id: RecordId,
        delta: u32,
        direction: WorkshopDirection,
    ) -> StoreResult<u32> {
        let station = self.stations.get_mut(station_id)?;
        let active = station.active_workshops;
        let total = station.total_workshops;
        let adjusted = match direction {
            WorkshopDirection::Start => active.checked_add(delta).filter(|next| *next <= total),
            WorkshopDirection::Stop => active.checked_sub(delta),
        };
        let Some(adjusted) = adjusted else {
            debug!(
                "event=workshop_adjust module=repo status=error station_id={station_id} direction={direction} delta={delta}"
            );
            return Err(StoreError::InvalidRange {
                station_id,
                direction,
                delta,
                active,
                total,
            });
        };
        station.active_workshops = adjusted;
        debug!(
            "event=workshop_adjust module=repo status=ok station_id={station_id} direction={direction} active={adjusted}"
        );
        Ok(adjusted)
    }

    pub fn pipes(&self) -> impl Iterator<Item = &Pipe> + '_ {
        self.pipes.iter()
    }

    pub fn stations(&self) -> impl Iterator<Item = &CompressorStation> + '_ {
        self.stations.iter()
    }

    pub fn pipe_count(&self) -> usize {
        self.pipes.len()
    }

    pub fn station_count(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pipes.is_empty() && self.stations.is_empty()
    }

    /// Renders the full state in the persisted text format.
    pub fn serialize(&self) -> String {
        format::serialize(self)
    }

    /// Replaces the whole state with the store parsed from `text`.
    ///
    /// On error the current state is kept untouched.
    pub fn load(&mut self, text: &str) -> Result<(), ParseError> {
        let loaded = format::parse(text)?;
        *self = loaded;
        info!(
            "event=store_replace module=repo status=ok pipes={} stations={}",
            self.pipe_count(),
            self.station_count()
        );
        Ok(())
    }

    /// Drops all records and resets both allocators.
    pub fn clear(&mut self) {
        self.pipes.clear();
        self.stations.clear();
    }
}
