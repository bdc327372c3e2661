//! Compressor station domain model.
//!
//! # Invariants
//! - `active_workshops <= total_workshops` at all times.

use crate::model::record::{
    validate_name, EntityKind, Record, RecordId, RecordValidationError, UNASSIGNED_ID,
};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Compressor station record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "StationFields")]
pub struct CompressorStation {
    /// Assigned by the store on insert.
    pub(crate) id: RecordId,
    pub(crate) name: String,
    pub(crate) total_workshops: u32,
    pub(crate) active_workshops: u32,
    pub(crate) station_class: i32,
}

impl CompressorStation {
    /// Creates a station that is not yet stored.
    ///
    /// # Errors
    /// - Returns validation error when `active_workshops > total_workshops`
    ///   or the name spans multiple lines.
    pub fn new(
        name: impl Into<String>,
        total_workshops: u32,
        active_workshops: u32,
        station_class: i32,
    ) -> Result<Self, RecordValidationError> {
        let station = Self {
            id: UNASSIGNED_ID,
            name: name.into(),
            total_workshops,
            active_workshops,
            station_class,
        };
        station.validate()?;
        Ok(station)
    }

    pub fn id(&self) -> RecordId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn total_workshops(&self) -> u32 {
        self.total_workshops
    }

    pub fn active_workshops(&self) -> u32 {
        self.active_workshops
    }

    pub fn station_class(&self) -> i32 {
        self.station_class
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> Result<(), RecordValidationError> {
        let name = name.into();
        validate_name(&name)?;
        self.name = name;
        Ok(())
    }

    /// Replaces both workshop counts at once.
    ///
    /// # Errors
    /// - `ActiveExceedsTotal` when `active > total`; the station is unchanged.
    pub fn set_workshops(&mut self, total: u32, active: u32) -> Result<(), RecordValidationError> {
        if active > total {
            return Err(RecordValidationError::ActiveExceedsTotal { active, total });
        }
        self.total_workshops = total;
        self.active_workshops = active;
        Ok(())
    }

    pub fn set_station_class(&mut self, station_class: i32) {
        self.station_class = station_class;
    }

    /// Share of idle workshops in percent, `(1 - active/total) * 100`.
    ///
    /// Returns `None` for stations without workshops.
    pub fn unused_percentage(&self) -> Option<f64> {
        if self.total_workshops == 0 {
            return None;
        }
        let active = f64::from(self.active_workshops);
        let total = f64::from(self.total_workshops);
        Some((1.0 - active / total) * 100.0)
    }

    /// Number of workshops that can still be started.
    pub fn idle_workshops(&self) -> u32 {
        self.total_workshops.saturating_sub(self.active_workshops)
    }
}

impl Record for CompressorStation {
    const KIND: EntityKind = EntityKind::Station;

    fn id(&self) -> RecordId {
        self.id
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = id;
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn validate(&self) -> Result<(), RecordValidationError> {
        validate_name(&self.name)?;
        if self.active_workshops > self.total_workshops {
            return Err(RecordValidationError::ActiveExceedsTotal {
                active: self.active_workshops,
                total: self.total_workshops,
            });
        }
        Ok(())
    }
}

impl Display for CompressorStation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ID: {} | Name: {} | Workshops: {}/{} | Class: {}",
            self.id, self.name, self.active_workshops, self.total_workshops, self.station_class
        )
    }
}

#[derive(Deserialize)]
struct StationFields {
    id: RecordId,
    name: String,
    total_workshops: u32,
    active_workshops: u32,
    station_class: i32,
}

impl TryFrom<StationFields> for CompressorStation {
    type Error = RecordValidationError;

    fn try_from(value: StationFields) -> Result<Self, Self::Error> {
        let station = Self {
            id: value.id,
            name: value.name,
            total_workshops: value.total_workshops,
            active_workshops: value.active_workshops,
            station_class: value.station_class,
        };
        station.validate()?;
        Ok(station)
    }
}
