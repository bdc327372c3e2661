//! In-memory record storage.
//!
//! # Responsibility
//! - Own per-kind record tables and their ID allocators.
//! - Expose CRUD, search and batch-mutation operations with semantic errors.
//!
//! # Invariants
//! - Failed operations (`NotFound`, `InvalidRange`, `Invalid`) leave state
//!   unchanged.
//! - Deleting a record always releases its ID.

use crate::model::record::{EntityKind, RecordId, RecordValidationError};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod id_allocator;
pub mod record_store;
pub mod table;

pub type StoreResult<T> = Result<T, StoreError>;

/// Direction of a workshop adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkshopDirection {
    /// Increase active workshops.
    Start,
    /// Decrease active workshops.
    Stop,
}

impl Display for WorkshopDirection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Start => f.write_str("start"),
            Self::Stop => f.write_str("stop"),
        }
    }
}

/// Semantic error for store operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    NotFound {
        kind: EntityKind,
        id: RecordId,
    },
    /// Workshop adjustment would leave `active` outside `0..=total`.
    InvalidRange {
        station_id: RecordId,
        direction: WorkshopDirection,
        delta: u32,
        active: u32,
        total: u32,
    },
    Invalid(RecordValidationError),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound { kind, id } => write!(f, "{kind} not found: {id}"),
            Self::InvalidRange {
                station_id,
                direction: WorkshopDirection::Start,
                delta,
                active,
                total,
            } => write!(
                f,
                "cannot start {delta} workshop(s) at station {station_id}: only {} of {total} idle",
                total.saturating_sub(*active)
            ),
            Self::InvalidRange {
                station_id,
                direction: WorkshopDirection::Stop,
                delta,
                active,
                ..
            } => write!(
                f,
                "cannot stop {delta} workshop(s) at station {station_id}: only {active} active"
            ),
            Self::Invalid(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Invalid(err) => Some(err),
            Self::NotFound { .. } | Self::InvalidRange { .. } => None,
        }
    }
}

impl From<RecordValidationError> for StoreError {
    fn from(value: RecordValidationError) -> Self {
        Self::Invalid(value)
    }
}
