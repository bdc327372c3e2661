//! Shared record identity and validation types.
//!
//! # Responsibility
//! - Name the entity kinds handled by the store.
//! - Provide the `Record` seam used by generic storage tables.
//!
//! # Invariants
//! - `RecordId` value `0` means "not yet assigned by the store".

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Integer identifier issued per entity kind by the ID allocator.
pub type RecordId = u32;

/// Placeholder ID carried by records that have not been inserted yet.
pub const UNASSIGNED_ID: RecordId = 0;

/// Entity kinds managed by the record store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// Pipeline segment.
    Pipe,
    /// Compressor station.
    Station,
}

impl EntityKind {
    /// Lowercase label used in log events and messages.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pipe => "pipe",
            Self::Station => "station",
        }
    }
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Field-level validation failures for pipes and stations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordValidationError {
    /// Name contains `\n` or `\r` and could not be persisted on one line.
    MultilineName,
    NonPositiveLength,
    NonPositiveDiameter,
    ActiveExceedsTotal { active: u32, total: u32 },
}

impl Display for RecordValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MultilineName => write!(f, "name must not contain line breaks"),
            Self::NonPositiveLength => write!(f, "length must be positive"),
            Self::NonPositiveDiameter => write!(f, "diameter must be positive"),
            Self::ActiveExceedsTotal { active, total } => write!(
                f,
                "active workshops ({active}) must be <= total workshops ({total})"
            ),
        }
    }
}

impl Error for RecordValidationError {}

/// Common surface of records kept in a store table.
pub trait Record: Clone {
    /// Kind tag for errors and log events.
    const KIND: EntityKind;

    fn id(&self) -> RecordId;
    fn set_id(&mut self, id: RecordId);
    fn name(&self) -> &str;
    fn validate(&self) -> Result<(), RecordValidationError>;
}

pub(crate) fn validate_name(name: &str) -> Result<(), RecordValidationError> {
    if name.contains(['\n', '\r']) {
        return Err(RecordValidationError::MultilineName);
    }
    Ok(())
}
