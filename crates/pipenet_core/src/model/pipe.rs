//! Pipe domain model.
//!
//! # Invariants
//! - `length` and `diameter` are strictly positive.
//! - `under_repair` starts as `false`.

use crate::model::record::{
    validate_name, EntityKind, Record, RecordId, RecordValidationError, UNASSIGNED_ID,
};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Pipeline segment record.
///
/// Fields are only writable through validating setters, so a `Pipe` held
/// outside the crate always satisfies its invariants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PipeFields")]
pub struct Pipe {
    /// Assigned by the store on insert.
    pub(crate) id: RecordId,
    pub(crate) name: String,
    /// Kilometers.
    pub(crate) length: u32,
    /// Millimeters.
    pub(crate) diameter: u32,
    pub(crate) under_repair: bool,
}

impl Pipe {
    /// Creates an operational pipe that is not yet stored.
    ///
    /// # Errors
    /// - Returns validation error for zero length/diameter or a multi-line name.
    pub fn new(
        name: impl Into<String>,
        length: u32,
        diameter: u32,
    ) -> Result<Self, RecordValidationError> {
        let pipe = Self {
            id: UNASSIGNED_ID,
            name: name.into(),
            length,
            diameter,
            under_repair: false,
        };
        pipe.validate()?;
        Ok(pipe)
    }

    pub fn id(&self) -> RecordId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn length(&self) -> u32 {
        self.length
    }

    pub fn diameter(&self) -> u32 {
        self.diameter
    }

    pub fn under_repair(&self) -> bool {
        self.under_repair
    }

    /// Renames the pipe; a multi-line name is rejected and nothing changes.
    pub fn set_name(&mut self, name: impl Into<String>) -> Result<(), RecordValidationError> {
        let name = name.into();
        validate_name(&name)?;
        self.name = name;
        Ok(())
    }

    pub fn set_length(&mut self, length: u32) -> Result<(), RecordValidationError> {
        if length == 0 {
            return Err(RecordValidationError::NonPositiveLength);
        }
        self.length = length;
        Ok(())
    }

    pub fn set_diameter(&mut self, diameter: u32) -> Result<(), RecordValidationError> {
        if diameter == 0 {
            return Err(RecordValidationError::NonPositiveDiameter);
        }
        self.diameter = diameter;
        Ok(())
    }

    pub fn set_under_repair(&mut self, under_repair: bool) {
        self.under_repair = under_repair;
    }

    /// Human-readable repair state.
    pub fn status_label(&self) -> &'static str {
        if self.under_repair {
            "Under repair"
        } else {
            "Operational"
        }
    }
}

impl Record for Pipe {
    const KIND: EntityKind = EntityKind::Pipe;

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
        if self.length == 0 {
            return Err(RecordValidationError::NonPositiveLength);
        }
        if self.diameter == 0 {
            return Err(RecordValidationError::NonPositiveDiameter);
        }
        Ok(())
    }
}

impl Display for Pipe {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ID: {} | Name: {} | Length: {} km | Diameter: {} mm | Under repair: {}",
            self.id,
            self.name,
            self.length,
            self.diameter,
            if self.under_repair { "Yes" } else { "No" }
        )
    }
}

#[derive(Deserialize)]
struct PipeFields {
    id: RecordId,
    name: String,
    length: u32,
    diameter: u32,
    under_repair: bool,
}

impl TryFrom<PipeFields> for Pipe {
    type Error = RecordValidationError;

    fn try_from(value: PipeFields) -> Result<Self, Self::Error> {
        let pipe = Self {
            id: value.id,
            name: value.name,
            length: value.length,
            diameter: value.diameter,
            under_repair: value.under_repair,
        };
        pipe.validate()?;
        Ok(pipe)
    }
}
