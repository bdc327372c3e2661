//! Domain model for pipeline network records.
//!
//! # Responsibility
//! - Define the two record kinds managed by core: pipes and compressor stations.
//! - Enforce field-level invariants at construction and deserialization.
//!
//! # Invariants
//! - Every stored record is identified by a positive `RecordId` unique per kind.
//! - Record names are single-line so the persisted format stays line-oriented.

pub mod pipe;
pub mod record;
pub mod station;
