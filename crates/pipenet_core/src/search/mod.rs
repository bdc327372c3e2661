//! Record search predicates.
//!
//! # Responsibility
//! - Express pipe/station queries as plain filter values.
//! - Keep name matching rules in one place for every record kind.

pub mod filter;
