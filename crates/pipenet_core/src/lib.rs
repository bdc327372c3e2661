//! Core record management for PipeNet.
//! This crate owns pipe/station invariants, ID allocation and persistence.

pub mod logging;
pub mod model;
pub mod repo;
pub mod search;
pub mod shell;
pub mod storage;

pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::pipe::Pipe;
pub use model::record::{EntityKind, Record, RecordId, RecordValidationError};
pub use model::station::CompressorStation;
pub use repo::id_allocator::IdAllocator;
pub use repo::record_store::{RecordStore, RepairAction};
pub use repo::{StoreError, StoreResult, WorkshopDirection};
pub use search::filter::{PipeFilter, StationFilter};
pub use shell::console::ConsolePrompter;
pub use shell::menu::Shell;
pub use shell::{Confirmer, InputProvider, ShellError, ShellResult};
pub use storage::file::{data_file_path, load_from_file, save_to_file};
pub use storage::format::{parse, serialize};
pub use storage::{ParseError, ParseErrorKind, StorageError, StorageResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
