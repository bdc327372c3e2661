//! Flat-file persistence for the record store.
//!
//! # Responsibility
//! - Convert store state to and from the line-oriented text format.
//! - Read and write whole snapshot files.
//!
//! # Invariants
//! - A failed load never touches the caller's store.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub mod file;
pub mod format;

pub use format::{ParseError, ParseErrorKind};

pub type StorageResult<T> = Result<T, StorageError>;

/// Error for snapshot file operations.
#[derive(Debug)]
pub enum StorageError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: PathBuf,
        source: ParseError,
    },
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "{}: {source}", path.display()),
            Self::Parse { path, source } => write!(f, "{}: {source}", path.display()),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
        }
    }
}
