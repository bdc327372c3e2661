//! Snapshot file read/write.
//!
//! # Invariants
//! - Save files are named `<base>.txt` inside the chosen directory.
//! - Files are read and written whole; no streaming or partial writes.

use crate::repo::record_store::RecordStore;
use crate::storage::format::{parse, serialize};
use crate::storage::{StorageError, StorageResult};
use log::{error, info};
use std::path::{Path, PathBuf};

const DATA_FILE_EXTENSION: &str = "txt";

/// Resolves a user-supplied base name to `<dir>/<name>.txt`.
pub fn data_file_path(dir: &Path, name: &str) -> PathBuf {
    let mut file_name = name.trim().to_string();
    file_name.push('.');
    file_name.push_str(DATA_FILE_EXTENSION);
    dir.join(file_name)
}

/// Writes a full snapshot of `store` to `path`, replacing any existing file.
pub fn save_to_file(store: &RecordStore, path: &Path) -> StorageResult<()> {
    let text = serialize(store);
    std::fs::write(path, text).map_err(|source| {
        error!(
            "event=store_save module=storage status=error path={} error={source}",
            path.display()
        );
        StorageError::Io {
            path: path.to_path_buf(),
            source,
        }
    })?;
    info!(
        "event=store_save module=storage status=ok path={} pipes={} stations={}",
        path.display(),
        store.pipe_count(),
        store.station_count()
    );
    Ok(())
}

/// Reads and parses the snapshot at `path` into a new store.
pub fn load_from_file(path: &Path) -> StorageResult<RecordStore> {
    let text = std::fs::read_to_string(path).map_err(|source| StorageError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let store = parse(&text).map_err(|source| {
        error!(
            "event=store_load module=storage status=error path={} error={source}",
            path.display()
        );
        StorageError::Parse {
            path: path.to_path_buf(),
            source,
        }
    })?;
    info!(
        "event=store_load module=storage status=ok path={} pipes={} stations={}",
        path.display(),
        store.pipe_count(),
        store.station_count()
    );
    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::data_file_path;
    use std::path::{Path, PathBuf};

    #[test]
    fn data_file_path_appends_txt_extension() {
        assert_eq!(
            data_file_path(Path::new("/data"), " network "),
            PathBuf::from("/data/network.txt")
        );
    }
}
