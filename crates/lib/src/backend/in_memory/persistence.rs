//! Persistence operations for the InMemory backend
//!
//! This module handles serialization and file I/O for saving/loading
//! the table to/from JSON snapshot files.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::InMemory;
use crate::{Error, Result, backend::errors::BackendError, store::Table};

/// The current snapshot file format version.
/// v0 indicates this is an unstable format subject to breaking changes.
const PERSISTENCE_VERSION: u8 = 0;

/// On-disk form of an `InMemory` backend.
#[derive(Serialize, Deserialize)]
struct Snapshot {
    /// File format version for compatibility checking
    #[serde(rename = "_v", default)]
    version: u8,
    table: Table,
}

/// Saves the whole table to a specified file as JSON.
pub(crate) async fn save_to_file<P: AsRef<Path>>(backend: &InMemory, path: P) -> Result<()> {
    let table = backend.table.read().await.clone();
    let rows = table.len();
    let snapshot = Snapshot {
        version: PERSISTENCE_VERSION,
        table,
    };

    let json = serde_json::to_string_pretty(&snapshot)
        .map_err(|e| -> Error { BackendError::SerializationFailed { source: e }.into() })?;
    tokio::fs::write(path.as_ref(), json)
        .await
        .map_err(|e| -> Error { BackendError::FileIo { source: e }.into() })?;
    info!(path = %path.as_ref().display(), rows, "Saved table snapshot");
    Ok(())
}

/// Loads the table from a specified JSON file.
///
/// If the file does not exist, a new, empty `InMemory` backend is returned.
pub(crate) async fn load_from_file<P: AsRef<Path>>(path: P) -> Result<InMemory> {
    let path = path.as_ref();
    match tokio::fs::read_to_string(path).await {
        Ok(json) => {
            let snapshot: Snapshot = serde_json::from_str(&json).map_err(|e| -> Error {
                BackendError::DeserializationFailed { source: e }.into()
            })?;
            if snapshot.version != PERSISTENCE_VERSION {
                return Err(BackendError::UnsupportedVersion {
                    found: snapshot.version,
                    supported: PERSISTENCE_VERSION,
                }
                .into());
            }
            info!(path = %path.display(), rows = snapshot.table.len(), "Loaded table snapshot");
            Ok(InMemory::from_table(snapshot.table))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            info!(path = %path.display(), "No snapshot found, starting empty");
            Ok(InMemory::new())
        }
        Err(e) => Err(BackendError::FileIo { source: e }.into()),
    }
}
