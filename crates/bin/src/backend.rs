//! Snapshot location and loading.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use userstore::backend::InMemory;

use crate::cli::StoreArgs;

/// File name of the table snapshot inside the data directory.
pub const SNAPSHOT_FILE: &str = "userstore.json";

/// Path of the snapshot for the given arguments.
pub fn snapshot_path(args: &StoreArgs) -> PathBuf {
    args.data_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(SNAPSHOT_FILE)
}

/// An opened snapshot: the live backend and where to write it back.
pub struct Snapshot {
    pub backend: Arc<InMemory>,
    pub path: PathBuf,
}

impl Snapshot {
    /// Load the snapshot, starting empty if it does not exist yet.
    ///
    /// A snapshot that exists but cannot be read is an error rather than a
    /// silent fresh start, so no users are ever dropped by accident.
    pub async fn open(args: &StoreArgs) -> Result<Self, Box<dyn std::error::Error>> {
        let path = snapshot_path(args);
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(dir).await?;
        }
        tracing::debug!("Using snapshot at {}", path.display());
        let backend = InMemory::load_from_file(&path).await?;
        Ok(Self {
            backend: Arc::new(backend),
            path,
        })
    }

    /// Write the table back to disk.
    pub async fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        self.backend.save_to_file(&self.path).await?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
