//! Backend error types.
//!
//! Procedure failures are reported through [`ProcedureError`](crate::procedure::ProcedureError)
//! and [`StoreError`](crate::store::StoreError); this module covers the backend's own
//! concerns, which for the in-memory store means snapshot files.

use thiserror::Error;

/// Errors that can occur while persisting or restoring a backend.
///
/// # Stability
///
/// - New variants may be added in minor versions (enum is `#[non_exhaustive]`)
/// - Existing variants will not be removed in minor versions
/// - Helper methods like `is_*()` provide stable APIs
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum BackendError {
    /// Serialization failed.
    #[error("Serialization failed")]
    SerializationFailed {
        /// The underlying serialization error
        #[source]
        source: serde_json::Error,
    },

    /// Deserialization failed.
    #[error("Deserialization failed")]
    DeserializationFailed {
        /// The underlying deserialization error
        #[source]
        source: serde_json::Error,
    },

    /// File I/O error.
    #[error("File I/O error")]
    FileIo {
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The snapshot was written by an incompatible format version.
    #[error("Unsupported snapshot version {found}; only version {supported} is supported")]
    UnsupportedVersion { found: u8, supported: u8 },
}

impl BackendError {
    /// Check if this error is I/O related
    pub fn is_io_error(&self) -> bool {
        matches!(self, BackendError::FileIo { .. })
    }

    /// Check if this error is related to the snapshot format
    pub fn is_format_error(&self) -> bool {
        matches!(
            self,
            BackendError::SerializationFailed { .. }
                | BackendError::DeserializationFailed { .. }
                | BackendError::UnsupportedVersion { .. }
        )
    }
}

impl From<BackendError> for crate::Error {
    fn from(err: BackendError) -> Self {
        crate::Error::Backend(err)
    }
}
