//! Error types for table operations.

use thiserror::Error;

/// Errors raised by [`Table`](super::Table) operations.
///
/// # Stability
///
/// - New variants may be added in minor versions (enum is `#[non_exhaustive]`)
/// - Existing variants will not be removed in minor versions
/// - Helper methods like `is_*()` provide stable APIs
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum StoreError {
    /// No row matched, or a row reference no longer points at a row.
    #[error("No row matched in table: {reason}")]
    RowNotFound { reason: String },

    /// A record was inserted with an id that is already taken.
    #[error("Duplicate row id: {id}")]
    DuplicateId { id: String },

    /// An update tried to change the id of an existing row.
    #[error("Row id is immutable: cannot change '{id}' to '{attempted}'")]
    ImmutableId { id: String, attempted: String },

    /// A stored value cannot be interpreted in its field's encoding.
    #[error("Corrupt value in field {field}: '{value}'")]
    CorruptValue { field: String, value: String },
}

impl StoreError {
    /// Check if this error indicates a row was not found
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::RowNotFound { .. })
    }

    /// Check if this error indicates a conflict with an existing row
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            StoreError::DuplicateId { .. } | StoreError::ImmutableId { .. }
        )
    }

    /// Check if this error indicates corrupted stored data
    pub fn is_corruption(&self) -> bool {
        matches!(self, StoreError::CorruptValue { .. })
    }
}

impl From<StoreError> for crate::Error {
    fn from(err: StoreError) -> Self {
        crate::Error::Store(err)
    }
}
