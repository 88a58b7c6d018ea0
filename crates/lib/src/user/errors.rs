//! Error types for the user system
use thiserror::Error;

/// Errors raised while turning stored records into users.
///
/// Expected conditions such as a missing user are not errors at this level;
/// lookups return `None` and writes return an [`IdentityResult`](super::IdentityResult).
/// What remains indicates storage corruption.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum UserError {
    /// A stored record cannot be decoded into a [`User`](super::User).
    #[error("Corrupt user record{}: field {field} holds '{value}'", id.as_ref().map(|id| format!(" {id}")).unwrap_or_default())]
    CorruptRecord {
        /// Id of the offending row, when it has one
        id: Option<String>,
        field: String,
        value: String,
    },
}

impl UserError {
    /// Check if this error indicates a corrupt stored record
    pub fn is_corrupt_record(&self) -> bool {
        matches!(self, UserError::CorruptRecord { .. })
    }
}

impl From<UserError> for crate::Error {
    fn from(err: UserError) -> Self {
        crate::Error::User(err)
    }
}
