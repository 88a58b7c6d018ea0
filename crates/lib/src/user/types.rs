//! Core data types for the user system

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A user identity as seen by the authentication layer.
///
/// A `User` is never stored directly. It is written through procedures by
/// the [`codec`](super::codec) and rebuilt from the stored record on lookup.
///
/// The normalized name and email are upper-cased copies kept in sync by the
/// caller; they are not persisted and are recomputed whenever a user is read
/// back.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Stable, unique, never changes once the user is created
    pub id: String,
    pub user_name: Option<String>,
    pub normalized_user_name: Option<String>,
    pub email: Option<String>,
    pub normalized_email: Option<String>,
    pub email_confirmed: bool,
    /// Opaque hash produced by the caller's password hasher
    pub password_hash: Option<String>,
    pub phone_number: Option<String>,
    pub phone_number_confirmed: bool,
    /// Changes whenever credentials change
    pub security_stamp: Option<String>,
    /// Regenerated on every write that lacks one
    pub concurrency_stamp: Option<String>,
    pub access_failed_count: u32,
    pub lockout_enabled: bool,
    /// A past value means the user is not locked out
    pub lockout_end: Option<DateTime<Utc>>,
    pub two_factor_enabled: bool,
}

impl User {
    /// Creates a user for registration with a fresh id and fresh stamps.
    pub fn new(user_name: impl Into<String>) -> Self {
        let user_name = user_name.into();
        Self {
            id: Uuid::new_v4().to_string(),
            normalized_user_name: Some(normalize(&user_name)),
            user_name: Some(user_name),
            security_stamp: Some(new_stamp()),
            concurrency_stamp: Some(new_stamp()),
            ..Self::default()
        }
    }

    /// Sets the email and its normalized form.
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        let email = email.into();
        self.normalized_email = Some(normalize(&email));
        self.email = Some(email);
        self
    }

    /// Sets the lockout flag.
    pub fn with_lockout_enabled(mut self, enabled: bool) -> Self {
        self.lockout_enabled = enabled;
        self
    }
}

/// The normalized form of a user name or email.
pub fn normalize(value: &str) -> String {
    value.to_uppercase()
}

/// A fresh random opaque stamp.
pub fn new_stamp() -> String {
    Uuid::new_v4().to_string()
}

/// One failure entry in an [`IdentityResult`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityError {
    pub code: String,
    pub description: String,
}

impl IdentityError {
    /// The entry used when a write fails for an unspecified reason.
    pub fn default_error() -> Self {
        Self {
            code: "DefaultError".to_string(),
            description: "An unknown failure has occurred.".to_string(),
        }
    }

    /// The entry used when a user is created without an id.
    pub fn missing_user_id() -> Self {
        Self {
            code: "MissingUserId".to_string(),
            description: "A user must have an id before it is created.".to_string(),
        }
    }
}

/// Outcome of a create, update or delete.
///
/// Success carries no errors; failure carries at least one.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityResult {
    errors: Vec<IdentityError>,
}

impl IdentityResult {
    pub fn success() -> Self {
        Self { errors: Vec::new() }
    }

    /// A failure with the given entries. An empty list gets the generic entry.
    pub fn failed(errors: impl IntoIterator<Item = IdentityError>) -> Self {
        let mut errors: Vec<_> = errors.into_iter().collect();
        if errors.is_empty() {
            errors.push(IdentityError::default_error());
        }
        Self { errors }
    }

    /// Maps a procedure outcome onto a result.
    pub fn from_outcome(succeeded: bool) -> Self {
        if succeeded {
            Self::success()
        } else {
            Self::failed([])
        }
    }

    pub fn succeeded(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[IdentityError] {
        &self.errors
    }
}
