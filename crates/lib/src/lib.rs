//!
//! Userstore: a credential-storage adapter.
//! This library persists and retrieves user identity records behind a small set of
//! named operations ("procedures"), decoupling an authentication layer from the
//! storage engine underneath it.
//!
//! ## Core Concepts
//!
//! * **Records (`store::Record`)**: Flat rows mapping fixed uppercase field keys to strings.
//!   This is the only persisted-state contract a storage engine has to honor.
//! * **Tables (`store::Table`)**: An ordered, unindexed collection of records. Every lookup is a linear scan.
//! * **Procedures (`procedure::Operation`)**: The closed set of named operations, each dispatched
//!   through a `procedure::ProcedureRegistry` to a handler that reads or mutates a table.
//! * **Backends (`backend::ProcedureBackend`)**: The procedure-call interface. `backend::InMemory`
//!   is the reference implementation, with optional JSON snapshots.
//! * **Users (`user::User`, `user::UserStore`)**: The structured entity, the codec mapping it
//!   to and from records, and the façade the authentication layer calls.

pub mod backend;
pub mod clock;
pub mod constants;
pub mod procedure;
pub mod store;
pub mod user;

#[cfg(any(test, feature = "testing"))]
pub use clock::FixedClock;
pub use clock::{Clock, SystemClock};

/// Result type used throughout the Userstore library.
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for the Userstore library.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Structured table errors from the store module
    #[error(transparent)]
    Store(store::StoreError),

    /// Structured dispatch and parameter errors from the procedure module
    #[error(transparent)]
    Procedure(procedure::ProcedureError),

    /// Structured persistence errors from the backend module
    #[error(transparent)]
    Backend(backend::BackendError),

    /// Structured entity errors from the user module
    #[error(transparent)]
    User(user::UserError),
}

impl Error {
    /// Get the originating module for this error.
    pub fn module(&self) -> &'static str {
        match self {
            Error::Store(_) => "store",
            Error::Procedure(_) => "procedure",
            Error::Backend(_) => "backend",
            Error::User(_) => "user",
            Error::Io(_) => "io",
            Error::Serialize(_) => "serialize",
        }
    }

    /// Check if this error indicates a row was not found.
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::Store(store_err) => store_err.is_not_found(),
            Error::Procedure(procedure_err) => procedure_err.is_not_found(),
            _ => false,
        }
    }

    /// Check if this error was caused by missing or malformed parameters.
    pub fn is_invalid_parameters(&self) -> bool {
        match self {
            Error::Procedure(procedure_err) => procedure_err.is_invalid_parameters(),
            _ => false,
        }
    }

    /// Check if this error names a procedure that is not registered.
    pub fn is_unknown_operation(&self) -> bool {
        match self {
            Error::Procedure(procedure_err) => procedure_err.is_unknown_operation(),
            _ => false,
        }
    }

    /// Check if this error indicates a conflict with an existing row.
    pub fn is_conflict(&self) -> bool {
        match self {
            Error::Store(store_err) => store_err.is_conflict(),
            _ => false,
        }
    }

    /// Check if this error indicates corrupted stored data.
    ///
    /// Corruption is never a caller error; it means a record holds a value the
    /// codec cannot represent.
    pub fn is_corruption(&self) -> bool {
        match self {
            Error::Store(store_err) => store_err.is_corruption(),
            Error::User(user_err) => user_err.is_corrupt_record(),
            _ => false,
        }
    }

    /// Check if this error is I/O related.
    pub fn is_io_error(&self) -> bool {
        match self {
            Error::Io(_) => true,
            Error::Backend(backend_err) => backend_err.is_io_error(),
            _ => false,
        }
    }
}
