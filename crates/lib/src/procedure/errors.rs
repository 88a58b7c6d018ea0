//! Error types for procedure dispatch and parameter validation.

use thiserror::Error;

/// Errors that can occur while dispatching or running a procedure.
///
/// At the [`ProcedureBackend`](crate::backend::ProcedureBackend) boundary every
/// one of these collapses into a plain failure; the structure is kept for
/// logging and for callers of `call` that want the reason.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ProcedureError {
    /// The procedure name is not in the registry.
    #[error("Unknown procedure: {name}")]
    UnknownOperation { name: String },

    /// A required parameter is missing, empty, or of the wrong type.
    #[error("Invalid parameter '{parameter}' for {operation}: {reason}")]
    InvalidParameters {
        operation: String,
        parameter: String,
        reason: String,
    },

    /// No row matched the procedure's target.
    #[error("{operation}: no row with {field} = '{value}'")]
    NotFound {
        operation: String,
        field: String,
        value: String,
    },
}

impl ProcedureError {
    /// Check if this error indicates a row was not found
    pub fn is_not_found(&self) -> bool {
        matches!(self, ProcedureError::NotFound { .. })
    }

    /// Check if this error was caused by the parameter set
    pub fn is_invalid_parameters(&self) -> bool {
        matches!(self, ProcedureError::InvalidParameters { .. })
    }

    /// Check if this error names an unregistered procedure
    pub fn is_unknown_operation(&self) -> bool {
        matches!(self, ProcedureError::UnknownOperation { .. })
    }

    /// Get the offending parameter name, if any
    pub fn parameter(&self) -> Option<&str> {
        match self {
            ProcedureError::InvalidParameters { parameter, .. } => Some(parameter),
            _ => None,
        }
    }
}

impl From<ProcedureError> for crate::Error {
    fn from(err: ProcedureError) -> Self {
        crate::Error::Procedure(err)
    }
}
