//! Backend implementations for the user store
//!
//! This module provides the `ProcedureBackend` trait, the procedure-call
//! interface the rest of the crate talks to, and the in-memory reference
//! implementation.
//!
//! A backend accepts a procedure name and a parameter set and returns zero or
//! more flat records. Callers that only care about success use the collapsed
//! forms: [`ProcedureBackend::execute`] (a bool) and [`ProcedureBackend::query`]
//! (rows or nothing).

use std::any::Any;

use async_trait::async_trait;
use tracing::warn;

use crate::Result;
use crate::procedure::Parameters;
use crate::store::Record;

mod errors;
mod in_memory;

pub use errors::BackendError;
pub use in_memory::InMemory;

/// Procedure-call interface over a user table.
///
/// Implementations must be `Send` and `Sync` so a single backend can be shared
/// across tasks, and implement `Any` to allow for downcasting if needed.
///
/// Each call is applied in full before any other call observes the table. No
/// partial write of a failed call is ever visible.
#[async_trait]
pub trait ProcedureBackend: Send + Sync + Any {
    /// Runs a procedure and returns its rows.
    ///
    /// # Arguments
    /// * `procedure` - The procedure name, e.g. `"findById"`.
    /// * `params` - Named parameters for the procedure.
    ///
    /// # Returns
    /// The rows the procedure produced (possibly none), or the reason it failed.
    async fn call(&self, procedure: &str, params: &Parameters) -> Result<Vec<Record>>;

    /// Runs a procedure, reporting only whether it succeeded.
    async fn execute(&self, procedure: &str, params: &Parameters) -> bool {
        self.query(procedure, params).await.is_some()
    }

    /// Runs a procedure, returning its rows or `None` on failure.
    ///
    /// An empty `Vec` is a successful call that matched nothing.
    async fn query(&self, procedure: &str, params: &Parameters) -> Option<Vec<Record>> {
        match self.call(procedure, params).await {
            Ok(rows) => Some(rows),
            Err(e) => {
                warn!(procedure, error = %e, "Procedure failed");
                None
            }
        }
    }

    /// Returns a reference to the backend as a `dyn Any` for downcasting.
    fn as_any(&self) -> &dyn Any;
}
