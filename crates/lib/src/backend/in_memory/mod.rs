//! In-memory backend implementation
//!
//! This module provides the reference `ProcedureBackend`: a single [`Table`]
//! held in memory and driven through a [`ProcedureRegistry`]. It is suitable for
//! testing, development, or deployments where the whole table can be saved to
//! and restored from a JSON snapshot.

mod persistence;

use std::any::Any;
use std::path::Path;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::Result;
use crate::backend::ProcedureBackend;
use crate::procedure::{Handler, Parameters, ProcedureRegistry};
use crate::store::{Record, Table};

/// The reference in-memory procedure backend.
///
/// Queries take a shared lock on the table and mutations an exclusive one, so a
/// procedure always runs to completion before another can observe the table.
///
/// It provides basic persistence via `save_to_file` and `load_from_file`,
/// serializing the table to JSON.
#[derive(Debug)]
pub struct InMemory {
    pub(crate) table: RwLock<Table>,
    registry: ProcedureRegistry,
}

impl InMemory {
    /// Creates an empty backend with every standard procedure registered.
    pub fn new() -> Self {
        Self::with_registry(ProcedureRegistry::standard())
    }

    /// Creates an empty backend dispatching through the given registry.
    pub fn with_registry(registry: ProcedureRegistry) -> Self {
        Self {
            table: RwLock::new(Table::new()),
            registry,
        }
    }

    /// Creates a backend over an existing table with the standard procedures.
    pub fn from_table(table: Table) -> Self {
        Self {
            table: RwLock::new(table),
            registry: ProcedureRegistry::standard(),
        }
    }

    pub fn registry(&self) -> &ProcedureRegistry {
        &self.registry
    }

    /// Number of rows currently in the table.
    pub async fn len(&self) -> usize {
        self.table.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.table.read().await.is_empty()
    }

    /// Returns a copy of every row, in table order.
    pub async fn rows(&self) -> Vec<Record> {
        self.table.read().await.rows().to_vec()
    }

    /// Saves the whole table to a specified file as JSON.
    ///
    /// # Arguments
    /// * `path` - The path to the file where the state should be saved.
    ///
    /// # Returns
    /// A `Result` indicating success or an I/O or serialization error.
    pub async fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        persistence::save_to_file(self, path).await
    }

    /// Loads the table from a specified JSON file.
    ///
    /// If the file does not exist, a new, empty `InMemory` backend is returned.
    ///
    /// # Arguments
    /// * `path` - The path to the file from which to load the state.
    ///
    /// # Returns
    /// A `Result` containing the loaded backend or an I/O or deserialization error.
    pub async fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        persistence::load_from_file(path).await
    }
}

impl Default for InMemory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProcedureBackend for InMemory {
    async fn call(&self, procedure: &str, params: &Parameters) -> Result<Vec<Record>> {
        let (op, handler) = self.registry.resolve(procedure)?;
        debug!(operation = %op, params = params.len(), "Dispatching procedure");

        match handler {
            Handler::Query(f) => {
                let table = self.table.read().await;
                f(&*table, params)
            }
            Handler::Mutation(f) => {
                let mut table = self.table.write().await;
                f(&mut *table, params)
            }
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
