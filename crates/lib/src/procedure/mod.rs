//! Named procedures over the user table.
//!
//! A procedure is identified by an [`Operation`] tag and run through the
//! [`ProcedureRegistry`]. Every procedure shares one contract: a [`Parameters`]
//! set in, a list of zero or more [`Record`]s out, or an error.
//!
//! Queries only read the table; mutations take it mutably. The split lets a
//! backend hold a shared lock for reads and an exclusive one for writes.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::Result;
use crate::store::{Record, Table};

mod errors;
mod handlers;
mod params;

pub use errors::ProcedureError;
pub use params::{ParamValue, Parameters};
pub(crate) use params::ParamReader;

/// The closed set of procedures the user table supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    FindById,
    FindByUsername,
    InsertUser,
    DeleteUser,
    UpdateUsername,
    UpdateUser,
    UpdatePassword,
    IncrementAccessFailedCount,
    ResetAccessFailedCount,
    SetLockoutEnabled,
    SetLockoutEnd,
    SetSecurityStamp,
}

impl Operation {
    pub const ALL: [Operation; 12] = [
        Operation::FindById,
        Operation::FindByUsername,
        Operation::InsertUser,
        Operation::DeleteUser,
        Operation::UpdateUsername,
        Operation::UpdateUser,
        Operation::UpdatePassword,
        Operation::IncrementAccessFailedCount,
        Operation::ResetAccessFailedCount,
        Operation::SetLockoutEnabled,
        Operation::SetLockoutEnd,
        Operation::SetSecurityStamp,
    ];

    /// The procedure name callers dispatch by.
    pub const fn as_str(self) -> &'static str {
        match self {
            Operation::FindById => "findById",
            Operation::FindByUsername => "findByUsername",
            Operation::InsertUser => "insertUser",
            Operation::DeleteUser => "deleteUser",
            Operation::UpdateUsername => "updateUsername",
            Operation::UpdateUser => "updateUser",
            Operation::UpdatePassword => "updatePassword",
            Operation::IncrementAccessFailedCount => "incrementAccessFailedCount",
            Operation::ResetAccessFailedCount => "resetAccessFailedCount",
            Operation::SetLockoutEnabled => "setLockoutEnabled",
            Operation::SetLockoutEnd => "setLockoutEnd",
            Operation::SetSecurityStamp => "setSecurityStamp",
        }
    }

    /// Whether the procedure only reads the table.
    pub const fn is_query(self) -> bool {
        matches!(self, Operation::FindById | Operation::FindByUsername)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = ProcedureError;

    fn from_str(name: &str) -> std::result::Result<Self, Self::Err> {
        Operation::ALL
            .into_iter()
            .find(|op| op.as_str() == name)
            .ok_or_else(|| ProcedureError::UnknownOperation {
                name: name.to_string(),
            })
    }
}

type QueryFn = dyn Fn(&Table, &Parameters) -> Result<Vec<Record>> + Send + Sync;
type MutationFn = dyn Fn(&mut Table, &Parameters) -> Result<Vec<Record>> + Send + Sync;

/// A registered procedure body.
pub enum Handler {
    /// Reads the table.
    Query(Box<QueryFn>),
    /// Modifies the table.
    Mutation(Box<MutationFn>),
}

impl Handler {
    pub fn query<F>(f: F) -> Self
    where
        F: Fn(&Table, &Parameters) -> Result<Vec<Record>> + Send + Sync + 'static,
    {
        Handler::Query(Box::new(f))
    }

    pub fn mutation<F>(f: F) -> Self
    where
        F: Fn(&mut Table, &Parameters) -> Result<Vec<Record>> + Send + Sync + 'static,
    {
        Handler::Mutation(Box::new(f))
    }

    pub fn is_query(&self) -> bool {
        matches!(self, Handler::Query(_))
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Handler::Query(_) => f.write_str("Handler::Query"),
            Handler::Mutation(_) => f.write_str("Handler::Mutation"),
        }
    }
}

/// Maps operations to their handlers.
///
/// [`ProcedureRegistry::standard`] registers every [`Operation`]. An empty
/// registry plus [`ProcedureRegistry::register`] can be used to restrict or
/// replace individual procedures.
#[derive(Debug, Default)]
pub struct ProcedureRegistry {
    handlers: HashMap<Operation, Handler>,
}

impl ProcedureRegistry {
    /// Creates a registry with no procedures.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with the standard handler for every operation.
    pub fn standard() -> Self {
        let mut registry = Self::new();
        for op in Operation::ALL {
            registry.register(op, handlers::standard(op));
        }
        registry
    }

    /// Registers a handler, returning the one it replaced.
    pub fn register(&mut self, op: Operation, handler: Handler) -> Option<Handler> {
        self.handlers.insert(op, handler)
    }

    pub fn get(&self, op: Operation) -> Option<&Handler> {
        self.handlers.get(&op)
    }

    /// Resolves a procedure name to its operation and handler.
    ///
    /// # Errors
    /// `ProcedureError::UnknownOperation` if the name is not an operation or
    /// has no handler registered.
    pub fn resolve(&self, name: &str) -> Result<(Operation, &Handler)> {
        let op: Operation = name.parse()?;
        let handler = self
            .get(op)
            .ok_or_else(|| ProcedureError::UnknownOperation {
                name: name.to_string(),
            })?;
        Ok((op, handler))
    }

    /// Registered operations in declaration order.
    pub fn operations(&self) -> Vec<Operation> {
        Operation::ALL
            .into_iter()
            .filter(|op| self.handlers.contains_key(op))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}
