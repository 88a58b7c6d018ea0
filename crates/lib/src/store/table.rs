//! The user table: ordered rows, scanned linearly.

use serde::{Deserialize, Serialize};
use tracing::trace;

use super::{FieldKey, Record, StoreError};
use crate::Result;

/// Position of a row inside a [`Table`].
///
/// Only meaningful while the table it came from is borrowed; any insert or
/// delete may shift rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowRef(usize);

/// The single user table.
///
/// `Table` is an ordered collection of [`Record`]s with numeric id generation
/// for rows inserted without an id.
///
/// # Features
/// - Assigns the next free numeric id to records inserted without one
/// - Rejects duplicate and changed ids, keeping ids unique and immutable
/// - Supports predicate-based lookup, deletion and in-place field updates
///
/// There is no index: every lookup is a linear scan over all rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    rows: Vec<Record>,
    next_id: u64,
}

impl Default for Table {
    fn default() -> Self {
        Self::new()
    }
}

impl Table {
    /// Creates an empty table whose first generated id is `1`.
    pub fn new() -> Self {
        Self {
            rows: Vec::new(),
            next_id: 1,
        }
    }

    /// Appends a record and returns the stored row.
    ///
    /// A record without an id (missing or empty) is given the next free numeric
    /// id. A supplied id that is already present is rejected.
    ///
    /// # Errors
    /// Returns `StoreError::DuplicateId` if the supplied id is taken.
    pub fn insert(&mut self, mut record: Record) -> Result<&Record> {
        match record.id() {
            Some(id) => {
                if self.contains_id(id) {
                    return Err(StoreError::DuplicateId { id: id.to_string() }.into());
                }
            }
            None => {
                let id = self.generate_id();
                record.set(FieldKey::Id, id);
            }
        }

        trace!(id = record.id(), "Inserting row");
        let index = self.rows.len();
        self.rows.push(record);
        Ok(&self.rows[index])
    }

    /// Returns clones of every row matching the predicate, in table order.
    ///
    /// Cardinality is the caller's concern: zero, one or many rows may match.
    pub fn find_by(&self, predicate: impl Fn(&Record) -> bool) -> Vec<Record> {
        self.rows.iter().filter(|r| predicate(r)).cloned().collect()
    }

    /// Returns a reference to the first row matching the predicate.
    pub fn position(&self, predicate: impl Fn(&Record) -> bool) -> Option<RowRef> {
        self.rows.iter().position(predicate).map(RowRef)
    }

    /// Returns the row behind a reference.
    pub fn row(&self, row: RowRef) -> Option<&Record> {
        self.rows.get(row.0)
    }

    /// Removes the first row matching the predicate and returns it.
    ///
    /// `None` means nothing matched and the table is unchanged.
    pub fn delete_by(&mut self, predicate: impl Fn(&Record) -> bool) -> Option<Record> {
        let index = self.rows.iter().position(predicate)?;
        Some(self.rows.remove(index))
    }

    /// Overwrites the named fields of an existing row in place.
    ///
    /// Either every field is applied or none is.
    ///
    /// # Errors
    /// * `StoreError::RowNotFound` if the reference does not point at a row
    /// * `StoreError::ImmutableId` if the fields would change the row's id
    pub fn update_fields(
        &mut self,
        row: RowRef,
        fields: impl IntoIterator<Item = (FieldKey, String)>,
    ) -> Result<&Record> {
        let fields: Vec<(FieldKey, String)> = fields.into_iter().collect();
        let record = self
            .rows
            .get_mut(row.0)
            .ok_or_else(|| StoreError::RowNotFound {
                reason: format!("row reference {} is out of range", row.0),
            })?;

        let current_id = record.get(FieldKey::Id).unwrap_or_default();
        if let Some((_, attempted)) = fields
            .iter()
            .find(|(key, value)| *key == FieldKey::Id && value != current_id)
        {
            return Err(StoreError::ImmutableId {
                id: current_id.to_string(),
                attempted: attempted.clone(),
            }
            .into());
        }

        for (key, value) in fields {
            record.set(key, value);
        }
        Ok(record)
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// All rows in insertion order.
    pub fn rows(&self) -> &[Record] {
        &self.rows
    }

    fn contains_id(&self, id: &str) -> bool {
        self.rows.iter().any(|r| r.get(FieldKey::Id) == Some(id))
    }

    fn generate_id(&mut self) -> String {
        loop {
            let candidate = self.next_id.to_string();
            self.next_id += 1;
            if !self.contains_id(&candidate) {
                return candidate;
            }
        }
    }
}
