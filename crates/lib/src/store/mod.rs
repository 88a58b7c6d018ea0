//! The record store: one table of flat user records.
//!
//! Everything the adapter knows about a user lives in a [`Record`] inside the
//! [`Table`]. The table owns its records; callers only ever receive clones or
//! short-lived borrows.

mod errors;
pub use errors::StoreError;

mod record;
pub use record::{FieldKey, FieldKind, Record, encode_flag, format_timestamp, parse_timestamp};

mod table;
pub use table::{RowRef, Table};
