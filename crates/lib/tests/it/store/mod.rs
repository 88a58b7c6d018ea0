//! Table and record tests
//!
//! Covers id generation, predicate lookups and the all-or-nothing update
//! contract of the store underneath every procedure.

mod table_operations;
