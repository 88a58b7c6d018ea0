//! Procedure dispatch tests
//!
//! Exercises every named procedure through the `ProcedureBackend` interface,
//! including the collapsed `execute`/`query` forms.

mod counters;
