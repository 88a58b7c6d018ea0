//! Backend tests
//!
//! Covers the InMemory snapshot files and concurrent use of one backend.

mod concurrency;
mod save_load;
