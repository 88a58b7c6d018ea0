//! User system tests
//!
//! Covers the record codec and every operation of the `UserStore` façade.

mod codec_tests;
mod lockout_tests;
mod user_store_tests;
