/*! Integration tests for Userstore.
 *
 * This test suite is organized as a single integration test binary
 * following the pattern described by matklad in
 * https://matklad.github.io/2021/02/27/delete-cargo-integration-tests.html
 *
 * The module structure mirrors the main library structure:
 * - store: Tests for the Table and Record types
 * - procedure: Tests for dispatch of every named procedure
 * - backend: Tests for the ProcedureBackend trait and InMemory snapshots
 * - user: Tests for the codec and the UserStore façade
 */

use tracing_subscriber::EnvFilter;

#[ctor::ctor]
fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("userstore=info".parse().unwrap()),
        )
        .with_test_writer()
        .try_init();
}

mod backend;
mod helpers;
mod procedure;
mod store;
mod user;
