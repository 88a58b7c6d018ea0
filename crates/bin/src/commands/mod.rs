//! Subcommand implementations.

pub mod call;
pub mod info;
pub mod login;
pub mod user;

use userstore::user::{User, UserStore, normalize};

/// Look a user up by name, failing with a readable error if absent.
pub(crate) async fn require_user(
    store: &UserStore,
    name: &str,
) -> Result<User, Box<dyn std::error::Error>> {
    store
        .find_by_name(&normalize(name))
        .await?
        .ok_or_else(|| format!("no such user: {name}").into())
}
