//! User system
//!
//! Provides the structured [`User`] entity, the codec that maps it to and from
//! flat records, and [`UserStore`], the façade an authentication layer calls.

pub mod codec;
pub mod errors;
pub mod types;
mod user_store;

pub use errors::UserError;
pub use types::{IdentityError, IdentityResult, User, new_stamp, normalize};
pub use user_store::UserStore;
