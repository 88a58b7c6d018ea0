//! The entity-level façade over a procedure backend.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use super::{IdentityError, IdentityResult, User, codec};
use crate::Result;
use crate::backend::ProcedureBackend;
use crate::clock::{Clock, SystemClock};
use crate::constants::params;
use crate::procedure::{Operation, Parameters};
use crate::store::{FieldKey, Record};

/// User storage for an authentication layer.
///
/// Every method maps to one procedure call on the backend. Setters that
/// persist a field only change the passed-in [`User`] once the backend reports
/// success; on failure the entity is left as it was and the method returns
/// `false`.
///
/// Lookups return `Ok(None)` for a missing user, a failed call, or an
/// ambiguous match. Only a corrupt stored record is an `Err`.
///
/// ```
/// # use std::sync::Arc;
/// # use userstore::backend::InMemory;
/// # use userstore::user::{User, UserStore};
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> userstore::Result<()> {
/// let store = UserStore::new(Arc::new(InMemory::new()));
///
/// let user = User::new("alice");
/// assert!(store.create(&user).await.succeeded());
///
/// let found = store.find_by_name("ALICE").await?.expect("alice exists");
/// assert_eq!(found.id, user.id);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct UserStore {
    backend: Arc<dyn ProcedureBackend>,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for UserStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserStore")
            .field("clock", &self.clock)
            .finish_non_exhaustive()
    }
}

impl UserStore {
    /// Creates a store over a backend, reading time from the system clock.
    pub fn new(backend: Arc<dyn ProcedureBackend>) -> Self {
        Self::with_clock(backend, Arc::new(SystemClock))
    }

    /// Creates a store with an explicit time source for lockout checks.
    pub fn with_clock(backend: Arc<dyn ProcedureBackend>, clock: Arc<dyn Clock>) -> Self {
        Self { backend, clock }
    }

    pub fn backend(&self) -> &Arc<dyn ProcedureBackend> {
        &self.backend
    }

    /// The time source used for lockout checks.
    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    // --- Entity lifecycle ---

    /// Inserts a new user.
    ///
    /// The user must already carry an id; [`User::new`] assigns one.
    pub async fn create(&self, user: &User) -> IdentityResult {
        if user.id.is_empty() {
            warn!("Refusing to create a user without an id");
            return IdentityResult::failed([IdentityError::missing_user_id()]);
        }
        let ok = self.execute(Operation::InsertUser, &codec::encode(user)).await;
        if ok {
            info!(user_id = %user.id, "Created user");
        }
        IdentityResult::from_outcome(ok)
    }

    /// Overwrites every stored field of an existing user.
    pub async fn update(&self, user: &User) -> IdentityResult {
        IdentityResult::from_outcome(self.execute(Operation::UpdateUser, &codec::encode(user)).await)
    }

    pub async fn delete(&self, user: &User) -> IdentityResult {
        let ok = self.execute(Operation::DeleteUser, &by_id(user)).await;
        if ok {
            info!(user_id = %user.id, "Deleted user");
        }
        IdentityResult::from_outcome(ok)
    }

    /// Looks a user up by id.
    pub async fn find_by_id(&self, user_id: &str) -> Result<Option<User>> {
        let params = Parameters::new().with(params::ID, user_id);
        self.find_one(Operation::FindById, &params).await
    }

    /// Looks a user up by normalized (upper-cased) name.
    pub async fn find_by_name(&self, normalized_user_name: &str) -> Result<Option<User>> {
        let params = Parameters::new().with(params::USERNAME, normalized_user_name);
        self.find_one(Operation::FindByUsername, &params).await
    }

    // --- Identity fields ---

    pub fn get_user_id<'a>(&self, user: &'a User) -> &'a str {
        &user.id
    }

    pub fn get_user_name<'a>(&self, user: &'a User) -> Option<&'a str> {
        user.user_name.as_deref()
    }

    /// Renames a user.
    pub async fn set_user_name(&self, user: &mut User, user_name: Option<String>) -> bool {
        let params = by_id(user).with(params::USERNAME, user_name.clone());
        let ok = self.execute(Operation::UpdateUsername, &params).await;
        if ok {
            user.user_name = user_name;
        }
        ok
    }

    pub fn get_normalized_user_name<'a>(&self, user: &'a User) -> Option<&'a str> {
        user.normalized_user_name.as_deref()
    }

    /// Sets the normalized name on the entity only; it is never stored.
    pub fn set_normalized_user_name(&self, user: &mut User, normalized: Option<String>) {
        user.normalized_user_name = normalized;
    }

    // --- Password ---

    pub fn get_password_hash<'a>(&self, user: &'a User) -> Option<&'a str> {
        user.password_hash.as_deref()
    }

    /// Stores a new password hash, matching the row by the user's current name.
    pub async fn set_password_hash(&self, user: &mut User, password_hash: Option<String>) -> bool {
        let params = Parameters::new()
            .with(params::USERNAME, user.user_name.clone())
            .with(params::PASSWORD_HASH, password_hash.clone());
        let ok = self.execute(Operation::UpdatePassword, &params).await;
        if ok {
            user.password_hash = password_hash;
        }
        ok
    }

    pub fn has_password(&self, user: &User) -> bool {
        user.password_hash.as_deref().is_some_and(|h| !h.is_empty())
    }

    // --- Lockout ---

    pub fn get_access_failed_count(&self, user: &User) -> u32 {
        user.access_failed_count
    }

    /// Records a failed access attempt and returns the new count.
    ///
    /// The count comes from the stored row, so concurrent increments are not
    /// lost. Only the counter is read back; other fields of the row are left
    /// to the lookups. Returns `None` if the call failed.
    pub async fn increment_access_failed_count(&self, user: &mut User) -> Option<u32> {
        let row = self
            .mutate_one(Operation::IncrementAccessFailedCount, &by_id(user))
            .await?;
        let count = row
            .get(FieldKey::AccessFailedCount)
            .and_then(|raw| raw.parse::<u32>().ok())?;
        user.access_failed_count = count;
        Some(count)
    }

    pub async fn reset_access_failed_count(&self, user: &mut User) -> bool {
        let ok = self
            .execute(Operation::ResetAccessFailedCount, &by_id(user))
            .await;
        if ok {
            user.access_failed_count = 0;
        }
        ok
    }

    pub fn get_lockout_enabled(&self, user: &User) -> bool {
        user.lockout_enabled
    }

    pub async fn set_lockout_enabled(&self, user: &mut User, enabled: bool) -> bool {
        let params = by_id(user).with(params::ENABLED, enabled);
        let ok = self.execute(Operation::SetLockoutEnabled, &params).await;
        if ok {
            user.lockout_enabled = enabled;
        }
        ok
    }

    pub fn get_lockout_end(&self, user: &User) -> Option<DateTime<Utc>> {
        user.lockout_end
    }

    /// Sets or, with `None`, clears the end of a lockout.
    pub async fn set_lockout_end(&self, user: &mut User, end: Option<DateTime<Utc>>) -> bool {
        let params = by_id(user).with(params::LOCKOUT_END, end);
        let ok = self.execute(Operation::SetLockoutEnd, &params).await;
        if ok {
            user.lockout_end = end;
        }
        ok
    }

    /// Whether lockout is enabled for the user and its end lies in the future.
    pub fn is_locked_out(&self, user: &User) -> bool {
        user.lockout_enabled && user.lockout_end.is_some_and(|end| end > self.clock.now())
    }

    // --- Security stamp ---

    pub fn get_security_stamp<'a>(&self, user: &'a User) -> Option<&'a str> {
        user.security_stamp.as_deref()
    }

    pub async fn set_security_stamp(&self, user: &mut User, stamp: Option<String>) -> bool {
        let params = by_id(user).with(params::STAMP, stamp.clone());
        let ok = self.execute(Operation::SetSecurityStamp, &params).await;
        if ok {
            user.security_stamp = stamp;
        }
        ok
    }

    async fn execute(&self, op: Operation, params: &Parameters) -> bool {
        let ok = self.backend.execute(op.as_str(), params).await;
        debug!(operation = %op, ok, "Procedure executed");
        ok
    }

    /// Runs a mutation and returns the single row it reports.
    async fn mutate_one(&self, op: Operation, params: &Parameters) -> Option<Record> {
        let mut rows = self.backend.query(op.as_str(), params).await?;
        (rows.len() == 1).then(|| rows.remove(0))
    }

    async fn find_one(&self, op: Operation, params: &Parameters) -> Result<Option<User>> {
        match self.backend.query(op.as_str(), params).await {
            Some(rows) if rows.len() == 1 => codec::decode(&rows[0]).map(Some),
            Some(rows) => {
                debug!(operation = %op, matches = rows.len(), "Lookup did not match exactly one user");
                Ok(None)
            }
            None => Ok(None),
        }
    }
}

fn by_id(user: &User) -> Parameters {
    Parameters::new().with(params::ID, &user.id)
}
