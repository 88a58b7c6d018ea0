use std::sync::Arc;

use chrono::{TimeZone, Utc};
use userstore::{
    FixedClock,
    backend::{InMemory, ProcedureBackend},
    procedure::Parameters,
    store::{FieldKey, Record},
    user::{User, UserStore, codec},
};

// ==========================
// CORE TEST FACTORIES
// ==========================

/// Creates an empty backend with every standard procedure registered.
pub fn test_backend() -> Arc<InMemory> {
    Arc::new(InMemory::new())
}

/// A clock pinned at 2030-01-01T00:00:00Z.
pub fn test_clock() -> Arc<FixedClock> {
    Arc::new(FixedClock::new(
        Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap(),
    ))
}

/// A store over a fresh backend, returning both so tests can inspect the table.
pub fn test_store() -> (UserStore, Arc<InMemory>, Arc<FixedClock>) {
    let backend = test_backend();
    let clock = test_clock();
    let store = UserStore::with_clock(backend.clone(), clock.clone());
    (store, backend, clock)
}

// ==========================
// PROCEDURE HELPERS
// ==========================

/// The full `insertUser` parameter set for a user with the given name and hash.
///
/// The id is left empty so the table assigns the next numeric one.
pub fn insert_params(user_name: &str, password_hash: &str) -> Parameters {
    let mut user = User::new(user_name);
    user.id = String::new();
    user.password_hash = Some(password_hash.to_string());
    codec::encode(&user)
}

/// Inserts a user and returns its stored row.
pub async fn insert_user(backend: &InMemory, user_name: &str) -> Record {
    let rows = backend
        .call("insertUser", &insert_params(user_name, "hash"))
        .await
        .expect("insertUser should succeed");
    assert_eq!(rows.len(), 1);
    rows.into_iter().next().unwrap()
}

pub fn id_params(id: &str) -> Parameters {
    Parameters::new().with("id", id)
}

/// Reads the stored access-failed count of a row.
pub async fn stored_count(backend: &InMemory, id: &str) -> String {
    let rows = backend.call("findById", &id_params(id)).await.unwrap();
    assert_eq!(rows.len(), 1);
    rows[0]
        .get(FieldKey::AccessFailedCount)
        .unwrap_or_default()
        .to_string()
}

/// Creates and stores a user through the façade.
pub async fn create_user(store: &UserStore, user_name: &str) -> User {
    let user = User::new(user_name);
    assert!(store.create(&user).await.succeeded());
    user
}
