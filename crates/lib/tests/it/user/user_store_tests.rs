use std::sync::Arc;

use userstore::{
    backend::{InMemory, ProcedureBackend},
    procedure::Parameters,
    store::{FieldKey, Record, Table},
    user::{IdentityError, User, UserStore},
};

use crate::helpers::*;

#[tokio::test]
async fn test_create_and_find() {
    let (store, backend, _) = test_store();
    let user = create_user(&store, "alice").await.with_email("alice@example.com");
    assert!(store.update(&user).await.succeeded());
    assert_eq!(backend.len().await, 1);

    let by_id = store.find_by_id(&user.id).await.unwrap().unwrap();
    assert_eq!(by_id.user_name.as_deref(), Some("alice"));
    assert_eq!(by_id.email.as_deref(), Some("alice@example.com"));

    let by_name = store.find_by_name("ALICE").await.unwrap().unwrap();
    assert_eq!(by_name, by_id);

    assert!(store.find_by_id("missing").await.unwrap().is_none());
    assert!(store.find_by_name("alice").await.unwrap().is_none());
}

#[tokio::test]
async fn test_create_duplicate_reports_generic_failure() {
    let (store, _, _) = test_store();
    let user = create_user(&store, "alice").await;

    let result = store.create(&user).await;
    assert!(!result.succeeded());
    assert_eq!(result.errors(), [IdentityError::default_error()]);
}

#[tokio::test]
async fn test_ambiguous_name_finds_nothing() {
    let (store, _, _) = test_store();
    create_user(&store, "alice").await;
    create_user(&store, "Alice").await;

    assert!(store.find_by_name("ALICE").await.unwrap().is_none());
}

#[tokio::test]
async fn test_update_and_delete_missing_user_fail() {
    let (store, _, _) = test_store();
    let ghost = User::new("ghost");

    assert!(!store.update(&ghost).await.succeeded());
    assert!(!store.delete(&ghost).await.succeeded());
}

#[tokio::test]
async fn test_delete_removes_user() {
    let (store, backend, _) = test_store();
    let user = create_user(&store, "alice").await;

    assert!(store.delete(&user).await.succeeded());
    assert!(backend.is_empty().await);
    assert!(store.find_by_id(&user.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_set_user_name_persists_new_name() {
    let (store, _, _) = test_store();
    let mut user = create_user(&store, "alice").await;

    assert!(store.set_user_name(&mut user, Some("alicia".to_string())).await);
    assert_eq!(store.get_user_name(&user), Some("alicia"));

    let stored = store.find_by_id(&user.id).await.unwrap().unwrap();
    assert_eq!(stored.user_name.as_deref(), Some("alicia"));
}

#[tokio::test]
async fn test_failed_setters_leave_entity_unchanged() {
    let (store, _, _) = test_store();
    let mut ghost = User::new("ghost");
    let before = ghost.clone();

    assert!(!store.set_user_name(&mut ghost, Some("other".to_string())).await);
    assert!(!store.set_password_hash(&mut ghost, Some("h".to_string())).await);
    assert!(!store.set_lockout_enabled(&mut ghost, true).await);
    assert!(!store.set_security_stamp(&mut ghost, None).await);
    assert!(store.increment_access_failed_count(&mut ghost).await.is_none());
    assert_eq!(ghost, before);
}

#[tokio::test]
async fn test_password_hash() {
    let (store, _, _) = test_store();
    let mut user = create_user(&store, "alice").await;
    assert!(!store.has_password(&user));

    assert!(store.set_password_hash(&mut user, Some("h1".to_string())).await);
    assert!(store.has_password(&user));
    assert_eq!(store.get_password_hash(&user), Some("h1"));

    let stored = store.find_by_name("ALICE").await.unwrap().unwrap();
    assert_eq!(stored.password_hash.as_deref(), Some("h1"));

    // An empty hash is rejected by updatePassword
    assert!(!store.set_password_hash(&mut user, Some(String::new())).await);
    assert_eq!(store.get_password_hash(&user), Some("h1"));
}

#[tokio::test]
async fn test_normalized_user_name_is_not_persisted() {
    let (store, _, _) = test_store();
    let mut user = create_user(&store, "alice").await;

    store.set_normalized_user_name(&mut user, Some("SOMETHING-ELSE".to_string()));
    assert_eq!(store.get_normalized_user_name(&user), Some("SOMETHING-ELSE"));
    assert!(store.update(&user).await.succeeded());

    let stored = store.find_by_id(store.get_user_id(&user)).await.unwrap().unwrap();
    assert_eq!(stored.normalized_user_name.as_deref(), Some("ALICE"));
}

#[tokio::test]
async fn test_corrupt_record_is_an_error() {
    // A value the procedures would never write
    let mut table = Table::new();
    table
        .insert(
            Record::new()
                .with(FieldKey::UserName, "alice")
                .with(FieldKey::LockoutEnd, "someday"),
        )
        .unwrap();
    let store = UserStore::new(Arc::new(InMemory::from_table(table)));

    let err = store.find_by_id("1").await.unwrap_err();
    assert!(err.is_corruption());
    let err = store.find_by_name("ALICE").await.unwrap_err();
    assert!(err.is_corruption());
}

#[tokio::test]
async fn test_security_stamp() {
    let (store, backend, _) = test_store();
    let mut user = create_user(&store, "alice").await;
    let original = store.get_security_stamp(&user).map(str::to_string);
    assert!(original.is_some());

    assert!(store.set_security_stamp(&mut user, Some("rotated".to_string())).await);
    assert_eq!(store.get_security_stamp(&user), Some("rotated"));

    let rows = backend
        .call("findById", &Parameters::new().with("id", user.id.as_str()))
        .await
        .unwrap();
    assert_eq!(
        rows[0].get(FieldKey::SecurityStamp),
        Some("rotated")
    );
}

#[tokio::test]
async fn test_create_without_id_is_refused() {
    let (store, backend, _) = test_store();
    let mut user = User::new("alice");
    user.id = String::new();

    let result = store.create(&user).await;
    assert!(!result.succeeded());
    assert_eq!(result.errors(), [IdentityError::missing_user_id()]);
    assert!(backend.is_empty().await);
}
