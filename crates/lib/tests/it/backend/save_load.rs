use std::fs;

use tempfile::TempDir;
use userstore::{
    backend::{InMemory, ProcedureBackend},
    store::FieldKey,
};

use crate::helpers::*;

#[tokio::test]
async fn test_in_memory_backend_save_and_load() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("userstore.json");

    {
        let backend = test_backend();
        insert_user(&backend, "alice").await;
        insert_user(&backend, "bob").await;
        backend
            .call("incrementAccessFailedCount", &id_params("1"))
            .await
            .unwrap();
        backend.save_to_file(&path).await.unwrap();
    }
    assert!(path.exists());

    let loaded = InMemory::load_from_file(&path).await.unwrap();
    assert_eq!(loaded.len().await, 2);
    assert_eq!(stored_count(&loaded, "1").await, "1");

    // The id counter survives the round trip
    let row = insert_user(&loaded, "carol").await;
    assert_eq!(row.id(), Some("3"));
}

#[tokio::test]
async fn test_load_non_existent_file() {
    let dir = TempDir::new().unwrap();
    let backend = InMemory::load_from_file(dir.path().join("missing.json"))
        .await
        .unwrap();
    assert!(backend.is_empty().await);
    assert_eq!(backend.registry().len(), 12);
}

#[tokio::test]
async fn test_load_invalid_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.json");
    fs::write(&path, "{ not json").unwrap();

    let err = InMemory::load_from_file(&path).await.unwrap_err();
    assert_eq!(err.module(), "backend");
    assert!(!err.is_io_error());
}

#[tokio::test]
async fn test_load_rejects_unknown_version() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("future.json");
    fs::write(&path, r#"{"_v":7,"table":{"rows":[],"next_id":1}}"#).unwrap();

    let err = InMemory::load_from_file(&path).await.unwrap_err();
    assert_eq!(err.module(), "backend");
    assert!(err.to_string().contains("version 7"));
}

#[tokio::test]
async fn test_snapshot_is_flat_records() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("userstore.json");

    let backend = test_backend();
    insert_user(&backend, "alice").await;
    backend.save_to_file(&path).await.unwrap();

    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(json["_v"], 0);
    let row = &json["table"]["rows"][0];
    for key in FieldKey::ALL {
        assert!(row[key.as_str()].is_string(), "{key} missing from snapshot");
    }
}
