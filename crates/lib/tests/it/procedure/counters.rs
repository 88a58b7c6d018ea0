use userstore::{backend::ProcedureBackend, procedure::Parameters, store::FieldKey};

use crate::helpers::*;

#[tokio::test]
async fn test_increment_n_times_yields_n() {
    let backend = test_backend();
    let row = insert_user(&backend, "alice").await;
    let id = row.id().unwrap();

    for n in 1..=5 {
        let rows = backend
            .query("incrementAccessFailedCount", &id_params(id))
            .await
            .unwrap();
        assert_eq!(rows[0].get(FieldKey::AccessFailedCount), Some(n.to_string().as_str()));
    }
    assert_eq!(stored_count(&backend, id).await, "5");
}

#[tokio::test]
async fn test_reset_always_yields_zero() {
    let backend = test_backend();
    let row = insert_user(&backend, "alice").await;
    let id = row.id().unwrap();

    assert!(backend.execute("resetAccessFailedCount", &id_params(id)).await);
    assert_eq!(stored_count(&backend, id).await, "0");

    for _ in 0..3 {
        backend
            .call("incrementAccessFailedCount", &id_params(id))
            .await
            .unwrap();
    }
    assert!(backend.execute("resetAccessFailedCount", &id_params(id)).await);
    assert_eq!(stored_count(&backend, id).await, "0");
}

#[tokio::test]
async fn test_counter_procedures_fail_for_unknown_id() {
    let backend = test_backend();
    insert_user(&backend, "alice").await;

    for name in ["incrementAccessFailedCount", "resetAccessFailedCount"] {
        let err = backend.call(name, &id_params("404")).await.unwrap_err();
        assert!(err.is_not_found(), "{name}");
    }
}

#[tokio::test]
async fn test_set_lockout_enabled_rejects_non_boolean() {
    let backend = test_backend();
    let row = insert_user(&backend, "alice").await;
    let id = row.id().unwrap();

    for bad in [Parameters::new().with("id", id), id_params(id).with("enabled", "yes")] {
        let err = backend.call("setLockoutEnabled", &bad).await.unwrap_err();
        assert!(err.is_invalid_parameters());
    }

    assert!(backend.execute("setLockoutEnabled", &id_params(id).with("enabled", "1")).await);
    let rows = backend.query("findById", &id_params(id)).await.unwrap();
    assert_eq!(rows[0].get(FieldKey::LockoutEnabled), Some("1"));
}
