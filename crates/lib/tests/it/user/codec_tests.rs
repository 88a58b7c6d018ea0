use chrono::{TimeZone, Utc};
use userstore::{
    backend::ProcedureBackend,
    store::{FieldKey, FieldKind},
    user::{User, codec},
};

use crate::helpers::*;

fn fully_populated() -> User {
    User {
        id: "u-1".to_string(),
        user_name: Some("Alice".to_string()),
        normalized_user_name: Some("whatever the caller set".to_string()),
        email: Some("alice@example.com".to_string()),
        normalized_email: None,
        email_confirmed: true,
        password_hash: Some("hash".to_string()),
        phone_number: Some("+1 555 0100".to_string()),
        phone_number_confirmed: true,
        security_stamp: Some("sec".to_string()),
        concurrency_stamp: Some("con".to_string()),
        access_failed_count: 4,
        lockout_enabled: true,
        lockout_end: Some(Utc.with_ymd_and_hms(2031, 6, 1, 12, 0, 0).unwrap()),
        two_factor_enabled: true,
    }
}

/// Writes a user through `insertUser` and reads it back.
async fn round_trip(user: &User) -> User {
    let backend = test_backend();
    backend
        .call("insertUser", &codec::encode(user))
        .await
        .unwrap();
    let rows = backend.call("findById", &id_params(&user.id)).await.unwrap();
    assert_eq!(rows.len(), 1);
    codec::decode(&rows[0]).unwrap()
}

#[tokio::test]
async fn test_round_trip_recomputes_only_normalized_fields() {
    let user = fully_populated();
    let decoded = round_trip(&user).await;

    assert_eq!(decoded.normalized_user_name.as_deref(), Some("ALICE"));
    assert_eq!(decoded.normalized_email.as_deref(), Some("ALICE@EXAMPLE.COM"));
    assert_eq!(
        User {
            normalized_user_name: user.normalized_user_name.clone(),
            normalized_email: user.normalized_email.clone(),
            ..decoded
        },
        user
    );
}

#[tokio::test]
async fn test_round_trip_of_sparse_user() {
    let user = User {
        id: "u-2".to_string(),
        security_stamp: Some("sec".to_string()),
        concurrency_stamp: Some("con".to_string()),
        ..User::default()
    };
    assert_eq!(round_trip(&user).await, user);
}

#[tokio::test]
async fn test_stamps_present_after_write() {
    let user = User {
        id: "u-3".to_string(),
        ..User::default()
    };
    let decoded = round_trip(&user).await;
    assert!(decoded.security_stamp.is_some_and(|s| !s.is_empty()));
    assert!(decoded.concurrency_stamp.is_some_and(|s| !s.is_empty()));
}

#[tokio::test]
async fn test_booleans_materialize_as_digits() {
    let backend = test_backend();
    backend
        .call("insertUser", &codec::encode(&fully_populated()))
        .await
        .unwrap();
    let rows = backend.rows().await;

    for key in FieldKey::ALL {
        if key.kind() == FieldKind::Flag {
            assert!(matches!(rows[0].get(key), Some("0" | "1")), "{key}");
        }
    }
}
