use std::sync::Arc;

use userstore::backend::ProcedureBackend;

use crate::helpers::*;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_increments_are_not_lost() {
    let backend = test_backend();
    let row = insert_user(&backend, "alice").await;
    let id = row.id().unwrap().to_string();

    let tasks: Vec<_> = (0..50)
        .map(|_| {
            let backend = Arc::clone(&backend);
            let id = id.clone();
            tokio::spawn(async move {
                backend
                    .execute("incrementAccessFailedCount", &id_params(&id))
                    .await
            })
        })
        .collect();
    for task in tasks {
        assert!(task.await.unwrap());
    }

    assert_eq!(stored_count(&backend, &id).await, "50");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_inserts_get_distinct_ids() {
    let backend = test_backend();

    let tasks: Vec<_> = (0..20)
        .map(|i| {
            let backend = Arc::clone(&backend);
            tokio::spawn(async move {
                let params = insert_params(&format!("user{i}"), "h");
                backend.call("insertUser", &params).await.unwrap()[0]
                    .id()
                    .unwrap()
                    .to_string()
            })
        })
        .collect();

    let mut ids = Vec::new();
    for task in tasks {
        ids.push(task.await.unwrap());
    }
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 20);
}
