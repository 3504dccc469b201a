//! Store tests against a real file-backed SQLite database (the in-memory
//! variant used by the unit-level tests inside `src/db/store.rs` can't
//! exercise cross-connection durability).

use netcrawl::config::DatabaseConfig;
use netcrawl::db::{run_migrations, DbPool, Store};
use netcrawl::models::DeviceProjection;
use tempfile::tempdir;

async fn file_backed_store(dir: &tempfile::TempDir) -> Store {
    let path = dir.path().join("netcrawl.db");
    let db = DbPool::new(&DatabaseConfig {
        path: path.to_string_lossy().to_string(),
    })
    .await
    .unwrap();
    run_migrations(db.get_pool()).await.unwrap();
    Store::new(db.get_pool().clone())
}

#[tokio::test]
async fn admitted_work_survives_a_second_connection() {
    let dir = tempdir().unwrap();
    {
        let store = file_backed_store(&dir).await;
        assert!(store.admit_if_absent("sw1", "10.0.0.1").await.unwrap());
    }

    let reopened = file_backed_store(&dir).await;
    let pending = reopened.unprocessed_entries().await.unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].hostname, "sw1");
}

#[tokio::test]
async fn concurrent_admission_of_the_same_neighbor_admits_exactly_once() {
    let dir = tempdir().unwrap();
    let store = file_backed_store(&dir).await;

    let mut handles = Vec::new();
    for _ in 0..8 {
        let store = store.clone();
        handles.push(tokio::spawn(async move {
            store.admit_if_absent("sw-shared", "10.0.0.9").await.unwrap()
        }));
    }

    let mut admitted_count = 0;
    for handle in handles {
        if handle.await.unwrap() {
            admitted_count += 1;
        }
    }
    assert_eq!(admitted_count, 1, "exactly one concurrent admitter should win");

    let pending = store.unprocessed_entries().await.unwrap();
    assert_eq!(pending.len(), 1);
}

#[tokio::test]
async fn already_claimed_reflects_processing_and_processed_state() {
    let dir = tempdir().unwrap();
    let store = file_backed_store(&dir).await;

    store.admit_if_absent("sw1", "10.0.0.1").await.unwrap();
    assert!(!store.already_claimed("sw1").await.unwrap());

    store.mark_processing("sw1").await.unwrap();
    assert!(store.already_claimed("sw1").await.unwrap());

    store.mark_processed("sw1").await.unwrap();
    assert!(store.already_claimed("sw1").await.unwrap());

    assert!(!store.already_claimed("never-queued").await.unwrap());
}

#[tokio::test]
async fn list_devices_is_ordered_by_hostname() {
    let dir = tempdir().unwrap();
    let store = file_backed_store(&dir).await;

    for (hostname, ip) in [("zzz-last", "10.0.0.3"), ("aaa-first", "10.0.0.1"), ("mmm-mid", "10.0.0.2")] {
        store
            .save_device(&DeviceProjection {
                hostname: hostname.into(),
                ip_address: ip.into(),
                platform: None,
                serial_number: None,
                device_type: "unknown".into(),
            })
            .await
            .unwrap();
    }

    let devices = store.list_devices().await.unwrap();
    let hostnames: Vec<&str> = devices.iter().map(|d| d.hostname.as_str()).collect();
    assert_eq!(hostnames, vec!["aaa-first", "mmm-mid", "zzz-last"]);
}
