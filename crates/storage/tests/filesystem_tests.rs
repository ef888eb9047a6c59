// Behavior of the filesystem backend through the FileStore trait object,
// the way the server holds it.

use bytes::Bytes;
use guestbook_core::config::StorageConfig;
use guestbook_storage::{FileStore, StorageError};
use std::collections::HashSet;
use std::sync::Arc;
use tempfile::TempDir;

async fn store_in(dir: &TempDir) -> Arc<dyn FileStore> {
    let config = StorageConfig::Filesystem {
        path: dir.path().join("uploads"),
    };
    guestbook_storage::from_config(&config).await.unwrap()
}

#[tokio::test]
async fn test_concurrent_stores_get_distinct_names() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir).await;

    let mut handles = Vec::new();
    for i in 0..32u8 {
        let store = store.clone();
        handles.push(tokio::spawn(async move {
            store
                .store(Bytes::from(vec![i; 64]), &format!("photo-{i}.jpg"))
                .await
                .unwrap()
        }));
    }

    let mut names = HashSet::new();
    for handle in handles {
        let name = handle.await.unwrap();
        assert!(name.ends_with(".jpg"));
        names.insert(name);
    }
    assert_eq!(names.len(), 32);

    for name in &names {
        assert_eq!(store.get(name).await.unwrap().len(), 64);
    }
}

#[tokio::test]
async fn test_put_replaces_existing_content() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir).await;

    store.put("same.png", Bytes::from("first")).await.unwrap();
    store.put("same.png", Bytes::from("second")).await.unwrap();

    assert_eq!(store.get("same.png").await.unwrap(), Bytes::from("second"));
}

#[tokio::test]
async fn test_delete_twice_reports_not_found_second_time() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir).await;

    let name = store.store(Bytes::from("img"), "a.gif").await.unwrap();
    store.delete(&name).await.unwrap();

    match store.delete(&name).await {
        Err(StorageError::NotFound(key)) => assert_eq!(key, name),
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[tokio::test]
#[cfg(unix)]
async fn test_delete_in_read_only_dir_is_io_error() {
    use std::os::unix::fs::PermissionsExt;

    let dir = TempDir::new().unwrap();
    let store = store_in(&dir).await;
    let name = store.store(Bytes::from("img"), "a.png").await.unwrap();

    let uploads = dir.path().join("uploads");
    std::fs::set_permissions(&uploads, std::fs::Permissions::from_mode(0o555)).unwrap();

    let result = store.delete(&name).await;

    std::fs::set_permissions(&uploads, std::fs::Permissions::from_mode(0o755)).unwrap();

    // Running as root ignores directory permissions; only assert when the
    // delete was actually refused.
    if let Err(err) = result {
        assert!(matches!(err, StorageError::Io(_)), "unexpected: {err:?}");
        assert!(store.exists(&name).await.unwrap());
    }
}
