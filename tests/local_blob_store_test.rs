use bytes::Bytes;

use scriptcast::application::ports::{BlobStore, BlobStoreError};
use scriptcast::domain::{ScriptId, StoragePath};
use scriptcast::infrastructure::storage::LocalBlobStore;

fn create_test_store() -> (tempfile::TempDir, LocalBlobStore) {
    let dir = tempfile::TempDir::new().unwrap();
    let store = LocalBlobStore::new(dir.path().to_path_buf(), "http://localhost:8080/media/").unwrap();
    (dir, store)
}

#[tokio::test]
async fn given_upload_when_storing_then_size_is_returned_and_bytes_round_trip() {
    let (_dir, store) = create_test_store();
    let path = StoragePath::upload(&ScriptId::new(), "pilot.txt");

    let size = store.put(&path, Bytes::from_static(b"ALICE\nHi.")).await.unwrap();
    let fetched = store.fetch(&path).await.unwrap();

    assert_eq!(size, 9);
    assert_eq!(fetched, b"ALICE\nHi.");
}

#[tokio::test]
async fn given_stored_object_when_stored_again_then_content_is_replaced() {
    let (_dir, store) = create_test_store();
    let path = StoragePath::upload(&ScriptId::new(), "pilot.txt");

    store.put(&path, Bytes::from_static(b"draft")).await.unwrap();
    store.put(&path, Bytes::from_static(b"final")).await.unwrap();

    assert_eq!(store.fetch(&path).await.unwrap(), b"final");
}

#[tokio::test]
async fn given_missing_object_when_fetching_then_not_found() {
    let (_dir, store) = create_test_store();
    let path = StoragePath::upload(&ScriptId::new(), "missing.pdf");

    let result = store.fetch(&path).await;

    assert!(matches!(result, Err(BlobStoreError::NotFound(_))));
}

#[tokio::test]
async fn given_stored_object_when_deleting_then_fetch_fails() {
    let (_dir, store) = create_test_store();
    let path = StoragePath::audio(&ScriptId::new(), "ALICE", "f1", "audition");
    store.put(&path, Bytes::from_static(b"mp3")).await.unwrap();

    store.delete(&path).await.unwrap();

    assert!(store.fetch(&path).await.is_err());
}

#[test]
fn given_public_url_with_trailing_slash_when_building_url_then_single_separator() {
    let (_dir, store) = create_test_store();
    let id = ScriptId::new();
    let path = StoragePath::audio(&id, "Dr. Smith", "m1", "audition");

    assert_eq!(
        store.url_for(&path),
        format!("http://localhost:8080/media/{}/audio/dr._smith/m1/audition.mp3", id)
    );
}

#[test]
fn given_unsafe_filename_when_building_upload_path_then_segments_are_sanitized() {
    let id = ScriptId::new();

    let path = StoragePath::upload(&id, "../../etc/passwd");

    assert_eq!(path.as_str(), format!("{}/upload/.._.._etc_passwd", id));
}
