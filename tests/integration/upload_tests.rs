//! Upload sequencing integration tests.
//!
//! Tests verify:
//! - The file read completes before the token is acquired and the POST is sent
//! - The upload future does not resolve until the POST response arrives
//! - The file is read exactly once and its bytes survive the round trip
//! - Concurrent uploads stay independent

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use base64::prelude::{Engine as _, BASE64_STANDARD};
use serde_json::json;
use tokio::sync::Notify;

use hma_client::LocalFile;

use super::test_utils::{mock_client, CountingSession, EventLog, RecordingBackend, SlowFile};

#[tokio::test]
async fn test_upload_image_reads_before_dispatch() {
    let log = EventLog::new();
    let session = CountingSession::new("tok").with_log(log.clone());
    let backend = RecordingBackend::new().with_log(log.clone());
    let client = mock_client(session, backend.clone());

    let file = SlowFile::new("slow.png", vec![9u8; 64], log.clone());
    client.upload_image(&file).await.unwrap();

    assert_eq!(log.events(), vec!["read", "token", "dispatch", "response"]);
    assert_eq!(file.reads.load(Ordering::SeqCst), 1);

    let body = backend.only_request().await.json_body();
    assert_eq!(
        body["fileContentsBase64Encoded"],
        BASE64_STANDARD.encode(vec![9u8; 64])
    );
}

#[tokio::test]
async fn test_submit_content_upload_reads_before_dispatch() {
    let log = EventLog::new();
    let session = CountingSession::new("tok").with_log(log.clone());
    let backend = RecordingBackend::new().with_log(log.clone());
    let client = mock_client(session, backend.clone());

    let file = SlowFile::new("slow.bin", b"payload".to_vec(), log.clone());
    client
        .submit_content_upload("upload", "c1", "photo", &file, json!({}))
        .await
        .unwrap();

    assert_eq!(log.events(), vec!["read", "token", "dispatch", "response"]);
    assert_eq!(file.reads.load(Ordering::SeqCst), 1);
    assert_eq!(
        backend.only_request().await.json_body()["content_ref"],
        "cGF5bG9hZA=="
    );
}

#[tokio::test]
async fn test_upload_resolves_only_after_post_response() {
    let gate = Arc::new(Notify::new());
    let backend = RecordingBackend::new().gated(gate.clone());
    let client = Arc::new(mock_client(CountingSession::new("tok"), backend.clone()));

    let task = {
        let client = Arc::clone(&client);
        tokio::spawn(async move {
            let file = SlowFile::new("held.jpg", vec![1u8, 2, 3], EventLog::new());
            client.upload_image(&file).await
        })
    };

    // Wait until the POST has reached the backend
    for _ in 0..100 {
        if backend.request_count().await == 1 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    assert_eq!(backend.request_count().await, 1);

    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(!task.is_finished(), "upload resolved before the POST response");

    gate.notify_one();
    let result = task.await.unwrap();
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_local_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("photo.jpg");
    let data: Vec<u8> = (0..=255u8).rev().cycle().take(10_000).collect();
    std::fs::write(&path, &data).unwrap();

    let backend = RecordingBackend::new();
    let client = mock_client(CountingSession::new("tok"), backend.clone());
    client.upload_image(&LocalFile::new(&path)).await.unwrap();

    let body = backend.only_request().await.json_body();
    assert_eq!(body["fileName"], "photo.jpg");

    let encoded = body["fileContentsBase64Encoded"].as_str().unwrap();
    assert_eq!(BASE64_STANDARD.decode(encoded).unwrap(), data);
}

#[tokio::test]
async fn test_concurrent_uploads_are_independent() {
    let session = CountingSession::new("tok");
    let backend = RecordingBackend::new();
    let client = mock_client(session.clone(), backend.clone());

    let first = SlowFile::new("one.jpg", b"one".to_vec(), EventLog::new());
    let second = SlowFile::new("two.jpg", b"two".to_vec(), EventLog::new());

    let (a, b) = tokio::join!(client.upload_image(&first), client.upload_image(&second));
    a.unwrap();
    b.unwrap();

    assert_eq!(session.calls(), 2);

    let mut names: Vec<String> = backend
        .requests()
        .await
        .iter()
        .map(|r| r.json_body()["fileName"].as_str().unwrap().to_string())
        .collect();
    names.sort();
    assert_eq!(names, vec!["one.jpg", "two.jpg"]);

    let mut tokens: Vec<String> = backend
        .requests()
        .await
        .iter()
        .map(|r| r.authorization().unwrap().to_string())
        .collect();
    tokens.sort();
    assert_eq!(tokens, vec!["tok-1", "tok-2"]);
}
