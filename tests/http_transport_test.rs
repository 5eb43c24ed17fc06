//! End-to-end tests for the reqwest-backed transport against a local mock
//! server: credential injection, URL construction, multipart upload, and
//! status classification.

use batchline::prelude::*;
use bytes::Bytes;
use std::sync::Arc;

fn transport_for(server: &mockito::ServerGuard) -> Arc<dyn Transport> {
    let config = ClientConfig::builder()
        .base_url(server.url())
        .api_key("sk-test")
        .organization("org-1")
        .build()
        .expect("config");
    Arc::new(HttpTransport::new(config).expect("transport"))
}

#[tokio::test]
async fn poll_sends_bearer_and_org_headers() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/batches/batch_1")
        .match_header("authorization", "Bearer sk-test")
        .match_header("openai-organization", "org-1")
        .with_status(200)
        .with_body(
            serde_json::json!({
                "id": "batch_1",
                "operationPath": "/chat/completions",
                "inputFileId": "file-abc",
                "completionWindow": "24h",
                "status": "running"
            })
            .to_string(),
        )
        .create_async()
        .await;

    let batches = BatchClient::new(transport_for(&server));
    let job = batches.poll("batch_1").await.expect("poll");
    assert_eq!(job.status, BatchStatus::Running);
    mock.assert_async().await;
}

#[tokio::test]
async fn unknown_batch_is_not_found() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/batches/batch_missing")
        .with_status(404)
        .with_body(r#"{"error": {"message": "No such batch"}}"#)
        .create_async()
        .await;

    let batches = BatchClient::new(transport_for(&server));
    let err = batches.poll("batch_missing").await.unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
    assert_eq!(err.status_code(), Some(404));
}

#[tokio::test]
async fn file_upload_is_sent_as_multipart() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/files")
        .match_header(
            "content-type",
            mockito::Matcher::Regex("multipart/form-data.*".to_string()),
        )
        .with_status(200)
        .with_body(
            serde_json::json!({
                "id": "file_1",
                "filename": "tasks.jsonl",
                "sizeBytes": 11,
                "createdAt": 1710000000u64,
                "purpose": "batch",
                "status": "uploaded"
            })
            .to_string(),
        )
        .create_async()
        .await;

    let files = FileClient::new(transport_for(&server));
    let file = files
        .upload(FileUploadRequest {
            content: Bytes::from_static(b"{\"a\": 1}\n"),
            filename: "tasks.jsonl".to_string(),
            purpose: FilePurpose::Batch,
            mime_type: None,
        })
        .await
        .expect("upload");
    assert_eq!(file.id, "file_1");
    assert_eq!(file.purpose, FilePurpose::Batch);
    mock.assert_async().await;
}

#[tokio::test]
async fn server_error_body_message_is_surfaced() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/batches")
        .with_status(500)
        .with_body(r#"{"error": {"message": "internal scheduler failure"}}"#)
        .create_async()
        .await;

    let batches = BatchClient::new(transport_for(&server));
    let err = batches
        .submit("/chat/completions", "file-abc", "24h")
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), Some(500));
    assert!(err.to_string().contains("internal scheduler failure"));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn connection_failure_is_a_transport_error() {
    // Port 9 (discard) is not listening.
    let config = ClientConfig::builder()
        .base_url("http://127.0.0.1:9")
        .api_key("sk-test")
        .build()
        .expect("config");
    let transport: Arc<dyn Transport> = Arc::new(HttpTransport::new(config).expect("transport"));

    let batches = BatchClient::new(transport);
    let err = batches.poll("batch_1").await.unwrap_err();
    assert!(matches!(err, Error::Transport { .. }));
}
