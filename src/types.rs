//! Data types shared by the upload, batch, and file clients.
//!
//! Wire field names are part of the compatibility contract and are pinned
//! with explicit serde renames: `totalSizeBytes`, `mimeType`, `partIds`,
//! `operationPath`, `inputFileId`, `completionWindow`, `outputFileId`.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Purpose of an uploaded file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FilePurpose {
    Assistants,
    Batch,
    FineTune,
    Vision,
}

impl std::fmt::Display for FilePurpose {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Assistants => "assistants",
            Self::Batch => "batch",
            Self::FineTune => "fine-tune",
            Self::Vision => "vision",
        };
        f.write_str(s)
    }
}

/// Lifecycle stage of an [`UploadSession`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadStatus {
    /// Parts may still be added.
    #[default]
    Pending,
    /// Finalized; the part list is immutable.
    Completed,
    /// Abandoned; the session is never resumable.
    Cancelled,
}

impl UploadStatus {
    /// Whether the session can no longer accept parts or be completed.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }
}

/// A chunked upload in progress (or finalized).
///
/// The session exclusively owns its part list. Ids are recorded by
/// [`crate::uploads::UploadClient::add_part`] in the order the adds return;
/// after completion the list holds the caller-supplied final order. Cloning
/// a session yields a handle to the same part list, so every handle observes
/// every recorded part.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadSession {
    /// Remote-assigned session id, set once on creation.
    pub id: String,
    pub filename: String,
    pub purpose: FilePurpose,
    /// Declared total byte size of the finished file.
    pub total_size_bytes: u64,
    pub mime_type: String,
    #[serde(default)]
    pub status: UploadStatus,
    /// Uploaded file id, present once the session is completed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_id: Option<String>,
    /// Parts recorded against this session, with client-side byte
    /// accounting for the completion-time size check. Interior-mutable so
    /// parts can be recorded through a shared borrow; reordering at
    /// completion goes through an exclusive borrow of the session. Not part
    /// of the wire format.
    #[serde(skip)]
    parts: Arc<Mutex<Vec<PartRecord>>>,
}

#[derive(Debug, Clone)]
struct PartRecord {
    id: String,
    size_bytes: u64,
}

impl UploadSession {
    /// Whether the session has reached a terminal status.
    pub fn is_final(&self) -> bool {
        self.status.is_terminal()
    }

    /// Ids of parts recorded so far, in record order. After completion this
    /// is the caller-supplied final order.
    pub fn part_ids(&self) -> Vec<String> {
        self.parts_guard().iter().map(|p| p.id.clone()).collect()
    }

    pub(crate) fn record_part(&self, id: &str, size_bytes: u64) {
        self.parts_guard().push(PartRecord {
            id: id.to_string(),
            size_bytes,
        });
    }

    pub(crate) fn part_size(&self, id: &str) -> Option<u64> {
        self.parts_guard()
            .iter()
            .find(|p| p.id == id)
            .map(|p| p.size_bytes)
    }

    /// Rewrite the part list to the given id order. Ids not recorded
    /// against this session are ignored.
    pub(crate) fn set_part_order(&mut self, ordered: &[String]) {
        let mut guard = self
            .parts
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let mut reordered = Vec::with_capacity(ordered.len());
        for id in ordered {
            if let Some(record) = guard.iter().find(|p| &p.id == id) {
                reordered.push(record.clone());
            }
        }
        *guard = reordered;
    }

    fn parts_guard(&self) -> MutexGuard<'_, Vec<PartRecord>> {
        self.parts.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// One chunk of an upload. Immutable once created; the id is assigned by the
/// remote side on a successful add.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadPart {
    pub id: String,
    /// Parent session id.
    #[serde(default)]
    pub upload_id: String,
    /// Byte length of this chunk.
    #[serde(default)]
    pub size_bytes: u64,
    /// Source filename label supplied by the caller.
    #[serde(default)]
    pub part_filename: String,
}

/// Status of a [`BatchJob`].
///
/// Transitions are monotonic: `pending → running → {completed, failed}`, and
/// `pending|running → cancelled`. No terminal status re-enters a non-terminal
/// one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BatchStatus {
    Pending,
    Running,
    Completed,
    Failed,
    Cancelled,
}

impl BatchStatus {
    /// Whether no further transition is possible from this status.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Cancelled)
    }
}

impl std::fmt::Display for BatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

/// An asynchronous, server-executed processing request over a previously
/// uploaded input file. Holds the input file by id only; it does not own the
/// file's lifecycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchJob {
    pub id: String,
    /// Target operation, e.g. `/chat/completions`.
    pub operation_path: String,
    pub input_file_id: String,
    /// Time-to-live duration string, e.g. `"24h"`.
    pub completion_window: String,
    pub status: BatchStatus,
    /// Present only when the job completed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_file_id: Option<String>,
}

/// One page of batch jobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchList {
    pub data: Vec<BatchJob>,
    #[serde(default)]
    pub has_more: bool,
}

/// Query parameters for listing batch jobs.
#[derive(Debug, Clone, Default)]
pub struct BatchListQuery {
    pub limit: Option<u32>,
    /// Cursor: list jobs after this id.
    pub after: Option<String>,
}

/// Metadata for a file stored on the remote side.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileObject {
    pub id: String,
    pub filename: String,
    pub size_bytes: u64,
    #[serde(default)]
    pub created_at: u64,
    pub purpose: FilePurpose,
    #[serde(default)]
    pub status: Option<String>,
}

/// Response to a file deletion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileDeleteResponse {
    pub id: String,
    pub deleted: bool,
}

/// One page of file metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileList {
    pub data: Vec<FileObject>,
    #[serde(default)]
    pub has_more: bool,
}

/// Query parameters for listing files.
#[derive(Debug, Clone, Default)]
pub struct FileListQuery {
    pub purpose: Option<FilePurpose>,
    pub limit: Option<u32>,
    pub after: Option<String>,
    pub order: Option<String>,
}

/// A single-shot file upload request.
#[derive(Debug, Clone)]
pub struct FileUploadRequest {
    pub content: Bytes,
    pub filename: String,
    pub purpose: FilePurpose,
    /// MIME type override; sniffed from content/extension when absent.
    pub mime_type: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_status_terminality() {
        assert!(!BatchStatus::Pending.is_terminal());
        assert!(!BatchStatus::Running.is_terminal());
        assert!(BatchStatus::Completed.is_terminal());
        assert!(BatchStatus::Failed.is_terminal());
        assert!(BatchStatus::Cancelled.is_terminal());
    }

    #[test]
    fn upload_session_wire_field_names() {
        let json = serde_json::json!({
            "id": "upload_1",
            "filename": "batch_tasks.jsonl",
            "purpose": "assistants",
            "totalSizeBytes": 1024,
            "mimeType": "text/plain",
            "status": "pending"
        });
        let session: UploadSession = serde_json::from_value(json).unwrap();
        assert_eq!(session.id, "upload_1");
        assert_eq!(session.total_size_bytes, 1024);
        assert_eq!(session.mime_type, "text/plain");
        assert_eq!(session.status, UploadStatus::Pending);
        assert!(session.part_ids().is_empty());

        let back = serde_json::to_value(&session).unwrap();
        assert!(back.get("totalSizeBytes").is_some());
        assert!(back.get("mimeType").is_some());
    }

    #[test]
    fn part_records_rewrite_to_explicit_order() {
        let json = serde_json::json!({
            "id": "upload_1",
            "filename": "f.bin",
            "purpose": "batch",
            "totalSizeBytes": 8,
            "mimeType": "application/octet-stream"
        });
        let mut session: UploadSession = serde_json::from_value(json).unwrap();
        session.record_part("p1", 5);
        session.record_part("p2", 3);
        assert_eq!(session.part_size("p1"), Some(5));

        session.set_part_order(&["p2".to_string(), "p1".to_string()]);
        assert_eq!(session.part_ids(), vec!["p2".to_string(), "p1".to_string()]);
    }

    #[test]
    fn batch_job_wire_field_names() {
        let json = serde_json::json!({
            "id": "batch_1",
            "operationPath": "/chat/completions",
            "inputFileId": "file-abc",
            "completionWindow": "24h",
            "status": "completed",
            "outputFileId": "file-out"
        });
        let job: BatchJob = serde_json::from_value(json).unwrap();
        assert_eq!(job.input_file_id, "file-abc");
        assert_eq!(job.status, BatchStatus::Completed);
        assert_eq!(job.output_file_id.as_deref(), Some("file-out"));
    }

    #[test]
    fn file_purpose_round_trips_kebab_case() {
        let v = serde_json::to_value(FilePurpose::FineTune).unwrap();
        assert_eq!(v, serde_json::json!("fine-tune"));
        assert_eq!(FilePurpose::Batch.to_string(), "batch");
    }
}
