//! Chunked upload coordinator.
//!
//! Drives the create → add-part → complete protocol for large-file
//! ingestion. Splitting the three calls apart keeps memory bounded for
//! arbitrarily large files and lets a failed part add be retried (or the
//! session abandoned) without re-uploading earlier parts.
//!
//! Part ordering is the caller's responsibility: `complete_upload` commits
//! exactly the id order it is given, regardless of the order the adds
//! returned in. Parts for one session may be added concurrently —
//! `add_part` takes the session by shared borrow and records parts through
//! an interior-mutable list — while `complete_upload` and `cancel_upload`
//! take an exclusive borrow, so finalization cannot overlap an in-flight
//! add. Completion must still wait until every intended add has returned.

use bytes::Bytes;
use std::sync::Arc;

use crate::error::Error;
use crate::transport::{MultipartField, Transport, TransportRequest};
use crate::types::{FilePurpose, UploadPart, UploadSession, UploadStatus};

/// Client for the chunked upload protocol.
#[derive(Clone)]
pub struct UploadClient {
    transport: Arc<dyn Transport>,
}

impl UploadClient {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Open a new upload session.
    ///
    /// Fails with [`Error::InvalidArgument`] before any network call when
    /// `total_size_bytes` is zero. The returned session has an empty part
    /// list and status `pending`.
    pub async fn create_upload(
        &self,
        filename: &str,
        purpose: FilePurpose,
        total_size_bytes: u64,
        mime_type: &str,
    ) -> Result<UploadSession, Error> {
        if total_size_bytes == 0 {
            return Err(Error::invalid_argument(
                "create_upload: total size must be greater than zero",
            ));
        }
        if filename.is_empty() {
            return Err(Error::invalid_argument(
                "create_upload: filename cannot be empty",
            ));
        }

        let body = serde_json::json!({
            "filename": filename,
            "purpose": purpose,
            "totalSizeBytes": total_size_bytes,
            "mimeType": mime_type,
        });
        let response = self
            .transport
            .send(TransportRequest::post_json("uploads", body))
            .await?
            .require_success("create_upload")?;

        let session: UploadSession = response.json()?;
        tracing::debug!(upload_id = %session.id, %filename, total_size_bytes, "upload session created");
        Ok(session)
    }

    /// Add one chunk to an open session.
    ///
    /// On success the remote-assigned part id is recorded in the session's
    /// part list. A failed add leaves the session untouched; whether to
    /// retry it or abandon the session is the caller's decision. Adds for
    /// one session may run concurrently; parts are independent chunks
    /// identified by remote-assigned ids.
    pub async fn add_part(
        &self,
        session: &UploadSession,
        content: Bytes,
        part_filename: &str,
    ) -> Result<UploadPart, Error> {
        if session.is_final() {
            return Err(Error::invalid_state(format!(
                "add_part: upload session {} is already {:?}",
                session.id, session.status
            )));
        }

        let size = content.len() as u64;
        let fields = vec![
            MultipartField::text("partFilename", part_filename),
            MultipartField::bytes("data", content, part_filename, "application/octet-stream"),
        ];
        let path = format!("uploads/{}/parts", session.id);
        let response = self
            .transport
            .send(TransportRequest::post_multipart(path, fields))
            .await?
            .require_success(&format!("add_part to upload {}", session.id))?;

        let mut part: UploadPart = response.json()?;
        if part.upload_id.is_empty() {
            part.upload_id = session.id.clone();
        }
        part.size_bytes = size;
        part.part_filename = part_filename.to_string();

        session.record_part(&part.id, size);
        tracing::debug!(upload_id = %session.id, part_id = %part.id, size, "part added");
        Ok(part)
    }

    /// Finalize a session with an explicit part order.
    ///
    /// Fails with [`Error::InvalidArgument`] when the order is empty,
    /// references an id this session never added, repeats an id, or when the
    /// committed part sizes do not sum to the declared total size. Fails with
    /// [`Error::InvalidState`] when the session is already final. On success
    /// the session's part list holds exactly the caller-supplied order.
    pub async fn complete_upload(
        &self,
        session: &mut UploadSession,
        ordered_part_ids: &[String],
    ) -> Result<UploadSession, Error> {
        if session.is_final() {
            return Err(Error::invalid_state(format!(
                "complete_upload: upload session {} is already {:?}",
                session.id, session.status
            )));
        }
        if ordered_part_ids.is_empty() {
            return Err(Error::invalid_argument(format!(
                "complete_upload: upload session {} requires at least one part",
                session.id
            )));
        }

        let mut committed_bytes: u64 = 0;
        let mut seen = std::collections::HashSet::new();
        for id in ordered_part_ids {
            let Some(size) = session.part_size(id) else {
                return Err(Error::invalid_argument(format!(
                    "complete_upload: part {id} was not added to upload session {}",
                    session.id
                )));
            };
            if !seen.insert(id) {
                return Err(Error::invalid_argument(format!(
                    "complete_upload: part {id} listed more than once"
                )));
            }
            committed_bytes += size;
        }
        if committed_bytes != session.total_size_bytes {
            return Err(Error::invalid_argument(format!(
                "complete_upload: committed parts total {committed_bytes} bytes but upload session {} declared {} bytes",
                session.id, session.total_size_bytes
            )));
        }

        let body = serde_json::json!({ "partIds": ordered_part_ids });
        let path = format!("uploads/{}/complete", session.id);
        let response = self
            .transport
            .send(TransportRequest::post_json(path, body))
            .await?
            .require_success(&format!("complete_upload of {}", session.id))?;

        let remote: UploadSession = response.json()?;
        session.status = UploadStatus::Completed;
        session.set_part_order(ordered_part_ids);
        session.file_id = remote.file_id.clone();

        let finalized = session.clone();
        tracing::debug!(
            upload_id = %session.id,
            parts = ordered_part_ids.len(),
            file_id = finalized.file_id.as_deref().unwrap_or(""),
            "upload completed"
        );
        Ok(finalized)
    }

    /// Abandon an open session. The session becomes terminal and is never
    /// resumable.
    pub async fn cancel_upload(&self, session: &mut UploadSession) -> Result<UploadSession, Error> {
        if session.is_final() {
            return Err(Error::invalid_state(format!(
                "cancel_upload: upload session {} is already {:?}",
                session.id, session.status
            )));
        }
        let path = format!("uploads/{}/cancel", session.id);
        self.transport
            .send(TransportRequest::post_json(path, serde_json::json!({})))
            .await?
            .require_success(&format!("cancel_upload of {}", session.id))?;

        session.status = UploadStatus::Cancelled;
        tracing::debug!(upload_id = %session.id, "upload cancelled");
        Ok(session.clone())
    }
}
