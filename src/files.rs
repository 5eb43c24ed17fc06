//! Single-shot file management.
//!
//! Covers the plain Files API: upload with a purpose, metadata retrieval,
//! listing, deletion, and content download. Large inputs should prefer the
//! chunked protocol in [`crate::uploads`].

use std::sync::Arc;

use crate::error::Error;
use crate::transport::{MultipartField, Transport, TransportRequest};
use crate::types::{FileDeleteResponse, FileList, FileListQuery, FileObject, FileUploadRequest};
use crate::utils::mime::guess_mime;

/// Maximum accepted size for a single-shot upload.
const MAX_FILE_SIZE: u64 = 512 * 1024 * 1024;

/// Client for stored files.
#[derive(Clone)]
pub struct FileClient {
    transport: Arc<dyn Transport>,
}

impl FileClient {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Upload a file in one request.
    pub async fn upload(&self, request: FileUploadRequest) -> Result<FileObject, Error> {
        if request.filename.is_empty() {
            return Err(Error::invalid_argument("upload: filename cannot be empty"));
        }
        if request.content.len() as u64 > MAX_FILE_SIZE {
            return Err(Error::invalid_argument(format!(
                "upload: file size {} bytes exceeds the maximum of {MAX_FILE_SIZE} bytes",
                request.content.len()
            )));
        }

        let mime_type = request
            .mime_type
            .clone()
            .unwrap_or_else(|| guess_mime(Some(&request.content), Some(&request.filename)));
        let fields = vec![
            MultipartField::text("purpose", request.purpose.to_string()),
            MultipartField::bytes("file", request.content, request.filename.clone(), mime_type),
        ];
        let response = self
            .transport
            .send(TransportRequest::post_multipart("files", fields))
            .await?
            .require_success("upload file")?;

        let file: FileObject = response.json()?;
        tracing::debug!(file_id = %file.id, filename = %file.filename, "file uploaded");
        Ok(file)
    }

    /// Retrieve metadata for one file. Fails with [`Error::NotFound`] when
    /// the id is unknown.
    pub async fn retrieve(&self, file_id: &str) -> Result<FileObject, Error> {
        let response = self
            .transport
            .send(TransportRequest::get(format!("files/{file_id}")))
            .await?
            .require_success(&format!("retrieve file {file_id}"))?;
        response.json()
    }

    /// List files with optional filtering.
    pub async fn list(&self, query: Option<FileListQuery>) -> Result<FileList, Error> {
        let mut endpoint = "files".to_string();
        if let Some(q) = query {
            let mut params = Vec::new();
            if let Some(purpose) = &q.purpose {
                params.push(format!("purpose={}", urlencoding::encode(&purpose.to_string())));
            }
            if let Some(limit) = q.limit {
                params.push(format!("limit={limit}"));
            }
            if let Some(after) = &q.after {
                params.push(format!("after={}", urlencoding::encode(after)));
            }
            if let Some(order) = &q.order {
                params.push(format!("order={}", urlencoding::encode(order)));
            }
            if !params.is_empty() {
                endpoint.push('?');
                endpoint.push_str(&params.join("&"));
            }
        }
        let response = self
            .transport
            .send(TransportRequest::get(endpoint))
            .await?
            .require_success("list files")?;
        response.json()
    }

    /// Delete a file permanently.
    pub async fn delete(&self, file_id: &str) -> Result<FileDeleteResponse, Error> {
        self.transport
            .send(TransportRequest::delete(format!("files/{file_id}")))
            .await?
            .require_success(&format!("delete file {file_id}"))?;
        // Some backends return an empty body here; acknowledge success.
        Ok(FileDeleteResponse {
            id: file_id.to_string(),
            deleted: true,
        })
    }

    /// Download a file's content as bytes.
    pub async fn content(&self, file_id: &str) -> Result<Vec<u8>, Error> {
        let response = self
            .transport
            .send(TransportRequest::get(format!("files/{file_id}/content")))
            .await?
            .require_success(&format!("content of file {file_id}"))?;
        Ok(response.body)
    }
}
