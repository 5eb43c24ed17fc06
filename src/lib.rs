//! # Batchline - Chunked Upload and Batch Job Client
//!
//! Batchline is a client library for the upload and batch surfaces of hosted
//! LLM APIs. It drives the two multi-step protocols those APIs expose — the
//! chunked file-upload sequence (create → add parts → complete) and the batch
//! job lifecycle (submit → poll → cancel → fetch output) — over an
//! injectable transport.
//!
#![deny(unsafe_code)]
//! ## Design
//!
//! - **Transport separation**: all networking goes through the [`transport::Transport`]
//!   trait. The bundled [`transport::HttpTransport`] handles credentials,
//!   proxying, and timeouts from explicit configuration; tests and embedders
//!   can substitute their own implementation.
//! - **Explicit failure semantics**: the library performs zero automatic
//!   retries and leaves no partial state ambiguous. Every error names the
//!   operation and the session or job involved, so callers can layer their
//!   own retry and backoff policy on top.
//! - **Caller-owned ordering**: part order for a chunked upload is committed
//!   exactly as the caller supplies it at completion time, independent of the
//!   order parts were added in.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use batchline::prelude::*;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ClientConfig::builder()
//!         .api_key("your-api-key")
//!         .build()?;
//!     let transport: Arc<dyn Transport> = Arc::new(HttpTransport::new(config)?);
//!
//!     let uploads = UploadClient::new(transport.clone());
//!     let mut session = uploads
//!         .create_upload("batch_tasks.jsonl", FilePurpose::Batch, 1024, "text/plain")
//!         .await?;
//!     let part = uploads
//!         .add_part(&session, bytes::Bytes::from_static(b"..."), "part1.jsonl")
//!         .await?;
//!     let finalized = uploads
//!         .complete_upload(&mut session, &[part.id])
//!         .await?;
//!
//!     let batches = BatchClient::new(transport);
//!     let job = batches
//!         .submit("/chat/completions", finalized.file_id.as_deref().unwrap_or(""), "24h")
//!         .await?;
//!     println!("submitted batch {} in status {}", job.id, job.status);
//!     Ok(())
//! }
//! ```

pub mod batches;
pub mod config;
pub mod error;
pub mod files;
pub mod transport;
pub mod types;
pub mod uploads;

pub(crate) mod utils;

pub use batches::BatchClient;
pub use config::{ClientConfig, HttpConfig};
pub use error::Error;
pub use files::FileClient;
pub use transport::{HttpTransport, Transport};
pub use uploads::UploadClient;

/// Commonly used imports.
pub mod prelude {
    pub use crate::batches::BatchClient;
    pub use crate::config::{ClientConfig, HttpConfig};
    pub use crate::error::Error;
    pub use crate::files::FileClient;
    pub use crate::transport::{
        HttpTransport, MultipartField, RequestBody, Transport, TransportRequest, TransportResponse,
    };
    pub use crate::types::{
        BatchJob, BatchList, BatchListQuery, BatchStatus, FileDeleteResponse, FileList,
        FileListQuery, FileObject, FilePurpose, FileUploadRequest, UploadPart, UploadSession,
        UploadStatus,
    };
    pub use crate::uploads::UploadClient;
}
