//! Batch job client.
//!
//! Drives the submit → poll → cancel / fetch-output lifecycle for
//! asynchronous batch jobs. Each call is one request round-trip; any
//! wait-for-completion loop with backoff belongs to the caller.

use std::sync::Arc;

use crate::error::Error;
use crate::transport::{Transport, TransportRequest};
use crate::types::{BatchJob, BatchList, BatchListQuery};

/// Client for the batch job lifecycle.
#[derive(Clone)]
pub struct BatchClient {
    transport: Arc<dyn Transport>,
}

impl BatchClient {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Submit a new batch job over a previously uploaded input file.
    ///
    /// Fails with [`Error::InvalidArgument`] before any network call when
    /// `input_file_id` is empty. The returned job starts in `pending`.
    pub async fn submit(
        &self,
        operation_path: &str,
        input_file_id: &str,
        completion_window: &str,
    ) -> Result<BatchJob, Error> {
        if input_file_id.is_empty() {
            return Err(Error::invalid_argument(
                "submit: input file id cannot be empty",
            ));
        }
        if operation_path.is_empty() {
            return Err(Error::invalid_argument(
                "submit: operation path cannot be empty",
            ));
        }

        let body = serde_json::json!({
            "operationPath": operation_path,
            "inputFileId": input_file_id,
            "completionWindow": completion_window,
        });
        let response = self
            .transport
            .send(TransportRequest::post_json("batches", body))
            .await?
            .require_success("submit batch")?;

        let job: BatchJob = response.json()?;
        tracing::debug!(batch_id = %job.id, %input_file_id, "batch submitted");
        Ok(job)
    }

    /// Read the current status of a job. Idempotent; never mutates remote
    /// state. Fails with [`Error::NotFound`] when the id is unknown.
    pub async fn poll(&self, job_id: &str) -> Result<BatchJob, Error> {
        let response = self
            .transport
            .send(TransportRequest::get(format!("batches/{job_id}")))
            .await?
            .require_success(&format!("poll batch {job_id}"))?;
        response.json()
    }

    /// List batch jobs, one page at a time.
    pub async fn list(&self, query: Option<BatchListQuery>) -> Result<BatchList, Error> {
        let mut endpoint = "batches".to_string();
        if let Some(q) = query {
            let mut params = Vec::new();
            if let Some(limit) = q.limit {
                params.push(format!("limit={limit}"));
            }
            if let Some(after) = &q.after {
                params.push(format!("after={}", urlencoding::encode(after)));
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
            .require_success("list batches")?;
        response.json()
    }

    /// Request cancellation of a job.
    ///
    /// Fails with [`Error::InvalidState`] when the job is already terminal.
    /// Cancellation is best-effort and racy with remote completion: the
    /// returned status reflects the race's actual outcome, not the caller's
    /// intent.
    pub async fn cancel(&self, job_id: &str) -> Result<BatchJob, Error> {
        let current = self.poll(job_id).await?;
        if current.status.is_terminal() {
            return Err(Error::invalid_state(format!(
                "cancel: batch {job_id} is already {}",
                current.status
            )));
        }

        let path = format!("batches/{job_id}/cancel");
        let response = self
            .transport
            .send(TransportRequest::post_json(path, serde_json::json!({})))
            .await?
            .require_success(&format!("cancel batch {job_id}"))?;

        let job: BatchJob = response.json()?;
        tracing::debug!(batch_id = %job.id, status = %job.status, "batch cancel requested");
        Ok(job)
    }

    /// Download the output of a completed job.
    ///
    /// Fails with [`Error::InvalidState`] unless the job is `completed`, and
    /// with [`Error::NotFound`] when the completed job has no output file id.
    pub async fn fetch_output(&self, job_id: &str) -> Result<Vec<u8>, Error> {
        let job = self.poll(job_id).await?;
        if job.status != crate::types::BatchStatus::Completed {
            return Err(Error::invalid_state(format!(
                "fetch_output: batch {job_id} is {}, not completed",
                job.status
            )));
        }
        let output_file_id = job.output_file_id.ok_or_else(|| {
            Error::not_found(format!("fetch_output: batch {job_id} has no output file"))
        })?;

        let path = format!("files/{output_file_id}/content");
        let response = self
            .transport
            .send(TransportRequest::get(path))
            .await?
            .require_success(&format!("fetch_output of batch {job_id}"))?;
        Ok(response.body)
    }
}
