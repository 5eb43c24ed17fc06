//! Transport abstraction.
//!
//! The upload, batch, and file clients never talk to the network directly;
//! they issue [`TransportRequest`]s through an injectable [`Transport`]. This
//! keeps proxying, credential injection, timeouts, and retry policy entirely
//! inside the transport implementation, and lets tests substitute a synthetic
//! transport that returns canned responses.

mod http;

pub use http::HttpTransport;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Method;
use reqwest::header::HeaderMap;

use crate::error::Error;

/// One field of a multipart form body.
///
/// Multipart content is described structurally rather than with
/// `reqwest::multipart::Form` so that non-HTTP transports and test doubles
/// can inspect it.
#[derive(Debug, Clone)]
pub struct MultipartField {
    pub name: String,
    pub value: FieldValue,
}

impl MultipartField {
    /// A plain text field.
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: FieldValue::Text(value.into()),
        }
    }

    /// A file field with bytes, a filename, and a MIME type.
    pub fn bytes(
        name: impl Into<String>,
        data: Bytes,
        filename: impl Into<String>,
        mime_type: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            value: FieldValue::Bytes {
                data,
                filename: filename.into(),
                mime_type: mime_type.into(),
            },
        }
    }
}

/// Value of a multipart field.
#[derive(Debug, Clone)]
pub enum FieldValue {
    Text(String),
    Bytes {
        data: Bytes,
        filename: String,
        mime_type: String,
    },
}

/// Request body variants understood by transports.
#[derive(Debug, Clone)]
pub enum RequestBody {
    Empty,
    Json(serde_json::Value),
    Multipart(Vec<MultipartField>),
}

/// Transport-level request data.
#[derive(Debug, Clone)]
pub struct TransportRequest {
    pub method: Method,
    /// Path relative to the transport's base URL, e.g. `uploads/u_1/parts`.
    pub path: String,
    /// Per-request headers merged over the transport's defaults.
    pub headers: HeaderMap,
    pub body: RequestBody,
}

impl TransportRequest {
    /// A GET request with no body.
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            path: path.into(),
            headers: HeaderMap::new(),
            body: RequestBody::Empty,
        }
    }

    /// A POST request with a JSON body.
    pub fn post_json(path: impl Into<String>, body: serde_json::Value) -> Self {
        Self {
            method: Method::POST,
            path: path.into(),
            headers: HeaderMap::new(),
            body: RequestBody::Json(body),
        }
    }

    /// A POST request with a multipart form body.
    pub fn post_multipart(path: impl Into<String>, fields: Vec<MultipartField>) -> Self {
        Self {
            method: Method::POST,
            path: path.into(),
            headers: HeaderMap::new(),
            body: RequestBody::Multipart(fields),
        }
    }

    /// A DELETE request with no body.
    pub fn delete(path: impl Into<String>) -> Self {
        Self {
            method: Method::DELETE,
            path: path.into(),
            headers: HeaderMap::new(),
            body: RequestBody::Empty,
        }
    }
}

/// Transport-level response data.
///
/// Any response the remote side actually produced comes back as `Ok`,
/// including 4xx/5xx statuses; [`Error::Transport`] is reserved for failures
/// where no response was obtained (connect, TLS, timeout, proxy).
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl TransportResponse {
    /// Map a non-2xx status to the library error taxonomy.
    ///
    /// 404 becomes [`Error::NotFound`]; other failures become
    /// [`Error::Transport`] carrying the status and the server's error
    /// message when one can be extracted from the body.
    pub fn require_success(self, operation: &str) -> Result<Self, Error> {
        if (200..300).contains(&self.status) {
            return Ok(self);
        }
        let message = extract_error_message(&self.body)
            .unwrap_or_else(|| String::from_utf8_lossy(&self.body).into_owned());
        if self.status == 404 {
            return Err(Error::not_found(format!("{operation}: {message}")));
        }
        Err(Error::transport_status(
            self.status,
            format!("{operation}: {message}"),
        ))
    }

    /// Deserialize the body as JSON.
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, Error> {
        serde_json::from_slice(&self.body)
            .map_err(|e| Error::Parse(format!("failed to decode response body: {e}")))
    }
}

/// Capability for issuing authenticated requests to a remote endpoint.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, Error>;
}

/// Best-effort extraction of `error.message` from an API error body.
fn extract_error_message(body: &[u8]) -> Option<String> {
    let value: serde_json::Value = serde_json::from_slice(body).ok()?;
    value
        .get("error")
        .and_then(|e| e.get("message"))
        .or_else(|| value.get("message"))
        .and_then(|m| m.as_str())
        .map(|s| s.to_string())
}
