//! Error types for the batchline client.
//!
//! Every failure is surfaced to the caller with its kind and enough context
//! (operation attempted, session/job id) to decide on a retry. The library
//! performs no automatic retries and no silent suppression.

use thiserror::Error;

/// Library error type.
#[derive(Error, Debug)]
pub enum Error {
    /// A caller-supplied precondition was violated. Detected before any
    /// network call is made.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The operation is not valid for the entity's current lifecycle stage
    /// (e.g. adding a part to a completed upload session).
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// A referenced id is unknown to the remote side.
    #[error("not found: {0}")]
    NotFound(String),

    /// Network, authentication, or server failure reported by the transport.
    #[error("transport error: {message}")]
    Transport {
        /// HTTP status code, when the failure carries one.
        status: Option<u16>,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The remote side returned a body this library could not interpret.
    #[error("parse error: {0}")]
    Parse(String),

    /// Client construction or configuration failure.
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl Error {
    /// Create an `InvalidArgument` error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Create an `InvalidState` error.
    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState(message.into())
    }

    /// Create a `NotFound` error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Create a transport error without an HTTP status.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            status: None,
            message: message.into(),
            source: None,
        }
    }

    /// Create a transport error carrying an HTTP status code.
    pub fn transport_status(status: u16, message: impl Into<String>) -> Self {
        Self::Transport {
            status: Some(status),
            message: message.into(),
            source: None,
        }
    }

    /// HTTP status code associated with this error, if any.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Transport { status, .. } => *status,
            Self::NotFound(_) => Some(404),
            _ => None,
        }
    }

    /// Whether a caller-side retry of the same call could plausibly succeed.
    ///
    /// `InvalidArgument` and `InvalidState` are deterministic and never
    /// retryable; transport failures are retryable unless they carry a
    /// non-429 client status.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport { status, .. } => match status {
                Some(429) => true,
                Some(code) if (400..500).contains(code) => false,
                _ => true,
            },
            _ => false,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport {
            status: err.status().map(|s| s.as_u16()),
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}
