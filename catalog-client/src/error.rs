//! Client error types
//!
//! Reads fail with [`FetchError`], writes with [`WriteError`], and input
//! rejected before any request with [`ValidationError`]. Store and session
//! APIs return the union, [`CatalogError`].

use http::StatusCode;
use thiserror::Error;

pub use shared::ValidationError;

/// Transport-level failure, before it is classified as a read or a write
#[derive(Debug, Error)]
pub enum HttpError {
    /// Request never produced a response
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-2xx response
    #[error("HTTP {status}: {body}")]
    Status { status: StatusCode, body: String },

    /// 2xx response with a body that does not match the expected shape
    #[error("invalid response body: {0}")]
    Decode(String),
}

impl HttpError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            HttpError::Status { status, .. } => Some(*status),
            HttpError::Transport(e) => e.status(),
            HttpError::Decode(_) => None,
        }
    }
}

/// A read against the catalog API failed
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("GET {path} failed: {source}")]
    Transport {
        path: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("GET {path} returned {status}")]
    Status {
        path: String,
        status: StatusCode,
        body: String,
    },

    #[error("GET {path} returned unreadable JSON: {message}")]
    Decode { path: String, message: String },
}

impl FetchError {
    pub(crate) fn from_http(path: &str, err: HttpError) -> Self {
        let path = path.to_string();
        match err {
            HttpError::Transport(source) => FetchError::Transport { path, source },
            HttpError::Status { status, body } => FetchError::Status { path, status, body },
            HttpError::Decode(message) => FetchError::Decode { path, message },
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            FetchError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Kind of write that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOp {
    Create,
    Update,
    Delete,
    Upload,
}

impl WriteOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            WriteOp::Create => "create",
            WriteOp::Update => "update",
            WriteOp::Delete => "delete",
            WriteOp::Upload => "upload",
        }
    }
}

impl std::fmt::Display for WriteOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A write against the catalog API failed
#[derive(Debug, Error)]
#[error("{op} failed{}: {message}", status_suffix(.status))]
pub struct WriteError {
    pub op: WriteOp,
    /// Status of the rejecting response; `None` when no response arrived
    pub status: Option<StatusCode>,
    pub message: String,
}

impl WriteError {
    pub(crate) fn from_http(op: WriteOp, err: HttpError) -> Self {
        let status = err.status();
        let message = match err {
            HttpError::Status { body, .. } if !body.trim().is_empty() => body,
            other => other.to_string(),
        };
        Self {
            op,
            status,
            message,
        }
    }
}

fn status_suffix(status: &Option<StatusCode>) -> String {
    status
        .map(|s| format!(" with HTTP {}", s.as_u16()))
        .unwrap_or_default()
}

/// Any failure surfaced by the store or session
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Write(#[from] WriteError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl CatalogError {
    /// HTTP status attached to the failure, if any
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            CatalogError::Fetch(e) => e.status(),
            CatalogError::Write(e) => e.status,
            CatalogError::Validation(_) => None,
        }
    }
}

/// Result type for catalog operations
pub type CatalogResult<T> = Result<T, CatalogError>;
