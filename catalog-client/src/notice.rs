//! User-facing notices
//!
//! Every outcome a screen reports (failed load, rejected save, successful
//! delete) is turned into a short transient message here, so callers never
//! format errors themselves.

use serde::Serialize;

use crate::error::{CatalogError, FetchError, WriteOp};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Success,
    Warning,
    Error,
}

/// Transient notification for the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    /// Confirmation after a successful write
    pub fn written(op: WriteOp) -> Self {
        match op {
            WriteOp::Create => Self::success("Product created"),
            WriteOp::Update => Self::success("Product updated"),
            WriteOp::Delete => Self::success("Product deleted"),
            WriteOp::Upload => Self::success("Image uploaded"),
        }
    }
}

impl CatalogError {
    pub fn notice(&self) -> Notice {
        match self {
            CatalogError::Fetch(FetchError::Decode { .. }) => {
                Notice::error("The catalog returned data that could not be read")
            }
            CatalogError::Fetch(e) => match e.status() {
                Some(status) => Notice::error(format!(
                    "Could not load the catalog (HTTP {})",
                    status.as_u16()
                )),
                None => Notice::error("Could not load the catalog"),
            },
            CatalogError::Write(e) => {
                let action = match e.op {
                    WriteOp::Create => "create the product",
                    WriteOp::Update => "update the product",
                    WriteOp::Delete => "delete the product",
                    WriteOp::Upload => "upload the image",
                };
                match e.status {
                    Some(status) => {
                        Notice::error(format!("Could not {} (HTTP {})", action, status.as_u16()))
                    }
                    None => Notice::error(format!("Could not {}", action)),
                }
            }
            CatalogError::Validation(e) => {
                Notice::warning(format!("Check these fields: {}", e.fields().join(", ")))
            }
        }
    }
}
