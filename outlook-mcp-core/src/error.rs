//! Unified error type definition

use serde::Serialize;
use thiserror::Error;

/// Broad failure category, used by the protocol layer to pick an error code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Rejected before any native call
    InvalidInput,
    /// Account, folder or item could not be resolved
    NotFound,
    /// Resolved but not readable
    PermissionDenied,
    /// Mail client or automation runtime missing
    Unavailable,
    /// Bounded wait exceeded
    Timeout,
    /// The native call reported its own failure
    Upstream,
    /// Local bookkeeping failure (IO, serialization)
    Internal,
}

/// Core layer error type
#[derive(Error, Debug, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum CoreError {
    /// Search pattern produced no usable terms
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// Malformed argument (date, type filter, path syntax, ...)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Account not found
    #[error("Account not found: {0}")]
    AccountNotFound(String),

    /// Folder segment not found under its parent
    #[error("Folder not found: '{segment}' under '{parent}'")]
    FolderNotFound { parent: String, segment: String },

    /// Item not found
    #[error("Item not found: {0}")]
    ItemNotFound(String),

    /// Not-found reported by the automation layer without further structure
    #[error("Not found: {0}")]
    NotFound(String),

    /// Folder exists but cannot be read
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// Mail client or automation runtime unavailable
    #[error("Outlook unavailable: {0}")]
    Unavailable(String),

    /// Bounded wait exceeded
    #[error("{operation} timed out after {timeout_secs}s")]
    Timeout {
        operation: String,
        timeout_secs: u64,
    },

    /// Upstream failure with the original diagnostic
    #[error("failed to {operation}: {message}")]
    Upstream { operation: String, message: String },

    /// Storage layer error
    #[error("Storage error: {0}")]
    StorageError(String),

    /// serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl CoreError {
    /// Failure category.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidQuery(_) | Self::InvalidInput(_) => ErrorKind::InvalidInput,
            Self::AccountNotFound(_)
            | Self::FolderNotFound { .. }
            | Self::ItemNotFound(_)
            | Self::NotFound(_) => ErrorKind::NotFound,
            Self::PermissionDenied(_) => ErrorKind::PermissionDenied,
            Self::Unavailable(_) => ErrorKind::Unavailable,
            Self::Timeout { .. } => ErrorKind::Timeout,
            Self::Upstream { .. } => ErrorKind::Upstream,
            Self::StorageError(_) | Self::SerializationError(_) => ErrorKind::Internal,
        }
    }

    /// Whether it is expected behavior (user input, resource does not exist, etc.) is used for log classification.
    ///
    /// Level `warn` should be used when returning `true` and level `error` when returning `false`.
    #[must_use]
    pub fn is_expected(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::InvalidInput | ErrorKind::NotFound | ErrorKind::PermissionDenied
        )
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}

/// Core layer Result type alias
pub type CoreResult<T> = std::result::Result<T, CoreError>;
