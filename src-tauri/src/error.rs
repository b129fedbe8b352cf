//! Client-facing error taxonomy shared by both gateway surfaces.
//!
//! Every failure on the way to and from the backend ends up as one
//! `GatewayError`. The surfaces decide how to render it (HTTP status and
//! JSON body for the web shell, an IPC response for the desktop shell).

use serde::Serialize;

use crate::backend::BackendError;

/// Stable discriminant reported to clients alongside the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    ValidationError,
    ConnectionError,
    UpstreamFormatError,
    #[serde(rename = "IOError")]
    IoError,
}

/// The caller sent something we cannot forward.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please enter text or upload a PDF file.")]
    NoInput,

    #[error("No file uploaded")]
    NoFile,

    #[error("Provide either text or a file, not both.")]
    ConflictingInput,

    #[error("Malformed request body: {0}")]
    MalformedBody(String),

    #[error("Request body exceeds the {limit} byte limit")]
    TooLarge { limit: usize },
}

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error("Failed to save file: {0}")]
    Io(#[from] std::io::Error),
}

impl GatewayError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GatewayError::Validation(_) => ErrorKind::ValidationError,
            GatewayError::Backend(BackendError::Connection(_)) => ErrorKind::ConnectionError,
            GatewayError::Backend(BackendError::UpstreamFormat(_)) => {
                ErrorKind::UpstreamFormatError
            }
            GatewayError::Io(_) => ErrorKind::IoError,
        }
    }
}
