//! Request router: picks exactly one backend call per redaction request
//! and hands the reply to the transcoder.
//!
//! No retries and no fallback between text and file mode.

use std::sync::Arc;
use std::time::Instant;

use clap::ValueEnum;

use crate::backend::RedactionBackend;
use crate::error::{GatewayError, ValidationError};
use crate::transcode;

/// A document uploaded for redaction, held in memory for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    pub bytes: Vec<u8>,
    pub filename: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RedactionRequest {
    Text { text: String },
    File(Upload),
}

/// What a surface does when a request carries both text and a file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Precedence {
    /// Refuse with `ConflictingInput`.
    #[default]
    Reject,
    /// Send the file, drop the text.
    PreferFile,
}

impl RedactionRequest {
    /// Build a request from whatever inputs a surface collected.
    ///
    /// Empty text counts as absent.
    pub fn from_parts(
        text: Option<String>,
        file: Option<Upload>,
        precedence: Precedence,
    ) -> Result<Self, ValidationError> {
        let text = text.filter(|t| !t.is_empty());

        match (text, file) {
            (None, None) => Err(ValidationError::NoInput),
            (Some(text), None) => Ok(RedactionRequest::Text { text }),
            (None, Some(upload)) => Ok(RedactionRequest::File(upload)),
            (Some(_), Some(upload)) => match precedence {
                Precedence::Reject => Err(ValidationError::ConflictingInput),
                Precedence::PreferFile => {
                    log::warn!(
                        "[ROUTER] Request has both text and '{}' — sending the file",
                        upload.filename
                    );
                    Ok(RedactionRequest::File(upload))
                }
            },
        }
    }

    pub fn mode(&self) -> &'static str {
        match self {
            RedactionRequest::Text { .. } => "text",
            RedactionRequest::File(_) => "file",
        }
    }
}

/// Cheap to clone; every clone shares the same backend.
#[derive(Clone)]
pub struct RequestRouter {
    backend: Arc<dyn RedactionBackend>,
}

impl RequestRouter {
    pub fn new(backend: Arc<dyn RedactionBackend>) -> Self {
        Self { backend }
    }

    /// Redact one request and return the finished PDF bytes.
    pub async fn route(&self, request: RedactionRequest) -> Result<Vec<u8>, GatewayError> {
        let start = Instant::now();
        let mode = request.mode();

        let reply = match request {
            RedactionRequest::Text { text } => {
                if text.is_empty() {
                    return Err(ValidationError::NoInput.into());
                }
                self.backend.submit_text(&text).await?
            }
            RedactionRequest::File(upload) => {
                if upload.bytes.is_empty() {
                    return Err(ValidationError::NoFile.into());
                }
                self.backend
                    .submit_file(upload.bytes, &upload.filename)
                    .await?
            }
        };

        let pdf = transcode::decode(&reply)?;
        log::info!(
            "[ROUTER] {} redaction done in {}ms — {} bytes",
            mode,
            start.elapsed().as_millis(),
            pdf.len()
        );
        Ok(pdf)
    }

    pub async fn stats(&self) -> Result<serde_json::Value, GatewayError> {
        Ok(self.backend.fetch_stats().await?)
    }
}
