//! Backend client: the one network hop to the redaction service.
//!
//! The rest of the gateway only sees the `RedactionBackend` trait, so the
//! router and both surfaces can be driven against an in-process fake.
//! `HttpBackend` is the production implementation.

mod client;

pub use client::HttpBackend;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Response envelope of `POST /redact` and `POST /redact/pdf`.
///
/// The service also returns `_links`, which the gateway ignores.
/// `pdf_base64` stays optional here so that a missing field is reported by
/// the transcoder as a contract violation rather than a JSON parse error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendResult {
    #[serde(default)]
    pub pdf_base64: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// Refused, unreachable, reset mid-exchange or timed out.
    #[error("Redaction service is unreachable: {0}")]
    Connection(String),

    /// Reachable, but the reply was not what the contract promises.
    #[error("Unexpected response from redaction service: {0}")]
    UpstreamFormat(String),
}

/// Single-attempt calls to the redaction service. Implementations never retry.
#[async_trait]
pub trait RedactionBackend: Send + Sync {
    /// `POST /redact` with `{ "text": ... }`.
    async fn submit_text(&self, text: &str) -> Result<BackendResult, BackendError>;

    /// `POST /redact/pdf` with the bytes as multipart field `file`.
    async fn submit_file(
        &self,
        bytes: Vec<u8>,
        filename: &str,
    ) -> Result<BackendResult, BackendError>;

    /// `GET /stats`, returned as-is.
    async fn fetch_stats(&self) -> Result<serde_json::Value, BackendError>;
}
