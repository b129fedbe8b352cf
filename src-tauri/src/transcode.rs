//! Payload transcoder: turns the service's base64 `pdf_base64` field into
//! the PDF bytes clients actually receive.
//!
//! This is the only place the wire encoding is undone.

use base64::{engine::general_purpose::STANDARD, Engine};

use crate::backend::{BackendError, BackendResult};

/// Validate and decode the document carried by a redaction reply.
///
/// ASCII whitespace inside the payload is ignored so line-wrapped base64
/// decodes the same as a single line.
pub fn decode(result: &BackendResult) -> Result<Vec<u8>, BackendError> {
    let payload = result.pdf_base64.as_deref().ok_or_else(|| {
        BackendError::UpstreamFormat("response is missing pdf_base64".to_string())
    })?;

    let compact: String = payload
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    if compact.is_empty() {
        return Err(BackendError::UpstreamFormat(
            "pdf_base64 is empty".to_string(),
        ));
    }

    STANDARD
        .decode(compact.as_bytes())
        .map_err(|e| BackendError::UpstreamFormat(format!("pdf_base64 is not valid base64: {}", e)))
}

/// Inverse of [`decode`], in the shape the service sends.
pub fn encode(bytes: &[u8]) -> BackendResult {
    BackendResult {
        pdf_base64: Some(STANDARD.encode(bytes)),
        message: None,
    }
}
