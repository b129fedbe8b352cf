//! HTTP rendering of gateway errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::error::{ErrorKind, GatewayError};

/// Which endpoint failed; picks the fallback message for opaque failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    RedactText,
    RedactPdf,
    Stats,
}

#[derive(Debug)]
pub struct ApiError {
    endpoint: Endpoint,
    error: GatewayError,
}

impl ApiError {
    pub fn new(endpoint: Endpoint, error: impl Into<GatewayError>) -> Self {
        Self {
            endpoint,
            error: error.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.error.kind()
    }

    pub fn status_code(&self) -> StatusCode {
        use crate::error::ValidationError;

        // Stats has no client-visible taxonomy: any failure is a 500.
        if self.endpoint == Endpoint::Stats {
            return StatusCode::INTERNAL_SERVER_ERROR;
        }

        match &self.error {
            GatewayError::Validation(ValidationError::TooLarge { .. }) => {
                StatusCode::PAYLOAD_TOO_LARGE
            }
            GatewayError::Validation(_) => StatusCode::BAD_REQUEST,
            GatewayError::Backend(_) => match self.kind() {
                ErrorKind::ConnectionError => StatusCode::SERVICE_UNAVAILABLE,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            GatewayError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show the browser. Upstream details stay in the log.
    pub fn user_message(&self) -> String {
        match (&self.error, self.endpoint) {
            (_, Endpoint::Stats) => "Failed to fetch stats.".to_string(),
            (GatewayError::Validation(e), _) => e.to_string(),
            (GatewayError::Backend(_), _) if self.kind() == ErrorKind::ConnectionError => {
                "Redaction service is unavailable.".to_string()
            }
            (_, Endpoint::RedactPdf) => "Failed to process PDF.".to_string(),
            (_, Endpoint::RedactText) => "Failed to process request.".to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self.kind() {
            ErrorKind::ValidationError => {
                log::debug!("[WEB] {:?} rejected: {}", self.endpoint, self.error)
            }
            ErrorKind::ConnectionError => {
                log::warn!("[WEB] {:?} backend unavailable: {}", self.endpoint, self.error)
            }
            ErrorKind::UpstreamFormatError | ErrorKind::IoError => {
                log::error!("[WEB] {:?} failed: {}", self.endpoint, self.error)
            }
        }

        let message = self.user_message();
        let body = serde_json::json!({
            "error": message,
            "errorKind": self.kind(),
            "message": message,
        });
        (self.status_code(), Json(body)).into_response()
    }
}
