//! Web gateway surface: the HTTP endpoints the browser page calls.
//!
//! - `POST /api/redact`      JSON `{ "text": ... }`      → PDF bytes
//! - `POST /api/redact/pdf`  multipart field `file`      → PDF bytes
//! - `GET  /api/stats`       backend statistics passthrough
//!
//! Each request is independent; the only shared state is the immutable
//! `AppState`. Dropping a request (client disconnect) drops the in-flight
//! backend call with it.

mod error;

pub use error::{ApiError, Endpoint};

use axum::{
    extract::{
        multipart::MultipartRejection, rejection::JsonRejection, DefaultBodyLimit, Multipart,
        State,
    },
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;

use crate::config::GatewayConfig;
use crate::error::ValidationError;
use crate::router::{Precedence, RedactionRequest, RequestRouter, Upload};

/// File name suggested to the browser for every redacted document.
pub const DOWNLOAD_FILE_NAME: &str = "redacted.pdf";

/// Name forwarded upstream when the browser did not send one.
const FALLBACK_UPLOAD_NAME: &str = "document.pdf";

#[derive(Clone)]
pub struct AppState {
    pub router: RequestRouter,
    pub precedence: Precedence,
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(router: RequestRouter, config: &GatewayConfig) -> Self {
        Self {
            router,
            precedence: config.input_precedence,
            max_upload_bytes: config.max_upload_bytes,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct TextRedactionBody {
    #[serde(default)]
    pub text: Option<String>,
}

/// Build the `/api` router with the body limit applied to every endpoint.
pub fn build_router(state: AppState) -> Router {
    let limit = state.max_upload_bytes;

    Router::new()
        .route("/api/redact", post(redact_text))
        .route("/api/redact/pdf", post(redact_pdf))
        .route("/api/stats", get(stats))
        .layer(DefaultBodyLimit::max(limit))
        .with_state(state)
}

fn pdf_response(pdf: Vec<u8>) -> Response {
    let disposition = format!("attachment; filename=\"{}\"", DOWNLOAD_FILE_NAME);
    let disposition = HeaderValue::from_str(&disposition)
        .unwrap_or_else(|_| HeaderValue::from_static("attachment"));

    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, HeaderValue::from_static("application/pdf")),
            (header::CONTENT_DISPOSITION, disposition),
            (header::CONTENT_LENGTH, HeaderValue::from(pdf.len())),
        ],
        pdf,
    )
        .into_response()
}

fn too_large_or(status: StatusCode, limit: usize, otherwise: ValidationError) -> ValidationError {
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        ValidationError::TooLarge { limit }
    } else {
        otherwise
    }
}

async fn redact_text(
    State(state): State<AppState>,
    body: Result<Json<TextRedactionBody>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(body) = body.map_err(|rejection| {
        let err = too_large_or(
            rejection.status(),
            state.max_upload_bytes,
            ValidationError::MalformedBody(rejection.body_text()),
        );
        ApiError::new(Endpoint::RedactText, err)
    })?;

    let request = RedactionRequest::from_parts(body.text, None, state.precedence)
        .map_err(|e| ApiError::new(Endpoint::RedactText, e))?;

    log::info!("[WEB] /api/redact accepted");
    let pdf = state
        .router
        .route(request)
        .await
        .map_err(|e| ApiError::new(Endpoint::RedactText, e))?;

    Ok(pdf_response(pdf))
}

async fn redact_pdf(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, ApiError> {
    let fail = |e: ValidationError| ApiError::new(Endpoint::RedactPdf, e);
    let limit = state.max_upload_bytes;

    // Not multipart at all: nothing was uploaded.
    let mut multipart = multipart.map_err(|_| fail(ValidationError::NoFile))?;

    let mut upload: Option<Upload> = None;
    let mut text: Option<String> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        fail(too_large_or(
            e.status(),
            limit,
            ValidationError::MalformedBody(e.body_text()),
        ))
    })? {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("file") => {
                let filename = field
                    .file_name()
                    .filter(|n| !n.is_empty())
                    .unwrap_or(FALLBACK_UPLOAD_NAME)
                    .to_string();
                let bytes = field.bytes().await.map_err(|e| {
                    fail(too_large_or(
                        e.status(),
                        limit,
                        ValidationError::MalformedBody(e.body_text()),
                    ))
                })?;
                if !bytes.is_empty() {
                    upload = Some(Upload {
                        bytes: bytes.to_vec(),
                        filename,
                    });
                }
            }
            Some("text") => {
                text = Some(field.text().await.map_err(|e| {
                    fail(too_large_or(
                        e.status(),
                        limit,
                        ValidationError::MalformedBody(e.body_text()),
                    ))
                })?);
            }
            other => log::debug!("[WEB] Ignoring multipart field {:?}", other),
        }
    }

    let Some(upload) = upload else {
        return Err(fail(ValidationError::NoFile));
    };

    log::info!(
        "[WEB] /api/redact/pdf accepted '{}' ({} bytes)",
        upload.filename,
        upload.bytes.len()
    );

    let request = RedactionRequest::from_parts(text, Some(upload), state.precedence).map_err(fail)?;
    let pdf = state
        .router
        .route(request)
        .await
        .map_err(|e| ApiError::new(Endpoint::RedactPdf, e))?;

    Ok(pdf_response(pdf))
}

async fn stats(State(state): State<AppState>) -> Result<Json<serde_json::Value>, ApiError> {
    state
        .router
        .stats()
        .await
        .map(Json)
        .map_err(|e| ApiError::new(Endpoint::Stats, e))
}
