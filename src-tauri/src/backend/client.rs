//! reqwest implementation of the backend client.
//!
//! One outbound request per call, bounded by the configured timeouts.
//! Failures are sorted into two buckets: could not talk to the service
//! (`Connection`) and talked to it but got something unusable
//! (`UpstreamFormat`).

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};

use super::{BackendError, BackendResult, RedactionBackend};
use crate::config::GatewayConfig;

pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(config: &GatewayConfig) -> Result<Self, reqwest::Error> {
        Self::with_timeouts(
            config.backend_base(),
            config.request_timeout(),
            config.connect_timeout(),
        )
    }

    pub fn with_timeouts(
        base_url: &str,
        request_timeout: Duration,
        connect_timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .connect_timeout(connect_timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send a prepared request and hand back the body of a 2xx reply.
    async fn exchange(
        &self,
        request: reqwest::RequestBuilder,
        url: &str,
    ) -> Result<Vec<u8>, BackendError> {
        let start = Instant::now();

        let response = request.send().await.map_err(|e| {
            if e.is_connect() || e.is_timeout() {
                log::warn!("[BACKEND] {} unreachable: {}", url, e);
                BackendError::Connection(e.to_string())
            } else {
                log::warn!("[BACKEND] {} sent no usable reply: {}", url, e);
                BackendError::UpstreamFormat(format!("bad reply: {}", e))
            }
        })?;

        let status = response.status();
        let body = response.bytes().await.map_err(|e| {
            if e.is_timeout() {
                BackendError::Connection(e.to_string())
            } else {
                BackendError::UpstreamFormat(format!("failed to read body: {}", e))
            }
        })?;

        log::info!(
            "[BACKEND] {} answered {} in {}ms ({} bytes)",
            url,
            status,
            start.elapsed().as_millis(),
            body.len()
        );

        if !status.is_success() {
            return Err(BackendError::UpstreamFormat(format!("HTTP {}", status)));
        }

        Ok(body.to_vec())
    }

    async fn redaction_call(
        &self,
        request: reqwest::RequestBuilder,
        url: &str,
    ) -> Result<BackendResult, BackendError> {
        let body = self.exchange(request, url).await?;
        let result: BackendResult = serde_json::from_slice(&body)
            .map_err(|e| BackendError::UpstreamFormat(format!("invalid JSON: {}", e)))?;

        if let Some(message) = &result.message {
            log::debug!("[BACKEND] Service says: {}", message);
        }
        Ok(result)
    }
}

#[async_trait]
impl RedactionBackend for HttpBackend {
    async fn submit_text(&self, text: &str) -> Result<BackendResult, BackendError> {
        let url = self.endpoint("/redact");
        log::info!("[BACKEND] Forwarding {} bytes of text to {}", text.len(), url);

        let request = self
            .client
            .post(&url)
            .json(&serde_json::json!({ "text": text }));
        self.redaction_call(request, &url).await
    }

    async fn submit_file(
        &self,
        bytes: Vec<u8>,
        filename: &str,
    ) -> Result<BackendResult, BackendError> {
        let url = self.endpoint("/redact/pdf");
        log::info!(
            "[BACKEND] Forwarding '{}' ({} bytes) to {}",
            filename,
            bytes.len(),
            url
        );

        let mime = mime_guess::from_path(filename).first_or_octet_stream();
        let part = Part::bytes(bytes)
            .file_name(filename.to_string())
            .mime_str(mime.essence_str())
            .map_err(|e| BackendError::UpstreamFormat(format!("bad content type: {}", e)))?;
        let form = Form::new().part("file", part);

        let request = self.client.post(&url).multipart(form);
        self.redaction_call(request, &url).await
    }

    async fn fetch_stats(&self) -> Result<serde_json::Value, BackendError> {
        let url = self.endpoint("/stats");
        let body = self.exchange(self.client.get(&url), &url).await?;
        serde_json::from_slice(&body)
            .map_err(|e| BackendError::UpstreamFormat(format!("invalid JSON: {}", e)))
    }
}
