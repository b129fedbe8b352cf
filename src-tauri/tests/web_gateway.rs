//! End-to-end tests for the web surface.
//!
//! Real `HttpBackend` against a wiremock redaction service, real axum router
//! behind axum-test. Covers the HTTP contract and the status code taxonomy.

use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use axum_test::multipart::{MultipartForm, Part};
use axum_test::TestServer;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use redact_gateway_lib::web::{build_router, AppState};
use redact_gateway_lib::{GatewayConfig, HttpBackend, RequestRouter};
use wiremock::matchers::{body_json, body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// base64("PDF-BYTES")
const PDF_BYTES_B64: &str = "UERGLUJZVEVT";

fn gateway_for(backend_url: &str) -> TestServer {
    let config = GatewayConfig {
        backend_url: backend_url.to_string(),
        ..Default::default()
    };
    let backend =
        HttpBackend::with_timeouts(backend_url, Duration::from_secs(5), Duration::from_secs(1))
            .unwrap();
    let state = AppState::new(RequestRouter::new(Arc::new(backend)), &config);
    TestServer::new(build_router(state)).unwrap()
}

fn closed_port_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

/// One-shot listener that answers the first request with bytes that are not HTTP.
async fn non_http_service_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = [0u8; 1024];
        let _ = socket.read(&mut buf).await;
        let _ = socket.write_all(b"garbage\r\n\r\n").await;
        let _ = socket.shutdown().await;
    });
    format!("http://{}", addr)
}

// ── Text redaction ──────────────────────────────────────────────────

#[tokio::test]
async fn text_redaction_delivers_decoded_pdf() {
    let service = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/redact"))
        .and(body_json(serde_json::json!({ "text": "Hello Mike, call me." })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "message": "Redaction successful",
            "pdf_base64": PDF_BYTES_B64,
            "_links": { "self": { "href": "/redact", "method": "POST" } },
        })))
        .expect(1)
        .mount(&service)
        .await;
    Mock::given(method("POST"))
        .and(path("/redact/pdf"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&service)
        .await;

    let gateway = gateway_for(&service.uri());
    let response = gateway
        .post("/api/redact")
        .json(&serde_json::json!({ "text": "Hello Mike, call me." }))
        .await;

    response.assert_status_ok();
    assert_eq!(response.header("content-type"), "application/pdf");
    assert_eq!(response.as_bytes().as_ref(), b"PDF-BYTES");
}

#[tokio::test]
async fn refused_connection_yields_503_with_message() {
    let gateway = gateway_for(&closed_port_url());

    let response = gateway
        .post("/api/redact")
        .json(&serde_json::json!({ "text": "hello" }))
        .await;

    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    let body: serde_json::Value = response.json();
    let message = body["error"].as_str().unwrap();
    assert!(!message.is_empty());
    assert_eq!(body["errorKind"], "ConnectionError");
}

#[tokio::test]
async fn non_http_reply_yields_500_not_503() {
    let gateway = gateway_for(&non_http_service_url().await);

    let response = gateway
        .post("/api/redact")
        .json(&serde_json::json!({ "text": "hi" }))
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: serde_json::Value = response.json();
    assert_eq!(body["errorKind"], "UpstreamFormatError");
    assert_eq!(body["error"], "Failed to process request.");
}

#[tokio::test]
async fn service_error_status_yields_500() {
    let service = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/redact"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&service)
        .await;

    let gateway = gateway_for(&service.uri());
    let response = gateway
        .post("/api/redact")
        .json(&serde_json::json!({ "text": "hello" }))
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Failed to process request.");
}

// ── PDF redaction ───────────────────────────────────────────────────

#[tokio::test]
async fn pdf_upload_is_forwarded_with_original_filename() {
    let service = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/redact/pdf"))
        .and(body_string_contains("name=\"file\""))
        .and(body_string_contains("filename=\"lease.pdf\""))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "pdf_base64": PDF_BYTES_B64 })),
        )
        .expect(1)
        .mount(&service)
        .await;
    Mock::given(method("POST"))
        .and(path("/redact"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&service)
        .await;

    let gateway = gateway_for(&service.uri());
    let form = MultipartForm::new().add_part(
        "file",
        Part::bytes(b"%PDF-1.4 lease".to_vec())
            .file_name("lease.pdf")
            .mime_type("application/pdf"),
    );
    let response = gateway.post("/api/redact/pdf").multipart(form).await;

    response.assert_status_ok();
    assert_eq!(
        response.header("content-disposition"),
        "attachment; filename=\"redacted.pdf\""
    );
    assert_eq!(response.as_bytes().as_ref(), b"PDF-BYTES");
}

#[tokio::test]
async fn pdf_reply_missing_payload_yields_500() {
    let service = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/redact/pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .mount(&service)
        .await;

    let gateway = gateway_for(&service.uri());
    let form = MultipartForm::new()
        .add_part("file", Part::bytes(b"%PDF".to_vec()).file_name("a.pdf"));
    let response = gateway.post("/api/redact/pdf").multipart(form).await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: serde_json::Value = response.json();
    assert_eq!(body["errorKind"], "UpstreamFormatError");
}

#[tokio::test]
async fn missing_file_yields_400_without_upstream_call() {
    let service = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&service)
        .await;

    let gateway = gateway_for(&service.uri());
    let form = MultipartForm::new().add_text("comment", "forgot the file");
    let response = gateway.post("/api/redact/pdf").multipart(form).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "No file uploaded");
}

#[tokio::test]
async fn oversize_upload_yields_413_without_upstream_call() {
    let service = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&service)
        .await;

    let config = GatewayConfig {
        backend_url: service.uri(),
        max_upload_bytes: 1024,
        ..Default::default()
    };
    let backend = HttpBackend::new(&config).unwrap();
    let state = AppState::new(RequestRouter::new(Arc::new(backend)), &config);
    let gateway = TestServer::new(build_router(state)).unwrap();

    let form = MultipartForm::new().add_part(
        "file",
        Part::bytes(vec![0u8; 64 * 1024]).file_name("big.pdf"),
    );
    let response = gateway.post("/api/redact/pdf").multipart(form).await;

    response.assert_status(StatusCode::PAYLOAD_TOO_LARGE);
}

// ── Stats ───────────────────────────────────────────────────────────

#[tokio::test]
async fn stats_are_passed_through() {
    let service = MockServer::start().await;
    let stats = serde_json::json!({
        "total_redactions": 5,
        "text_redactions": 3,
        "pdf_redactions": 2,
        "recent_activity": [{ "id": 5, "type": "pdf", "time": "2024-01-01T00:00:00" }],
    });
    Mock::given(method("GET"))
        .and(path("/stats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(stats.clone()))
        .mount(&service)
        .await;

    let gateway = gateway_for(&service.uri());
    let response = gateway.get("/api/stats").await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body, stats);
}

#[tokio::test]
async fn stats_with_unreachable_service_yield_500() {
    let gateway = gateway_for(&closed_port_url());

    let response = gateway.get("/api/stats").await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
}

// ── Isolation ───────────────────────────────────────────────────────

#[tokio::test]
async fn failed_request_does_not_affect_the_next_one() {
    let service = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/redact"))
        .and(body_json(serde_json::json!({ "text": "bad" })))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&service)
        .await;
    Mock::given(method("POST"))
        .and(path("/redact"))
        .and(body_json(serde_json::json!({ "text": "good" })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "pdf_base64": PDF_BYTES_B64 })),
        )
        .mount(&service)
        .await;

    let gateway = gateway_for(&service.uri());

    let first = gateway
        .post("/api/redact")
        .json(&serde_json::json!({ "text": "bad" }))
        .await;
    first.assert_status(StatusCode::INTERNAL_SERVER_ERROR);

    let second = gateway
        .post("/api/redact")
        .json(&serde_json::json!({ "text": "good" }))
        .await;
    second.assert_status_ok();
    assert_eq!(second.as_bytes().as_ref(), b"PDF-BYTES");
}
