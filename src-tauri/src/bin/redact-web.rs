//! Web shell: serves the `/api` redaction endpoints for the browser page.

use std::sync::Arc;

use anyhow::Context;
use redact_gateway_lib::web::{self, AppState};
use redact_gateway_lib::{GatewayConfig, HttpBackend, RequestRouter};
use tokio::net::TcpListener;

/// Wait for Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            log::error!("[WEB] Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                log::error!("[WEB] Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => log::info!("[WEB] Received Ctrl+C, shutting down gracefully..."),
        _ = terminate => log::info!("[WEB] Received SIGTERM, shutting down gracefully..."),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = GatewayConfig::load()?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let backend = HttpBackend::new(&config).context("building backend HTTP client")?;
    let state = AppState::new(RequestRouter::new(Arc::new(backend)), &config);
    let app = web::build_router(state);

    let bind_addr = config.bind_addr();
    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("binding {}", bind_addr))?;

    log::info!(
        "[WEB] Listening on http://{} — forwarding to {} (upload cap {} bytes)",
        bind_addr,
        config.backend_base(),
        config.max_upload_bytes
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
