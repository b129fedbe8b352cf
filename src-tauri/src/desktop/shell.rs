//! Tauri shell for the desktop surface.
//!
//! Wires the `redact_text` IPC command to [`redact_and_save`], with the
//! native save dialog as the [`SaveLocation`]. The application context is
//! built once in [`run`] and handed to Tauri's managed state.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use tauri::Manager;
use tauri_plugin_dialog::DialogExt;
use tokio::sync::oneshot;

use super::{redact_and_save, SaveLocation, SaveResponse};
use crate::backend::HttpBackend;
use crate::config::GatewayConfig;
use crate::router::RequestRouter;

/// Everything a desktop request needs, constructed at startup.
pub struct DesktopContext {
    router: RequestRouter,
}

impl DesktopContext {
    pub fn new(router: RequestRouter) -> Self {
        Self { router }
    }
}

/// Native "Save PDF" dialog. The dialog callback hands its answer back over
/// a oneshot channel so the command can await it.
struct DialogSaveLocation {
    app: tauri::AppHandle,
}

#[async_trait]
impl SaveLocation for DialogSaveLocation {
    async fn choose(&self, suggested_name: &str) -> Option<PathBuf> {
        let (tx, rx) = oneshot::channel();

        let mut dialog = self
            .app
            .dialog()
            .file()
            .set_title("Save PDF")
            .set_file_name(suggested_name)
            .add_filter("PDF", &["pdf"]);
        if let Some(downloads) = dirs::download_dir() {
            dialog = dialog.set_directory(downloads);
        }

        dialog.save_file(move |picked| {
            let _ = tx.send(picked);
        });

        // A dropped sender means the dialog went away without an answer.
        let picked = rx.await.ok().flatten()?;
        let path = picked.as_path().map(|p| p.to_path_buf());
        if path.is_none() {
            log::warn!("[DESKTOP] Save dialog returned a non-filesystem location");
        }
        path
    }
}

/// Tauri command: redact `text` and save the resulting PDF.
///
/// Always answers with a [`SaveResponse`]; failures are reported in its
/// `error` field rather than as a rejected promise.
#[tauri::command]
async fn redact_text(app: tauri::AppHandle, text: String) -> SaveResponse {
    let router = app.state::<DesktopContext>().router.clone();
    let location = DialogSaveLocation { app };

    redact_and_save(&router, &location, text).await.into()
}

/// Entry point for the desktop binary.
pub fn run() -> anyhow::Result<()> {
    let config = GatewayConfig::from_env()?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let backend = HttpBackend::new(&config)?;
    let context = DesktopContext::new(RequestRouter::new(Arc::new(backend)));

    tauri::Builder::default()
        .plugin(tauri_plugin_dialog::init())
        .manage(context)
        .invoke_handler(tauri::generate_handler![redact_text])
        .setup(move |_app| {
            log::info!(
                "[DESKTOP] Redactor starting up, backend {}",
                config.backend_base()
            );
            Ok(())
        })
        .run(tauri::generate_context!())?;

    Ok(())
}
