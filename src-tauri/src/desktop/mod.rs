//! Desktop gateway surface: redact text, then save the PDF where the user
//! chooses.
//!
//! Per request: `Requesting → SaveDialog → Saved | Cancelled`, or `Failed`
//! from either step. The dialog sits behind [`SaveLocation`] so the flow
//! runs without a window in tests; the Tauri wiring lives in `shell`.

#[cfg(feature = "desktop")]
pub mod shell;

use std::path::PathBuf;

use async_trait::async_trait;
use serde::Serialize;

use crate::error::GatewayError;
use crate::router::{Precedence, RedactionRequest, RequestRouter};

pub const SUGGESTED_FILE_NAME: &str = "redacted.pdf";

/// Asks the user where the redacted document should go.
#[async_trait]
pub trait SaveLocation: Send + Sync {
    /// `None` when the user dismissed the dialog.
    async fn choose(&self, suggested_name: &str) -> Option<PathBuf>;
}

/// Terminal state of one desktop redaction.
#[derive(Debug)]
pub enum SaveOutcome {
    Saved(PathBuf),
    Cancelled,
    Failed(GatewayError),
}

/// IPC payload returned to the desktop page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SaveResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<SaveOutcome> for SaveResponse {
    fn from(outcome: SaveOutcome) -> Self {
        match outcome {
            SaveOutcome::Saved(path) => SaveResponse {
                success: true,
                path: Some(path.to_string_lossy().to_string()),
                ..Default::default()
            },
            SaveOutcome::Cancelled => SaveResponse {
                success: false,
                message: Some("Cancelled".to_string()),
                ..Default::default()
            },
            SaveOutcome::Failed(err) => SaveResponse {
                success: false,
                error: Some(err.to_string()),
                ..Default::default()
            },
        }
    }
}

/// Run one redaction for the desktop page.
///
/// Writes the file exactly once on success and never otherwise.
pub async fn redact_and_save(
    router: &RequestRouter,
    location: &dyn SaveLocation,
    text: String,
) -> SaveOutcome {
    let request = match RedactionRequest::from_parts(Some(text), None, Precedence::Reject) {
        Ok(request) => request,
        Err(e) => return SaveOutcome::Failed(e.into()),
    };

    log::info!("[DESKTOP] Requesting redaction");
    let pdf = match router.route(request).await {
        Ok(pdf) => pdf,
        Err(e) => {
            log::error!("[DESKTOP] Redaction failed ({:?}): {}", e.kind(), e);
            return SaveOutcome::Failed(e);
        }
    };

    log::info!("[DESKTOP] Awaiting save location for {} bytes", pdf.len());
    let Some(path) = location.choose(SUGGESTED_FILE_NAME).await else {
        log::info!("[DESKTOP] Save cancelled");
        return SaveOutcome::Cancelled;
    };

    match tokio::fs::write(&path, &pdf).await {
        Ok(()) => {
            log::info!("[DESKTOP] Saved {}", path.display());
            SaveOutcome::Saved(path)
        }
        Err(e) => {
            log::error!("[DESKTOP] Writing {} failed: {}", path.display(), e);
            SaveOutcome::Failed(e.into())
        }
    }
}
