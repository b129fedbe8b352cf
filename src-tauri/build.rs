//! Build script for the redaction gateway.
//!
//! Tauri codegen only runs for the desktop shell. The web shell and the
//! library have no build steps.

fn main() {
    #[cfg(feature = "desktop")]
    tauri_build::build();
}
