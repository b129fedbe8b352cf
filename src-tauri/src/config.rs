//! Gateway configuration.
//!
//! Every setting is a CLI flag with an environment fallback, so the backend
//! address can be changed per deployment without rebuilding. A `.env` file
//! in the working directory is read first; it never overrides variables
//! that are already set.
//!
//! ```bash
//! BACKEND_URL=http://redaction-service:8000 PORT=8080 redact-web
//! redact-web --backend-url http://10.0.0.5:8000 --max-upload-bytes 5242880
//! ```

use std::time::Duration;

use clap::Parser;

use crate::router::Precedence;

pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Redaction gateway", long_about = None)]
pub struct GatewayConfig {
    /// Base URL of the redaction service
    #[arg(long, env = "BACKEND_URL", default_value = DEFAULT_BACKEND_URL)]
    pub backend_url: String,

    /// Host the web shell binds to
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port the web shell binds to
    #[arg(long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// Upper bound for one backend call, connect included
    #[arg(long, env = "REQUEST_TIMEOUT_SECS", default_value_t = 30)]
    pub request_timeout_secs: u64,

    #[arg(long, env = "CONNECT_TIMEOUT_SECS", default_value_t = 5)]
    pub connect_timeout_secs: u64,

    /// Largest inbound request body accepted, in bytes
    #[arg(long, env = "MAX_UPLOAD_BYTES", default_value_t = DEFAULT_MAX_UPLOAD_BYTES)]
    pub max_upload_bytes: usize,

    /// What to do when a request carries both text and a file
    #[arg(long, env = "INPUT_PRECEDENCE", value_enum, default_value_t = Precedence::Reject)]
    pub input_precedence: Precedence,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid backend URL '{url}': {reason}")]
    BackendUrl { url: String, reason: String },

    #[error("{0} must be greater than zero")]
    Zero(&'static str),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            host: "0.0.0.0".to_string(),
            port: 3000,
            request_timeout_secs: 30,
            connect_timeout_secs: 5,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            input_precedence: Precedence::Reject,
        }
    }
}

impl GatewayConfig {
    /// Load `.env`, then parse the process arguments and environment.
    pub fn load() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        let config = Self::parse();
        config.validate()?;
        Ok(config)
    }

    /// Same sources as [`GatewayConfig::load`] minus the command line, for
    /// shells that do not take flags.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        let config = Self::try_parse_from([env!("CARGO_PKG_NAME")])
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = reqwest::Url::parse(&self.backend_url).map_err(|e| ConfigError::BackendUrl {
            url: self.backend_url.clone(),
            reason: e.to_string(),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::BackendUrl {
                url: self.backend_url.clone(),
                reason: format!("unsupported scheme '{}'", url.scheme()),
            });
        }

        if self.request_timeout_secs == 0 {
            return Err(ConfigError::Zero("request_timeout_secs"));
        }
        if self.connect_timeout_secs == 0 {
            return Err(ConfigError::Zero("connect_timeout_secs"));
        }
        if self.max_upload_bytes == 0 {
            return Err(ConfigError::Zero("max_upload_bytes"));
        }
        Ok(())
    }

    pub fn backend_base(&self) -> &str {
        self.backend_url.trim_end_matches('/')
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
