//! Redaction gateway: sits between the desktop and web shells and the
//! redaction service.
//!
//! This crate wires together:
//! - Backend client (backend/): the single hop to the service
//! - Payload transcoder (transcode.rs): base64 reply → PDF bytes
//! - Request router (router.rs): text XOR file, one backend call
//! - Gateway surfaces: HTTP endpoints (web/) and the desktop save flow (desktop/)

pub mod backend;
pub mod config;
pub mod desktop;
pub mod error;
pub mod router;
pub mod transcode;
pub mod web;

pub use backend::{BackendError, BackendResult, HttpBackend, RedactionBackend};
pub use config::GatewayConfig;
pub use error::{ErrorKind, GatewayError, ValidationError};
pub use router::{Precedence, RedactionRequest, RequestRouter, Upload};
