//! Startup and registry failure modes.
//!
//! Per-request failures (parse/invalid-request/method-not-found) are wire
//! outcomes, not Rust errors — see `introspectd_wire::Response`.

use std::net::SocketAddr;

/// Errors that can abort server startup or registration.
#[derive(Debug, thiserror::Error)]
pub enum DaemonError {
    #[error("failed to bind {0}: {1}")]
    BindFailed(SocketAddr, #[source] std::io::Error),

    #[error("procedure '{0}' is already registered")]
    DuplicateName(String),

    #[error("registry is frozen: procedures cannot be registered after Run()")]
    RegistryFrozen,

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
