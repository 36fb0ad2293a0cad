//! Environment-driven configuration. One accessor per variable, each with
//! a sane default; a malformed value is logged and falls back rather than
//! panicking the daemon at startup.

use introspectd_core::limits::{
    DEFAULT_CAPTURE_MAX, DEFAULT_MAX_CONN_BUFFER, DEFAULT_PORT, DEFAULT_PROC_MAX, DEFAULT_WORKERS,
};
use introspectd_core::Limits;

fn parse_var<T: std::str::FromStr>(name: &str, default: T) -> T {
    match std::env::var(name) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            tracing::warn!(var = name, value = %raw, "invalid value, using default");
            default
        }),
        Err(_) => default,
    }
}

/// TCP listening port. Overridden by `INTROSPECTD_PORT`.
pub fn port() -> u16 {
    parse_var("INTROSPECTD_PORT", DEFAULT_PORT)
}

/// Worker-pool size. Overridden by `INTROSPECTD_WORKERS`.
pub fn workers() -> usize {
    parse_var("INTROSPECTD_WORKERS", DEFAULT_WORKERS)
}

/// Resolved size limits for this process, reading all three env vars.
pub fn limits() -> Limits {
    Limits {
        capture_max: parse_var("INTROSPECTD_CAPTURE_MAX", DEFAULT_CAPTURE_MAX),
        proc_max: parse_var("INTROSPECTD_PROC_MAX", DEFAULT_PROC_MAX),
        max_conn_buffer: parse_var("INTROSPECTD_MAX_CONN_BUFFER", DEFAULT_MAX_CONN_BUFFER),
    }
}

/// Server-side logging verbosity: 0 = silent, 1 = method names, >=2 = full
/// request/response dumps. Does not affect wire behaviour.
pub fn jrpc_debug() -> u8 {
    parse_var("JRPC_DEBUG", 0)
}
