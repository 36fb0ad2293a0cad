//! introspectd-core: shared constants and error types for the introspection daemon.

pub mod error;
pub mod limits;

pub use error::DaemonError;
pub use limits::Limits;
