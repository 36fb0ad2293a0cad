/// Failure modes of the framing layer itself (not wire-level JSON-RPC
/// errors, which travel as [`crate::Response::Error`] values instead).
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("connection buffer exceeded its configured cap")]
    BufferOverflow,
}
