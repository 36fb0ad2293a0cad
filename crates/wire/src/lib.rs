//! Wire protocol for the introspection daemon.
//!
//! Pure parsing/encoding, no I/O: one complete JSON-RPC value in, one
//! [`Response`] out. The connection-framing state machine in [`framing`]
//! is what a caller drives against bytes read off a socket.

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod error;
mod framing;
mod request;
mod response;

pub use error::ProtocolError;
pub use framing::{ConnBuf, Frame};
pub use request::PendingRequest;
pub use response::{error_code, ErrorObject, Id, Response};
