//! Response envelope: either `{"result": ..., "id": ...}` or
//! `{"error": {"code", "message"}, "id": ...}`. The two shapes never share
//! a field, so this is modeled as an untagged enum rather than one struct
//! with optional fields.

use serde::Serialize;

/// JSON-RPC error codes this daemon emits. The registry may add
/// procedure-specific codes on top of these.
pub mod error_code {
    pub const PARSE_ERROR: i64 = -32700;
    pub const INVALID_REQUEST: i64 = -32600;
    pub const METHOD_NOT_FOUND: i64 = -32601;
}

/// Request/response correlation id. `Null` covers both "absent in the
/// request" and a client-supplied JSON null.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Id {
    Str(String),
    Num(serde_json::Number),
    Null,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorObject {
    pub code: i64,
    pub message: String,
}

/// Outcome of one RPC call, ready to be serialized back onto the wire.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Response {
    Result {
        /// `None` serializes as JSON `null` — a probe may legitimately
        /// fail to produce a payload (e.g. a `/proc` file that doesn't
        /// exist on this kernel) without that being a protocol error.
        result: Option<String>,
        id: Id,
    },
    Error {
        error: ErrorObject,
        id: Id,
    },
}

impl Response {
    pub fn result(id: Id, result: Option<String>) -> Self {
        Response::Result { result, id }
    }

    pub fn error(id: Id, code: i64, message: impl Into<String>) -> Self {
        Response::Error { error: ErrorObject { code, message: message.into() }, id }
    }

    pub fn parse_error() -> Self {
        Response::error(
            Id::Null,
            error_code::PARSE_ERROR,
            "Parse error. Invalid JSON was received by the server.",
        )
    }

    pub fn invalid_request(id: Id) -> Self {
        Response::error(
            id,
            error_code::INVALID_REQUEST,
            "The JSON sent is not a valid Request object.",
        )
    }

    pub fn method_not_found(id: Id) -> Self {
        Response::error(id, error_code::METHOD_NOT_FOUND, "Method not found.")
    }

    /// Serialize as `<json-value>\n` — the trailing newline is part of the
    /// wire framing (§4.4), not of the JSON encoding itself.
    pub fn to_bytes(&self) -> serde_json::Result<Vec<u8>> {
        let mut bytes = serde_json::to_vec(self)?;
        bytes.push(b'\n');
        Ok(bytes)
    }
}

#[cfg(test)]
#[path = "response_tests.rs"]
mod tests;
