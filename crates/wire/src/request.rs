//! Validating the envelope of one decoded JSON value against the subset
//! of JSON-RPC this daemon accepts: `method` (string, required), `params`
//! (array or object, optional), `id` (string or number, optional).
//!
//! This is deliberately not a `Deserialize` impl — the three fields have
//! independent validity rules and a derive would either reject valid
//! requests or accept invalid ones silently.

use serde_json::Value;

use crate::response::Id;
use crate::Response;

/// A request that has passed envelope validation and is ready for
/// procedure lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingRequest {
    pub method: String,
    pub params: Option<Value>,
    pub id: Id,
}

impl PendingRequest {
    /// Validate `value` as a JSON-RPC request object, returning the
    /// ready-to-dispatch error `Response` on any shape violation.
    ///
    /// Per §4.4 step 2, `id` is echoed only once every other field has
    /// also validated — any single violation (missing object, bad
    /// `method`, bad `params`, bad `id`) responds with `id: null`,
    /// never the client-supplied id. This matches the original's
    /// `eval_request()`, which only ever builds `id_copy` inside the
    /// innermost validated branch and otherwise sends `JRPC_INVALID_REQUEST`
    /// with a `NULL` id unconditionally.
    pub fn from_value(value: &Value) -> Result<PendingRequest, Response> {
        let obj = value.as_object().ok_or_else(|| Response::invalid_request(Id::Null))?;

        let id = match obj.get("id") {
            None => Id::Null,
            Some(Value::String(s)) => Id::Str(s.clone()),
            Some(Value::Number(n)) => Id::Num(n.clone()),
            Some(_) => return Err(Response::invalid_request(Id::Null)),
        };

        let method = match obj.get("method") {
            Some(Value::String(m)) => m.clone(),
            _ => return Err(Response::invalid_request(Id::Null)),
        };

        let params = match obj.get("params") {
            None => None,
            Some(v @ Value::Array(_)) | Some(v @ Value::Object(_)) => Some(v.clone()),
            Some(_) => return Err(Response::invalid_request(Id::Null)),
        };

        Ok(PendingRequest { method, params, id })
    }
}

#[cfg(test)]
#[path = "request_tests.rs"]
mod tests;
