use std::sync::Arc;

use serde_json::json;

use super::*;
use introspectd_wire::Id;

fn ctx() -> ConnectionCtx {
    ConnectionCtx {
        registry: Arc::new(Registry::with_standard_catalogue().unwrap()),
        limits: Limits::default(),
        debug: 0,
    }
}

#[test]
fn say_hello_round_trip() {
    let ctx = ctx();
    let value = json!({"method": "SayHello", "id": 1});
    let response = evaluate(&value, &ctx);
    match response {
        Response::Result { result, id } => {
            assert_eq!(result.unwrap(), "Hello!lepdendstring");
            assert_eq!(id, Id::Num(serde_json::Number::from(1)));
        }
        other => panic!("expected Result, got {other:?}"),
    }
}

#[test]
fn unknown_method_is_method_not_found_with_echoed_id() {
    let ctx = ctx();
    let value = json!({"method": "X", "id": 7});
    let response = evaluate(&value, &ctx);
    match response {
        Response::Error { error, id } => {
            assert_eq!(error.code, introspectd_wire::error_code::METHOD_NOT_FOUND);
            assert_eq!(id, Id::Num(serde_json::Number::from(7)));
        }
        other => panic!("expected Error, got {other:?}"),
    }
}

#[test]
fn missing_method_is_invalid_request_with_null_id() {
    let ctx = ctx();
    let value = json!({"id": 3});
    let response = evaluate(&value, &ctx);
    match response {
        Response::Error { error, id } => {
            assert_eq!(error.code, introspectd_wire::error_code::INVALID_REQUEST);
            assert_eq!(id, Id::Null);
        }
        other => panic!("expected Error, got {other:?}"),
    }
}
