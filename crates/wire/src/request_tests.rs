use serde_json::json;

use super::*;
use crate::Response;

#[test]
fn accepts_minimal_request_with_no_params_or_id() {
    let v = json!({"method": "say_hello"});
    let req = PendingRequest::from_value(&v).expect("should validate");
    assert_eq!(req.method, "say_hello");
    assert_eq!(req.params, None);
    assert_eq!(req.id, Id::Null);
}

#[test]
fn accepts_array_params() {
    let v = json!({"method": "get_cpuinfo", "params": [], "id": 7});
    let req = PendingRequest::from_value(&v).expect("should validate");
    assert_eq!(req.params, Some(json!([])));
    assert_eq!(req.id, Id::Num(serde_json::Number::from(7)));
}

#[test]
fn accepts_object_params() {
    let v = json!({"method": "get_cpuinfo", "params": {"a": 1}, "id": "xyz"});
    let req = PendingRequest::from_value(&v).expect("should validate");
    assert_eq!(req.params, Some(json!({"a": 1})));
    assert_eq!(req.id, Id::Str("xyz".to_string()));
}

#[yare::parameterized(
    non_object_envelope = { json!([1, 2, 3]) },
    missing_method       = { json!({"id": 1}) },
    non_string_method    = { json!({"method": 5}) },
    scalar_params        = { json!({"method": "say_hello", "params": "oops"}) },
    boolean_id           = { json!({"method": "say_hello", "id": true}) },
)]
fn rejects_malformed_envelope(value: serde_json::Value) {
    let err = PendingRequest::from_value(&value).unwrap_err();
    match err {
        Response::Error { id, .. } => assert_eq!(id, Id::Null),
        other => panic!("expected Error, got {other:?}"),
    }
}

#[test]
fn invalid_request_always_carries_null_id_even_when_client_supplied_one() {
    let v = json!({"id": "abc-123"});
    let err = PendingRequest::from_value(&v).unwrap_err();
    match err {
        Response::Error { id, .. } => assert_eq!(id, Id::Null),
        other => panic!("expected Error, got {other:?}"),
    }
}
