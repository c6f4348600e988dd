//! Custom test assertions

use actix_web::http::StatusCode;
use serde_json::Value;

/// Assert an error envelope's status, code and optional redirect
pub fn assert_error(status: StatusCode, body: &Value, expected: StatusCode, code: &str) {
    assert_eq!(status, expected, "unexpected status, body: {}", body);
    assert_eq!(body["error"]["code"], code, "unexpected code, body: {}", body);
}

/// Assert the redirect carried by an error envelope
pub fn assert_redirect(body: &Value, path: &str) {
    assert_eq!(
        body["error"]["redirect"], path,
        "unexpected redirect, body: {}",
        body
    );
}

/// Unwrap the `data` field of a success envelope
pub fn data(body: &Value) -> &Value {
    assert_eq!(body["success"], true, "expected success, body: {}", body);
    &body["data"]
}
