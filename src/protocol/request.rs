//! Request and Response message types.
//!
//! Defines the JSON bodies exchanged with the `/json` endpoint.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::identifiers::RequestId;

// ============================================================================
// Constants
// ============================================================================

/// Error code of client-synthesised transport failures.
pub const TRANSPORT_ERROR_CODE: i64 = 255;

/// Server error code: the session is missing or expired.
pub const NOT_AUTHENTICATED_CODE: i64 = 1;

/// Server error code: the method is not exported.
pub const UNKNOWN_METHOD_CODE: i64 = 2;

/// Server error code: the method raised while executing.
pub const CALL_RAISED_CODE: i64 = 3;

/// Server error code: the deferred call failed.
pub const CALL_FAILED_CODE: i64 = 4;

/// Server error code: the request body was rejected.
pub const BAD_REQUEST_CODE: i64 = 5;

// ============================================================================
// Request
// ============================================================================

/// A call from the client to the server.
///
/// # Format
///
/// ```json
/// { "method": "core.get_torrents_status", "params": [{}, ["name"]], "id": 3 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    /// Dotted `namespace.method` name.
    pub method: String,

    /// Positional parameters.
    pub params: Vec<Value>,

    /// Request id, echoed by the server.
    pub id: RequestId,
}

impl Request {
    /// Creates a new request.
    #[inline]
    #[must_use]
    pub fn new(id: RequestId, method: impl Into<String>, params: Vec<Value>) -> Self {
        Self {
            method: method.into(),
            params,
            id,
        }
    }
}

// ============================================================================
// Response
// ============================================================================

/// A response from the server, or a client-synthesised transport failure.
///
/// # Format
///
/// Success:
/// ```json
/// { "result": 42, "error": null, "id": 0 }
/// ```
///
/// Error:
/// ```json
/// { "result": null, "error": { "message": "Unknown method", "code": 2 }, "id": 0 }
/// ```
///
/// A `null` or absent `error` means success.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    /// Call result (absent or `null` on error).
    #[serde(default)]
    pub result: Option<Value>,

    /// Server-defined error object.
    #[serde(default)]
    pub error: Option<RpcError>,

    /// Echoed request id (`null` when the server could not read it).
    #[serde(default)]
    pub id: Option<RequestId>,
}

impl Response {
    /// Creates a success response.
    #[inline]
    #[must_use]
    pub fn success(id: RequestId, result: Value) -> Self {
        Self {
            result: Some(result),
            error: None,
            id: Some(id),
        }
    }

    /// Creates the uniform object for an HTTP-level failure.
    ///
    /// ```json
    /// { "id": 3, "result": null, "error": { "message": "HTTP: 500 Internal Server Error", "code": 255 } }
    /// ```
    #[must_use]
    pub fn transport_failure(id: RequestId, status: u16, status_text: &str) -> Self {
        Self {
            result: None,
            error: Some(RpcError::transport(status, status_text)),
            id: Some(id),
        }
    }

    /// Returns `true` if the response carries an error.
    #[inline]
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// Returns the result value, `Null` when absent.
    #[inline]
    #[must_use]
    pub fn result(&self) -> &Value {
        self.result.as_ref().unwrap_or(&Value::Null)
    }
}

// ============================================================================
// RpcError
// ============================================================================

/// Error object reported by the server.
///
/// The shape is server-defined, so the raw JSON is kept untouched and
/// only the conventional `message` and `code` fields get accessors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RpcError(Value);

impl RpcError {
    /// Creates an error object with `message` and `code`.
    #[must_use]
    pub fn new(message: impl Into<String>, code: i64) -> Self {
        Self(json!({ "message": message.into(), "code": code }))
    }

    /// Creates the synthesised transport error object.
    #[must_use]
    pub fn transport(status: u16, status_text: &str) -> Self {
        let message = format!("HTTP: {status} {status_text}");
        Self::new(message.trim_end(), TRANSPORT_ERROR_CODE)
    }

    /// Wraps a raw error value.
    #[inline]
    #[must_use]
    pub fn from_value(value: Value) -> Self {
        Self(value)
    }

    /// Returns the raw error value.
    #[inline]
    #[must_use]
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Returns the `message` field, if present.
    #[inline]
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.0.get("message").and_then(Value::as_str)
    }

    /// Returns the `code` field, if present.
    #[inline]
    #[must_use]
    pub fn code(&self) -> Option<i64> {
        self.0.get("code").and_then(Value::as_i64)
    }

    /// Returns `true` for client-synthesised transport failures.
    #[inline]
    #[must_use]
    pub fn is_transport(&self) -> bool {
        self.code() == Some(TRANSPORT_ERROR_CODE)
    }

    /// Returns `true` when the server rejected the session.
    #[inline]
    #[must_use]
    pub fn is_not_authenticated(&self) -> bool {
        self.code() == Some(NOT_AUTHENTICATED_CODE)
    }
}

impl fmt::Display for RpcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.message(), self.code()) {
            (Some(message), Some(code)) => write!(f, "{message} (code {code})"),
            (Some(message), None) => f.write_str(message),
            _ => write!(f, "{}", self.0),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serialization() {
        let request = Request::new(RequestId::new(0), "foo.bar", vec![json!(1), json!(2)]);
        let json = serde_json::to_string(&request).expect("serialize");
        assert_eq!(json, r#"{"method":"foo.bar","params":[1,2],"id":0}"#);
    }

    #[test]
    fn test_request_empty_params() {
        let request = Request::new(RequestId::new(5), "system.listMethods", Vec::new());
        let value = serde_json::to_value(&request).expect("serialize");
        assert_eq!(value["params"], json!([]));
    }

    #[test]
    fn test_success_response() {
        let response: Response =
            serde_json::from_str(r#"{"result": 42, "error": null, "id": 0}"#).expect("parse");
        assert!(!response.is_error());
        assert_eq!(response.result(), &json!(42));
        assert_eq!(response.id, Some(RequestId::new(0)));
    }

    #[test]
    fn test_success_response_without_error_field() {
        let response: Response = serde_json::from_str(r#"{"result": "x", "id": 1}"#).expect("parse");
        assert!(!response.is_error());
        assert_eq!(response.result(), &json!("x"));
    }

    #[test]
    fn test_error_response_passes_shape_through() {
        let text = r#"{"result": null, "error": {"message": "Not authenticated", "code": 1, "detail": [1]}, "id": 7}"#;
        let response: Response = serde_json::from_str(text).expect("parse");

        let error = response.error.as_ref().expect("error");
        assert!(error.is_not_authenticated());
        assert_eq!(error.message(), Some("Not authenticated"));
        assert_eq!(error.as_value()["detail"], json!([1]));
        assert_eq!(response.result(), &Value::Null);
    }

    #[test]
    fn test_null_id_response() {
        let text = r#"{"result": null, "error": {"message": "JSONException: bad", "code": 5}, "id": null}"#;
        let response: Response = serde_json::from_str(text).expect("parse");
        assert_eq!(response.id, None);
        assert_eq!(response.error.expect("error").code(), Some(BAD_REQUEST_CODE));
    }

    #[test]
    fn test_transport_failure_shape() {
        let response = Response::transport_failure(RequestId::new(3), 500, "Internal Server Error");
        let value = serde_json::to_value(&response).expect("serialize");
        assert_eq!(
            value,
            json!({
                "id": 3,
                "result": null,
                "error": { "message": "HTTP: 500 Internal Server Error", "code": 255 }
            })
        );
        assert!(response.error.expect("error").is_transport());
    }

    #[test]
    fn test_transport_error_without_reason_has_no_trailing_space() {
        let error = RpcError::transport(0, "");
        assert_eq!(error.message(), Some("HTTP: 0"));
    }

    #[test]
    fn test_rpc_error_display() {
        assert_eq!(
            RpcError::new("Unknown method", 2).to_string(),
            "Unknown method (code 2)"
        );
        assert_eq!(RpcError::from_value(json!("boom")).to_string(), "\"boom\"");
    }
}
