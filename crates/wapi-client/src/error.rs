//! WAPI client errors

use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// Errors that can occur when interacting with the WAPI
#[derive(Debug, Error)]
pub enum WapiError {
    /// Caller supplied an invalid parameter combination
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Paged read returned more records than a negative `max_results` allows
    #[error("Result set of {actual} exceeds the max_results limit of {limit}.")]
    LimitExceeded {
        /// Configured limit (magnitude of `max_results`)
        limit: u64,
        /// Number of records observed before the loop stopped
        actual: usize,
    },

    /// WAPI answered with a non-2xx status
    #[error("WAPI error: {0}")]
    RemoteRequestFailed(ApiError),

    /// HTTP transport error (connect, TLS, timeout)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Missing or malformed client configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl From<ApiError> for WapiError {
    fn from(err: ApiError) -> Self {
        WapiError::RemoteRequestFailed(err)
    }
}

/// Error record extracted from a failed WAPI response.
///
/// Built once by [`ApiError::from_response`] and never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiError {
    /// HTTP status code
    pub status_code: u16,
    /// Best-effort human-readable message
    pub message: String,
    /// Server-supplied error code (the status code for non-JSON bodies)
    pub code: Option<Value>,
    /// Server-supplied error text (the raw body for non-JSON bodies)
    pub text: Option<String>,
}

impl ApiError {
    /// Translate a non-2xx response into an error record.
    ///
    /// A JSON object body yields the server's `Error`, `code` and `text`
    /// fields. Anything else falls back to a status-specific message with the
    /// raw body kept as `text`.
    pub fn from_response(status_code: u16, body: &str) -> Self {
        match serde_json::from_str::<Value>(body) {
            Ok(Value::Object(err)) => Self {
                status_code,
                message: err
                    .get("Error")
                    .map(|v| match v {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    })
                    .unwrap_or_else(|| "Unknown error".to_string()),
                code: err.get("code").cloned().filter(|v| !v.is_null()),
                text: err.get("text").and_then(|v| match v {
                    Value::String(s) => Some(s.clone()),
                    Value::Null => None,
                    other => Some(other.to_string()),
                }),
            },
            Ok(_) | Err(_) => {
                let message = if status_code == 401 {
                    "Invalid credentials or insufficient permissions".to_string()
                } else {
                    format!("Unknown error (non-JSON response): {}", body)
                };
                Self {
                    status_code,
                    message,
                    code: Some(Value::from(status_code)),
                    text: Some(body.to_string()),
                }
            }
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.status_code, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_body_fields_are_extracted() {
        let body = r#"{"Error": "AdmConDataNotFoundError: Reference not found", "code": "Client.Ibap.Data.NotFound", "text": "Reference record:host/abc not found"}"#;
        let err = ApiError::from_response(404, body);

        assert_eq!(err.status_code, 404);
        assert_eq!(err.message, "AdmConDataNotFoundError: Reference not found");
        assert_eq!(err.code, Some(Value::from("Client.Ibap.Data.NotFound")));
        assert_eq!(err.text.as_deref(), Some("Reference record:host/abc not found"));
        assert_eq!(err.to_string(), "404: AdmConDataNotFoundError: Reference not found");
    }

    #[test]
    fn test_json_body_without_error_field() {
        let err = ApiError::from_response(400, r#"{"code": "Client.Ibap.Proto"}"#);

        assert_eq!(err.message, "Unknown error");
        assert_eq!(err.code, Some(Value::from("Client.Ibap.Proto")));
        assert!(err.text.is_none());
    }

    #[test]
    fn test_unauthorized_non_json_body() {
        let err = ApiError::from_response(401, "<html>Authorization Required</html>");

        assert_eq!(err.message, "Invalid credentials or insufficient permissions");
        assert_eq!(err.code, Some(Value::from(401)));
        assert_eq!(err.text.as_deref(), Some("<html>Authorization Required</html>"));
    }

    #[test]
    fn test_generic_non_json_body() {
        let unauthorized = ApiError::from_response(401, "oops");
        let err = ApiError::from_response(502, "Bad Gateway");

        assert_eq!(err.message, "Unknown error (non-JSON response): Bad Gateway");
        assert_eq!(err.code, Some(Value::from(502)));
        assert_ne!(err.message, unauthorized.message);
    }

    #[test]
    fn test_limit_exceeded_message() {
        let err = WapiError::LimitExceeded { limit: 2, actual: 3 };
        assert_eq!(
            err.to_string(),
            "Result set of 3 exceeds the max_results limit of 2."
        );
    }
}
