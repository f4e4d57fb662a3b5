//! Error envelope normalisation and the client error taxonomy.
//!
//! Every non-2xx response body is folded into one [`ErrorEnvelope`] shape
//! before it reaches a caller, whichever of the two backend conventions
//! produced it: the native `{error_code, message, details?}` envelope or the
//! FastAPI `{detail}` validation payload. Transport failures never carry a
//! body and map onto dedicated [`ClientError`] variants instead.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Envelope code for bodies following the FastAPI `{detail}` convention.
pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
/// Envelope code for bodies the normaliser cannot classify.
pub const UNKNOWN_ERROR: &str = "UNKNOWN_ERROR";

const PREVIEW_CHAR_LIMIT: usize = 160;

/// Normalised error payload surfaced to views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    /// Stable machine-readable code, e.g. `TERM_NOT_FOUND`.
    pub error_code: String,
    /// Human-readable message.
    pub message: String,
    /// Supplementary structured details.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl ErrorEnvelope {
    /// Build an envelope with no details.
    pub fn new(error_code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error_code: error_code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Attach structured details.
    #[must_use]
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }
}

impl std::fmt::Display for ErrorEnvelope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Failures surfaced by the service clients.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClientError {
    /// The server answered with a non-2xx status.
    #[error("request failed with status {status}: {envelope}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Normalised error body.
        envelope: ErrorEnvelope,
    },
    /// The session could not be re-established; the caller must log in again.
    #[error("session expired, please sign in again")]
    SessionExpired,
    /// The request never completed.
    #[error("network error: {message}")]
    Transport {
        /// Transport-level description.
        message: String,
    },
    /// The request exceeded the configured timeout.
    #[error("request timed out: {message}")]
    Timeout {
        /// Timeout description.
        message: String,
    },
    /// A 2xx body did not match the expected shape.
    #[error("failed to decode response: {message}")]
    Decode {
        /// Decoder description.
        message: String,
    },
}

impl ClientError {
    /// Helper for transport failures.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Helper for timeouts.
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Timeout {
            message: message.into(),
        }
    }

    /// Helper for decode failures.
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Whether this error denotes an unauthorized response.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Api { status: 401, .. } | Self::SessionExpired)
    }

    /// The HTTP status, when the server produced one.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Fold a non-2xx body into the canonical envelope.
///
/// Recognises the native envelope, the FastAPI `{detail}` shape (string or
/// array of `{msg}` objects), any other JSON object, and non-JSON bodies,
/// in that order.
#[must_use]
pub fn normalize_error_body(status: u16, body: &[u8]) -> ErrorEnvelope {
    let Ok(value) = serde_json::from_slice::<Value>(body) else {
        return ErrorEnvelope::new(UNKNOWN_ERROR, status_message(status, body));
    };

    if let Some(code) = value.get("error_code").and_then(Value::as_str) {
        let message = value
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("request failed")
            .to_owned();
        let mut envelope = ErrorEnvelope::new(code, message);
        if let Some(details) = value.get("details") {
            if !details.is_null() {
                envelope = envelope.with_details(details.clone());
            }
        }
        return envelope;
    }

    if let Some(detail) = value.get("detail") {
        return ErrorEnvelope::new(VALIDATION_ERROR, detail_message(detail))
            .with_details(detail.clone());
    }

    let message = value
        .get("message")
        .and_then(Value::as_str)
        .map_or_else(|| format!("HTTP {status}"), str::to_owned);
    ErrorEnvelope::new(UNKNOWN_ERROR, message).with_details(value)
}

fn detail_message(detail: &Value) -> String {
    match detail {
        Value::String(text) => text.clone(),
        Value::Array(entries) => entries
            .iter()
            .map(|entry| {
                entry
                    .get("msg")
                    .and_then(Value::as_str)
                    .map_or_else(|| entry.to_string(), str::to_owned)
            })
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_string(),
    }
}

fn status_message(status: u16, body: &[u8]) -> String {
    let preview = body_preview(body);
    if preview.is_empty() {
        format!("HTTP {status}")
    } else {
        format!("HTTP {status}: {preview}")
    }
}

/// Whitespace-collapsed, length-capped body excerpt for diagnostics.
#[must_use]
pub fn body_preview(body: &[u8]) -> String {
    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}

#[cfg(test)]
mod tests {
    //! Coverage for folding backend error conventions into one envelope.

    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[test]
    fn keeps_native_envelope_fields() {
        let body = json!({
            "error_code": "TERM_NOT_FOUND",
            "message": "term 42 does not exist",
            "details": { "term_id": 42 }
        });

        let envelope = normalize_error_body(404, body.to_string().as_bytes());
        assert_eq!(envelope.error_code, "TERM_NOT_FOUND");
        assert_eq!(envelope.message, "term 42 does not exist");
        assert_eq!(envelope.details, Some(json!({ "term_id": 42 })));
    }

    #[test]
    fn joins_fastapi_detail_array() {
        let body = json!({
            "detail": [
                { "loc": ["body", "email"], "msg": "value is not a valid email" },
                { "loc": ["body", "password"], "msg": "ensure this value has at least 8 characters" }
            ]
        });

        let envelope = normalize_error_body(422, body.to_string().as_bytes());
        assert_eq!(envelope.error_code, VALIDATION_ERROR);
        assert_eq!(
            envelope.message,
            "value is not a valid email, ensure this value has at least 8 characters"
        );
        assert!(envelope.details.is_some(), "raw detail rides along");
    }

    #[test]
    fn passes_fastapi_string_detail_through() {
        let envelope = normalize_error_body(400, br#"{"detail": "Unsupported format"}"#);
        assert_eq!(envelope.error_code, VALIDATION_ERROR);
        assert_eq!(envelope.message, "Unsupported format");
    }

    #[rstest]
    #[case::html(b"<html>Bad Gateway</html>".as_slice(), "HTTP 502: <html>Bad Gateway</html>")]
    #[case::empty(b"".as_slice(), "HTTP 502")]
    fn falls_back_to_status_preview_for_non_json(#[case] body: &[u8], #[case] expected: &str) {
        let envelope = normalize_error_body(502, body);
        assert_eq!(envelope.error_code, UNKNOWN_ERROR);
        assert_eq!(envelope.message, expected);
    }

    #[test]
    fn classifies_unrecognised_json_as_unknown() {
        let envelope = normalize_error_body(500, br#"{"oops": true}"#);
        assert_eq!(envelope.error_code, UNKNOWN_ERROR);
        assert_eq!(envelope.message, "HTTP 500");
        assert_eq!(envelope.details, Some(json!({ "oops": true })));
    }

    #[test]
    fn caps_long_previews() {
        let long_body = "x".repeat(400);
        let envelope = normalize_error_body(500, long_body.as_bytes());
        assert!(
            envelope.message.ends_with("..."),
            "long bodies are truncated with an ellipsis"
        );
    }

    #[test]
    fn unauthorized_detection_covers_both_shapes() {
        let api = ClientError::Api {
            status: 401,
            envelope: ErrorEnvelope::new("UNAUTHORIZED", "token expired"),
        };
        assert!(api.is_unauthorized());
        assert!(ClientError::SessionExpired.is_unauthorized());
        assert!(!ClientError::transport("offline").is_unauthorized());
    }
}
