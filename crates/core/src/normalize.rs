//! Response normalization
//!
//! The AIR API reports failures two ways: a 4xx/5xx status with an error body,
//! or a 200 response whose body carries `success: false`. Both collapse into a
//! single [`OperationResult`] here so callers never look at status codes.

use serde_json::Value;

use crate::error::OperationError;

/// Fallback message when a `success: false` body carries no errors
pub const DEFAULT_FAILURE_MESSAGE: &str = "API request failed";

// =============================================================================
// Transport-facing types
// =============================================================================

/// A response as received from the wire, before any interpretation
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Value,
}

impl RawResponse {
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    /// Build from a text body, parsing JSON when possible
    pub fn from_text(status: u16, text: &str) -> Self {
        let body = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
        };
        Self { status, body }
    }

    /// Build from a body that was requested as a document (HTML or text).
    ///
    /// Error statuses and JSON content types still go through
    /// [`RawResponse::from_text`] so the API's own error bodies are kept.
    pub fn from_document(status: u16, content_type: Option<&str>, text: &str) -> Self {
        if status >= 400 || content_type.is_some_and(is_json_content_type) {
            Self::from_text(status, text)
        } else {
            Self::new(status, Value::String(text.to_string()))
        }
    }
}

fn is_json_content_type(content_type: &str) -> bool {
    content_type
        .split(';')
        .next()
        .map(|mime| mime.trim().to_ascii_lowercase())
        .is_some_and(|mime| mime == "application/json" || mime.ends_with("+json"))
}

/// No usable response reached the caller (DNS, connection refused, timeout)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportFailure {
    pub message: String,
    pub status: Option<u16>,
}

impl TransportFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: None,
        }
    }
}

pub type TransportOutcome = Result<RawResponse, TransportFailure>;

// =============================================================================
// Operation result
// =============================================================================

/// Outcome of one API operation; exactly one variant is populated
#[derive(Debug, Clone, PartialEq)]
pub enum OperationResult {
    Success {
        payload: Value,
    },
    ApiError {
        messages: Vec<String>,
        status: u16,
    },
    TransportError {
        message: String,
        status: Option<u16>,
    },
}

impl OperationResult {
    pub fn is_success(&self) -> bool {
        matches!(self, OperationResult::Success { .. })
    }

    /// Convert into a `Result`, attaching the operation name to failures
    pub fn into_result(self, operation: &str) -> Result<Value, OperationError> {
        match self {
            OperationResult::Success { payload } => Ok(payload),
            OperationResult::ApiError { messages, status } => Err(OperationError::Api {
                operation: operation.to_string(),
                messages,
                status,
            }),
            OperationResult::TransportError { message, status } => Err(OperationError::Transport {
                operation: operation.to_string(),
                message,
                status,
            }),
        }
    }
}

// =============================================================================
// Normalization
// =============================================================================

/// Normalize a transport outcome, including the "no response" case
pub fn normalize_outcome(outcome: TransportOutcome) -> OperationResult {
    match outcome {
        Ok(raw) => normalize(&raw),
        Err(failure) => OperationResult::TransportError {
            message: failure.message,
            status: failure.status,
        },
    }
}

/// Classify a received response as success or API failure
pub fn normalize(raw: &RawResponse) -> OperationResult {
    if raw.status >= 400 {
        return OperationResult::ApiError {
            messages: error_messages(&raw.body, raw.status),
            status: raw.status,
        };
    }

    if let Some(false) = raw.body.get("success").and_then(Value::as_bool) {
        let messages = non_empty_array(&raw.body, "errors")
            .unwrap_or_else(|| vec![DEFAULT_FAILURE_MESSAGE.to_string()]);
        let status = raw
            .body
            .get("statusCode")
            .and_then(Value::as_u64)
            .and_then(|code| u16::try_from(code).ok())
            .unwrap_or(raw.status);

        return OperationResult::ApiError { messages, status };
    }

    OperationResult::Success {
        payload: raw.body.clone(),
    }
}

/// Error messages of a 4xx/5xx body, in priority order
fn error_messages(body: &Value, status: u16) -> Vec<String> {
    non_empty_array(body, "message")
        .or_else(|| non_empty_array(body, "errors"))
        .or_else(|| scalar_message(body, "error"))
        .or_else(|| scalar_message(body, "message"))
        .unwrap_or_else(|| vec![format!("API request failed with status {status}")])
}

fn non_empty_array(body: &Value, key: &str) -> Option<Vec<String>> {
    let items = body.get(key)?.as_array()?;
    if items.is_empty() {
        return None;
    }
    Some(items.iter().map(render_message).collect())
}

fn scalar_message(body: &Value, key: &str) -> Option<Vec<String>> {
    match body.get(key)? {
        Value::String(s) if !s.trim().is_empty() => Some(vec![s.clone()]),
        Value::Null | Value::Array(_) | Value::String(_) => None,
        other => Some(vec![other.to_string()]),
    }
}

fn render_message(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
