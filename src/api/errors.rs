use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};

use crate::domain::user::UserError;

/// Body key carrying the human-readable text of an error envelope
///
/// Classified failures report under `error`; plain misses (unknown user,
/// unknown route) report under `message`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKey {
    Message,
    Error,
}

impl MessageKey {
    fn as_str(&self) -> &'static str {
        match self {
            MessageKey::Message => "message",
            MessageKey::Error => "error",
        }
    }
}

/// Diagnostic detail attached to an error response
///
/// Stored in the response extensions, never in the body. The diagnostics
/// layer decides whether it is exposed.
#[derive(Debug, Clone)]
pub struct ErrorDiagnostic {
    pub body: Value,
    pub trace: String,
}

/// API error type with HTTP status code and message
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub key: MessageKey,
    pub trace: Option<String>,
}

impl ApiError {
    /// Creates a new API error reported under the `error` key
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            key: MessageKey::Error,
            trace: None,
        }
    }

    /// Creates a 400 Bad Request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// Creates a 404 Not Found error reported under the `message` key
    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            key: MessageKey::Message,
            ..Self::new(StatusCode::NOT_FOUND, message)
        }
    }

    /// Creates a 500 Internal Server Error
    pub fn internal_server_error(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn with_trace(mut self, trace: impl Into<String>) -> Self {
        self.trace = Some(trace.into());
        self
    }

    fn body(&self) -> Value {
        let mut body = json!({ "success": false });
        body[self.key.as_str()] = Value::String(self.message.clone());
        body
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = self.body();
        let mut response = (self.status, Json(body.clone())).into_response();

        if let Some(trace) = self.trace {
            response
                .extensions_mut()
                .insert(ErrorDiagnostic { body, trace });
        }

        response
    }
}

/// Error classifier
///
/// Precedence: malformed id, duplicate key, validation, then everything else
/// as a 500. Misses on well-formed ids map to 404 under `message`.
impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        let classified = match &err {
            UserError::MalformedId(_) => {
                ApiError::new(StatusCode::NOT_FOUND, "Resource not found")
            }
            UserError::DuplicateKey(_) => ApiError::bad_request("Data already exists"),
            UserError::Validation(messages) => ApiError::bad_request(messages.join(", ")),
            UserError::NotFound(_) => ApiError::not_found("User not found"),
            UserError::InvalidRecord(_) | UserError::Database(_) => {
                ApiError::internal_server_error("Server error")
            }
        };

        if classified.status.is_server_error() {
            tracing::error!(error = %err, "request failed");
        } else {
            tracing::warn!(error = %err, status = %classified.status, "request rejected");
        }

        classified.with_trace(format!("{err:?}"))
    }
}
