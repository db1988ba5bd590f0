use thiserror::Error;

use super::user::UserId;

/// Failures surfaced by the user domain and its record stores
#[derive(Debug, Error)]
pub enum UserError {
    /// One message per violated field rule, in field order
    #[error("{}", .0.join(", "))]
    Validation(Vec<String>),

    #[error("Email already registered: {0}")]
    DuplicateKey(String),

    #[error("User not found: {0}")]
    NotFound(UserId),

    #[error("Malformed user id: {0}")]
    MalformedId(String),

    #[error("Stored record is invalid: {0}")]
    InvalidRecord(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl UserError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(vec![message.into()])
    }
}

pub type UserResult<T> = Result<T, UserError>;
