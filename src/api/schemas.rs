//! OpenAPI-only descriptions of the response envelopes.
//!
//! [`ApiResponse`](crate::api::envelope::ApiResponse) is generic and error
//! bodies are built as JSON values, so these concrete shapes exist solely to
//! document what clients receive.

use serde::Serialize;
use utoipa::ToSchema;

use crate::api::envelope::{EmptyData, Pagination};
use crate::api::handlers::users::UserResponse;

/// Envelope carrying a single user
#[derive(Serialize, ToSchema)]
pub struct UserEnvelope {
    #[schema(example = true)]
    pub success: bool,
    #[schema(example = "User retrieved successfully")]
    pub message: String,
    pub data: UserResponse,
}

/// Envelope carrying a page of users
#[derive(Serialize, ToSchema)]
pub struct UserListEnvelope {
    #[schema(example = true)]
    pub success: bool,
    #[schema(example = "Users retrieved successfully")]
    pub message: String,
    pub data: Vec<UserResponse>,
    pub pagination: Pagination,
}

/// Envelope returned after a delete
#[derive(Serialize, ToSchema)]
pub struct DeletedEnvelope {
    #[schema(example = true)]
    pub success: bool,
    #[schema(example = "User deleted successfully")]
    pub message: String,
    pub data: EmptyData,
}

/// Error envelope
///
/// Classified failures carry `error`; misses carry `message`. `trace` is only
/// present outside production.
#[derive(Serialize, ToSchema)]
pub struct ErrorEnvelope {
    #[schema(example = false)]
    pub success: bool,
    #[schema(example = "User not found")]
    pub message: Option<String>,
    #[schema(example = "Data already exists")]
    pub error: Option<String>,
    pub trace: Option<String>,
}

/// Liveness probe body
#[derive(Serialize, ToSchema)]
pub struct HealthEnvelope {
    #[schema(example = true)]
    pub success: bool,
    #[schema(example = "Server is running")]
    pub message: String,
    #[schema(example = "development")]
    pub environment: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}
