use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::api::envelope::{ApiResponse, EmptyData, Pagination};
use crate::api::errors::ApiError;
use crate::api::middleware::ValidatedJson;
use crate::api::schemas::{DeletedEnvelope, ErrorEnvelope, UserEnvelope, UserListEnvelope};
use crate::api::validation::{CreateUserRequest, UpdateUserRequest};
use crate::domain::repositories::{PageRequest, UserFilter};
use crate::domain::user::{User, UserError, UserId};
use crate::state::AppState;

/// User record as returned by the API
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub department: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id().as_uuid(),
            name: user.name().as_str().to_string(),
            email: user.email().as_str().to_string(),
            phone: user.phone().as_str().to_string(),
            department: user.department().as_str().to_string(),
            is_active: user.is_active(),
            created_at: user.created_at(),
            updated_at: user.updated_at(),
        }
    }
}

/// Query parameters for listing users
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListUsersQuery {
    /// Page number, starting at 1 (default 1; values below 1 read as 1)
    pub page: Option<i64>,
    /// Page size (default 10, capped by the server; values below 1 read as 10)
    pub limit: Option<i64>,
    /// Exact match on the active flag
    pub is_active: Option<bool>,
    /// Case-insensitive substring of the department
    pub department: Option<String>,
    /// Case-insensitive substring of name, email, or department
    pub search: Option<String>,
}

impl ListUsersQuery {
    fn into_parts(self, max_limit: u32) -> (UserFilter, PageRequest) {
        let page = PageRequest::new(self.page, self.limit, max_limit);
        let filter = UserFilter {
            is_active: self.is_active,
            department: self.department,
            search: self.search,
        };
        (filter, page)
    }
}

fn parse_id(raw: &str) -> Result<UserId, ApiError> {
    raw.parse::<UserId>().map_err(ApiError::from)
}

/// Create a new user
///
/// POST /users
#[utoipa::path(
    post,
    path = "/users",
    tag = "users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = UserEnvelope),
        (status = 400, description = "Validation failed or email already exists", body = ErrorEnvelope),
        (status = 500, description = "Server error", body = ErrorEnvelope)
    )
)]
pub async fn create_user(
    State(state): State<AppState>,
    ValidatedJson(new_user): ValidatedJson<CreateUserRequest>,
) -> Result<(StatusCode, Json<ApiResponse<UserResponse>>), ApiError> {
    let user = state.users.create(new_user).await?;

    tracing::info!(user_id = %user.id(), "user created");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(
            "User created successfully",
            UserResponse::from(&user),
        )),
    ))
}

/// List users with filtering and pagination
///
/// GET /users
#[utoipa::path(
    get,
    path = "/users",
    tag = "users",
    params(ListUsersQuery),
    responses(
        (status = 200, description = "Page of users, newest first", body = UserListEnvelope),
        (status = 400, description = "Malformed query string", body = ErrorEnvelope),
        (status = 500, description = "Server error", body = ErrorEnvelope)
    )
)]
pub async fn list_users(
    State(state): State<AppState>,
    query: Result<Query<ListUsersQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<Vec<UserResponse>>>, ApiError> {
    let Query(query) = query.map_err(|rejection| UserError::validation(rejection.body_text()))?;
    let (filter, page) = query.into_parts(state.config.max_page_limit);

    let result = state.users.find(&filter, page).await?;
    let users = result.users.iter().map(UserResponse::from).collect();

    Ok(Json(
        ApiResponse::new("Users retrieved successfully", users)
            .with_pagination(Pagination::new(page, result.total)),
    ))
}

/// Get a user by ID
///
/// GET /users/:id
#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "users",
    params(("id" = String, Path, description = "User ID")),
    responses(
        (status = 200, description = "User found", body = UserEnvelope),
        (status = 404, description = "User not found or malformed ID", body = ErrorEnvelope),
        (status = 500, description = "Server error", body = ErrorEnvelope)
    )
)]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<UserResponse>>, ApiError> {
    let id = parse_id(&id)?;
    let user = state
        .users
        .find_by_id(id)
        .await?
        .ok_or(UserError::NotFound(id))?;

    Ok(Json(ApiResponse::new(
        "User retrieved successfully",
        UserResponse::from(&user),
    )))
}

/// Update a user; absent fields are left unchanged
///
/// PUT /users/:id
#[utoipa::path(
    put,
    path = "/users/{id}",
    tag = "users",
    params(("id" = String, Path, description = "User ID")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = UserEnvelope),
        (status = 400, description = "Validation failed or email already exists", body = ErrorEnvelope),
        (status = 404, description = "User not found or malformed ID", body = ErrorEnvelope),
        (status = 500, description = "Server error", body = ErrorEnvelope)
    )
)]
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(changes): ValidatedJson<UpdateUserRequest>,
) -> Result<Json<ApiResponse<UserResponse>>, ApiError> {
    let id = parse_id(&id)?;
    let user = state
        .users
        .update_by_id(id, changes)
        .await?
        .ok_or(UserError::NotFound(id))?;

    tracing::info!(user_id = %id, "user updated");

    Ok(Json(ApiResponse::new(
        "User updated successfully",
        UserResponse::from(&user),
    )))
}

/// Delete a user
///
/// DELETE /users/:id
#[utoipa::path(
    delete,
    path = "/users/{id}",
    tag = "users",
    params(("id" = String, Path, description = "User ID")),
    responses(
        (status = 200, description = "User deleted", body = DeletedEnvelope),
        (status = 404, description = "User not found or malformed ID", body = ErrorEnvelope),
        (status = 500, description = "Server error", body = ErrorEnvelope)
    )
)]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<EmptyData>>, ApiError> {
    let id = parse_id(&id)?;
    state
        .users
        .delete_by_id(id)
        .await?
        .ok_or(UserError::NotFound(id))?;

    tracing::info!(user_id = %id, "user deleted");

    Ok(Json(ApiResponse::new(
        "User deleted successfully",
        EmptyData::default(),
    )))
}
