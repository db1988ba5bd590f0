//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] collects the annotated handlers and the request/response
//! schemas. The document is served at `/api-docs/openapi.json` and rendered
//! by Swagger UI under `/api-docs`.

use utoipa::OpenApi;

use crate::api::envelope::{EmptyData, Pagination};
use crate::api::handlers::users::UserResponse;
use crate::api::schemas::{
    DeletedEnvelope, ErrorEnvelope, HealthEnvelope, UserEnvelope, UserListEnvelope,
};
use crate::api::validation::{CreateUserRequest, UpdateUserRequest};

pub const DOCS_PATH: &str = "/api-docs";
pub const OPENAPI_JSON_PATH: &str = "/api-docs/openapi.json";

/// OpenAPI document for the REST API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "User Management API",
        description = "CRUD operations for user records with validation, filtering and pagination",
        contact(name = "API Support", email = "support@example.com")
    ),
    servers((url = "/", description = "Relative to the deployment base URL")),
    paths(
        crate::api::handlers::users::create_user,
        crate::api::handlers::users::list_users,
        crate::api::handlers::users::get_user,
        crate::api::handlers::users::update_user,
        crate::api::handlers::users::delete_user,
        crate::api::handlers::health::health_check,
    ),
    components(schemas(
        UserResponse,
        CreateUserRequest,
        UpdateUserRequest,
        Pagination,
        EmptyData,
        UserEnvelope,
        UserListEnvelope,
        DeletedEnvelope,
        ErrorEnvelope,
        HealthEnvelope,
    )),
    tags(
        (name = "users", description = "User record management"),
        (name = "health", description = "Liveness probe")
    )
)]
pub struct ApiDoc;
