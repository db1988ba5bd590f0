// API layer module (adapters for controllers)
// Follows Hexagonal Architecture - API is an adapter

pub mod docs;
pub mod envelope;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod schemas;
pub mod validation;

use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderName, HeaderValue},
    middleware as axum_middleware,
    routing::get,
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::state::AppState;
use docs::{ApiDoc, DOCS_PATH, OPENAPI_JSON_PATH};
use handlers::{health, users};

const BODY_LIMIT_BYTES: usize = 10 * 1024 * 1024;

/// Hardening headers added to every response unless a handler set them
const SECURITY_HEADERS: [(&str, &str); 7] = [
    ("x-content-type-options", "nosniff"),
    ("x-frame-options", "SAMEORIGIN"),
    ("referrer-policy", "no-referrer"),
    ("x-dns-prefetch-control", "off"),
    ("x-xss-protection", "0"),
    ("strict-transport-security", "max-age=15552000; includeSubDomains"),
    ("cross-origin-opener-policy", "same-origin"),
];

/// Builds the application router
///
/// Layers, innermost first: diagnostics for error bodies, body size limit,
/// security headers, HTTP tracing, then CORS.
pub fn router(state: AppState) -> Router {
    // Configure CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut router = Router::new()
        .route("/", get(health::index))
        // Health check
        .route("/health", get(health::health_check))
        // User routes
        .route("/users", get(users::list_users).post(users::create_user))
        .route(
            "/users/:id",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
        .merge(SwaggerUi::new(DOCS_PATH).url(OPENAPI_JSON_PATH, ApiDoc::openapi()))
        .fallback(health::route_not_found)
        // Middleware
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::attach_diagnostics,
        ))
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES));

    for (name, value) in SECURITY_HEADERS {
        router = router.layer(SetResponseHeaderLayer::if_not_present(
            HeaderName::from_static(name),
            HeaderValue::from_static(value),
        ));
    }

    router
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        // Shared state
        .with_state(state)
}
