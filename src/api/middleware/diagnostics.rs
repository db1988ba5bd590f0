use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;

use crate::api::errors::ErrorDiagnostic;
use crate::state::AppState;

/// Final pipeline stage for error responses
///
/// Outside production the diagnostic trace recorded by the classifier is
/// added to the error body under `trace`. In production it is dropped.
///
/// ```ignore
/// Router::new()
///     .route("/users", get(list_users))
///     .layer(middleware::from_fn_with_state(state.clone(), attach_diagnostics))
/// ```
pub async fn attach_diagnostics(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;

    let Some(diagnostic) = response.extensions_mut().remove::<ErrorDiagnostic>() else {
        return response;
    };

    if state.config.mode.is_production() {
        return response;
    }

    let ErrorDiagnostic { mut body, trace } = diagnostic;
    body["trace"] = Value::String(trace);
    (response.status(), Json(body)).into_response()
}
