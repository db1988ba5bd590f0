use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Request},
    http::{header, HeaderMap},
    Json,
};
use serde::de::DeserializeOwned;

use crate::api::errors::ApiError;
use crate::api::validation::Validate;
use crate::domain::user::UserError;

/// Validating JSON extractor for write routes
///
/// Decodes the body into the request schema `T`, runs its field rules, and
/// hands the normalized domain input to the handler. Decoding failures and
/// rule violations short-circuit with a classified validation error before
/// the handler runs.
///
/// An absent or blank body decodes as `T::default()`, i.e. no fields.
///
/// Usage:
/// ```rust,ignore
/// async fn create_user(
///     ValidatedJson(new_user): ValidatedJson<CreateUserRequest>,
/// ) -> Result<StatusCode, ApiError> {
///     // new_user: NewUser
///     Ok(StatusCode::CREATED)
/// }
/// ```
pub struct ValidatedJson<T: Validate>(pub T::Output);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: Validate + DeserializeOwned + Default + Send,
    T::Output: Send,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_json = has_json_content_type(req.headers());
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|rejection| UserError::validation(rejection.body_text()))?;

        let body = if bytes.iter().all(u8::is_ascii_whitespace) {
            T::default()
        } else if !is_json {
            return Err(UserError::validation(
                "Expected request with `Content-Type: application/json`",
            )
            .into());
        } else {
            let Json(body) = Json::<T>::from_bytes(&bytes)
                .map_err(|rejection| UserError::validation(rejection.body_text()))?;
            body
        };

        body.validate()
            .map(ValidatedJson)
            .map_err(|messages| UserError::Validation(messages).into())
    }
}

/// Accepts `application/json` and `application/*+json`, with parameters
fn has_json_content_type(headers: &HeaderMap) -> bool {
    let Some(value) = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
    else {
        return false;
    };

    let essence = value
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    essence == "application/json"
        || (essence.starts_with("application/") && essence.ends_with("+json"))
}
