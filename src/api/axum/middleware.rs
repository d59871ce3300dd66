use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, FromRequestParts, Request};
use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use super::error::AppError;
use super::routes::AppState;
use crate::{Authenticator, Caller, InviteError};

/// Resolves the `Authorization: Bearer` header into a [`Caller`].
///
/// Never rejects a request for a missing or unknown credential; the action
/// decides whether it needs an authenticated caller. Only a failing
/// authenticator turns into an error response.
#[derive(Debug, Clone)]
pub struct RequestCaller(pub Caller);

pub fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()
        .and_then(|auth| auth.strip_prefix("Bearer "))
        .map(ToOwned::to_owned)
}

impl<I, P, A> FromRequestParts<AppState<I, P, A>> for RequestCaller
where
    I: Clone + Send + Sync + 'static,
    P: Clone + Send + Sync + 'static,
    A: Authenticator + Clone + Send + Sync + 'static,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState<I, P, A>,
    ) -> Result<Self, Self::Rejection> {
        let Some(token) = extract_bearer_token(&parts.headers) else {
            return Ok(RequestCaller(Caller::Unauthenticated));
        };

        let identity = state.authenticator.authenticate(&token).await?;
        Ok(RequestCaller(identity.into()))
    }
}

/// `Json` whose rejections use the crate's `{error, code}` body with a 400.
#[derive(Debug, Clone)]
pub struct ApiJson<T>(pub T);

impl<T, S> FromRequest<S> for ApiJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError(InviteError::MalformedRequest(rejection.body_text())))?;

        Ok(ApiJson(value))
    }
}
