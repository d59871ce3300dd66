use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::InviteError;
use crate::api::ErrorResponse;

/// converts `InviteError` into appropriate HTTP responses
#[derive(Debug)]
pub struct AppError(pub InviteError);

impl From<InviteError> for AppError {
    fn from(err: InviteError) -> Self {
        Self(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            InviteError::NotFound => StatusCode::NOT_FOUND,
            InviteError::DuplicateInvitation => StatusCode::CONFLICT,
            InviteError::Unauthorized => StatusCode::FORBIDDEN,
            InviteError::AccountCreationFailed(_)
            | InviteError::InvalidEmail
            | InviteError::MalformedRequest(_) => StatusCode::BAD_REQUEST,
            InviteError::StoreFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, Json(ErrorResponse::from(self.0))).into_response()
    }
}
