//! Domain error → HTTP response mapping
//!
//! Every error body is `{"detail": "<message>"}`.

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::error;

use super::common::ErrorResponse;
use crate::domain::DomainError;

/// Wrapper that lets handlers return `DomainError` with `?`.
#[derive(Debug)]
pub struct ApiError(pub DomainError);

pub type ApiResult<T> = Result<T, ApiError>;

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self(err)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            DomainError::Conflict(_) | DomainError::AccountNotApproved(_) => {
                StatusCode::BAD_REQUEST
            }
            DomainError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            DomainError::Forbidden(_) => StatusCode::FORBIDDEN,
            DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
            DomainError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            DomainError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if let DomainError::Internal(ref msg) = self.0 {
            error!("Internal error: {}", msg);
        }

        let body = Json(ErrorResponse {
            detail: self.0.detail(),
        });

        if status == StatusCode::UNAUTHORIZED {
            (status, [(header::WWW_AUTHENTICATE, "Bearer")], body).into_response()
        } else {
            (status, body).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        let cases = [
            (DomainError::Conflict("dup".into()), StatusCode::BAD_REQUEST),
            (
                DomainError::AccountNotApproved("no".into()),
                StatusCode::BAD_REQUEST,
            ),
            (DomainError::Unauthorized("x".into()), StatusCode::UNAUTHORIZED),
            (DomainError::Forbidden("x".into()), StatusCode::FORBIDDEN),
            (DomainError::not_found("Class", "c"), StatusCode::NOT_FOUND),
            (
                DomainError::Validation("x".into()),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                DomainError::internal("boom"),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(ApiError(err).status(), expected);
        }
    }

    #[test]
    fn unauthorized_carries_bearer_challenge() {
        let resp = ApiError(DomainError::Unauthorized("nope".into())).into_response();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(resp.headers()[header::WWW_AUTHENTICATE], "Bearer");

        let resp = ApiError(DomainError::Forbidden("nope".into())).into_response();
        assert!(resp.headers().get(header::WWW_AUTHENTICATE).is_none());
    }
}
