//! Authentication and role-gate middleware for Axum
//!
//! `auth_middleware` resolves the bearer token to the current account and
//! stores it in request extensions as [`CurrentUser`]. The gate middlewares
//! run after it and apply the role checks from `application::identity::gate`.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::error::ApiError;
use crate::application::identity::{require_approved, require_role, UserService};
use crate::domain::{DomainError, User, UserRole};

const NOT_AUTHENTICATED: &str = "Not authenticated";

/// Authentication state containing the identity service
#[derive(Clone)]
pub struct AuthState {
    pub users: Arc<UserService>,
}

/// The verified caller, inserted by [`auth_middleware`].
///
/// Extract in handlers: `Extension(CurrentUser(user)): Extension<CurrentUser>`
#[derive(Clone, Debug)]
pub struct CurrentUser(pub User);

fn extract_token(auth_header: &str) -> Option<&str> {
    let (scheme, token) = auth_header.split_once(' ')?;
    let token = token.trim();
    if scheme.eq_ignore_ascii_case("bearer") && !token.is_empty() {
        Some(token)
    } else {
        None
    }
}

/// Bearer token authentication middleware
pub async fn auth_middleware(
    State(auth_state): State<AuthState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(extract_token)
        .map(String::from);

    let Some(token) = token else {
        return ApiError(DomainError::Unauthorized(NOT_AUTHENTICATED.into())).into_response();
    };

    match auth_state.users.verify_token(&token).await {
        Ok(user) => {
            tracing::Span::current().record("user_id", user.id.as_str());
            request.extensions_mut().insert(CurrentUser(user));
            next.run(request).await
        }
        Err(e) => ApiError(e).into_response(),
    }
}

fn current_user(request: &Request<Body>) -> Result<&User, ApiError> {
    request
        .extensions()
        .get::<CurrentUser>()
        .map(|c| &c.0)
        .ok_or_else(|| ApiError(DomainError::Unauthorized(NOT_AUTHENTICATED.into())))
}

async fn gate(
    request: Request<Body>,
    next: Next,
    check: impl FnOnce(&User) -> Result<(), DomainError>,
) -> Response {
    let verdict = current_user(&request).and_then(|user| check(user).map_err(ApiError));
    match verdict {
        Ok(()) => next.run(request).await,
        Err(e) => e.into_response(),
    }
}

/// Any approved account
pub async fn approved_middleware(request: Request<Body>, next: Next) -> Response {
    gate(request, next, |user| require_approved(user).map(|_| ())).await
}

/// Approved teachers (and admins)
pub async fn teacher_middleware(request: Request<Body>, next: Next) -> Response {
    gate(request, next, |user| {
        require_role(user, UserRole::Teacher).map(|_| ())
    })
    .await
}

/// Approved admins only
pub async fn admin_middleware(request: Request<Body>, next: Next) -> Response {
    gate(request, next, |user| require_role(user, UserRole::Admin).map(|_| ())).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearer_token_extraction() {
        assert_eq!(extract_token("Bearer abc.def"), Some("abc.def"));
        assert_eq!(extract_token("bearer abc"), Some("abc"));
        assert_eq!(extract_token("Basic dXNlcjpwdw=="), None);
        assert_eq!(extract_token("Bearer "), None);
        assert_eq!(extract_token("abc"), None);
    }
}
