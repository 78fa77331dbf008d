//! User management API handlers
//!
//! Admin-only endpoints. Delegates to `UserService` from the
//! application/identity layer.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Extension, Json,
};

use super::dto::ListUsersParams;
use crate::application::identity::UserService;
use crate::interfaces::http::common::{ApiQuery, ErrorResponse};
use crate::interfaces::http::error::ApiResult;
use crate::interfaces::http::middleware::CurrentUser;
use crate::interfaces::http::modules::auth::UserDto;

#[derive(Clone)]
pub struct UserHandlerState {
    pub users: Arc<UserService>,
}

#[utoipa::path(
    get,
    path = "/api/admin/pending-users",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Accounts awaiting approval", body = Vec<UserDto>),
        (status = 403, description = "Not an admin", body = ErrorResponse)
    )
)]
pub async fn list_pending_users(
    State(state): State<UserHandlerState>,
) -> ApiResult<Json<Vec<UserDto>>> {
    let users = state.users.pending_users().await?;
    Ok(Json(users.into_iter().map(UserDto::from).collect()))
}

#[utoipa::path(
    post,
    path = "/api/admin/approve-user/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "User ID")),
    responses(
        (status = 200, description = "Account approved", body = UserDto),
        (status = 400, description = "Account is not pending", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    )
)]
pub async fn approve_user(
    State(state): State<UserHandlerState>,
    Extension(CurrentUser(admin)): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> ApiResult<Json<UserDto>> {
    let user = state.users.approve_user(&admin, &id).await?;
    Ok(Json(user.into()))
}

#[utoipa::path(
    post,
    path = "/api/admin/reject-user/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "User ID")),
    responses(
        (status = 200, description = "Account rejected", body = UserDto),
        (status = 400, description = "Account is not pending", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    )
)]
pub async fn reject_user(
    State(state): State<UserHandlerState>,
    Extension(CurrentUser(admin)): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> ApiResult<Json<UserDto>> {
    let user = state.users.reject_user(&admin, &id).await?;
    Ok(Json(user.into()))
}

#[utoipa::path(
    get,
    path = "/api/admin/users",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(ListUsersParams),
    responses(
        (status = 200, description = "All accounts, newest first", body = Vec<UserDto>),
        (status = 400, description = "Unknown role or status filter", body = ErrorResponse),
        (status = 403, description = "Not an admin", body = ErrorResponse)
    )
)]
pub async fn list_users(
    State(state): State<UserHandlerState>,
    ApiQuery(params): ApiQuery<ListUsersParams>,
) -> ApiResult<Json<Vec<UserDto>>> {
    let users = state.users.list_users(params.into()).await?;
    Ok(Json(users.into_iter().map(UserDto::from).collect()))
}
