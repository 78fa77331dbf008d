//! Authentication API handlers

use axum::{extract::State, Extension, Json};

use super::dto::{ChangePasswordRequest, LoginRequest, LoginResponse, RegisterRequest, UserDto};
use crate::interfaces::http::common::{ErrorResponse, MessageResponse, ValidatedJson};
use crate::interfaces::http::error::ApiResult;
use crate::interfaces::http::middleware::{AuthState, CurrentUser};

pub const REGISTERED: &str = "Registration successful. Please wait for admin approval.";
pub const PASSWORD_CHANGED: &str = "Password changed successfully";
pub const API_BANNER: &str = "School29 Management System API";

#[utoipa::path(
    get,
    path = "/api/",
    tag = "Authentication",
    responses((status = 200, description = "API banner", body = MessageResponse))
)]
pub async fn root() -> Json<MessageResponse> {
    Json(MessageResponse::new(API_BANNER))
}

#[utoipa::path(
    post,
    path = "/api/register",
    tag = "Authentication",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Account created, pending approval", body = MessageResponse),
        (status = 400, description = "Username or email already registered", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    )
)]
pub async fn register(
    State(state): State<AuthState>,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> ApiResult<Json<MessageResponse>> {
    state.users.register(request.into()).await?;
    Ok(Json(MessageResponse::new(REGISTERED)))
}

#[utoipa::path(
    post,
    path = "/api/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Successful login", body = LoginResponse),
        (status = 400, description = "Account not approved yet", body = ErrorResponse),
        (status = 401, description = "Incorrect username or password", body = ErrorResponse)
    )
)]
pub async fn login(
    State(state): State<AuthState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let auth = state.users.login(&request.username, &request.password).await?;

    Ok(Json(LoginResponse {
        access_token: auth.token,
        token_type: auth.token_type,
        user: auth.user.into(),
    }))
}

#[utoipa::path(
    get,
    path = "/api/me",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current account", body = UserDto),
        (status = 400, description = "Account not approved", body = ErrorResponse),
        (status = 401, description = "Missing, invalid or expired token", body = ErrorResponse)
    )
)]
pub async fn get_current_user(
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Json<UserDto> {
    Json(user.into())
}

#[utoipa::path(
    post,
    path = "/api/change-password",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed", body = MessageResponse),
        (status = 401, description = "Invalid current password or token", body = ErrorResponse),
        (status = 422, description = "New password too short", body = ErrorResponse)
    )
)]
pub async fn change_password(
    State(state): State<AuthState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    ValidatedJson(request): ValidatedJson<ChangePasswordRequest>,
) -> ApiResult<Json<MessageResponse>> {
    state
        .users
        .change_password(&user, &request.current_password, &request.new_password)
        .await?;
    Ok(Json(MessageResponse::new(PASSWORD_CHANGED)))
}
