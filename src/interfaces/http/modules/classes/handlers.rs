//! Class API handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Extension, Json,
};

use super::dto::{ClassDto, ClassRequest};
use crate::application::ClassService;
use crate::interfaces::http::common::{ErrorResponse, MessageResponse, ValidatedJson};
use crate::interfaces::http::error::ApiResult;
use crate::interfaces::http::middleware::CurrentUser;
use crate::interfaces::http::modules::auth::UserDto;

#[derive(Clone)]
pub struct ClassHandlerState {
    pub classes: Arc<ClassService>,
}

#[utoipa::path(
    get,
    path = "/api/classes",
    tag = "Classes",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Classes ordered by grade and name", body = Vec<ClassDto>),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    )
)]
pub async fn list_classes(State(state): State<ClassHandlerState>) -> ApiResult<Json<Vec<ClassDto>>> {
    let classes = state.classes.list().await?;
    Ok(Json(classes.into_iter().map(ClassDto::from).collect()))
}

#[utoipa::path(
    post,
    path = "/api/classes",
    tag = "Classes",
    security(("bearer_auth" = [])),
    request_body = ClassRequest,
    responses(
        (status = 200, description = "Class created", body = ClassDto),
        (status = 403, description = "Not an admin", body = ErrorResponse),
        (status = 404, description = "Teacher not found", body = ErrorResponse)
    )
)]
pub async fn create_class(
    State(state): State<ClassHandlerState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    ValidatedJson(request): ValidatedJson<ClassRequest>,
) -> ApiResult<Json<ClassDto>> {
    let class = state.classes.create(&user, request.into()).await?;
    Ok(Json(class.into()))
}

#[utoipa::path(
    get,
    path = "/api/classes/{id}",
    tag = "Classes",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Class ID")),
    responses(
        (status = 200, description = "Class details", body = ClassDto),
        (status = 404, description = "Not found", body = ErrorResponse)
    )
)]
pub async fn get_class(
    State(state): State<ClassHandlerState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ClassDto>> {
    Ok(Json(state.classes.get(&id).await?.into()))
}

#[utoipa::path(
    put,
    path = "/api/classes/{id}",
    tag = "Classes",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Class ID")),
    request_body = ClassRequest,
    responses(
        (status = 200, description = "Class updated", body = ClassDto),
        (status = 404, description = "Not found", body = ErrorResponse)
    )
)]
pub async fn update_class(
    State(state): State<ClassHandlerState>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<ClassRequest>,
) -> ApiResult<Json<ClassDto>> {
    let class = state.classes.update(&id, request.into()).await?;
    Ok(Json(class.into()))
}

#[utoipa::path(
    delete,
    path = "/api/classes/{id}",
    tag = "Classes",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Class ID")),
    responses(
        (status = 200, description = "Class deleted", body = MessageResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    )
)]
pub async fn delete_class(
    State(state): State<ClassHandlerState>,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    state.classes.delete(&id).await?;
    Ok(Json(MessageResponse::new("Class deleted successfully")))
}

#[utoipa::path(
    get,
    path = "/api/classes/{id}/students",
    tag = "Classes",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Class ID")),
    responses(
        (status = 200, description = "Approved students in the class", body = Vec<UserDto>),
        (status = 403, description = "Not a teacher", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    )
)]
pub async fn list_students(
    State(state): State<ClassHandlerState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<UserDto>>> {
    let students = state.classes.roster(&id).await?;
    Ok(Json(students.into_iter().map(UserDto::from).collect()))
}
