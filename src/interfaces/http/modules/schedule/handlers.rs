//! Schedule API handlers
//!
//! `/api/schedule/change-requests` is a static route and wins over
//! `/api/schedule/{id}` in the router.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Extension, Json,
};

use super::dto::{
    ChangeRequestCreate, ChangeRequestDto, ReviewQueueQuery, ScheduleDto, ScheduleQuery,
    ScheduleRequest,
};
use crate::application::ScheduleService;
use crate::domain::ScheduleChangeRequest;
use crate::interfaces::http::common::{ApiQuery, ErrorResponse, MessageResponse, ValidatedJson};
use crate::interfaces::http::error::ApiResult;
use crate::interfaces::http::middleware::CurrentUser;

#[derive(Clone)]
pub struct ScheduleHandlerState {
    pub schedule: Arc<ScheduleService>,
}

fn to_request_dtos(items: Vec<ScheduleChangeRequest>) -> Vec<ChangeRequestDto> {
    items.into_iter().map(ChangeRequestDto::from).collect()
}

#[utoipa::path(
    get,
    path = "/api/schedule",
    tag = "Schedule",
    security(("bearer_auth" = [])),
    params(ScheduleQuery),
    responses(
        (status = 200, description = "Entries ordered by day and time slot", body = Vec<ScheduleDto>),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    )
)]
pub async fn list_schedule(
    State(state): State<ScheduleHandlerState>,
    ApiQuery(query): ApiQuery<ScheduleQuery>,
) -> ApiResult<Json<Vec<ScheduleDto>>> {
    let entries = state.schedule.list(query.into()).await?;
    Ok(Json(entries.into_iter().map(ScheduleDto::from).collect()))
}

#[utoipa::path(
    post,
    path = "/api/schedule",
    tag = "Schedule",
    security(("bearer_auth" = [])),
    request_body = ScheduleRequest,
    responses(
        (status = 200, description = "Entry created", body = ScheduleDto),
        (status = 403, description = "Not an admin", body = ErrorResponse),
        (status = 404, description = "Class or teacher not found", body = ErrorResponse)
    )
)]
pub async fn create_schedule(
    State(state): State<ScheduleHandlerState>,
    ValidatedJson(request): ValidatedJson<ScheduleRequest>,
) -> ApiResult<Json<ScheduleDto>> {
    Ok(Json(state.schedule.create(request.into()).await?.into()))
}

#[utoipa::path(
    get,
    path = "/api/schedule/{id}",
    tag = "Schedule",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Schedule entry ID")),
    responses(
        (status = 200, description = "Entry details", body = ScheduleDto),
        (status = 404, description = "Not found", body = ErrorResponse)
    )
)]
pub async fn get_schedule(
    State(state): State<ScheduleHandlerState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ScheduleDto>> {
    Ok(Json(state.schedule.get(&id).await?.into()))
}

#[utoipa::path(
    put,
    path = "/api/schedule/{id}",
    tag = "Schedule",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Schedule entry ID")),
    request_body = ScheduleRequest,
    responses(
        (status = 200, description = "Entry updated", body = ScheduleDto),
        (status = 404, description = "Not found", body = ErrorResponse)
    )
)]
pub async fn update_schedule(
    State(state): State<ScheduleHandlerState>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<ScheduleRequest>,
) -> ApiResult<Json<ScheduleDto>> {
    Ok(Json(state.schedule.update(&id, request.into()).await?.into()))
}

#[utoipa::path(
    delete,
    path = "/api/schedule/{id}",
    tag = "Schedule",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Schedule entry ID")),
    responses(
        (status = 200, description = "Entry deleted", body = MessageResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    )
)]
pub async fn delete_schedule(
    State(state): State<ScheduleHandlerState>,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    state.schedule.delete(&id).await?;
    Ok(Json(MessageResponse::new("Schedule deleted successfully")))
}

#[utoipa::path(
    post,
    path = "/api/schedule/change-requests",
    tag = "Schedule",
    security(("bearer_auth" = [])),
    request_body = ChangeRequestCreate,
    responses(
        (status = 200, description = "Change request submitted", body = ChangeRequestDto),
        (status = 403, description = "Not a teacher", body = ErrorResponse),
        (status = 404, description = "Schedule entry not found", body = ErrorResponse)
    )
)]
pub async fn create_change_request(
    State(state): State<ScheduleHandlerState>,
    Extension(CurrentUser(teacher)): Extension<CurrentUser>,
    ValidatedJson(request): ValidatedJson<ChangeRequestCreate>,
) -> ApiResult<Json<ChangeRequestDto>> {
    let created = state
        .schedule
        .request_change(
            &teacher,
            request.schedule_id,
            request.requested_changes,
            request.reason,
        )
        .await?;
    Ok(Json(created.into()))
}

#[utoipa::path(
    get,
    path = "/api/schedule/change-requests",
    tag = "Schedule",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Caller's requests (all requests for admins)", body = Vec<ChangeRequestDto>),
        (status = 403, description = "Not a teacher", body = ErrorResponse)
    )
)]
pub async fn list_change_requests(
    State(state): State<ScheduleHandlerState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> ApiResult<Json<Vec<ChangeRequestDto>>> {
    Ok(Json(to_request_dtos(state.schedule.requests_for(&user).await?)))
}

#[utoipa::path(
    get,
    path = "/api/admin/schedule-change-requests",
    tag = "Schedule",
    security(("bearer_auth" = [])),
    params(ReviewQueueQuery),
    responses(
        (status = 200, description = "Review queue", body = Vec<ChangeRequestDto>),
        (status = 400, description = "Unknown status filter", body = ErrorResponse),
        (status = 403, description = "Not an admin", body = ErrorResponse)
    )
)]
pub async fn review_queue(
    State(state): State<ScheduleHandlerState>,
    ApiQuery(query): ApiQuery<ReviewQueueQuery>,
) -> ApiResult<Json<Vec<ChangeRequestDto>>> {
    Ok(Json(to_request_dtos(
        state.schedule.review_queue(query.status).await?,
    )))
}

#[utoipa::path(
    post,
    path = "/api/admin/approve-schedule-change/{id}",
    tag = "Schedule",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Change request ID")),
    responses(
        (status = 200, description = "Changes applied to the schedule entry", body = ChangeRequestDto),
        (status = 400, description = "Request is not pending", body = ErrorResponse),
        (status = 404, description = "Request or schedule entry not found", body = ErrorResponse)
    )
)]
pub async fn approve_change_request(
    State(state): State<ScheduleHandlerState>,
    Extension(CurrentUser(admin)): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> ApiResult<Json<ChangeRequestDto>> {
    Ok(Json(state.schedule.approve_change(&admin, &id).await?.into()))
}

#[utoipa::path(
    post,
    path = "/api/admin/reject-schedule-change/{id}",
    tag = "Schedule",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Change request ID")),
    responses(
        (status = 200, description = "Request rejected", body = ChangeRequestDto),
        (status = 400, description = "Request is not pending", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    )
)]
pub async fn reject_change_request(
    State(state): State<ScheduleHandlerState>,
    Extension(CurrentUser(admin)): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> ApiResult<Json<ChangeRequestDto>> {
    Ok(Json(state.schedule.reject_change(&admin, &id).await?.into()))
}
