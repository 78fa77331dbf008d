//! News API handlers
//!
//! Reader endpoints sit behind the approved gate, authoring behind the
//! teacher gate, and moderation under `/api/admin`.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Extension, Json,
};

use super::dto::{NewsDto, NewsRequest};
use crate::application::NewsService;
use crate::interfaces::http::common::{ErrorResponse, MessageResponse, ValidatedJson};
use crate::interfaces::http::error::ApiResult;
use crate::interfaces::http::middleware::CurrentUser;

#[derive(Clone)]
pub struct NewsHandlerState {
    pub news: Arc<NewsService>,
}

fn to_dtos(items: Vec<crate::domain::News>) -> Vec<NewsDto> {
    items.into_iter().map(NewsDto::from).collect()
}

#[utoipa::path(
    get,
    path = "/api/news",
    tag = "News",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Published news, newest first", body = Vec<NewsDto>),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    )
)]
pub async fn list_news(State(state): State<NewsHandlerState>) -> ApiResult<Json<Vec<NewsDto>>> {
    Ok(Json(to_dtos(state.news.list_published().await?)))
}

#[utoipa::path(
    post,
    path = "/api/news",
    tag = "News",
    security(("bearer_auth" = [])),
    request_body = NewsRequest,
    responses(
        (status = 200, description = "News created (pending unless posted by an admin)", body = NewsDto),
        (status = 403, description = "Not a teacher", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    )
)]
pub async fn create_news(
    State(state): State<NewsHandlerState>,
    Extension(CurrentUser(author)): Extension<CurrentUser>,
    ValidatedJson(request): ValidatedJson<NewsRequest>,
) -> ApiResult<Json<NewsDto>> {
    let news = state
        .news
        .create(&author, request.title, request.content)
        .await?;
    Ok(Json(news.into()))
}

#[utoipa::path(
    get,
    path = "/api/news/{id}",
    tag = "News",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "News ID")),
    responses(
        (status = 200, description = "News item; the view is counted", body = NewsDto),
        (status = 404, description = "Not found or not visible", body = ErrorResponse)
    )
)]
pub async fn get_news(
    State(state): State<NewsHandlerState>,
    Extension(CurrentUser(viewer)): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> ApiResult<Json<NewsDto>> {
    Ok(Json(state.news.view(&viewer, &id).await?.into()))
}

#[utoipa::path(
    put,
    path = "/api/news/{id}",
    tag = "News",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "News ID")),
    request_body = NewsRequest,
    responses(
        (status = 200, description = "News updated", body = NewsDto),
        (status = 403, description = "Not the author", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    )
)]
pub async fn update_news(
    State(state): State<NewsHandlerState>,
    Extension(CurrentUser(editor)): Extension<CurrentUser>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<NewsRequest>,
) -> ApiResult<Json<NewsDto>> {
    let news = state
        .news
        .update(&editor, &id, request.title, request.content)
        .await?;
    Ok(Json(news.into()))
}

#[utoipa::path(
    delete,
    path = "/api/news/{id}",
    tag = "News",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "News ID")),
    responses(
        (status = 200, description = "News deleted", body = MessageResponse),
        (status = 403, description = "Not the author", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    )
)]
pub async fn delete_news(
    State(state): State<NewsHandlerState>,
    Extension(CurrentUser(editor)): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    state.news.delete(&editor, &id).await?;
    Ok(Json(MessageResponse::new("News deleted successfully")))
}

#[utoipa::path(
    get,
    path = "/api/admin/pending-news",
    tag = "News",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "News awaiting moderation", body = Vec<NewsDto>),
        (status = 403, description = "Not an admin", body = ErrorResponse)
    )
)]
pub async fn list_pending_news(
    State(state): State<NewsHandlerState>,
) -> ApiResult<Json<Vec<NewsDto>>> {
    Ok(Json(to_dtos(state.news.list_pending().await?)))
}

#[utoipa::path(
    post,
    path = "/api/admin/approve-news/{id}",
    tag = "News",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "News ID")),
    responses(
        (status = 200, description = "News published", body = NewsDto),
        (status = 400, description = "News is not pending", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    )
)]
pub async fn approve_news(
    State(state): State<NewsHandlerState>,
    Extension(CurrentUser(admin)): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> ApiResult<Json<NewsDto>> {
    Ok(Json(state.news.approve(&admin, &id).await?.into()))
}

#[utoipa::path(
    post,
    path = "/api/admin/reject-news/{id}",
    tag = "News",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "News ID")),
    responses(
        (status = 200, description = "News rejected", body = NewsDto),
        (status = 400, description = "News is not pending", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    )
)]
pub async fn reject_news(
    State(state): State<NewsHandlerState>,
    Extension(CurrentUser(admin)): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> ApiResult<Json<NewsDto>> {
    Ok(Json(state.news.reject(&admin, &id).await?.into()))
}
