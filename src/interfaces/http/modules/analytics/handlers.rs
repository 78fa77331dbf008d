use std::sync::Arc;

use axum::{extract::State, Json};

use super::dto::AnalyticsDto;
use crate::application::AnalyticsService;
use crate::interfaces::http::common::ErrorResponse;
use crate::interfaces::http::error::ApiResult;

#[derive(Clone)]
pub struct AnalyticsHandlerState {
    pub analytics: Arc<AnalyticsService>,
}

#[utoipa::path(
    get,
    path = "/api/admin/analytics",
    tag = "Analytics",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Aggregate usage counts", body = AnalyticsDto),
        (status = 403, description = "Not an admin", body = ErrorResponse)
    )
)]
pub async fn get_analytics(
    State(state): State<AnalyticsHandlerState>,
) -> ApiResult<Json<AnalyticsDto>> {
    Ok(Json(state.analytics.report().await?.into()))
}
