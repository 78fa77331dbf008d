//! Schedule DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::domain::{
    RequestStatus, Schedule, ScheduleChangeRequest, ScheduleFilter, ScheduleInput,
};

/// Body for creating or replacing a schedule entry
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ScheduleRequest {
    #[validate(length(min = 1, message = "class_id is required"))]
    pub class_id: String,
    /// 0 = Monday ... 6 = Sunday
    #[validate(range(min = 0, max = 6, message = "day_of_week must be between 0 and 6"))]
    pub day_of_week: i32,
    #[validate(length(min = 1, max = 50, message = "time_slot must be 1-50 characters"))]
    pub time_slot: String,
    #[validate(length(min = 1, max = 100, message = "subject must be 1-100 characters"))]
    pub subject: String,
    #[validate(length(min = 1, message = "teacher_id is required"))]
    pub teacher_id: String,
}

impl From<ScheduleRequest> for ScheduleInput {
    fn from(req: ScheduleRequest) -> Self {
        Self {
            class_id: req.class_id,
            day_of_week: req.day_of_week,
            time_slot: req.time_slot,
            subject: req.subject,
            teacher_id: req.teacher_id,
        }
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ScheduleQuery {
    /// Only entries of this class
    pub class_id: Option<String>,
    /// Only entries taught by this teacher
    pub teacher_id: Option<String>,
}

impl From<ScheduleQuery> for ScheduleFilter {
    fn from(query: ScheduleQuery) -> Self {
        Self {
            class_id: query.class_id,
            teacher_id: query.teacher_id,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ScheduleDto {
    pub id: String,
    pub class_id: String,
    pub day_of_week: i32,
    pub time_slot: String,
    pub subject: String,
    pub teacher_id: String,
    pub teacher_name: String,
    pub created_at: DateTime<Utc>,
    /// Attributes set by approved change requests without a dedicated field
    #[schema(value_type = Object)]
    pub extra: Map<String, Value>,
}

impl From<Schedule> for ScheduleDto {
    fn from(entry: Schedule) -> Self {
        Self {
            id: entry.id,
            class_id: entry.class_id,
            day_of_week: entry.day_of_week,
            time_slot: entry.time_slot,
            subject: entry.subject,
            teacher_id: entry.teacher_id,
            teacher_name: entry.teacher_name,
            created_at: entry.created_at,
            extra: entry.extra,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ChangeRequestCreate {
    #[validate(length(min = 1, message = "schedule_id is required"))]
    pub schedule_id: String,
    /// Fields to apply to the schedule entry on approval
    #[schema(value_type = Object)]
    pub requested_changes: Map<String, Value>,
    #[validate(length(min = 1, message = "reason is required"))]
    pub reason: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ChangeRequestDto {
    pub id: String,
    pub schedule_id: String,
    pub teacher_id: String,
    pub teacher_name: String,
    #[schema(value_type = Object)]
    pub requested_changes: Map<String, Value>,
    pub reason: String,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub reviewed_by: Option<String>,
}

impl From<ScheduleChangeRequest> for ChangeRequestDto {
    fn from(req: ScheduleChangeRequest) -> Self {
        Self {
            id: req.id,
            schedule_id: req.schedule_id,
            teacher_id: req.teacher_id,
            teacher_name: req.teacher_name,
            requested_changes: req.requested_changes,
            reason: req.reason,
            status: req.status,
            created_at: req.created_at,
            reviewed_at: req.reviewed_at,
            reviewed_by: req.reviewed_by,
        }
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ReviewQueueQuery {
    /// Defaults to `pending`
    pub status: Option<RequestStatus>,
}
