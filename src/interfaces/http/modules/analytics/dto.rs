//! Analytics DTOs

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use utoipa::ToSchema;

use crate::application::AnalyticsReport;
use crate::domain::UserActivity;

#[derive(Debug, Serialize, ToSchema)]
pub struct ActivityDto {
    pub id: String,
    pub user_id: String,
    pub action: String,
    #[schema(value_type = Object)]
    pub details: Map<String, Value>,
    pub timestamp: DateTime<Utc>,
}

impl From<UserActivity> for ActivityDto {
    fn from(activity: UserActivity) -> Self {
        Self {
            id: activity.id,
            user_id: activity.user_id,
            action: activity.action,
            details: activity.details,
            timestamp: activity.timestamp,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AnalyticsDto {
    pub total_users: u64,
    pub users_by_role: BTreeMap<String, u64>,
    pub users_by_status: BTreeMap<String, u64>,
    pub total_classes: u64,
    pub total_news: u64,
    pub published_news: u64,
    pub pending_news: u64,
    pub total_news_views: i64,
    pub total_schedules: u64,
    pub pending_schedule_changes: u64,
    pub logins_last_7_days: u64,
    pub activity_by_action: BTreeMap<String, u64>,
    pub recent_activity: Vec<ActivityDto>,
}

impl From<AnalyticsReport> for AnalyticsDto {
    fn from(report: AnalyticsReport) -> Self {
        Self {
            total_users: report.total_users,
            users_by_role: report.users_by_role,
            users_by_status: report.users_by_status,
            total_classes: report.total_classes,
            total_news: report.total_news,
            published_news: report.published_news,
            pending_news: report.pending_news,
            total_news_views: report.total_news_views,
            total_schedules: report.total_schedules,
            pending_schedule_changes: report.pending_schedule_changes,
            logins_last_7_days: report.logins_last_7_days,
            activity_by_action: report.activity_by_action,
            recent_activity: report
                .recent_activity
                .into_iter()
                .map(ActivityDto::from)
                .collect(),
        }
    }
}
