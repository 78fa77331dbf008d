//! Schedule entries and teacher change requests

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;
use utoipa::ToSchema;

/// One lesson slot in a class timetable.
#[derive(Debug, Clone, PartialEq)]
pub struct Schedule {
    pub id: String,
    pub class_id: String,
    /// 0-6 (Monday-Sunday)
    pub day_of_week: i32,
    /// e.g. "9:00-10:00"
    pub time_slot: String,
    pub subject: String,
    pub teacher_id: String,
    pub teacher_name: String,
    pub created_at: DateTime<Utc>,
    /// Fields written by approved change requests that have no column of their own.
    pub extra: Map<String, Value>,
}

impl Schedule {
    /// Apply a change request's fields verbatim.
    ///
    /// Known fields are overwritten when the JSON type matches the column;
    /// anything else lands in `extra` untouched. `id` and `created_at` are
    /// never overwritten.
    pub fn apply_changes(&mut self, changes: &Map<String, Value>) {
        for (key, value) in changes {
            match (key.as_str(), value) {
                ("id" | "created_at", _) => {
                    warn!(schedule_id = %self.id, field = %key, "Ignoring change to immutable schedule field");
                }
                ("class_id", Value::String(v)) => self.class_id = v.clone(),
                ("time_slot", Value::String(v)) => self.time_slot = v.clone(),
                ("subject", Value::String(v)) => self.subject = v.clone(),
                ("teacher_id", Value::String(v)) => self.teacher_id = v.clone(),
                ("teacher_name", Value::String(v)) => self.teacher_name = v.clone(),
                ("day_of_week", Value::Number(n)) => {
                    match n.as_i64().and_then(|d| i32::try_from(d).ok()) {
                        Some(day) => self.day_of_week = day,
                        None => {
                            self.extra.insert(key.clone(), value.clone());
                        }
                    }
                }
                _ => {
                    self.extra.insert(key.clone(), value.clone());
                }
            }
        }
    }
}

/// Writable fields of a schedule entry.
#[derive(Debug, Clone)]
pub struct ScheduleInput {
    pub class_id: String,
    pub day_of_week: i32,
    pub time_slot: String,
    pub subject: String,
    pub teacher_id: String,
}

/// Filter for listing schedule entries.
#[derive(Debug, Clone, Default)]
pub struct ScheduleFilter {
    pub class_id: Option<String>,
    pub teacher_id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

/// A teacher's request to change a schedule entry, reviewed by an admin.
#[derive(Debug, Clone)]
pub struct ScheduleChangeRequest {
    pub id: String,
    pub schedule_id: String,
    pub teacher_id: String,
    pub teacher_name: String,
    pub requested_changes: Map<String, Value>,
    pub reason: String,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub reviewed_by: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CreateChangeRequestDto {
    pub schedule_id: String,
    pub teacher_id: String,
    pub teacher_name: String,
    pub requested_changes: Map<String, Value>,
    pub reason: String,
}

#[derive(Debug, Clone, Default)]
pub struct ChangeRequestFilter {
    pub status: Option<RequestStatus>,
    pub teacher_id: Option<String>,
}
