//! Timetable entries and teacher change requests
//!
//! Approving a change request first claims it with a conditional review
//! update, then applies `requested_changes` to the schedule entry verbatim
//! (see [`Schedule::apply_changes`]).

use std::sync::Arc;

use chrono::Utc;
use serde_json::{Map, Value};
use tracing::{error, info, warn};

use super::activity::{self, details, ActivityLog};
use crate::domain::{
    ChangeRequestFilter, CreateChangeRequestDto, DomainError, DomainResult, RepositoryProvider,
    RequestStatus, Schedule, ScheduleChangeRequest, ScheduleFilter, ScheduleInput, User, UserRole,
};

#[derive(Clone)]
pub struct ScheduleService {
    repos: Arc<dyn RepositoryProvider>,
    activity: ActivityLog,
}

impl ScheduleService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self {
            activity: ActivityLog::new(repos.clone()),
            repos,
        }
    }

    // ── Schedule entries ────────────────────────────────────────

    pub async fn list(&self, filter: ScheduleFilter) -> DomainResult<Vec<Schedule>> {
        self.repos.schedules().list_schedules(filter).await
    }

    pub async fn get(&self, id: &str) -> DomainResult<Schedule> {
        self.repos
            .schedules()
            .get_schedule(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Schedule", id))
    }

    pub async fn create(&self, input: ScheduleInput) -> DomainResult<Schedule> {
        let teacher_name = self.resolve_references(&input).await?;
        let entry = self
            .repos
            .schedules()
            .create_schedule(input, teacher_name)
            .await?;

        info!(schedule_id = %entry.id, class_id = %entry.class_id, day = entry.day_of_week, "Schedule entry created");
        Ok(entry)
    }

    pub async fn update(&self, id: &str, input: ScheduleInput) -> DomainResult<Schedule> {
        let mut entry = self.get(id).await?;
        let teacher_name = self.resolve_references(&input).await?;

        entry.class_id = input.class_id;
        entry.day_of_week = input.day_of_week;
        entry.time_slot = input.time_slot;
        entry.subject = input.subject;
        entry.teacher_id = input.teacher_id;
        entry.teacher_name = teacher_name;

        if !self.repos.schedules().save_schedule(&entry).await? {
            return Err(DomainError::not_found("Schedule", id));
        }
        info!(schedule_id = id, "Schedule entry updated");
        Ok(entry)
    }

    pub async fn delete(&self, id: &str) -> DomainResult<()> {
        if !self.repos.schedules().delete_schedule(id).await? {
            return Err(DomainError::not_found("Schedule", id));
        }
        info!(schedule_id = id, "Schedule entry deleted");
        Ok(())
    }

    /// Class must exist and the teacher must be a teacher account.
    /// Returns the teacher's display name.
    async fn resolve_references(&self, input: &ScheduleInput) -> DomainResult<String> {
        if self
            .repos
            .classes()
            .get_class(&input.class_id)
            .await?
            .is_none()
        {
            return Err(DomainError::not_found("Class", &input.class_id));
        }

        match self.repos.users().get_user_by_id(&input.teacher_id).await? {
            Some(teacher) if teacher.role == UserRole::Teacher => Ok(teacher.full_name),
            _ => Err(DomainError::not_found("Teacher", &input.teacher_id)),
        }
    }

    // ── Change requests ─────────────────────────────────────────

    pub async fn request_change(
        &self,
        teacher: &User,
        schedule_id: String,
        requested_changes: Map<String, Value>,
        reason: String,
    ) -> DomainResult<ScheduleChangeRequest> {
        self.get(&schedule_id).await?;

        let request = self
            .repos
            .change_requests()
            .create_request(CreateChangeRequestDto {
                schedule_id,
                teacher_id: teacher.id.clone(),
                teacher_name: teacher.full_name.clone(),
                requested_changes,
                reason,
            })
            .await?;

        self.activity
            .record(
                &teacher.id,
                activity::SCHEDULE_CHANGE_REQUESTED,
                details([
                    ("request_id", request.id.as_str()),
                    ("schedule_id", request.schedule_id.as_str()),
                ]),
            )
            .await;

        info!(request_id = %request.id, schedule_id = %request.schedule_id, teacher_id = %teacher.id, "Schedule change requested");
        Ok(request)
    }

    /// A teacher sees their own requests; an admin sees all of them.
    pub async fn requests_for(&self, user: &User) -> DomainResult<Vec<ScheduleChangeRequest>> {
        let filter = ChangeRequestFilter {
            status: None,
            teacher_id: (!user.is_admin()).then(|| user.id.clone()),
        };
        self.repos.change_requests().list_requests(filter).await
    }

    /// Admin review queue, pending by default.
    pub async fn review_queue(
        &self,
        status: Option<RequestStatus>,
    ) -> DomainResult<Vec<ScheduleChangeRequest>> {
        let filter = ChangeRequestFilter {
            status: Some(status.unwrap_or(RequestStatus::Pending)),
            teacher_id: None,
        };
        self.repos.change_requests().list_requests(filter).await
    }

    pub async fn approve_change(
        &self,
        admin: &User,
        request_id: &str,
    ) -> DomainResult<ScheduleChangeRequest> {
        let request = self.pending_request(request_id).await?;
        let mut entry = self.get(&request.schedule_id).await?;

        self.claim(admin, request_id, RequestStatus::Approved).await?;

        entry.apply_changes(&request.requested_changes);
        match self.repos.schedules().save_schedule(&entry).await {
            Ok(true) => {}
            Ok(false) => {
                warn!(request_id, schedule_id = %entry.id, "Schedule entry vanished while applying approved change");
                self.reopen(request_id).await;
                return Err(DomainError::not_found("Schedule", &entry.id));
            }
            Err(e) => {
                self.reopen(request_id).await;
                return Err(e);
            }
        }

        info!(request_id, schedule_id = %entry.id, admin_id = %admin.id, "Schedule change approved and applied");
        self.find_request(request_id).await
    }

    pub async fn reject_change(
        &self,
        admin: &User,
        request_id: &str,
    ) -> DomainResult<ScheduleChangeRequest> {
        self.pending_request(request_id).await?;
        self.claim(admin, request_id, RequestStatus::Rejected).await?;

        info!(request_id, admin_id = %admin.id, "Schedule change rejected");
        self.find_request(request_id).await
    }

    async fn claim(&self, admin: &User, request_id: &str, to: RequestStatus) -> DomainResult<()> {
        let claimed = self
            .repos
            .change_requests()
            .review_request(request_id, to, &admin.id, Utc::now())
            .await?;
        if claimed {
            Ok(())
        } else {
            Err(DomainError::Conflict("Request is no longer pending".into()))
        }
    }

    /// Undo a claim whose changes could not be applied.
    async fn reopen(&self, request_id: &str) {
        match self
            .repos
            .change_requests()
            .reopen_request(request_id, RequestStatus::Approved)
            .await
        {
            Ok(true) => info!(request_id, "Schedule change request returned to pending"),
            Ok(false) => warn!(request_id, "Schedule change request was not approved; nothing to reopen"),
            Err(e) => error!(request_id, "Failed to reopen schedule change request: {}", e),
        }
    }

    async fn pending_request(&self, id: &str) -> DomainResult<ScheduleChangeRequest> {
        let request = self.find_request(id).await?;
        if request.status != RequestStatus::Pending {
            return Err(DomainError::Conflict(format!(
                "Request is already {}",
                request.status.as_str()
            )));
        }
        Ok(request)
    }

    async fn find_request(&self, id: &str) -> DomainResult<ScheduleChangeRequest> {
        self.repos
            .change_requests()
            .get_request(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Schedule change request", id))
    }
}
