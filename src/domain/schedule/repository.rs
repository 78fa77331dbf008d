use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::{
    ChangeRequestFilter, CreateChangeRequestDto, RequestStatus, Schedule, ScheduleChangeRequest,
    ScheduleFilter, ScheduleInput,
};
use crate::domain::DomainResult;

#[async_trait]
pub trait ScheduleRepositoryInterface: Send + Sync {
    async fn create_schedule(
        &self,
        input: ScheduleInput,
        teacher_name: String,
    ) -> DomainResult<Schedule>;
    async fn get_schedule(&self, id: &str) -> DomainResult<Option<Schedule>>;
    /// Ordered by day of week, then time slot.
    async fn list_schedules(&self, filter: ScheduleFilter) -> DomainResult<Vec<Schedule>>;
    /// Overwrite every mutable column of an existing entry.
    async fn save_schedule(&self, schedule: &Schedule) -> DomainResult<bool>;
    async fn delete_schedule(&self, id: &str) -> DomainResult<bool>;
    async fn count_schedules(&self) -> DomainResult<u64>;
}

#[async_trait]
pub trait ChangeRequestRepositoryInterface: Send + Sync {
    async fn create_request(&self, dto: CreateChangeRequestDto)
        -> DomainResult<ScheduleChangeRequest>;
    async fn get_request(&self, id: &str) -> DomainResult<Option<ScheduleChangeRequest>>;
    /// Newest first.
    async fn list_requests(
        &self,
        filter: ChangeRequestFilter,
    ) -> DomainResult<Vec<ScheduleChangeRequest>>;

    /// Move a pending request to `to`, stamping the reviewer.
    /// Returns `false` when the request is missing or no longer pending.
    async fn review_request(
        &self,
        id: &str,
        to: RequestStatus,
        reviewed_by: &str,
        reviewed_at: DateTime<Utc>,
    ) -> DomainResult<bool>;

    /// Move a request from `from` back to pending and clear the reviewer.
    async fn reopen_request(&self, id: &str, from: RequestStatus) -> DomainResult<bool>;

    async fn count_requests(&self, status: Option<RequestStatus>) -> DomainResult<u64>;
}
