use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

use super::{db_err, json_to_text, text_to_json};
use crate::domain::{
    ChangeRequestFilter, ChangeRequestRepositoryInterface, CreateChangeRequestDto, DomainResult,
    RequestStatus, ScheduleChangeRequest,
};
use crate::infrastructure::database::entities::schedule_change_request as request;

pub struct SeaOrmChangeRequestRepository {
    db: DatabaseConnection,
}

impl SeaOrmChangeRequestRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn entity_status_to_domain(status: request::RequestStatus) -> RequestStatus {
    match status {
        request::RequestStatus::Pending => RequestStatus::Pending,
        request::RequestStatus::Approved => RequestStatus::Approved,
        request::RequestStatus::Rejected => RequestStatus::Rejected,
    }
}

fn domain_status_to_entity(status: RequestStatus) -> request::RequestStatus {
    match status {
        RequestStatus::Pending => request::RequestStatus::Pending,
        RequestStatus::Approved => request::RequestStatus::Approved,
        RequestStatus::Rejected => request::RequestStatus::Rejected,
    }
}

fn request_model_to_domain(model: request::Model) -> ScheduleChangeRequest {
    ScheduleChangeRequest {
        requested_changes: text_to_json(&model.requested_changes),
        id: model.id,
        schedule_id: model.schedule_id,
        teacher_id: model.teacher_id,
        teacher_name: model.teacher_name,
        reason: model.reason,
        status: entity_status_to_domain(model.status),
        created_at: model.created_at,
        reviewed_at: model.reviewed_at,
        reviewed_by: model.reviewed_by,
    }
}

#[async_trait]
impl ChangeRequestRepositoryInterface for SeaOrmChangeRequestRepository {
    async fn create_request(
        &self,
        dto: CreateChangeRequestDto,
    ) -> DomainResult<ScheduleChangeRequest> {
        let model = request::ActiveModel {
            id: Set(uuid::Uuid::new_v4().to_string()),
            schedule_id: Set(dto.schedule_id),
            teacher_id: Set(dto.teacher_id),
            teacher_name: Set(dto.teacher_name),
            requested_changes: Set(json_to_text(&dto.requested_changes)),
            reason: Set(dto.reason),
            status: Set(request::RequestStatus::Pending),
            created_at: Set(Utc::now()),
            reviewed_at: Set(None),
            reviewed_by: Set(None),
        }
        .insert(&self.db)
        .await
        .map_err(db_err)?;

        Ok(request_model_to_domain(model))
    }

    async fn get_request(&self, id: &str) -> DomainResult<Option<ScheduleChangeRequest>> {
        let model = request::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(model.map(request_model_to_domain))
    }

    async fn list_requests(
        &self,
        filter: ChangeRequestFilter,
    ) -> DomainResult<Vec<ScheduleChangeRequest>> {
        let mut query = request::Entity::find();

        if let Some(status) = filter.status {
            query = query.filter(request::Column::Status.eq(domain_status_to_entity(status)));
        }
        if let Some(ref teacher_id) = filter.teacher_id {
            query = query.filter(request::Column::TeacherId.eq(teacher_id.as_str()));
        }

        let models = query
            .order_by_desc(request::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(models.into_iter().map(request_model_to_domain).collect())
    }

    async fn review_request(
        &self,
        id: &str,
        to: RequestStatus,
        reviewed_by: &str,
        reviewed_at: DateTime<Utc>,
    ) -> DomainResult<bool> {
        let result = request::Entity::update_many()
            .set(request::ActiveModel {
                status: Set(domain_status_to_entity(to)),
                reviewed_at: Set(Some(reviewed_at)),
                reviewed_by: Set(Some(reviewed_by.to_string())),
                ..Default::default()
            })
            .filter(request::Column::Id.eq(id))
            .filter(request::Column::Status.eq(request::RequestStatus::Pending))
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        Ok(result.rows_affected > 0)
    }

    async fn reopen_request(&self, id: &str, from: RequestStatus) -> DomainResult<bool> {
        let result = request::Entity::update_many()
            .set(request::ActiveModel {
                status: Set(request::RequestStatus::Pending),
                reviewed_at: Set(None),
                reviewed_by: Set(None),
                ..Default::default()
            })
            .filter(request::Column::Id.eq(id))
            .filter(request::Column::Status.eq(domain_status_to_entity(from)))
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        Ok(result.rows_affected > 0)
    }

    async fn count_requests(&self, status: Option<RequestStatus>) -> DomainResult<u64> {
        let mut query = request::Entity::find();
        if let Some(status) = status {
            query = query.filter(request::Column::Status.eq(domain_status_to_entity(status)));
        }
        query.count(&self.db).await.map_err(db_err)
    }
}
