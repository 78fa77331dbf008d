use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

use super::{db_err, json_to_text, text_to_json};
use crate::domain::{
    DomainResult, Schedule, ScheduleFilter, ScheduleInput, ScheduleRepositoryInterface,
};
use crate::infrastructure::database::entities::schedule;

pub struct SeaOrmScheduleRepository {
    db: DatabaseConnection,
}

impl SeaOrmScheduleRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn schedule_model_to_domain(model: schedule::Model) -> Schedule {
    Schedule {
        extra: text_to_json(&model.extra),
        id: model.id,
        class_id: model.class_id,
        day_of_week: model.day_of_week,
        time_slot: model.time_slot,
        subject: model.subject,
        teacher_id: model.teacher_id,
        teacher_name: model.teacher_name,
        created_at: model.created_at,
    }
}

#[async_trait]
impl ScheduleRepositoryInterface for SeaOrmScheduleRepository {
    async fn create_schedule(
        &self,
        input: ScheduleInput,
        teacher_name: String,
    ) -> DomainResult<Schedule> {
        let model = schedule::ActiveModel {
            id: Set(uuid::Uuid::new_v4().to_string()),
            class_id: Set(input.class_id),
            day_of_week: Set(input.day_of_week),
            time_slot: Set(input.time_slot),
            subject: Set(input.subject),
            teacher_id: Set(input.teacher_id),
            teacher_name: Set(teacher_name),
            extra: Set("{}".to_string()),
            created_at: Set(Utc::now()),
        }
        .insert(&self.db)
        .await
        .map_err(db_err)?;

        Ok(schedule_model_to_domain(model))
    }

    async fn get_schedule(&self, id: &str) -> DomainResult<Option<Schedule>> {
        let model = schedule::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(model.map(schedule_model_to_domain))
    }

    async fn list_schedules(&self, filter: ScheduleFilter) -> DomainResult<Vec<Schedule>> {
        let mut query = schedule::Entity::find();

        if let Some(ref class_id) = filter.class_id {
            query = query.filter(schedule::Column::ClassId.eq(class_id.as_str()));
        }
        if let Some(ref teacher_id) = filter.teacher_id {
            query = query.filter(schedule::Column::TeacherId.eq(teacher_id.as_str()));
        }

        let models = query
            .order_by_asc(schedule::Column::DayOfWeek)
            .order_by_asc(schedule::Column::TimeSlot)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(models.into_iter().map(schedule_model_to_domain).collect())
    }

    async fn save_schedule(&self, entry: &Schedule) -> DomainResult<bool> {
        let result = schedule::Entity::update_many()
            .set(schedule::ActiveModel {
                class_id: Set(entry.class_id.clone()),
                day_of_week: Set(entry.day_of_week),
                time_slot: Set(entry.time_slot.clone()),
                subject: Set(entry.subject.clone()),
                teacher_id: Set(entry.teacher_id.clone()),
                teacher_name: Set(entry.teacher_name.clone()),
                extra: Set(json_to_text(&entry.extra)),
                ..Default::default()
            })
            .filter(schedule::Column::Id.eq(entry.id.as_str()))
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        Ok(result.rows_affected > 0)
    }

    async fn delete_schedule(&self, id: &str) -> DomainResult<bool> {
        let result = schedule::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        Ok(result.rows_affected > 0)
    }

    async fn count_schedules(&self) -> DomainResult<u64> {
        schedule::Entity::find().count(&self.db).await.map_err(db_err)
    }
}
