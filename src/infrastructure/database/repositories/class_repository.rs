use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

use super::db_err;
use crate::domain::{Class, ClassInput, ClassRepositoryInterface, DomainResult};
use crate::infrastructure::database::entities::class;

pub struct SeaOrmClassRepository {
    db: DatabaseConnection,
}

impl SeaOrmClassRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn class_model_to_domain(model: class::Model) -> Class {
    Class {
        id: model.id,
        name: model.name,
        grade: model.grade,
        teacher_id: model.teacher_id,
        student_count: model.student_count,
        created_at: model.created_at,
    }
}

#[async_trait]
impl ClassRepositoryInterface for SeaOrmClassRepository {
    async fn create_class(&self, input: ClassInput) -> DomainResult<Class> {
        let model = class::ActiveModel {
            id: Set(uuid::Uuid::new_v4().to_string()),
            name: Set(input.name),
            grade: Set(input.grade),
            teacher_id: Set(input.teacher_id),
            student_count: Set(0),
            created_at: Set(Utc::now()),
        }
        .insert(&self.db)
        .await
        .map_err(db_err)?;

        Ok(class_model_to_domain(model))
    }

    async fn get_class(&self, id: &str) -> DomainResult<Option<Class>> {
        let model = class::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(model.map(class_model_to_domain))
    }

    async fn list_classes(&self) -> DomainResult<Vec<Class>> {
        let models = class::Entity::find()
            .order_by_asc(class::Column::Grade)
            .order_by_asc(class::Column::Name)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(models.into_iter().map(class_model_to_domain).collect())
    }

    async fn update_class(&self, id: &str, input: ClassInput) -> DomainResult<Option<Class>> {
        let existing = class::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        let Some(existing) = existing else {
            return Ok(None);
        };

        let mut active: class::ActiveModel = existing.into();
        active.name = Set(input.name);
        active.grade = Set(input.grade);
        active.teacher_id = Set(input.teacher_id);

        let updated = active.update(&self.db).await.map_err(db_err)?;
        Ok(Some(class_model_to_domain(updated)))
    }

    async fn delete_class(&self, id: &str) -> DomainResult<bool> {
        let result = class::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        Ok(result.rows_affected > 0)
    }

    async fn set_student_count(&self, id: &str, count: i32) -> DomainResult<()> {
        class::Entity::update_many()
            .set(class::ActiveModel {
                student_count: Set(count),
                ..Default::default()
            })
            .filter(class::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        Ok(())
    }

    async fn count_classes(&self) -> DomainResult<u64> {
        class::Entity::find().count(&self.db).await.map_err(db_err)
    }
}
