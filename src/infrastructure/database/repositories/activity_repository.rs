use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

use super::{db_err, json_to_text, text_to_json};
use crate::domain::{ActivityRepositoryInterface, DomainResult, UserActivity};
use crate::infrastructure::database::entities::user_activity;

pub struct SeaOrmActivityRepository {
    db: DatabaseConnection,
}

impl SeaOrmActivityRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn activity_model_to_domain(model: user_activity::Model) -> UserActivity {
    UserActivity {
        details: text_to_json(&model.details),
        id: model.id,
        user_id: model.user_id,
        action: model.action,
        timestamp: model.timestamp,
    }
}

#[async_trait]
impl ActivityRepositoryInterface for SeaOrmActivityRepository {
    async fn record(&self, activity: UserActivity) -> DomainResult<()> {
        user_activity::ActiveModel {
            id: Set(activity.id),
            user_id: Set(activity.user_id),
            action: Set(activity.action),
            details: Set(json_to_text(&activity.details)),
            timestamp: Set(activity.timestamp),
        }
        .insert(&self.db)
        .await
        .map_err(db_err)?;

        Ok(())
    }

    async fn count_since(&self, action: &str, since: DateTime<Utc>) -> DomainResult<u64> {
        user_activity::Entity::find()
            .filter(user_activity::Column::Action.eq(action))
            .filter(user_activity::Column::Timestamp.gte(since))
            .count(&self.db)
            .await
            .map_err(db_err)
    }

    async fn count_by_action(&self) -> DomainResult<Vec<(String, u64)>> {
        let rows: Vec<(String, i64)> = user_activity::Entity::find()
            .select_only()
            .column(user_activity::Column::Action)
            .column_as(Expr::col(user_activity::Column::Id).count(), "count")
            .group_by(user_activity::Column::Action)
            .order_by_asc(user_activity::Column::Action)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(rows
            .into_iter()
            .map(|(action, count)| (action, count.max(0) as u64))
            .collect())
    }

    async fn recent(&self, limit: u64) -> DomainResult<Vec<UserActivity>> {
        let models = user_activity::Entity::find()
            .order_by_desc(user_activity::Column::Timestamp)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(models.into_iter().map(activity_model_to_domain).collect())
    }
}
