use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Select, Set,
};

use super::db_err;
use crate::domain::{CreateNewsDto, DomainResult, News, NewsRepositoryInterface, NewsStatus};
use crate::infrastructure::database::entities::news;

pub struct SeaOrmNewsRepository {
    db: DatabaseConnection,
}

impl SeaOrmNewsRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn entity_status_to_domain(status: news::NewsStatus) -> NewsStatus {
    match status {
        news::NewsStatus::Published => NewsStatus::Published,
        news::NewsStatus::Pending => NewsStatus::Pending,
        news::NewsStatus::Rejected => NewsStatus::Rejected,
    }
}

fn domain_status_to_entity(status: NewsStatus) -> news::NewsStatus {
    match status {
        NewsStatus::Published => news::NewsStatus::Published,
        NewsStatus::Pending => news::NewsStatus::Pending,
        NewsStatus::Rejected => news::NewsStatus::Rejected,
    }
}

fn news_model_to_domain(model: news::Model) -> News {
    News {
        id: model.id,
        title: model.title,
        content: model.content,
        author_id: model.author_id,
        author_name: model.author_name,
        status: entity_status_to_domain(model.status),
        views: model.views,
        created_at: model.created_at,
        published_at: model.published_at,
    }
}

fn with_status(status: Option<NewsStatus>) -> Select<news::Entity> {
    match status {
        Some(status) => {
            news::Entity::find().filter(news::Column::Status.eq(domain_status_to_entity(status)))
        }
        None => news::Entity::find(),
    }
}

#[async_trait]
impl NewsRepositoryInterface for SeaOrmNewsRepository {
    async fn create_news(&self, dto: CreateNewsDto) -> DomainResult<News> {
        let model = news::ActiveModel {
            id: Set(uuid::Uuid::new_v4().to_string()),
            title: Set(dto.title),
            content: Set(dto.content),
            author_id: Set(dto.author_id),
            author_name: Set(dto.author_name),
            status: Set(domain_status_to_entity(dto.status)),
            views: Set(0),
            created_at: Set(Utc::now()),
            published_at: Set(dto.published_at),
        }
        .insert(&self.db)
        .await
        .map_err(db_err)?;

        Ok(news_model_to_domain(model))
    }

    async fn get_news(&self, id: &str) -> DomainResult<Option<News>> {
        let model = news::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(model.map(news_model_to_domain))
    }

    async fn list_news(&self, status: Option<NewsStatus>) -> DomainResult<Vec<News>> {
        let models = with_status(status)
            .order_by_desc(news::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(models.into_iter().map(news_model_to_domain).collect())
    }

    async fn update_news(
        &self,
        id: &str,
        title: String,
        content: String,
        status: NewsStatus,
    ) -> DomainResult<Option<News>> {
        let existing = news::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        let Some(existing) = existing else {
            return Ok(None);
        };

        let mut active: news::ActiveModel = existing.into();
        active.title = Set(title);
        active.content = Set(content);
        active.status = Set(domain_status_to_entity(status));
        // Leaving the published state withdraws the publication time
        if status != NewsStatus::Published {
            active.published_at = Set(None);
        }

        let updated = active.update(&self.db).await.map_err(db_err)?;
        Ok(Some(news_model_to_domain(updated)))
    }

    async fn delete_news(&self, id: &str) -> DomainResult<bool> {
        let result = news::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        Ok(result.rows_affected > 0)
    }

    async fn transition_status(
        &self,
        id: &str,
        from: NewsStatus,
        to: NewsStatus,
        published_at: Option<DateTime<Utc>>,
    ) -> DomainResult<bool> {
        let mut changes = news::ActiveModel {
            status: Set(domain_status_to_entity(to)),
            ..Default::default()
        };
        if let Some(at) = published_at {
            changes.published_at = Set(Some(at));
        }

        let result = news::Entity::update_many()
            .set(changes)
            .filter(news::Column::Id.eq(id))
            .filter(news::Column::Status.eq(domain_status_to_entity(from)))
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        Ok(result.rows_affected > 0)
    }

    async fn increment_views(&self, id: &str) -> DomainResult<()> {
        news::Entity::update_many()
            .col_expr(news::Column::Views, Expr::col(news::Column::Views).add(1))
            .filter(news::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        Ok(())
    }

    async fn count_news(&self, status: Option<NewsStatus>) -> DomainResult<u64> {
        with_status(status).count(&self.db).await.map_err(db_err)
    }

    async fn total_views(&self) -> DomainResult<i64> {
        let total: Option<Option<i64>> = news::Entity::find()
            .select_only()
            .column_as(Expr::col(news::Column::Views).sum(), "total")
            .into_tuple()
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(total.flatten().unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::database::test_connection;

    fn draft(title: &str, status: NewsStatus) -> CreateNewsDto {
        CreateNewsDto {
            title: title.to_string(),
            content: "Body".to_string(),
            author_id: "u-1".to_string(),
            author_name: "Ann Smith".to_string(),
            status,
            published_at: None,
        }
    }

    #[tokio::test]
    async fn views_are_counted_and_summed() {
        let repo = SeaOrmNewsRepository::new(test_connection().await);
        assert_eq!(repo.total_views().await.unwrap(), 0);

        let a = repo.create_news(draft("a", NewsStatus::Published)).await.unwrap();
        let b = repo.create_news(draft("b", NewsStatus::Published)).await.unwrap();
        repo.increment_views(&a.id).await.unwrap();
        repo.increment_views(&a.id).await.unwrap();
        repo.increment_views(&b.id).await.unwrap();

        assert_eq!(repo.get_news(&a.id).await.unwrap().unwrap().views, 2);
        assert_eq!(repo.total_views().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn approval_is_conditional_on_pending() {
        let repo = SeaOrmNewsRepository::new(test_connection().await);
        let item = repo.create_news(draft("x", NewsStatus::Pending)).await.unwrap();
        let now = Utc::now();

        assert!(repo
            .transition_status(&item.id, NewsStatus::Pending, NewsStatus::Published, Some(now))
            .await
            .unwrap());
        assert!(!repo
            .transition_status(&item.id, NewsStatus::Pending, NewsStatus::Rejected, None)
            .await
            .unwrap());

        let stored = repo.get_news(&item.id).await.unwrap().unwrap();
        assert!(stored.is_published());
        assert!(stored.published_at.is_some());
        assert_eq!(repo.count_news(Some(NewsStatus::Pending)).await.unwrap(), 0);
    }
}
