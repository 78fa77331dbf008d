use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::{CreateNewsDto, News, NewsStatus};
use crate::domain::DomainResult;

#[async_trait]
pub trait NewsRepositoryInterface: Send + Sync {
    async fn create_news(&self, dto: CreateNewsDto) -> DomainResult<News>;
    async fn get_news(&self, id: &str) -> DomainResult<Option<News>>;
    /// Newest first. `None` lists every status.
    async fn list_news(&self, status: Option<NewsStatus>) -> DomainResult<Vec<News>>;
    async fn update_news(
        &self,
        id: &str,
        title: String,
        content: String,
        status: NewsStatus,
    ) -> DomainResult<Option<News>>;
    async fn delete_news(&self, id: &str) -> DomainResult<bool>;

    /// Conditional status update. `published_at` is written alongside the
    /// status when given. Returns `false` when no row matched.
    async fn transition_status(
        &self,
        id: &str,
        from: NewsStatus,
        to: NewsStatus,
        published_at: Option<DateTime<Utc>>,
    ) -> DomainResult<bool>;

    async fn increment_views(&self, id: &str) -> DomainResult<()>;
    async fn count_news(&self, status: Option<NewsStatus>) -> DomainResult<u64>;
    async fn total_views(&self) -> DomainResult<i64>;
}
