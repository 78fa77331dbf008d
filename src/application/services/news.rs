//! News publishing and moderation
//!
//! Teacher posts wait in `pending` until an admin approves them; admin posts
//! are published immediately. Unpublished items are only visible to their
//! author and to admins.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use super::activity::{self, details, ActivityLog};
use crate::application::identity::require_owner_or_admin;
use crate::domain::{
    CreateNewsDto, DomainError, DomainResult, News, NewsStatus, RepositoryProvider, User,
};

#[derive(Clone)]
pub struct NewsService {
    repos: Arc<dyn RepositoryProvider>,
    activity: ActivityLog,
}

impl NewsService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self {
            activity: ActivityLog::new(repos.clone()),
            repos,
        }
    }

    pub async fn list_published(&self) -> DomainResult<Vec<News>> {
        self.repos.news().list_news(Some(NewsStatus::Published)).await
    }

    pub async fn list_pending(&self) -> DomainResult<Vec<News>> {
        self.repos.news().list_news(Some(NewsStatus::Pending)).await
    }

    pub async fn create(&self, author: &User, title: String, content: String) -> DomainResult<News> {
        let (status, published_at) = if author.is_admin() {
            (NewsStatus::Published, Some(Utc::now()))
        } else {
            (NewsStatus::Pending, None)
        };

        let news = self
            .repos
            .news()
            .create_news(CreateNewsDto {
                title,
                content,
                author_id: author.id.clone(),
                author_name: author.full_name.clone(),
                status,
                published_at,
            })
            .await?;

        self.activity
            .record(
                &author.id,
                activity::NEWS_CREATED,
                details([("news_id", news.id.as_str()), ("status", status.as_str())]),
            )
            .await;

        info!(news_id = %news.id, author_id = %author.id, status = status.as_str(), "News created");
        Ok(news)
    }

    /// Fetch an item for `viewer` and count the view.
    pub async fn view(&self, viewer: &User, id: &str) -> DomainResult<News> {
        let mut news = self.find(id).await?;

        if !news.is_published() && news.author_id != viewer.id && !viewer.is_admin() {
            return Err(DomainError::not_found("News", id));
        }

        self.repos.news().increment_views(id).await?;
        news.views += 1;
        Ok(news)
    }

    /// Author or admin. A non-admin edit sends the item back to moderation.
    pub async fn update(
        &self,
        editor: &User,
        id: &str,
        title: String,
        content: String,
    ) -> DomainResult<News> {
        let existing = self.find(id).await?;
        require_owner_or_admin(editor, &existing.author_id)?;

        let status = if editor.is_admin() {
            existing.status
        } else {
            NewsStatus::Pending
        };

        let news = self
            .repos
            .news()
            .update_news(id, title, content, status)
            .await?
            .ok_or_else(|| DomainError::not_found("News", id))?;

        info!(news_id = id, editor_id = %editor.id, status = status.as_str(), "News updated");
        Ok(news)
    }

    pub async fn delete(&self, editor: &User, id: &str) -> DomainResult<()> {
        let existing = self.find(id).await?;
        require_owner_or_admin(editor, &existing.author_id)?;

        if !self.repos.news().delete_news(id).await? {
            return Err(DomainError::not_found("News", id));
        }
        info!(news_id = id, editor_id = %editor.id, "News deleted");
        Ok(())
    }

    pub async fn approve(&self, admin: &User, id: &str) -> DomainResult<News> {
        self.moderate(admin, id, NewsStatus::Published).await
    }

    pub async fn reject(&self, admin: &User, id: &str) -> DomainResult<News> {
        self.moderate(admin, id, NewsStatus::Rejected).await
    }

    async fn moderate(&self, admin: &User, id: &str, to: NewsStatus) -> DomainResult<News> {
        let existing = self.find(id).await?;
        if existing.status != NewsStatus::Pending {
            return Err(DomainError::Conflict(format!(
                "News is already {}",
                existing.status.as_str()
            )));
        }

        let published_at = (to == NewsStatus::Published).then(Utc::now);
        if !self
            .repos
            .news()
            .transition_status(id, NewsStatus::Pending, to, published_at)
            .await?
        {
            return Err(DomainError::Conflict("News is no longer pending".into()));
        }

        info!(news_id = id, admin_id = %admin.id, status = to.as_str(), "News moderated");
        self.find(id).await
    }

    async fn find(&self, id: &str) -> DomainResult<News> {
        self.repos
            .news()
            .get_news(id)
            .await?
            .ok_or_else(|| DomainError::not_found("News", id))
    }
}
