//! News DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::{News, NewsStatus};

/// Body for creating or editing a news item
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct NewsRequest {
    #[validate(length(min = 1, max = 255, message = "title must be 1-255 characters"))]
    pub title: String,
    #[validate(length(min = 1, message = "content is required"))]
    pub content: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct NewsDto {
    pub id: String,
    pub title: String,
    pub content: String,
    pub author_id: String,
    pub author_name: String,
    pub status: NewsStatus,
    pub views: i32,
    pub created_at: DateTime<Utc>,
    pub published_at: Option<DateTime<Utc>>,
}

impl From<News> for NewsDto {
    fn from(news: News) -> Self {
        Self {
            id: news.id,
            title: news.title,
            content: news.content,
            author_id: news.author_id,
            author_name: news.author_name,
            status: news.status,
            views: news.views,
            created_at: news.created_at,
            published_at: news.published_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_title_is_rejected() {
        let req = NewsRequest {
            title: String::new(),
            content: "body".into(),
        };
        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("title"));
    }

    #[test]
    fn long_title_is_rejected() {
        let req = NewsRequest {
            title: "x".repeat(256),
            content: "body".into(),
        };
        assert!(req.validate().is_err());
    }
}
