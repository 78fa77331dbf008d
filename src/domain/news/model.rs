//! News entity and moderation states

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum NewsStatus {
    Published,
    Pending,
    Rejected,
}

impl NewsStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Published => "published",
            Self::Pending => "pending",
            Self::Rejected => "rejected",
        }
    }
}

#[derive(Debug, Clone)]
pub struct News {
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

impl News {
    pub fn is_published(&self) -> bool {
        self.status == NewsStatus::Published
    }
}

#[derive(Debug, Clone)]
pub struct CreateNewsDto {
    pub title: String,
    pub content: String,
    pub author_id: String,
    pub author_name: String,
    pub status: NewsStatus,
    pub published_at: Option<DateTime<Utc>>,
}
