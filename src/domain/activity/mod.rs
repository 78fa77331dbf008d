//! User activity log

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use crate::domain::DomainResult;

/// Append-only activity record.
#[derive(Debug, Clone)]
pub struct UserActivity {
    pub id: String,
    pub user_id: String,
    pub action: String,
    pub details: Map<String, Value>,
    pub timestamp: DateTime<Utc>,
}

#[async_trait]
pub trait ActivityRepositoryInterface: Send + Sync {
    async fn record(&self, activity: UserActivity) -> DomainResult<()>;
    async fn count_since(&self, action: &str, since: DateTime<Utc>) -> DomainResult<u64>;
    /// `(action, count)` pairs, sorted by action.
    async fn count_by_action(&self) -> DomainResult<Vec<(String, u64)>>;
    /// Most recent first.
    async fn recent(&self, limit: u64) -> DomainResult<Vec<UserActivity>>;
}
