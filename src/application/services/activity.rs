//! Activity log
//!
//! Appends `UserActivity` records consumed by analytics. Recording is best
//! effort: a failed insert is logged and never fails the caller.

use std::sync::Arc;

use chrono::Utc;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::domain::{RepositoryProvider, UserActivity};

pub const LOGIN: &str = "login";
pub const PASSWORD_CHANGED: &str = "password_changed";
pub const NEWS_CREATED: &str = "news_created";
pub const CLASS_CREATED: &str = "class_created";
pub const SCHEDULE_CHANGE_REQUESTED: &str = "schedule_change_requested";
pub const USER_APPROVED: &str = "user_approved";
pub const USER_REJECTED: &str = "user_rejected";

#[derive(Clone)]
pub struct ActivityLog {
    repos: Arc<dyn RepositoryProvider>,
}

impl ActivityLog {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    pub async fn record(&self, user_id: &str, action: &str, details: Map<String, Value>) {
        let activity = UserActivity {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            action: action.to_string(),
            details,
            timestamp: Utc::now(),
        };

        match self.repos.activities().record(activity).await {
            Ok(()) => debug!(user_id, action, "Activity recorded"),
            Err(e) => warn!(user_id, action, "Failed to record activity: {}", e),
        }
    }
}

/// Build a details map from `(key, value)` pairs.
pub fn details<I, K, V>(pairs: I) -> Map<String, Value>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<Value>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}
