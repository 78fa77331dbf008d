//! Aggregate usage counts for the admin dashboard

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{Duration, Utc};

use super::activity;
use crate::domain::{
    DomainResult, GetUserDto, NewsStatus, RepositoryProvider, RequestStatus, UserActivity,
    UserRole, UserStatus,
};

const RECENT_ACTIVITY_LIMIT: u64 = 10;
const LOGIN_WINDOW_DAYS: i64 = 7;

#[derive(Debug, Clone)]
pub struct AnalyticsReport {
    pub total_users: u64,
    pub users_by_role: BTreeMap<String, u64>,
    pub users_by_status: BTreeMap<String, u64>,
    pub total_classes: u64,
    pub total_news: u64,
    pub published_news: u64,
    pub pending_news: u64,
    pub total_news_views: i64,
    pub total_schedules: u64,
    pub pending_schedule_changes: u64,
    pub logins_last_7_days: u64,
    pub activity_by_action: BTreeMap<String, u64>,
    pub recent_activity: Vec<UserActivity>,
}

#[derive(Clone)]
pub struct AnalyticsService {
    repos: Arc<dyn RepositoryProvider>,
}

impl AnalyticsService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    pub async fn report(&self) -> DomainResult<AnalyticsReport> {
        let users = self.repos.users();
        let news = self.repos.news();

        let mut users_by_role = BTreeMap::new();
        for role in UserRole::ALL {
            let filter = GetUserDto {
                role: Some(role),
                ..Default::default()
            };
            users_by_role.insert(role.as_str().to_string(), users.count_users(filter).await?);
        }

        let mut users_by_status = BTreeMap::new();
        for status in UserStatus::ALL {
            let filter = GetUserDto {
                status: Some(status),
                ..Default::default()
            };
            users_by_status.insert(status.as_str().to_string(), users.count_users(filter).await?);
        }

        let since = Utc::now() - Duration::days(LOGIN_WINDOW_DAYS);

        Ok(AnalyticsReport {
            total_users: users.count_users(GetUserDto::default()).await?,
            users_by_role,
            users_by_status,
            total_classes: self.repos.classes().count_classes().await?,
            total_news: news.count_news(None).await?,
            published_news: news.count_news(Some(NewsStatus::Published)).await?,
            pending_news: news.count_news(Some(NewsStatus::Pending)).await?,
            total_news_views: news.total_views().await?,
            total_schedules: self.repos.schedules().count_schedules().await?,
            pending_schedule_changes: self
                .repos
                .change_requests()
                .count_requests(Some(RequestStatus::Pending))
                .await?,
            logins_last_7_days: self
                .repos
                .activities()
                .count_since(activity::LOGIN, since)
                .await?,
            activity_by_action: self
                .repos
                .activities()
                .count_by_action()
                .await?
                .into_iter()
                .collect(),
            recent_activity: self
                .repos
                .activities()
                .recent(RECENT_ACTIVITY_LIMIT)
                .await?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::identity::UserService;
    use crate::test_support::{jwt_config, repos, seed_user, BCRYPT_COST, PASSWORD};

    #[tokio::test]
    async fn counts_users_and_logins() {
        let repos = repos().await;
        seed_user(&repos, "root", UserRole::Admin, UserStatus::Approved).await;
        seed_user(&repos, "ann", UserRole::Teacher, UserStatus::Approved).await;
        seed_user(&repos, "kid", UserRole::Student, UserStatus::Pending).await;

        let users = UserService::new(repos.clone(), jwt_config(), BCRYPT_COST);
        users.login("root", PASSWORD).await.unwrap();
        users.login("ann", PASSWORD).await.unwrap();

        let report = AnalyticsService::new(repos).report().await.unwrap();
        assert_eq!(report.total_users, 3);
        assert_eq!(report.users_by_role["student"], 1);
        assert_eq!(report.users_by_status["approved"], 2);
        assert_eq!(report.users_by_status["rejected"], 0);
        assert_eq!(report.logins_last_7_days, 2);
        assert_eq!(report.activity_by_action.get("login"), Some(&2));
        assert_eq!(report.recent_activity.len(), 2);
        assert_eq!(report.total_news_views, 0);
    }
}
