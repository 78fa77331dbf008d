//! SeaORM implementation of RepositoryProvider

use sea_orm::DatabaseConnection;

use crate::domain::{
    ActivityRepositoryInterface, ChangeRequestRepositoryInterface, ClassRepositoryInterface,
    NewsRepositoryInterface, RepositoryProvider, ScheduleRepositoryInterface,
    UserRepositoryInterface,
};

use super::activity_repository::SeaOrmActivityRepository;
use super::change_request_repository::SeaOrmChangeRequestRepository;
use super::class_repository::SeaOrmClassRepository;
use super::news_repository::SeaOrmNewsRepository;
use super::schedule_repository::SeaOrmScheduleRepository;
use super::user_repository::SeaOrmUserRepository;

/// Unified repository provider backed by SeaORM.
///
/// Holds one connection pool and exposes per-aggregate repository accessors.
///
/// ```ignore
/// let repos = SeaOrmRepositoryProvider::new(db.clone());
/// let user = repos.users().get_user_by_username("alice").await?;
/// let pending = repos.news().list_news(Some(NewsStatus::Pending)).await?;
/// ```
pub struct SeaOrmRepositoryProvider {
    users: SeaOrmUserRepository,
    classes: SeaOrmClassRepository,
    news: SeaOrmNewsRepository,
    schedules: SeaOrmScheduleRepository,
    change_requests: SeaOrmChangeRequestRepository,
    activities: SeaOrmActivityRepository,
}

impl SeaOrmRepositoryProvider {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            users: SeaOrmUserRepository::new(db.clone()),
            classes: SeaOrmClassRepository::new(db.clone()),
            news: SeaOrmNewsRepository::new(db.clone()),
            schedules: SeaOrmScheduleRepository::new(db.clone()),
            change_requests: SeaOrmChangeRequestRepository::new(db.clone()),
            activities: SeaOrmActivityRepository::new(db),
        }
    }
}

impl RepositoryProvider for SeaOrmRepositoryProvider {
    fn users(&self) -> &dyn UserRepositoryInterface {
        &self.users
    }

    fn classes(&self) -> &dyn ClassRepositoryInterface {
        &self.classes
    }

    fn news(&self) -> &dyn NewsRepositoryInterface {
        &self.news
    }

    fn schedules(&self) -> &dyn ScheduleRepositoryInterface {
        &self.schedules
    }

    fn change_requests(&self) -> &dyn ChangeRequestRepositoryInterface {
        &self.change_requests
    }

    fn activities(&self) -> &dyn ActivityRepositoryInterface {
        &self.activities
    }
}
