//! Domain layer
//!
//! Entities, enums and repository traits. Nothing in here touches the
//! database or HTTP directly.

pub mod activity;
pub mod class;
pub mod news;
pub mod repositories;
pub mod schedule;
pub mod user;

pub use activity::{ActivityRepositoryInterface, UserActivity};
pub use class::{Class, ClassInput, ClassRepositoryInterface};
pub use news::{CreateNewsDto, News, NewsRepositoryInterface, NewsStatus};
pub use repositories::{DomainResult, RepositoryProvider};
pub use schedule::{
    ChangeRequestFilter, ChangeRequestRepositoryInterface, CreateChangeRequestDto, RequestStatus,
    Schedule, ScheduleChangeRequest, ScheduleFilter, ScheduleInput, ScheduleRepositoryInterface,
};
pub use user::{CreateUserDto, GetUserDto, User, UserRepositoryInterface, UserRole, UserStatus};

pub use crate::shared::errors::DomainError;
