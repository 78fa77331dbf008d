//! Database entities module

pub mod class;
pub mod news;
pub mod schedule;
pub mod schedule_change_request;
pub mod user;
pub mod user_activity;

pub use class::Entity as Class;
pub use news::Entity as News;
pub use schedule::Entity as Schedule;
pub use schedule_change_request::Entity as ScheduleChangeRequest;
pub use user::Entity as User;
pub use user_activity::Entity as UserActivity;
