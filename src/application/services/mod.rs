//! Application services for the collaborator features
//!
//! Each service takes the shared `RepositoryProvider` and is cheap to clone.

pub mod activity;
pub mod analytics;
pub mod classes;
pub mod news;
pub mod schedule;

pub use activity::ActivityLog;
pub use analytics::{AnalyticsReport, AnalyticsService};
pub use classes::ClassService;
pub use news::NewsService;
pub use schedule::ScheduleService;
