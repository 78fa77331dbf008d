//! Application layer
//!
//! Use-case orchestration on top of the domain repositories. HTTP handlers
//! call into these services and never touch persistence directly.

pub mod identity;
pub mod services;

pub use identity::{AuthResult, Registration, UserService};
pub use services::{AnalyticsReport, AnalyticsService, ClassService, NewsService, ScheduleService};
