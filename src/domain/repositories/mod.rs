//! Repository traits for the domain layer
//!
//! Contains:
//! - `RepositoryProvider`: unified access to all per-aggregate repositories
//! - `DomainResult`: standard result type for domain operations

use super::activity::ActivityRepositoryInterface;
use super::class::ClassRepositoryInterface;
use super::news::NewsRepositoryInterface;
use super::schedule::{ChangeRequestRepositoryInterface, ScheduleRepositoryInterface};
use super::user::UserRepositoryInterface;
use crate::shared::errors::DomainError;

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

/// Provides access to all domain repositories.
///
/// ```ignore
/// async fn handle(repos: &dyn RepositoryProvider) {
///     let user = repos.users().get_user_by_username("alice").await?;
///     let classes = repos.classes().list_classes().await?;
/// }
/// ```
pub trait RepositoryProvider: Send + Sync {
    fn users(&self) -> &dyn UserRepositoryInterface;
    fn classes(&self) -> &dyn ClassRepositoryInterface;
    fn news(&self) -> &dyn NewsRepositoryInterface;
    fn schedules(&self) -> &dyn ScheduleRepositoryInterface;
    fn change_requests(&self) -> &dyn ChangeRequestRepositoryInterface;
    fn activities(&self) -> &dyn ActivityRepositoryInterface;
}
