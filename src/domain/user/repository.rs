use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::{CreateUserDto, GetUserDto, User, UserStatus};
use crate::domain::DomainResult;

#[async_trait]
pub trait UserRepositoryInterface: Send + Sync {
    /// Insert a new account. Fails with `Conflict` on a duplicate username or email.
    async fn create_user(&self, dto: CreateUserDto) -> DomainResult<User>;

    async fn get_user_by_id(&self, id: &str) -> DomainResult<Option<User>>;
    async fn get_user_by_username(&self, username: &str) -> DomainResult<Option<User>>;
    async fn find_by_username_or_email(
        &self,
        username: &str,
        email: &str,
    ) -> DomainResult<Option<User>>;
    async fn list_users(&self, dto: GetUserDto) -> DomainResult<Vec<User>>;
    async fn count_users(&self, dto: GetUserDto) -> DomainResult<u64>;

    /// Conditional status update (`WHERE id = ? AND status = from`).
    /// Returns `false` when no row matched.
    async fn transition_status(
        &self,
        id: &str,
        from: UserStatus,
        to: UserStatus,
    ) -> DomainResult<bool>;

    async fn update_last_login(&self, id: &str, at: DateTime<Utc>) -> DomainResult<()>;

    /// Returns `false` when the account does not exist.
    async fn update_password_hash(&self, id: &str, password_hash: &str) -> DomainResult<bool>;
}
