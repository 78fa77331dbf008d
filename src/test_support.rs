//! Shared fixtures for unit and HTTP tests

use std::sync::Arc;

use crate::domain::{CreateUserDto, RepositoryProvider, User, UserRole, UserStatus};
use crate::infrastructure::crypto::jwt::JwtConfig;
use crate::infrastructure::crypto::password::hash_password;
use crate::infrastructure::database::test_connection;
use crate::infrastructure::SeaOrmRepositoryProvider;

pub const PASSWORD: &str = "pw123";
pub const BCRYPT_COST: u32 = 4;

pub fn jwt_config() -> JwtConfig {
    JwtConfig::new("test-secret-key")
}

pub async fn repos() -> Arc<dyn RepositoryProvider> {
    Arc::new(SeaOrmRepositoryProvider::new(test_connection().await))
}

/// Insert an account with password [`PASSWORD`] directly, bypassing registration.
pub async fn seed_user(
    repos: &Arc<dyn RepositoryProvider>,
    username: &str,
    role: UserRole,
    status: UserStatus,
) -> User {
    let password_hash = hash_password(PASSWORD, BCRYPT_COST).unwrap();
    repos
        .users()
        .create_user(CreateUserDto {
            email: format!("{}@school.test", username),
            username: username.to_string(),
            full_name: format!("{} Example", username),
            password_hash,
            role,
            status,
            class_id: None,
        })
        .await
        .unwrap()
}
