use super::{UserRole, UserStatus};

/// Fields required to persist a new account.
///
/// The password has already been hashed by the caller.
#[derive(Debug, Clone)]
pub struct CreateUserDto {
    pub email: String,
    pub username: String,
    pub full_name: String,
    pub password_hash: String,
    pub role: UserRole,
    pub status: UserStatus,
    pub class_id: Option<String>,
}
