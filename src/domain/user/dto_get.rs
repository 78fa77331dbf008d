use super::{UserRole, UserStatus};

/// Filter for listing accounts. `None` fields match everything.
#[derive(Debug, Clone, Default)]
pub struct GetUserDto {
    pub role: Option<UserRole>,
    pub status: Option<UserStatus>,
    pub class_id: Option<String>,
}
