//! User management DTOs

use serde::Deserialize;
use utoipa::IntoParams;

use crate::domain::{GetUserDto, UserRole, UserStatus};

/// Query parameters for listing accounts
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ListUsersParams {
    /// Filter by role
    pub role: Option<UserRole>,
    /// Filter by approval state
    pub status: Option<UserStatus>,
}

impl From<ListUsersParams> for GetUserDto {
    fn from(params: ListUsersParams) -> Self {
        Self {
            role: params.role,
            status: params.status,
            class_id: None,
        }
    }
}
