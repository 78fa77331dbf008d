//! Account aggregate
//!
//! Contains the User entity, DTOs, and repository interface.

pub mod model;
pub mod repository;

mod dto_create;
mod dto_get;

pub use model::{User, UserRole, UserStatus};

pub use dto_create::CreateUserDto;
pub use dto_get::GetUserDto;

pub use repository::UserRepositoryInterface;
