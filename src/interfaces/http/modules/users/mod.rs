//! User management module: admin approval queue and account listing

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
