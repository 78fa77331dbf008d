//! News module: publishing and moderation endpoints

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
