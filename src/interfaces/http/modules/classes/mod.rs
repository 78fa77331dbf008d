//! Class module: class CRUD and rosters

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
