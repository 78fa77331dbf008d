//! Schedule module: timetable CRUD and change requests

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
