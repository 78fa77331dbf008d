//! HTTP REST API
//!
//! - `middleware`: bearer authentication and role gates
//! - `modules`: per-feature DTOs and handlers
//! - `router`: route table, OpenAPI document and Swagger UI

pub mod common;
pub mod error;
pub mod middleware;
pub mod modules;
pub mod router;

pub use router::{create_api_router, ApiDoc, AppState, RouterOptions};
