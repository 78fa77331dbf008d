//! # School29 Management System
//!
//! REST backend for school administration: account registration with admin
//! approval, classes and rosters, moderated news, timetables with teacher
//! change requests, and usage analytics.
//!
//! ## Architecture
//!
//! - **domain**: entities, enums and repository traits
//! - **application**: identity service, role gate and feature services
//! - **infrastructure**: SeaORM persistence, JWT and bcrypt
//! - **interfaces**: axum HTTP API with Swagger documentation
//! - **server**: startup, shutdown and tracing setup shared by binaries

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod server;
pub mod shared;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::{default_config_path, AppConfig};
pub use infrastructure::{init_database, run_migrations, DatabaseConfig, SeaOrmRepositoryProvider};
pub use interfaces::http::create_api_router;
