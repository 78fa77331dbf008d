//! HTTP feature modules
//!
//! Each module owns its DTOs, handlers and handler state. Routing and the
//! role gates are wired in `interfaces::http::router`.

pub mod analytics;
pub mod auth;
pub mod classes;
pub mod health;
pub mod metrics;
pub mod news;
pub mod request_id;
pub mod schedule;
pub mod users;
