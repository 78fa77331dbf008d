//! Database repository implementations
//!
//! Per-aggregate SeaORM repositories + unified RepositoryProvider.

pub mod activity_repository;
pub mod change_request_repository;
pub mod class_repository;
pub mod news_repository;
pub mod repository_provider;
pub mod schedule_repository;
pub mod user_repository;

pub use repository_provider::SeaOrmRepositoryProvider;

use sea_orm::{DbErr, SqlErr};
use serde_json::{Map, Value};
use tracing::warn;

use crate::domain::DomainError;

/// Unique-index violations surface as `Conflict`; everything else is internal.
pub(crate) fn db_err(e: DbErr) -> DomainError {
    if let Some(SqlErr::UniqueConstraintViolation(detail)) = e.sql_err() {
        return DomainError::Conflict(format!("Duplicate value: {}", detail));
    }
    DomainError::internal(format!("Database error: {}", e))
}

pub(crate) fn json_to_text(map: &Map<String, Value>) -> String {
    Value::Object(map.clone()).to_string()
}

pub(crate) fn text_to_json(text: &str) -> Map<String, Value> {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(map)) => map,
        Ok(other) => {
            warn!(kind = ?other, "Stored JSON document is not an object, ignoring");
            Map::new()
        }
        Err(e) => {
            warn!("Failed to parse stored JSON document: {}", e);
            Map::new()
        }
    }
}
