//! Shared HTTP types

pub mod query;
pub mod validated_json;

use serde::Serialize;
use utoipa::ToSchema;

pub use query::{ApiQuery, ApiQueryRejection};
pub use validated_json::{ValidatedJson, ValidatedJsonRejection};

/// Error body returned by every failing endpoint
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub detail: String,
}

/// Plain confirmation body
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
