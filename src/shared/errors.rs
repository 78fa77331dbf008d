use thiserror::Error;

/// Errors produced by services and repositories.
///
/// Each variant maps onto exactly one HTTP status in the interface layer;
/// see `interfaces::http::error`.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {entity} with {field}={value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("Validation: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Account not approved: {0}")]
    AccountNotApproved(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            field: "id",
            value: id.into(),
        }
    }

    pub fn internal(err: impl std::fmt::Display) -> Self {
        Self::Internal(err.to_string())
    }

    /// Client-facing message without the variant prefix.
    pub fn detail(&self) -> String {
        match self {
            Self::NotFound { entity, .. } => format!("{} not found", entity),
            Self::Validation(msg)
            | Self::Conflict(msg)
            | Self::Unauthorized(msg)
            | Self::AccountNotApproved(msg)
            | Self::Forbidden(msg) => msg.clone(),
            Self::Internal(_) => "Internal server error".to_string(),
        }
    }
}
