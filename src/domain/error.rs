use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Not authenticated")]
    Unauthenticated,

    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl DomainError {
    /// Whether the caller may retry the whole operation.
    pub fn is_retryable(&self) -> bool {
        matches!(self, DomainError::StoreUnavailable(_))
    }
}

impl From<rusqlite::Error> for DomainError {
    fn from(err: rusqlite::Error) -> Self {
        DomainError::StoreUnavailable(err.to_string())
    }
}

impl From<mongodb::error::Error> for DomainError {
    fn from(err: mongodb::error::Error) -> Self {
        DomainError::StoreUnavailable(err.to_string())
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        DomainError::StoreUnavailable(err.to_string())
    }
}
