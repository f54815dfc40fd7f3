use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::domain::error::DomainError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    #[serde(default)]
    pub id: String,
    pub publication_id: String,
    pub user_id: String,
    pub user_name: String,
    #[serde(default)]
    pub user_photo: Option<String>,
    #[serde(default)]
    pub user_email: String,
    pub text: String,
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
}

impl Comment {
    /// Build a comment with trimmed text; blank text is rejected.
    pub fn new(
        publication_id: String,
        user_id: String,
        user_name: String,
        text: &str,
        date: OffsetDateTime,
    ) -> Result<Self, DomainError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(DomainError::Validation("comment text is empty".into()));
        }
        if publication_id.is_empty() {
            return Err(DomainError::Validation("publication id is required".into()));
        }
        if user_id.is_empty() {
            return Err(DomainError::Unauthenticated);
        }

        Ok(Self {
            id: String::new(),
            publication_id,
            user_id,
            user_name,
            user_photo: None,
            user_email: String::new(),
            text: text.to_string(),
            date,
        })
    }
}
