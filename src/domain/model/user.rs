use serde::{Deserialize, Serialize};

use super::ExperienceLevel;
use crate::domain::error::DomainError;

/// Profile document stored per user id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub birth_date: String,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub level: ExperienceLevel,
    #[serde(default)]
    pub photo: Option<String>,
}

impl UserProfile {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.name.trim().is_empty() {
            return Err(DomainError::Validation("name is required".into()));
        }
        if !self.email.contains('@') {
            return Err(DomainError::Validation(format!("invalid email: {}", self.email)));
        }
        Ok(())
    }
}
