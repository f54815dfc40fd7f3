use serde::{Deserialize, Serialize};
use ulid::Ulid;

use crate::domain::error::DomainError;

/// Group label used when a publication is not posted to a specific group.
pub const GENERAL_GROUP: &str = "General";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PublicationKind {
    #[default]
    Post,
    #[serde(alias = "Historia")]
    Story,
}

impl PublicationKind {
    /// Collection the publication is written to.
    pub fn collection(&self) -> &'static str {
        match self {
            Self::Post => "publicaciones",
            Self::Story => "historias",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Publication {
    pub id: String,
    pub author: String,
    pub text: String,
    pub group: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_path: Option<String>,
    /// Display timestamp as entered, `dd/MM/yyyy HH:mm`.
    pub time: String,
    pub user_id: String,
    #[serde(default)]
    pub kind: PublicationKind,
}

impl Publication {
    pub fn new(
        kind: PublicationKind,
        author: String,
        user_id: String,
        text: String,
        group: Option<String>,
        image_path: Option<String>,
        time: String,
    ) -> Self {
        Self {
            id: Ulid::new().to_string(),
            author,
            text,
            group: group
                .filter(|g| !g.trim().is_empty())
                .unwrap_or_else(|| GENERAL_GROUP.to_string()),
            image_path: image_path.filter(|p| !p.is_empty()),
            time,
            user_id,
            kind,
        }
    }

    /// A publication carries text, an image, or both.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.user_id.is_empty() {
            return Err(DomainError::Unauthenticated);
        }
        if self.text.trim().is_empty() && self.image_path.is_none() {
            return Err(DomainError::Validation(
                "add text or an image before publishing".into(),
            ));
        }
        Ok(())
    }
}
