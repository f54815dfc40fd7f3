use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::domain::error::DomainError;

/// Activity tagged on a shared map location. Unlike [`super::SportType`],
/// walking is allowed here.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivityType {
    #[default]
    Running,
    #[serde(alias = "Ciclismo")]
    Cycling,
    #[serde(alias = "Caminata")]
    Walking,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapLocation {
    #[serde(default)]
    pub id: String,
    pub user_id: String,
    #[serde(default)]
    pub user_name: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub activity: ActivityType,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    #[serde(default)]
    pub note: String,
}

impl MapLocation {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.user_id.is_empty() {
            return Err(DomainError::Unauthenticated);
        }
        if !(-90.0..=90.0).contains(&self.latitude) || !(-180.0..=180.0).contains(&self.longitude) {
            return Err(DomainError::Validation(format!(
                "coordinates out of range: {}, {}",
                self.latitude, self.longitude
            )));
        }
        Ok(())
    }
}
