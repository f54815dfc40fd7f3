use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;
use time::OffsetDateTime;

use crate::domain::error::DomainError;

/// Accepted group distance at input time, in kilometres.
pub const DISTANCE_RANGE_KM: RangeInclusive<f32> = 1.0..=50.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExperienceLevel {
    #[default]
    #[serde(alias = "Principiante")]
    Beginner,
    #[serde(alias = "Intermedio")]
    Intermediate,
    #[serde(alias = "Avanzado")]
    Advanced,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SportType {
    #[default]
    Running,
    #[serde(alias = "Ciclismo")]
    Cycling,
}

/// Training day label. Ordered Monday first so sets render in week order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Weekday {
    #[serde(rename = "Mon", alias = "Lun")]
    Monday,
    #[serde(rename = "Tue", alias = "Mar")]
    Tuesday,
    #[serde(rename = "Wed", alias = "Mié")]
    Wednesday,
    #[serde(rename = "Thu", alias = "Jue")]
    Thursday,
    #[serde(rename = "Fri", alias = "Vie")]
    Friday,
    #[serde(rename = "Sat", alias = "Sáb")]
    Saturday,
    #[serde(rename = "Sun", alias = "Dom")]
    Sunday,
}

/// Local `HH:MM` meeting time, 24-hour clock, no timezone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MeetingTime {
    hour: u8,
    minute: u8,
}

impl MeetingTime {
    pub fn new(hour: u8, minute: u8) -> Result<Self, DomainError> {
        if hour > 23 || minute > 59 {
            return Err(DomainError::Validation(format!(
                "invalid meeting time {}:{}",
                hour, minute
            )));
        }
        Ok(Self { hour, minute })
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn minute(&self) -> u8 {
        self.minute
    }
}

impl Default for MeetingTime {
    fn default() -> Self {
        Self { hour: 18, minute: 0 }
    }
}

impl fmt::Display for MeetingTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl FromStr for MeetingTime {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || DomainError::Validation(format!("meeting time must be HH:MM, got {:?}", s));

        let (hour, minute) = s.split_once(':').ok_or_else(invalid)?;
        let two_digits = |part: &str| part.len() == 2 && part.bytes().all(|b| b.is_ascii_digit());
        if !two_digits(hour) || !two_digits(minute) {
            return Err(invalid());
        }
        let hour = hour.parse::<u8>().map_err(|_| invalid())?;
        let minute = minute.parse::<u8>().map_err(|_| invalid())?;
        Self::new(hour, minute)
    }
}

impl TryFrom<String> for MeetingTime {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MeetingTime> for String {
    fn from(time: MeetingTime) -> Self {
        time.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GroupLocation {
    pub latitude: f64,
    pub longitude: f64,
    pub use_current_location: bool,
    pub address: String,
}

impl Default for GroupLocation {
    fn default() -> Self {
        Self {
            latitude: 0.0,
            longitude: 0.0,
            use_current_location: true,
            address: String::new(),
        }
    }
}

/// Group entity - a running or cycling meetup.
///
/// `members` and `member_count` move together: the count is only ever
/// changed by the store's conditional join update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub location: GroupLocation,
    #[serde(default)]
    pub experience_level: ExperienceLevel,
    #[serde(default)]
    pub sport_type: SportType,
    pub distance: f32,
    #[serde(default)]
    pub training_days: BTreeSet<Weekday>,
    #[serde(default)]
    pub meeting_time: MeetingTime,
    #[serde(default = "default_pace")]
    pub pace: f64,
    pub created_by: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(default)]
    pub members: Vec<String>,
    pub member_count: i64,
}

fn default_pace() -> f64 {
    10.0
}

impl Group {
    /// Build a not-yet-persisted group. The creator is the sole member and
    /// the id stays empty until the store assigns one.
    pub fn seeded(draft: GroupDraft, created_by: String, created_at: OffsetDateTime) -> Self {
        Self {
            id: String::new(),
            name: draft.name.trim().to_string(),
            description: draft.description,
            image_url: String::new(),
            location: draft.location,
            experience_level: draft.experience_level,
            sport_type: draft.sport_type,
            distance: draft.distance,
            training_days: draft.training_days,
            meeting_time: draft.meeting_time,
            pace: draft.pace,
            members: vec![created_by.clone()],
            member_count: 1,
            created_by,
            created_at,
        }
    }

    pub fn is_member(&self, user_id: &str) -> bool {
        self.members.iter().any(|m| m == user_id)
    }
}

/// Creator-supplied fields of a new group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GroupDraft {
    pub name: String,
    pub description: String,
    pub location: GroupLocation,
    pub experience_level: ExperienceLevel,
    pub sport_type: SportType,
    pub distance: f32,
    pub training_days: BTreeSet<Weekday>,
    pub meeting_time: MeetingTime,
    pub pace: f64,
}

impl Default for GroupDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            location: GroupLocation::default(),
            experience_level: ExperienceLevel::default(),
            sport_type: SportType::default(),
            distance: 15.0,
            training_days: BTreeSet::new(),
            meeting_time: MeetingTime::default(),
            pace: default_pace(),
        }
    }
}

impl GroupDraft {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Input-time checks; stored groups are never re-validated.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.name.trim().is_empty() {
            return Err(DomainError::Validation("group name is required".into()));
        }
        if self.training_days.is_empty() {
            return Err(DomainError::Validation(
                "at least one training day is required".into(),
            ));
        }
        if !DISTANCE_RANGE_KM.contains(&self.distance) {
            return Err(DomainError::Validation(format!(
                "distance must be between {} and {} km, got {}",
                DISTANCE_RANGE_KM.start(),
                DISTANCE_RANGE_KM.end(),
                self.distance
            )));
        }
        Ok(())
    }
}
