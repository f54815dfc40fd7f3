mod comment;
mod group;
mod map_location;
pub mod notification;
mod publication;
mod user;

pub use comment::Comment;
pub use group::{
    ExperienceLevel, Group, GroupDraft, GroupLocation, MeetingTime, SportType, Weekday,
    DISTANCE_RANGE_KM,
};
pub use map_location::{ActivityType, MapLocation};
pub use notification::{Notification, NotificationFilter, NotificationKind};
pub use publication::{Publication, PublicationKind, GENERAL_GROUP};
pub use user::UserProfile;
