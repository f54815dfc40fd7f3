use serde::{Deserialize, Serialize};

/// Domain events that represent state changes in the system
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DomainEvent {
    /// A group was created and seeded with its creator
    GroupCreated {
        group_id: String,
        name: String,
        created_by: String,
    },

    /// A user was added to a group's member set
    MemberJoined {
        group_id: String,
        group_name: String,
        user_id: String,
        member_count: i64,
    },
}

impl DomainEvent {
    /// Get the group ID associated with this event
    pub fn group_id(&self) -> &str {
        match self {
            Self::GroupCreated { group_id, .. } => group_id,
            Self::MemberJoined { group_id, .. } => group_id,
        }
    }

    /// Get the event type name for frontend routing
    pub fn event_name(&self) -> &'static str {
        match self {
            Self::GroupCreated { .. } => "group_created",
            Self::MemberJoined { .. } => "member_joined",
        }
    }
}
