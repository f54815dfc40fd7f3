use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::error::DomainError;
use crate::domain::model::Group;

pub type Result<T> = std::result::Result<T, DomainError>;

/// Filter for [`GroupRepository::query_groups`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupFilter {
    All,
    /// `createdBy == uid`
    CreatedBy(String),
    /// `members` array contains `uid`
    HasMember(String),
}

impl GroupFilter {
    pub fn matches(&self, group: &Group) -> bool {
        match self {
            Self::All => true,
            Self::CreatedBy(uid) => group.created_by == *uid,
            Self::HasMember(uid) => group.is_member(uid),
        }
    }
}

/// Multi-field update applied to a single group document as one unit.
///
/// The store must apply it only when `members_add` is absent from the
/// member set; otherwise neither field changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupUpdate {
    pub members_add: String,
    pub member_count_increment: i64,
}

impl GroupUpdate {
    pub fn join(user_id: impl Into<String>) -> Self {
        Self {
            members_add: user_id.into(),
            member_count_increment: 1,
        }
    }

    /// Apply to an in-process copy of the document. Returns false when the
    /// user is already a member and the group was left untouched.
    pub fn apply_to(&self, group: &mut Group) -> bool {
        if group.is_member(&self.members_add) {
            return false;
        }
        group.members.push(self.members_add.clone());
        group.member_count += self.member_count_increment;
        true
    }
}

/// Result of a conditional [`GroupUpdate`], carrying the post-update document.
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateOutcome {
    Applied(Group),
    Unchanged(Group),
}

impl UpdateOutcome {
    pub fn group(&self) -> &Group {
        match self {
            Self::Applied(g) | Self::Unchanged(g) => g,
        }
    }

    pub fn into_group(self) -> Group {
        match self {
            Self::Applied(g) | Self::Unchanged(g) => g,
        }
    }
}

/// Document store contract for Group entities.
#[async_trait]
pub trait GroupRepository: Send + Sync {
    async fn query_groups(&self, filter: GroupFilter) -> Result<Vec<Group>>;

    async fn find_by_id(&self, id: &str) -> Result<Option<Group>>;

    /// Persist a new group and return the store-assigned id. Any id already
    /// set on `group` is ignored.
    async fn insert_group(&self, group: &Group) -> Result<String>;

    /// Atomic, absence-conditioned update. Fails with `NotFound` when no
    /// group has this id; never creates a document.
    async fn update_group_fields(&self, id: &str, update: GroupUpdate) -> Result<UpdateOutcome>;
}

// Implement GroupRepository for Box<dyn GroupRepository> to allow dynamic dispatch
#[async_trait]
impl GroupRepository for Box<dyn GroupRepository> {
    async fn query_groups(&self, filter: GroupFilter) -> Result<Vec<Group>> {
        (**self).query_groups(filter).await
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Group>> {
        (**self).find_by_id(id).await
    }

    async fn insert_group(&self, group: &Group) -> Result<String> {
        (**self).insert_group(group).await
    }

    async fn update_group_fields(&self, id: &str, update: GroupUpdate) -> Result<UpdateOutcome> {
        (**self).update_group_fields(id, update).await
    }
}

#[async_trait]
impl GroupRepository for Arc<dyn GroupRepository> {
    async fn query_groups(&self, filter: GroupFilter) -> Result<Vec<Group>> {
        (**self).query_groups(filter).await
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Group>> {
        (**self).find_by_id(id).await
    }

    async fn insert_group(&self, group: &Group) -> Result<String> {
        (**self).insert_group(group).await
    }

    async fn update_group_fields(&self, id: &str, update: GroupUpdate) -> Result<UpdateOutcome> {
        (**self).update_group_fields(id, update).await
    }
}
