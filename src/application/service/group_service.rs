use serde::Serialize;
use std::sync::Arc;
use time::OffsetDateTime;

use crate::application::eventbus::SharedEventBus;
use crate::domain::error::DomainError;
use crate::domain::event::DomainEvent;
use crate::domain::identity::IdentityProvider;
use crate::domain::model::{Group, GroupDraft};
use crate::domain::repository::{GroupFilter, GroupRepository, Result};

/// Per-user state of a group card on the join screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinStatus {
    Available,
    Joining,
    Joined,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupCard {
    pub group: Group,
    pub status: JoinStatus,
}

pub struct GroupService {
    repo: Arc<dyn GroupRepository>,
    identity: Arc<dyn IdentityProvider>,
    events: SharedEventBus,
}

impl GroupService {
    pub fn new(
        repo: Arc<dyn GroupRepository>,
        identity: Arc<dyn IdentityProvider>,
        events: SharedEventBus,
    ) -> Self {
        Self {
            repo,
            identity,
            events,
        }
    }

    /// Create a group owned by the current user, seeded with the creator as
    /// its only member.
    pub async fn create(&self, draft: GroupDraft) -> Result<Group> {
        let creator = self
            .identity
            .current_user_id()
            .filter(|id| !id.trim().is_empty())
            .ok_or(DomainError::Unauthenticated)?;
        draft.validate()?;

        let mut group = Group::seeded(draft, creator, OffsetDateTime::now_utc());
        group.id = self.repo.insert_group(&group).await?;

        tracing::info!(group_id = %group.id, created_by = %group.created_by, "Group created");
        self.events.publish(DomainEvent::GroupCreated {
            group_id: group.id.clone(),
            name: group.name.clone(),
            created_by: group.created_by.clone(),
        });

        Ok(group)
    }

    pub async fn list_all(&self) -> Result<Vec<Group>> {
        self.repo.query_groups(GroupFilter::All).await
    }

    pub async fn find(&self, group_id: &str) -> Result<Group> {
        self.repo
            .find_by_id(group_id)
            .await?
            .ok_or_else(|| DomainError::NotFound(group_id.to_string()))
    }

    /// All groups with the caller's join status, for the join screen.
    pub async fn browse(&self, user_id: Option<&str>) -> Result<Vec<GroupCard>> {
        let groups = self.list_all().await?;
        Ok(groups
            .into_iter()
            .map(|group| {
                let status = match user_id {
                    Some(uid) if group.is_member(uid) => JoinStatus::Joined,
                    _ => JoinStatus::Available,
                };
                GroupCard { group, status }
            })
            .collect())
    }
}
