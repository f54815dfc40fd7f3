use std::collections::HashSet;
use std::sync::Arc;

use crate::domain::error::DomainError;
use crate::domain::identity::IdentityProvider;
use crate::domain::model::Group;
use crate::domain::repository::{GroupFilter, GroupRepository, Result};

/// Union of two group lists keyed by id. The first occurrence wins,
/// scanning `created` before `member`.
pub fn merge(created: Vec<Group>, member: Vec<Group>) -> Vec<Group> {
    let mut seen = HashSet::with_capacity(created.len() + member.len());
    created
        .into_iter()
        .chain(member)
        .filter(|g| seen.insert(g.id.clone()))
        .collect()
}

/// Builds the caller's "my groups" view from the created-by and
/// member-of queries.
pub struct GroupViewMerger {
    repo: Arc<dyn GroupRepository>,
    identity: Arc<dyn IdentityProvider>,
}

impl GroupViewMerger {
    pub fn new(repo: Arc<dyn GroupRepository>, identity: Arc<dyn IdentityProvider>) -> Self {
        Self { repo, identity }
    }

    pub async fn my_groups_current(&self) -> Result<Vec<Group>> {
        let user_id = self.identity.current_user_id();
        self.my_groups(user_id.as_deref()).await
    }

    pub async fn my_groups(&self, user_id: Option<&str>) -> Result<Vec<Group>> {
        let user_id = user_id
            .filter(|id| !id.trim().is_empty())
            .ok_or(DomainError::Unauthenticated)?;

        let (created, member) = tokio::try_join!(
            self.repo.query_groups(GroupFilter::CreatedBy(user_id.to_string())),
            self.repo.query_groups(GroupFilter::HasMember(user_id.to_string())),
        )?;

        let (created_len, member_len) = (created.len(), member.len());
        let groups = merge(created, member);

        tracing::debug!(
            user_id,
            created = created_len,
            member = member_len,
            merged = groups.len(),
            "Loaded my groups"
        );
        Ok(groups)
    }
}
