//! In-process document store, used for tests and offline runs.
//!
//! Documents keep insertion order so query results are stable.

use async_trait::async_trait;
use std::sync::Mutex;
use ulid::Ulid;

use crate::domain::error::DomainError;
use crate::domain::model::Group;
use crate::domain::repository::{GroupFilter, GroupRepository, GroupUpdate, Result, UpdateOutcome};

#[derive(Default)]
pub struct InMemoryGroupRepository {
    groups: Mutex<Vec<Group>>,
}

impl InMemoryGroupRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Vec<Group>>> {
        self.groups
            .lock()
            .map_err(|e| DomainError::StoreUnavailable(e.to_string()))
    }
}

#[async_trait]
impl GroupRepository for InMemoryGroupRepository {
    async fn query_groups(&self, filter: GroupFilter) -> Result<Vec<Group>> {
        let groups = self.lock()?;
        Ok(groups.iter().filter(|g| filter.matches(g)).cloned().collect())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Group>> {
        let groups = self.lock()?;
        Ok(groups.iter().find(|g| g.id == id).cloned())
    }

    async fn insert_group(&self, group: &Group) -> Result<String> {
        let mut groups = self.lock()?;
        let mut doc = group.clone();
        doc.id = Ulid::new().to_string();
        let id = doc.id.clone();
        groups.push(doc);
        Ok(id)
    }

    async fn update_group_fields(&self, id: &str, update: GroupUpdate) -> Result<UpdateOutcome> {
        let mut groups = self.lock()?;
        let group = groups
            .iter_mut()
            .find(|g| g.id == id)
            .ok_or_else(|| DomainError::NotFound(id.to_string()))?;

        if update.apply_to(group) {
            Ok(UpdateOutcome::Applied(group.clone()))
        } else {
            Ok(UpdateOutcome::Unchanged(group.clone()))
        }
    }
}
