//! Client-side group list state.
//!
//! Transitions are pure: each returns a new state built from the previous
//! one plus a store-confirmed delta. Local counts are never incremented by
//! hand; a confirmed join replaces the group with the document the store
//! returned.

use std::collections::HashSet;

use crate::application::service::{JoinOutcome, JoinStatus};
use crate::domain::model::Group;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupListState {
    groups: Vec<Group>,
    joining: HashSet<String>,
}

impl GroupListState {
    pub fn new(groups: Vec<Group>) -> Self {
        Self {
            groups,
            joining: HashSet::new(),
        }
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn is_joining(&self, group_id: &str) -> bool {
        self.joining.contains(group_id)
    }

    /// Mark a join as in flight. Returns `None` when one is already pending
    /// for this group, so a second tap issues no request.
    pub fn begin_join(&self, group_id: &str) -> Option<Self> {
        if self.is_joining(group_id) {
            return None;
        }
        let mut next = self.clone();
        next.joining.insert(group_id.to_string());
        Some(next)
    }

    /// Fold a confirmed join into the list.
    pub fn apply(&self, outcome: &JoinOutcome) -> Self {
        let confirmed = outcome.group();
        let mut next = self.clone();
        next.joining.remove(&confirmed.id);
        for group in next.groups.iter_mut().filter(|g| g.id == confirmed.id) {
            *group = confirmed.clone();
        }
        next
    }

    pub fn fail_join(&self, group_id: &str) -> Self {
        let mut next = self.clone();
        next.joining.remove(group_id);
        next
    }

    pub fn status(&self, group_id: &str, user_id: &str) -> JoinStatus {
        if self.is_joining(group_id) {
            return JoinStatus::Joining;
        }
        match self.groups.iter().find(|g| g.id == group_id) {
            Some(g) if g.is_member(user_id) => JoinStatus::Joined,
            _ => JoinStatus::Available,
        }
    }
}
