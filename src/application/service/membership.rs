use std::collections::HashSet;
use std::sync::Arc;

use crate::application::eventbus::SharedEventBus;
use crate::domain::error::DomainError;
use crate::domain::event::DomainEvent;
use crate::domain::identity::IdentityProvider;
use crate::domain::model::Group;
use crate::domain::repository::{GroupRepository, GroupUpdate, Result, UpdateOutcome};

/// Successful result of a join. Joining twice is not an error.
#[derive(Debug, Clone, PartialEq)]
pub enum JoinOutcome {
    Joined(Group),
    AlreadyMember(Group),
}

impl JoinOutcome {
    pub fn group(&self) -> &Group {
        match self {
            Self::Joined(g) | Self::AlreadyMember(g) => g,
        }
    }

    pub fn into_group(self) -> Group {
        match self {
            Self::Joined(g) | Self::AlreadyMember(g) => g,
        }
    }

    pub fn is_new_member(&self) -> bool {
        matches!(self, Self::Joined(_))
    }
}

/// Mismatch between a group's recorded count and its member set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountDrift {
    pub recorded: i64,
    pub actual: i64,
}

/// Cardinality of the member set. Repeated ids count once.
pub fn compute_member_count<S: AsRef<str>>(members: &[S]) -> i64 {
    members
        .iter()
        .map(AsRef::as_ref)
        .collect::<HashSet<&str>>()
        .len() as i64
}

/// Check `member_count` against the member set.
pub fn audit(group: &Group) -> Option<CountDrift> {
    let actual = compute_member_count(&group.members);
    (group.member_count != actual).then_some(CountDrift {
        recorded: group.member_count,
        actual,
    })
}

/// Owns the join path: one conditional store update per join, so
/// `members` and `member_count` cannot drift apart.
pub struct MembershipLedger {
    repo: Arc<dyn GroupRepository>,
    identity: Arc<dyn IdentityProvider>,
    events: SharedEventBus,
}

impl MembershipLedger {
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

    /// Join `group_id` as the currently signed-in user.
    pub async fn join(&self, group_id: &str) -> Result<JoinOutcome> {
        let user_id = self.identity.current_user_id();
        self.join_as(group_id, user_id.as_deref()).await
    }

    pub async fn join_as(&self, group_id: &str, user_id: Option<&str>) -> Result<JoinOutcome> {
        let user_id = match user_id {
            Some(id) if !id.trim().is_empty() => id,
            _ => {
                tracing::warn!(group_id, "Join rejected: not authenticated");
                return Err(DomainError::Unauthenticated);
            }
        };

        let outcome = self
            .repo
            .update_group_fields(group_id, GroupUpdate::join(user_id))
            .await
            .inspect_err(|e| tracing::warn!(group_id, user_id, error = %e, "Join failed"))?;

        match outcome {
            UpdateOutcome::Applied(group) => {
                tracing::info!(
                    group_id,
                    user_id,
                    member_count = group.member_count,
                    "User joined group"
                );
                self.events.publish(DomainEvent::MemberJoined {
                    group_id: group.id.clone(),
                    group_name: group.name.clone(),
                    user_id: user_id.to_string(),
                    member_count: group.member_count,
                });
                Ok(JoinOutcome::Joined(group))
            }
            UpdateOutcome::Unchanged(group) => {
                tracing::debug!(group_id, user_id, "Already a member, nothing to do");
                Ok(JoinOutcome::AlreadyMember(group))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::eventbus::create_event_bus;
    use crate::domain::identity::StaticIdentity;
    use crate::domain::model::GroupDraft;
    use crate::domain::repository::GroupFilter;
    use crate::infrastructure::persistence::memory::InMemoryGroupRepository;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use time::OffsetDateTime;

    async fn seeded_repo() -> (Arc<InMemoryGroupRepository>, String) {
        let repo = Arc::new(InMemoryGroupRepository::new());
        let group = Group::seeded(GroupDraft::new("G1"), "u1".into(), OffsetDateTime::UNIX_EPOCH);
        let id = repo.insert_group(&group).await.unwrap();
        (repo, id)
    }

    fn build_ledger(repo: Arc<dyn GroupRepository>, user: Option<&str>) -> MembershipLedger {
        let identity = match user {
            Some(u) => StaticIdentity::user(u),
            None => StaticIdentity::anonymous(),
        };
        MembershipLedger::new(repo, Arc::new(identity), create_event_bus())
    }

    /// Counts store writes and fails every call when `fail` is set.
    struct ProbeRepository {
        writes: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl GroupRepository for ProbeRepository {
        async fn query_groups(&self, _filter: GroupFilter) -> Result<Vec<Group>> {
            Ok(Vec::new())
        }

        async fn find_by_id(&self, _id: &str) -> Result<Option<Group>> {
            Ok(None)
        }

        async fn insert_group(&self, _group: &Group) -> Result<String> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            Ok("G1".into())
        }

        async fn update_group_fields(&self, id: &str, _update: GroupUpdate) -> Result<UpdateOutcome> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(DomainError::StoreUnavailable("connection reset".into()))
            } else {
                Err(DomainError::NotFound(id.to_string()))
            }
        }
    }

    #[tokio::test]
    async fn test_join_then_double_tap() {
        let (repo, id) = seeded_repo().await;
        let ledger = build_ledger(repo.clone(), Some("u2"));

        let first = ledger.join(&id).await.unwrap();
        assert!(first.is_new_member());
        assert_eq!(first.group().members, vec!["u1", "u2"]);
        assert_eq!(first.group().member_count, 2);

        let second = ledger.join(&id).await.unwrap();
        assert!(!second.is_new_member());
        assert_eq!(second.group().members, vec!["u1", "u2"]);
        assert_eq!(second.group().member_count, 2);

        let stored = repo.find_by_id(&id).await.unwrap().unwrap();
        assert_eq!(stored.member_count, 2);
        assert!(audit(&stored).is_none());
    }

    #[tokio::test]
    async fn test_creator_join_is_no_op() {
        let (repo, id) = seeded_repo().await;
        let outcome = build_ledger(repo, Some("u1")).join(&id).await.unwrap();
        assert!(matches!(outcome, JoinOutcome::AlreadyMember(_)));
        assert_eq!(outcome.group().member_count, 1);
    }

    #[tokio::test]
    async fn test_unauthenticated_join_never_reaches_store() {
        let probe = Arc::new(ProbeRepository {
            writes: AtomicUsize::new(0),
            fail: false,
        });

        let err = build_ledger(probe.clone(), None).join("G1").await.unwrap_err();
        assert!(matches!(err, DomainError::Unauthenticated));

        let err = build_ledger(probe.clone(), Some("u1"))
            .join_as("G1", Some("  "))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Unauthenticated));

        assert_eq!(probe.writes.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_missing_group_is_not_found() {
        let (repo, _) = seeded_repo().await;
        let err = build_ledger(repo.clone(), Some("u3")).join("G_missing").await.unwrap_err();

        assert!(matches!(err, DomainError::NotFound(_)));
        assert!(!err.is_retryable());
        assert_eq!(repo.query_groups(GroupFilter::All).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_store_failure_is_surfaced_once() {
        let probe = Arc::new(ProbeRepository {
            writes: AtomicUsize::new(0),
            fail: true,
        });

        let err = build_ledger(probe.clone(), Some("u2")).join("G1").await.unwrap_err();
        assert!(err.is_retryable());
        assert_eq!(probe.writes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_join_publishes_event_only_for_new_members() {
        let (repo, id) = seeded_repo().await;
        let events = create_event_bus();
        let mut rx = events.subscribe();
        let ledger = MembershipLedger::new(repo, Arc::new(StaticIdentity::user("u2")), events);

        ledger.join(&id).await.unwrap();
        ledger.join(&id).await.unwrap();

        let event = rx.next().await.unwrap();
        assert_eq!(
            event,
            DomainEvent::MemberJoined {
                group_id: id.clone(),
                group_name: "G1".into(),
                user_id: "u2".into(),
                member_count: 2,
            }
        );
        assert!(rx.try_next().is_none());
    }

    #[test]
    fn test_compute_member_count_and_audit() {
        assert_eq!(compute_member_count::<&str>(&[]), 0);
        assert_eq!(compute_member_count(&["u1", "u2", "u1"]), 2);

        let mut group = Group::seeded(GroupDraft::new("G1"), "u1".into(), OffsetDateTime::UNIX_EPOCH);
        assert!(audit(&group).is_none());

        group.member_count = 3;
        assert_eq!(
            audit(&group),
            Some(CountDrift {
                recorded: 3,
                actual: 1
            })
        );
    }
}
