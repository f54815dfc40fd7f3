use std::sync::Arc;

use runwithme::domain::model::Weekday;
use runwithme::infrastructure::persistence::memory::InMemoryGroupRepository;
use runwithme::infrastructure::persistence::sqlite::{open_in_memory, SqliteGroupRepository};
use runwithme::{
    audit, merge, AppState, DomainError, GroupDraft, GroupFilter, GroupRepository, JoinOutcome,
    SharedIdentity,
};

fn memory_repo() -> Arc<dyn GroupRepository> {
    Arc::new(InMemoryGroupRepository::new())
}

fn sqlite_repo() -> Arc<dyn GroupRepository> {
    let db = open_in_memory("grupos").unwrap();
    Arc::new(SqliteGroupRepository::new(db, "grupos").unwrap())
}

fn draft(name: &str) -> GroupDraft {
    let mut draft = GroupDraft::new(name);
    draft.training_days.insert(Weekday::Tuesday);
    draft.training_days.insert(Weekday::Thursday);
    draft.meeting_time = "06:30".parse().unwrap();
    draft
}

async fn double_tap_scenario(repo: Arc<dyn GroupRepository>) {
    let identity = Arc::new(SharedIdentity::new());
    let state = AppState::new(repo.clone(), identity.clone());

    identity.sign_in("u1");
    let g1 = state.group_service.create(draft("G1")).await.unwrap();
    assert_eq!(g1.members, vec!["u1"]);
    assert_eq!(g1.member_count, 1);

    identity.sign_in("u2");
    let joined = state.membership.join(&g1.id).await.unwrap();
    assert!(matches!(joined, JoinOutcome::Joined(_)));
    assert_eq!(joined.group().members, vec!["u1", "u2"]);
    assert_eq!(joined.group().member_count, 2);

    let again = state.membership.join(&g1.id).await.unwrap();
    assert!(matches!(again, JoinOutcome::AlreadyMember(_)));
    assert_eq!(again.group().members, vec!["u1", "u2"]);
    assert_eq!(again.group().member_count, 2);

    identity.sign_in("u3");
    let err = state.membership.join("G_missing").await.unwrap_err();
    assert!(matches!(err, DomainError::NotFound(_)));
    assert_eq!(repo.query_groups(GroupFilter::All).await.unwrap().len(), 1);

    identity.sign_out();
    let err = state.membership.join(&g1.id).await.unwrap_err();
    assert!(matches!(err, DomainError::Unauthenticated));

    let stored = state.group_service.find(&g1.id).await.unwrap();
    assert_eq!(stored.members, vec!["u1", "u2"]);
    assert_eq!(stored.member_count, 2);
    assert!(audit(&stored).is_none());
}

#[tokio::test]
async fn test_double_tap_scenario_memory() {
    double_tap_scenario(memory_repo()).await;
}

#[tokio::test]
async fn test_double_tap_scenario_sqlite() {
    double_tap_scenario(sqlite_repo()).await;
}

#[tokio::test]
async fn test_my_groups_merges_created_and_member_sqlite() {
    let repo = sqlite_repo();
    let identity = Arc::new(SharedIdentity::new());
    let state = AppState::new(repo, identity.clone());

    identity.sign_in("u1");
    let g1 = state.group_service.create(draft("G1")).await.unwrap();

    identity.sign_in("u2");
    let g2 = state.group_service.create(draft("G2")).await.unwrap();
    state.group_service.create(draft("G3")).await.unwrap();

    identity.sign_in("u1");
    state.membership.join(&g2.id).await.unwrap();

    let groups = state.group_view.my_groups_current().await.unwrap();
    let ids: Vec<&str> = groups.iter().map(|g| g.id.as_str()).collect();
    assert_eq!(ids, vec![g1.id.as_str(), g2.id.as_str()]);
}

#[tokio::test]
async fn test_merge_scenario() {
    let repo = memory_repo();
    let identity = Arc::new(SharedIdentity::new());
    let state = AppState::new(repo, identity.clone());

    identity.sign_in("u1");
    let g1 = state.group_service.create(draft("G1")).await.unwrap();
    let g2 = state.group_service.create(draft("G2")).await.unwrap();

    let merged = merge(vec![g1.clone()], vec![g1.clone(), g2.clone()]);
    assert_eq!(merged, vec![g1, g2]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_joins_keep_count_in_sync() {
    for repo in [memory_repo(), sqlite_repo()] {
        let identity = Arc::new(SharedIdentity::new());
        identity.sign_in("owner");
        let state = Arc::new(AppState::new(repo.clone(), identity));
        let group = state.group_service.create(draft("Race")).await.unwrap();

        // Ten users, each tapping join three times.
        let mut tasks = Vec::new();
        for attempt in 0..30 {
            let state = state.clone();
            let group_id = group.id.clone();
            let user = format!("runner-{}", attempt % 10);
            tasks.push(tokio::spawn(async move {
                state.membership.join_as(&group_id, Some(user.as_str())).await
            }));
        }

        let mut new_members = 0;
        for task in tasks {
            if task.await.unwrap().unwrap().is_new_member() {
                new_members += 1;
            }
        }

        let stored = repo.find_by_id(&group.id).await.unwrap().unwrap();
        assert_eq!(new_members, 10);
        assert_eq!(stored.members.len(), 11);
        assert_eq!(stored.member_count, 11);
        assert!(audit(&stored).is_none());
    }
}

#[tokio::test]
async fn test_events_follow_store_writes() {
    let identity = Arc::new(SharedIdentity::new());
    let state = AppState::new(memory_repo(), identity.clone());
    let mut rx = state.event_bus.subscribe();

    identity.sign_in("u1");
    let g1 = state.group_service.create(draft("G1")).await.unwrap();
    identity.sign_in("u2");
    state.membership.join(&g1.id).await.unwrap();
    state.membership.join(&g1.id).await.unwrap();

    let names: Vec<&str> = vec![
        rx.next().await.unwrap().event_name(),
        rx.next().await.unwrap().event_name(),
    ];
    assert_eq!(names, vec!["group_created", "member_joined"]);
    assert!(rx.try_next().is_none());
}
