use std::sync::Arc;

use crate::application::eventbus::{create_event_bus, SharedEventBus};
use crate::application::service::{GroupService, GroupViewMerger, MembershipLedger};
use crate::domain::identity::IdentityProvider;
use crate::domain::repository::GroupRepository;

/// Type aliases for dynamic collaborator types
pub type DynGroupRepository = Arc<dyn GroupRepository>;
pub type DynIdentityProvider = Arc<dyn IdentityProvider>;

/// Services wired against one store and one identity provider.
pub struct AppState {
    pub group_service: GroupService,
    pub membership: MembershipLedger,
    pub group_view: GroupViewMerger,
    pub identity: DynIdentityProvider,
    pub event_bus: SharedEventBus,
}

impl AppState {
    pub fn new(repo: DynGroupRepository, identity: DynIdentityProvider) -> Self {
        let event_bus = create_event_bus();

        Self {
            group_service: GroupService::new(repo.clone(), identity.clone(), event_bus.clone()),
            membership: MembershipLedger::new(repo.clone(), identity.clone(), event_bus.clone()),
            group_view: GroupViewMerger::new(repo, identity.clone()),
            identity,
            event_bus,
        }
    }
}
