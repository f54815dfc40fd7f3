//! runwithme: group membership core for the RunWithMe runners app.
//!
//! Groups live in a document store behind [`GroupRepository`]. Joins go
//! through [`MembershipLedger`], which keeps a group's member set and member
//! count in lockstep, and [`GroupViewMerger`] builds the caller's
//! "my groups" list.

pub mod application;
pub mod domain;
pub mod infrastructure;

use std::sync::Arc;

pub use application::eventbus::{EventBus, EventStream, SharedEventBus};
pub use application::service::{
    audit, compute_member_count, merge, CountDrift, GroupCard, GroupService, GroupViewMerger,
    JoinOutcome, JoinStatus, MembershipLedger,
};
pub use application::state::AppState;
pub use application::view_state::GroupListState;
pub use domain::error::DomainError;
pub use domain::event::DomainEvent;
pub use domain::identity::{IdentityProvider, SharedIdentity, StaticIdentity};
pub use domain::model::{Group, GroupDraft};
pub use domain::repository::{GroupFilter, GroupRepository, GroupUpdate, UpdateOutcome};

use infrastructure::config::{self, StorageSettings, StorageType};
use infrastructure::logging;
use infrastructure::persistence;

/// Open the configured storage backend
pub async fn init_storage(settings: &StorageSettings) -> anyhow::Result<Arc<dyn GroupRepository>> {
    match settings.storage_type {
        StorageType::Sqlite => {
            tracing::info!("Using SQLite storage backend");
            let path = settings.sqlite.effective_path();
            let db = persistence::sqlite::init_database(&path, &settings.collection)?;
            let repo = persistence::sqlite::SqliteGroupRepository::new(db, &settings.collection)?;
            Ok(Arc::new(repo))
        }
        StorageType::Mongodb => {
            tracing::info!("Using MongoDB storage backend");
            let mongo = &settings.mongodb;
            let conn = persistence::mongodb::init_mongodb(&mongo.uri, &mongo.database).await?;
            let repo = persistence::mongodb::MongoGroupRepository::new(conn, &settings.collection);
            repo.ensure_indexes().await?;
            Ok(Arc::new(repo))
        }
        StorageType::Memory => {
            tracing::warn!("Using in-memory storage backend; data is lost on exit");
            Ok(Arc::new(persistence::memory::InMemoryGroupRepository::new()))
        }
    }
}

/// Set up logging, configuration and storage, then wire the services.
///
/// Settings are read before logging exists, so how they were resolved is
/// only reported once the subscriber is installed.
pub async fn bootstrap(identity: Arc<dyn IdentityProvider>) -> anyhow::Result<AppState> {
    let (settings, source) = config::loader::read_config();
    logging::setup(settings.logging.production);
    source.log();
    let app_config = config::init(settings);

    let repo = init_storage(&app_config.storage).await?;
    Ok(AppState::new(repo, identity))
}
