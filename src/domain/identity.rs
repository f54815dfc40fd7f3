use std::sync::{PoisonError, RwLock};

/// Source of the caller's stable user id. `None` means not authenticated.
pub trait IdentityProvider: Send + Sync {
    fn current_user_id(&self) -> Option<String>;
}

/// Fixed identity, mostly for tests and tooling.
#[derive(Debug, Clone, Default)]
pub struct StaticIdentity(Option<String>);

impl StaticIdentity {
    pub fn user(id: impl Into<String>) -> Self {
        Self(Some(id.into()))
    }

    pub fn anonymous() -> Self {
        Self(None)
    }
}

impl IdentityProvider for StaticIdentity {
    fn current_user_id(&self) -> Option<String> {
        self.0.clone()
    }
}

/// Mutable session identity updated by whatever performs sign-in.
#[derive(Debug, Default)]
pub struct SharedIdentity {
    current: RwLock<Option<String>>,
}

impl SharedIdentity {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sign_in(&self, user_id: impl Into<String>) {
        let user_id = user_id.into();
        tracing::info!(user_id = %user_id, "Signed in");
        self.set(Some(user_id));
    }

    pub fn sign_out(&self) {
        self.set(None);
        tracing::info!("Signed out");
    }

    // Writers only ever store a whole Option, so a poisoned lock still
    // holds a valid session.
    fn set(&self, user_id: Option<String>) {
        let mut guard = self.current.write().unwrap_or_else(|poisoned| {
            tracing::warn!("Session lock was poisoned, recovering");
            PoisonError::into_inner(poisoned)
        });
        *guard = user_id;
    }
}

impl IdentityProvider for SharedIdentity {
    fn current_user_id(&self) -> Option<String> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
