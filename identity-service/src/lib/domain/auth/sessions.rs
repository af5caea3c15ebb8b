use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;

use crate::domain::auth::errors::SessionStoreError;
use crate::domain::auth::models::Session;
use crate::domain::auth::models::SessionId;
use crate::domain::auth::ports::SessionStore;
use crate::domain::user::models::UserId;

/// Session lifecycle over a keyed TTL store.
///
/// A session is `active` from `create` until `destroy` or TTL expiry; both
/// terminal states look identical to `resolve` and require a fresh `create`.
pub struct SessionManager<S>
where
    S: SessionStore,
{
    store: Arc<S>,
    ttl: Duration,
}

impl<S> SessionManager<S>
where
    S: SessionStore,
{
    pub fn new(store: Arc<S>, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    /// Fixed session lifetime, counted from creation.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Create a session bound to `user_id` and return its identifier.
    ///
    /// Identifier collisions are cryptographically negligible, but the
    /// contract is explicit: an identifier already live in the store is
    /// regenerated, never reused.
    pub async fn create(&self, user_id: UserId) -> Result<SessionId, SessionStoreError> {
        loop {
            let id = SessionId::generate();
            if self.store.get(&id).await?.is_some() {
                continue;
            }

            let session = Session {
                id: id.clone(),
                user_id,
                created_at: Utc::now(),
            };
            self.store.put(session, self.ttl).await?;

            return Ok(id);
        }
    }

    /// Look up the user behind an identifier.
    ///
    /// Unknown and expired identifiers are a normal `None`.
    pub async fn resolve(&self, id: &SessionId) -> Result<Option<UserId>, SessionStoreError> {
        Ok(self.store.get(id).await?.map(|session| session.user_id))
    }

    /// Destroy a session; destroying an absent one is a no-op success.
    pub async fn destroy(&self, id: &SessionId) -> Result<(), SessionStoreError> {
        self.store.delete(id).await
    }
}
