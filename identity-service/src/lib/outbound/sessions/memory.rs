use std::collections::HashMap;
use std::time::Duration;
use std::time::Instant;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::auth::errors::SessionStoreError;
use crate::domain::auth::models::Session;
use crate::domain::auth::models::SessionId;
use crate::domain::auth::ports::SessionStore;

/// In-process session store with lazy TTL expiry.
///
/// Each entry carries an absolute deadline computed at insert; reads drop
/// entries past it, so an expired session is indistinguishable from one
/// that never existed.
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<SessionId, StoredSession>>,
}

struct StoredSession {
    session: Session,
    expires_at: Instant,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn put(&self, session: Session, ttl: Duration) -> Result<(), SessionStoreError> {
        let entry = StoredSession {
            session,
            expires_at: Instant::now() + ttl,
        };

        let mut sessions = self.sessions.write().await;
        sessions.insert(entry.session.id.clone(), entry);

        Ok(())
    }

    async fn get(&self, id: &SessionId) -> Result<Option<Session>, SessionStoreError> {
        {
            let sessions = self.sessions.read().await;
            match sessions.get(id) {
                None => return Ok(None),
                Some(entry) if entry.expires_at > Instant::now() => {
                    return Ok(Some(entry.session.clone()));
                }
                Some(_) => {}
            }
        }

        // Past the deadline: evict under the write lock, re-checking in case
        // a concurrent put replaced the entry meanwhile.
        let mut sessions = self.sessions.write().await;
        if let Some(entry) = sessions.get(id) {
            if entry.expires_at > Instant::now() {
                return Ok(Some(entry.session.clone()));
            }
            sessions.remove(id);
        }

        Ok(None)
    }

    async fn delete(&self, id: &SessionId) -> Result<(), SessionStoreError> {
        let mut sessions = self.sessions.write().await;
        sessions.remove(id);

        Ok(())
    }
}
