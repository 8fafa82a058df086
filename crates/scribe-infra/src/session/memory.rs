//! In-memory session store - used as fallback when Redis is unavailable.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use scribe_core::domain::{Session, SessionId};
use scribe_core::ports::{SessionError, SessionStore};

/// In-memory session store using a HashMap with async RwLock.
///
/// Note: sessions are lost on process restart and are not shared between instances.
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<SessionId, Session>>,
    ttl: Duration,
}

impl InMemorySessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    #[cfg(test)]
    async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new(Duration::seconds(super::DEFAULT_SESSION_TTL_SECS))
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn create(&self, user_id: Uuid) -> Result<Session, SessionError> {
        let now = Utc::now();
        let session = Session::new(user_id, self.ttl);

        let mut sessions = self.sessions.write().await;
        // Sweep sessions that expired without ever being loaded again.
        sessions.retain(|_, s| !s.is_expired(now));
        sessions.insert(session.id.clone(), session.clone());

        Ok(session)
    }

    async fn load(&self, id: &SessionId) -> Result<Option<Session>, SessionError> {
        let now = Utc::now();
        let mut sessions = self.sessions.write().await;

        let Some(session) = sessions.get_mut(id) else {
            return Ok(None);
        };

        if session.is_expired(now) {
            sessions.remove(id);
            return Ok(None);
        }

        session.touch(now, self.ttl);
        Ok(Some(session.clone()))
    }

    async fn destroy(&self, id: &SessionId) -> Result<(), SessionError> {
        self.sessions.write().await.remove(id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_and_load() {
        let store = InMemorySessionStore::default();
        let user_id = Uuid::new_v4();

        let session = store.create(user_id).await.unwrap();
        let loaded = store.load(&session.id).await.unwrap().unwrap();

        assert_eq!(loaded.user_id, user_id);
    }

    #[tokio::test]
    async fn test_destroy_is_idempotent() {
        let store = InMemorySessionStore::default();
        let session = store.create(Uuid::new_v4()).await.unwrap();

        store.destroy(&session.id).await.unwrap();
        store.destroy(&session.id).await.unwrap();

        assert!(store.load(&session.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_expired_session_is_gone() {
        let store = InMemorySessionStore::new(Duration::zero());
        let session = store.create(Uuid::new_v4()).await.unwrap();

        assert!(store.load(&session.id).await.unwrap().is_none());
        assert_eq!(store.len().await, 0);
    }

    #[tokio::test]
    async fn test_load_slides_expiry() {
        let store = InMemorySessionStore::new(Duration::minutes(10));
        let session = store.create(Uuid::new_v4()).await.unwrap();

        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let loaded = store.load(&session.id).await.unwrap().unwrap();

        assert!(loaded.expires_at > session.expires_at);
    }

    #[tokio::test]
    async fn test_create_sweeps_expired_sessions() {
        let store = InMemorySessionStore::new(Duration::zero());
        store.create(Uuid::new_v4()).await.unwrap();
        store.create(Uuid::new_v4()).await.unwrap();

        // Each create removes the previous, already expired, session.
        assert_eq!(store.len().await, 1);
    }
}
