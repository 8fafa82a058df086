//! Session store port - server-side sessions keyed by an opaque id.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Session, SessionId};

/// Session store - abstraction over session backends (Redis, in-memory).
///
/// Implementations own the expiry window: `load` must ignore expired sessions and
/// slide the window of live ones.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Create and persist a new session for `user_id`.
    async fn create(&self, user_id: Uuid) -> Result<Session, SessionError>;

    /// Fetch a live session, extending its expiry.
    async fn load(&self, id: &SessionId) -> Result<Option<Session>, SessionError>;

    /// Remove a session. Removing an unknown session is not an error.
    async fn destroy(&self, id: &SessionId) -> Result<(), SessionError>;
}

/// Session store errors.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Serialization failed: {0}")]
    Serialization(String),

    #[error("Operation failed: {0}")]
    Operation(String),
}
