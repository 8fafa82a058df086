//! Redis session store - sessions survive restarts and are shared between instances.

use std::time::Duration as StdDuration;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};
use uuid::Uuid;

use scribe_core::domain::{Session, SessionId};
use scribe_core::ports::{SessionError, SessionStore};

/// Redis connection configuration.
#[derive(Debug, Clone)]
pub struct RedisConfig {
    /// Redis URL (e.g., redis://localhost:6379)
    pub url: String,
    /// Connection timeout
    pub connect_timeout: StdDuration,
    /// Prefix for session keys
    pub key_prefix: String,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: "redis://localhost:6379".to_string(),
            connect_timeout: StdDuration::from_secs(5),
            key_prefix: "scribe:session:".to_string(),
        }
    }
}

impl RedisConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }
}

/// Redis-backed session store.
///
/// Each session is a JSON value whose Redis TTL is the sliding window: `GETEX`
/// refreshes it on every load.
pub struct RedisSessionStore {
    conn: ConnectionManager,
    config: RedisConfig,
    ttl: Duration,
}

impl RedisSessionStore {
    pub async fn new(config: RedisConfig, ttl: Duration) -> Result<Self, SessionError> {
        let client = Client::open(config.url.as_str())
            .map_err(|e| SessionError::Connection(e.to_string()))?;

        // Use timeout to prevent hanging if Redis is unreachable
        let conn = tokio::time::timeout(config.connect_timeout, ConnectionManager::new(client))
            .await
            .map_err(|_| SessionError::Connection("Connection timed out".to_string()))?
            .map_err(|e| SessionError::Connection(e.to_string()))?;

        tracing::info!(url = %config.url, "Connected to Redis session store");

        Ok(Self { conn, config, ttl })
    }

    fn key(&self, id: &SessionId) -> String {
        format!("{}{}", self.config.key_prefix, id)
    }

    fn ttl_secs(&self) -> u64 {
        self.ttl.num_seconds().max(1) as u64
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn create(&self, user_id: Uuid) -> Result<Session, SessionError> {
        let session = Session::new(user_id, self.ttl);
        let value = serde_json::to_string(&session)
            .map_err(|e| SessionError::Serialization(e.to_string()))?;

        let mut conn = self.conn.clone();
        conn.set_ex::<_, _, ()>(self.key(&session.id), value, self.ttl_secs())
            .await
            .map_err(|e| SessionError::Operation(e.to_string()))?;

        Ok(session)
    }

    async fn load(&self, id: &SessionId) -> Result<Option<Session>, SessionError> {
        let mut conn = self.conn.clone();
        let value: Option<String> = redis::cmd("GETEX")
            .arg(self.key(id))
            .arg("EX")
            .arg(self.ttl_secs())
            .query_async(&mut conn)
            .await
            .map_err(|e| SessionError::Operation(e.to_string()))?;

        let Some(value) = value else {
            return Ok(None);
        };

        let mut session: Session = serde_json::from_str(&value)
            .map_err(|e| SessionError::Serialization(e.to_string()))?;
        session.touch(Utc::now(), self.ttl);

        Ok(Some(session))
    }

    async fn destroy(&self, id: &SessionId) -> Result<(), SessionError> {
        let mut conn = self.conn.clone();
        conn.del::<_, ()>(self.key(id))
            .await
            .map_err(|e| SessionError::Operation(e.to_string()))?;
        Ok(())
    }
}
