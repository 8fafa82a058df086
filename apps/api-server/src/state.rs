//! Application state - shared across all handlers.

use std::sync::Arc;

use scribe_core::ports::{AuthError, PasswordService, PostRepository, SessionStore, UserRepository};
use scribe_core::services::{AccessGuard, PostService, SessionAuthenticator};
use scribe_infra::{
    Argon2PasswordService, DatabaseConfig, InMemoryPostRepository, InMemorySessionStore,
    InMemoryUserRepository,
};

#[cfg(feature = "postgres")]
use scribe_infra::{PostgresPostRepository, PostgresUserRepository};
#[cfg(feature = "redis")]
use scribe_infra::{RedisConfig, RedisSessionStore};

use crate::config::AppConfig;
use crate::session_cookie::SessionCookie;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<SessionAuthenticator>,
    pub guard: Arc<AccessGuard>,
    pub posts: Arc<PostService>,
    pub cookies: SessionCookie,
}

type Stores = (Arc<dyn UserRepository>, Arc<dyn PostRepository>);

impl AppState {
    /// Build the state from configuration, falling back to in-memory stores for
    /// anything that is not configured or not reachable.
    pub async fn new(config: &AppConfig) -> Result<Self, AuthError> {
        let ttl = chrono::Duration::seconds(config.session.ttl_secs);

        let (users, posts) = Self::stores(config.database.as_ref()).await;
        let sessions = Self::session_store(config.redis_url.as_deref(), ttl).await;
        let passwords: Arc<dyn PasswordService> = Arc::new(Argon2PasswordService::new());

        let state = Self::from_parts(
            users,
            posts,
            sessions,
            passwords,
            SessionCookie::new(&config.session),
        )?;
        tracing::info!("Application state initialized");

        Ok(state)
    }

    /// Wire the services over explicit adapters.
    pub fn from_parts(
        users: Arc<dyn UserRepository>,
        posts: Arc<dyn PostRepository>,
        sessions: Arc<dyn SessionStore>,
        passwords: Arc<dyn PasswordService>,
        cookies: SessionCookie,
    ) -> Result<Self, AuthError> {
        let auth = Arc::new(SessionAuthenticator::new(users.clone(), sessions, passwords)?);
        let guard = Arc::new(AccessGuard::new(auth.clone(), posts.clone()));
        let posts = Arc::new(PostService::new(posts, users));

        Ok(Self {
            auth,
            guard,
            posts,
            cookies,
        })
    }

    fn in_memory_stores() -> Stores {
        (
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(InMemoryPostRepository::new()),
        )
    }

    #[cfg(feature = "postgres")]
    async fn stores(db_config: Option<&DatabaseConfig>) -> Stores {
        let Some(config) = db_config else {
            tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
            return Self::in_memory_stores();
        };

        match scribe_infra::database::connect(config).await {
            Ok(conn) => (
                Arc::new(PostgresUserRepository::new(conn.clone())),
                Arc::new(PostgresPostRepository::new(conn)),
            ),
            Err(e) => {
                tracing::error!(
                    "Failed to connect to database: {}. Using in-memory fallback.",
                    e
                );
                Self::in_memory_stores()
            }
        }
    }

    #[cfg(not(feature = "postgres"))]
    async fn stores(_db_config: Option<&DatabaseConfig>) -> Stores {
        tracing::info!("Running without postgres feature - using in-memory repositories");
        Self::in_memory_stores()
    }

    #[cfg(feature = "redis")]
    async fn session_store(url: Option<&str>, ttl: chrono::Duration) -> Arc<dyn SessionStore> {
        let Some(url) = url else {
            tracing::warn!("REDIS_URL not set. Sessions are kept in memory.");
            return Arc::new(InMemorySessionStore::new(ttl));
        };

        match RedisSessionStore::new(RedisConfig::new(url), ttl).await {
            Ok(store) => Arc::new(store),
            Err(e) => {
                tracing::error!(
                    "Failed to connect to Redis: {}. Sessions are kept in memory.",
                    e
                );
                Arc::new(InMemorySessionStore::new(ttl))
            }
        }
    }

    #[cfg(not(feature = "redis"))]
    async fn session_store(_url: Option<&str>, ttl: chrono::Duration) -> Arc<dyn SessionStore> {
        tracing::info!("Running without redis feature - sessions are kept in memory");
        Arc::new(InMemorySessionStore::new(ttl))
    }
}
