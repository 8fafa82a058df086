//! In-process port implementations for service unit tests.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Duration;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::{PageRequest, Post, Session, SessionId, User};
use crate::error::RepoError;
use crate::ports::{
    AuthError, BaseRepository, PasswordService, PostFilter, PostRepository, SessionError,
    SessionStore, UserRepository,
};

use super::SessionAuthenticator;

#[derive(Default)]
pub struct FakeUsers {
    users: RwLock<HashMap<Uuid, User>>,
    /// Lookups by email and username report nothing, as when another signup
    /// commits between the pre-check and the insert.
    pub stale_lookups: bool,
}

impl FakeUsers {
    pub fn racing() -> Self {
        Self {
            stale_lookups: true,
            ..Self::default()
        }
    }

    pub async fn seed(&self, user: User) {
        self.users.write().await.insert(user.id, user);
    }
}

#[async_trait]
impl BaseRepository<User, Uuid> for FakeUsers {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn insert(&self, user: User) -> Result<User, RepoError> {
        let mut users = self.users.write().await;
        for existing in users.values() {
            if existing.email == user.email {
                return Err(RepoError::Duplicate("users_email_key".to_string()));
            }
            if existing.username == user.username {
                return Err(RepoError::Duplicate("users_username_key".to_string()));
            }
        }
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update(&self, user: User) -> Result<User, RepoError> {
        let mut users = self.users.write().await;
        if !users.contains_key(&user.id) {
            return Err(RepoError::NotFound);
        }
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        self.users
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl UserRepository for FakeUsers {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        if self.stale_lookups {
            return Ok(None);
        }
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        if self.stale_lookups {
            return Ok(None);
        }
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.username == username).cloned())
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>, RepoError> {
        let users = self.users.read().await;
        Ok(ids.iter().filter_map(|id| users.get(id).cloned()).collect())
    }
}

#[derive(Default)]
pub struct FakePosts {
    posts: RwLock<HashMap<Uuid, Post>>,
}

impl FakePosts {
    fn matches(filter: &PostFilter, post: &Post) -> bool {
        filter.author_id.is_none_or(|a| post.author_id == a)
            && filter.published.is_none_or(|p| post.published == p)
            && filter.category.is_none_or(|c| post.category == c)
    }
}

#[async_trait]
impl BaseRepository<Post, Uuid> for FakePosts {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        Ok(self.posts.read().await.get(&id).cloned())
    }

    async fn insert(&self, post: Post) -> Result<Post, RepoError> {
        self.posts.write().await.insert(post.id, post.clone());
        Ok(post)
    }

    async fn update(&self, post: Post) -> Result<Post, RepoError> {
        let mut posts = self.posts.write().await;
        if !posts.contains_key(&post.id) {
            return Err(RepoError::NotFound);
        }
        posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        self.posts
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl PostRepository for FakePosts {
    async fn find_page(
        &self,
        filter: &PostFilter,
        page: PageRequest,
    ) -> Result<Vec<Post>, RepoError> {
        let posts = self.posts.read().await;
        let mut matching: Vec<Post> = posts
            .values()
            .filter(|p| Self::matches(filter, p))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(matching
            .into_iter()
            .skip(page.skip() as usize)
            .take(page.limit() as usize)
            .collect())
    }

    async fn count(&self, filter: &PostFilter) -> Result<u64, RepoError> {
        let posts = self.posts.read().await;
        Ok(posts.values().filter(|p| Self::matches(filter, p)).count() as u64)
    }
}

#[derive(Default)]
pub struct FakeSessions {
    sessions: RwLock<HashMap<SessionId, Session>>,
}

#[async_trait]
impl SessionStore for FakeSessions {
    async fn create(&self, user_id: Uuid) -> Result<Session, SessionError> {
        let session = Session::new(user_id, Duration::hours(1));
        self.sessions
            .write()
            .await
            .insert(session.id.clone(), session.clone());
        Ok(session)
    }

    async fn load(&self, id: &SessionId) -> Result<Option<Session>, SessionError> {
        Ok(self.sessions.read().await.get(id).cloned())
    }

    async fn destroy(&self, id: &SessionId) -> Result<(), SessionError> {
        self.sessions.write().await.remove(id);
        Ok(())
    }
}

/// Reversible "hash" so tests can run without a real KDF.
pub struct PlainPasswords;

impl PasswordService for PlainPasswords {
    fn hash(&self, password: &str) -> Result<String, AuthError> {
        Ok(format!("plain:{password}"))
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        Ok(hash.strip_prefix("plain:") == Some(password))
    }
}

pub fn authenticator(users: Arc<FakeUsers>) -> SessionAuthenticator {
    SessionAuthenticator::new(
        users,
        Arc::new(FakeSessions::default()),
        Arc::new(PlainPasswords),
    )
    .unwrap()
}
