//! In-memory repositories - used when no database is configured, and in tests.
//!
//! Uniqueness of username and email is enforced on write, the way a unique index
//! would. Data is lost on process restart.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use scribe_core::domain::{PageRequest, Post, User};
use scribe_core::error::RepoError;
use scribe_core::ports::{BaseRepository, PostFilter, PostRepository, UserRepository};

use super::search::{matches_any, search_terms};

/// In-memory credential store.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<Uuid, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn check_unique(users: &HashMap<Uuid, User>, candidate: &User) -> Result<(), RepoError> {
        for existing in users.values().filter(|u| u.id != candidate.id) {
            if existing.email == candidate.email {
                return Err(RepoError::Duplicate("users_email_key".to_string()));
            }
            if existing.username == candidate.username {
                return Err(RepoError::Duplicate("users_username_key".to_string()));
            }
        }
        Ok(())
    }
}

#[async_trait]
impl BaseRepository<User, Uuid> for InMemoryUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn insert(&self, user: User) -> Result<User, RepoError> {
        let mut users = self.users.write().await;
        if users.contains_key(&user.id) {
            return Err(RepoError::Duplicate("users_pkey".to_string()));
        }
        Self::check_unique(&users, &user)?;
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update(&self, user: User) -> Result<User, RepoError> {
        let mut users = self.users.write().await;
        if !users.contains_key(&user.id) {
            return Err(RepoError::NotFound);
        }
        Self::check_unique(&users, &user)?;
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
impl UserRepository for InMemoryUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.username == username).cloned())
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>, RepoError> {
        let users = self.users.read().await;
        Ok(ids.iter().filter_map(|id| users.get(id).cloned()).collect())
    }
}

/// In-memory post store.
#[derive(Default)]
pub struct InMemoryPostRepository {
    posts: RwLock<HashMap<Uuid, Post>>,
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Matching posts, newest first.
    async fn matching(&self, filter: &PostFilter) -> Vec<Post> {
        let terms = filter
            .search
            .as_deref()
            .map(search_terms)
            .unwrap_or_default();
        let searching = filter.search.is_some();

        let posts = self.posts.read().await;
        let mut found: Vec<Post> = posts
            .values()
            .filter(|p| filter.author_id.is_none_or(|a| p.author_id == a))
            .filter(|p| filter.published.is_none_or(|v| p.published == v))
            .filter(|p| filter.category.is_none_or(|c| p.category == c))
            .filter(|p| {
                !searching
                    || (!terms.is_empty()
                        && matches_any(
                            &terms,
                            [p.title.as_str(), p.content.as_str()]
                                .into_iter()
                                .chain(p.tags.iter().map(String::as_str)),
                        ))
            })
            .cloned()
            .collect();

        found.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        found
    }
}

#[async_trait]
impl BaseRepository<Post, Uuid> for InMemoryPostRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        Ok(self.posts.read().await.get(&id).cloned())
    }

    async fn insert(&self, post: Post) -> Result<Post, RepoError> {
        let mut posts = self.posts.write().await;
        if posts.contains_key(&post.id) {
            return Err(RepoError::Duplicate("posts_pkey".to_string()));
        }
        posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn update(&self, post: Post) -> Result<Post, RepoError> {
        let mut posts = self.posts.write().await;
        match posts.get_mut(&post.id) {
            Some(slot) => {
                *slot = post.clone();
                Ok(post)
            }
            None => Err(RepoError::NotFound),
        }
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
impl PostRepository for InMemoryPostRepository {
    async fn find_page(
        &self,
        filter: &PostFilter,
        page: PageRequest,
    ) -> Result<Vec<Post>, RepoError> {
        Ok(self
            .matching(filter)
            .await
            .into_iter()
            .skip(page.skip() as usize)
            .take(page.limit() as usize)
            .collect())
    }

    async fn count(&self, filter: &PostFilter) -> Result<u64, RepoError> {
        Ok(self.matching(filter).await.len() as u64)
    }
}
