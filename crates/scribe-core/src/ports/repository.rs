use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Category, PageRequest, Post, User};
use crate::error::RepoError;

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Insert a new entity. Unique violations surface as `RepoError::Duplicate`.
    async fn insert(&self, entity: T) -> Result<T, RepoError>;

    /// Overwrite an existing entity. `RepoError::NotFound` if it is gone.
    async fn update(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID. `RepoError::NotFound` if it is gone.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// User repository - the credential store.
#[async_trait]
pub trait UserRepository: BaseRepository<User, Uuid> {
    /// Find a user by (already lowercased) email address.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;

    /// Batch lookup used to attach authors to a page of posts. Missing ids are skipped.
    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>, RepoError>;
}

/// Criteria for post listings. Every `Some` field narrows the result.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostFilter {
    pub author_id: Option<Uuid>,
    pub published: Option<bool>,
    pub category: Option<Category>,
    /// Full-text search terms; a post matches if any term occurs in its title,
    /// content, or tags.
    pub search: Option<String>,
}

impl PostFilter {
    /// Publicly visible posts.
    pub fn published() -> Self {
        Self {
            published: Some(true),
            ..Self::default()
        }
    }

    /// Every post written by `author_id`, published or not.
    pub fn by_author(author_id: Uuid) -> Self {
        Self {
            author_id: Some(author_id),
            ..Self::default()
        }
    }

    pub fn with_category(mut self, category: Option<Category>) -> Self {
        self.category = category;
        self
    }

    pub fn with_search(mut self, search: Option<String>) -> Self {
        self.search = search.filter(|s| !s.trim().is_empty());
        self
    }
}

/// Post repository - the document store for posts.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, Uuid> {
    /// One page of matching posts, newest first.
    async fn find_page(
        &self,
        filter: &PostFilter,
        page: PageRequest,
    ) -> Result<Vec<Post>, RepoError>;

    /// Number of posts matching `filter`.
    async fn count(&self, filter: &PostFilter) -> Result<u64, RepoError>;
}
