//! Post queries and mutations.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{AuthorSummary, Category, Page, PageRequest, Post, PostChanges, PostDraft};
use crate::error::{DomainError, RepoError};
use crate::ports::{PostFilter, PostRepository, UserRepository};

use super::{Caller, Owned};

/// Validated listing parameters for the public feed.
#[derive(Debug, Clone, Default)]
pub struct PostQuery {
    pub search: Option<String>,
    pub category: Option<Category>,
    pub page: PageRequest,
}

/// A post with its author resolved. `author` is `None` when the user is gone.
#[derive(Debug, Clone)]
pub struct AuthoredPost {
    pub post: Post,
    pub author: Option<AuthorSummary>,
}

pub struct PostService {
    posts: Arc<dyn PostRepository>,
    users: Arc<dyn UserRepository>,
}

impl PostService {
    pub fn new(posts: Arc<dyn PostRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { posts, users }
    }

    /// Published posts, optionally narrowed by search term and category.
    pub async fn list_published(
        &self,
        query: PostQuery,
    ) -> Result<Page<AuthoredPost>, DomainError> {
        let filter = PostFilter::published()
            .with_category(query.category)
            .with_search(query.search);
        self.list(&filter, query.page).await
    }

    /// Published posts in one category.
    pub async fn list_by_category(
        &self,
        category: Category,
        page: PageRequest,
    ) -> Result<Page<AuthoredPost>, DomainError> {
        self.list(&PostFilter::published().with_category(Some(category)), page)
            .await
    }

    /// All of the caller's own posts, drafts included.
    pub async fn list_own(
        &self,
        caller: &Caller,
        page: PageRequest,
    ) -> Result<Page<AuthoredPost>, DomainError> {
        self.list(&PostFilter::by_author(caller.id()), page).await
    }

    pub async fn get(&self, id: Uuid) -> Result<AuthoredPost, DomainError> {
        let post = self
            .posts
            .find_by_id(id)
            .await?
            .ok_or(DomainError::NotFound {
                entity_type: "Post",
                id,
            })?;
        self.with_author(post).await
    }

    /// Create a post authored by the caller.
    pub async fn create(
        &self,
        caller: &Caller,
        draft: PostDraft,
    ) -> Result<AuthoredPost, DomainError> {
        let post = self.posts.insert(Post::new(caller.id(), draft)).await?;
        tracing::info!(post_id = %post.id, author_id = %caller.id(), "Post created");

        Ok(AuthoredPost {
            post,
            author: Some(caller.user().summary()),
        })
    }

    pub async fn update(
        &self,
        owned: Owned<Post>,
        changes: PostChanges,
    ) -> Result<AuthoredPost, DomainError> {
        let mut post = owned.into_inner();
        let id = post.id;
        post.apply(changes);

        let post = self
            .posts
            .update(post)
            .await
            .map_err(|e| Self::vanished(e, id))?;
        self.with_author(post).await
    }

    pub async fn toggle_published(
        &self,
        owned: Owned<Post>,
    ) -> Result<AuthoredPost, DomainError> {
        let mut post = owned.into_inner();
        let id = post.id;
        let published = post.toggle_published();

        let post = self
            .posts
            .update(post)
            .await
            .map_err(|e| Self::vanished(e, id))?;
        tracing::info!(post_id = %post.id, published, "Post visibility changed");
        self.with_author(post).await
    }

    /// Hard delete.
    pub async fn delete(&self, owned: Owned<Post>) -> Result<(), DomainError> {
        let id = owned.id;
        self.posts
            .delete(id)
            .await
            .map_err(|e| Self::vanished(e, id))?;
        tracing::info!(post_id = %id, "Post deleted");
        Ok(())
    }

    async fn list(
        &self,
        filter: &PostFilter,
        page: PageRequest,
    ) -> Result<Page<AuthoredPost>, DomainError> {
        let posts = self.posts.find_page(filter, page).await?;
        let total = self.posts.count(filter).await?;

        let author_ids: Vec<Uuid> = posts
            .iter()
            .map(|p| p.author_id)
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        let authors: HashMap<Uuid, AuthorSummary> = self
            .users
            .find_by_ids(&author_ids)
            .await?
            .into_iter()
            .map(|u| (u.id, u.summary()))
            .collect();

        Ok(Page::new(posts, page, total).map(|post| AuthoredPost {
            author: authors.get(&post.author_id).cloned(),
            post,
        }))
    }

    async fn with_author(&self, post: Post) -> Result<AuthoredPost, DomainError> {
        let author = self
            .users
            .find_by_id(post.author_id)
            .await?
            .map(|u| u.summary());
        Ok(AuthoredPost { post, author })
    }

    /// The post was removed between the ownership check and the write.
    fn vanished(err: RepoError, id: Uuid) -> DomainError {
        match err {
            RepoError::NotFound => DomainError::NotFound {
                entity_type: "Post",
                id,
            },
            other => other.into(),
        }
    }
}
