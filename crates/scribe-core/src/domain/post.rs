use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Category;

/// Post entity - represents a blog post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub content: String,
    pub category: Category,
    pub tags: Vec<String>,
    pub published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated fields for a new post. The author is supplied separately.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostDraft {
    pub title: String,
    pub content: String,
    pub category: Category,
    pub tags: Vec<String>,
}

/// The mutable subset of a post. Author, id, and publication state are not here.
pub type PostChanges = PostDraft;

impl Post {
    /// Create a new, published post owned by `author_id`.
    pub fn new(author_id: Uuid, draft: PostDraft) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            author_id,
            title: draft.title,
            content: draft.content,
            category: draft.category,
            tags: draft.tags,
            published: true,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.author_id == user_id
    }

    /// Apply an edit. Only title, content, category, and tags change.
    pub fn apply(&mut self, changes: PostChanges) {
        self.title = changes.title;
        self.content = changes.content;
        self.category = changes.category;
        self.tags = changes.tags;
        self.updated_at = Utc::now();
    }

    /// Flip the published flag and return the new value.
    pub fn toggle_published(&mut self) -> bool {
        self.published = !self.published;
        self.updated_at = Utc::now();
        self.published
    }
}
