//! Access guard - authentication and ownership gates.
//!
//! Both gates hand back proof values instead of mutating request state:
//! [`Caller`] can only be obtained from [`AccessGuard::require_authenticated`], and
//! [`AccessGuard::require_ownership`] needs a `Caller`, so the ownership check cannot
//! run for an unauthenticated request.

use std::ops::Deref;
use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{Post, SessionId, User};
use crate::error::DomainError;
use crate::ports::PostRepository;

use super::SessionAuthenticator;

/// An authenticated caller, resolved from the session for this request only.
#[derive(Debug, Clone)]
pub struct Caller(User);

impl Caller {
    pub fn id(&self) -> Uuid {
        self.0.id
    }

    pub fn user(&self) -> &User {
        &self.0
    }

    pub fn into_user(self) -> User {
        self.0
    }
}

/// A resource the caller has been shown to own.
#[derive(Debug, Clone)]
pub struct Owned<T> {
    resource: T,
}

impl<T> Owned<T> {
    pub fn into_inner(self) -> T {
        self.resource
    }
}

impl<T> Deref for Owned<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.resource
    }
}

pub struct AccessGuard {
    authenticator: Arc<SessionAuthenticator>,
    posts: Arc<dyn PostRepository>,
}

impl AccessGuard {
    pub fn new(authenticator: Arc<SessionAuthenticator>, posts: Arc<dyn PostRepository>) -> Self {
        Self {
            authenticator,
            posts,
        }
    }

    /// Resolve the session into a caller, or fail with `Unauthenticated`.
    pub async fn require_authenticated(
        &self,
        session: Option<&SessionId>,
    ) -> Result<Caller, DomainError> {
        let Some(session) = session else {
            return Err(DomainError::Unauthenticated);
        };

        self.authenticator
            .resolve_session(session)
            .await
            .map_err(|e| DomainError::Internal(e.to_string()))?
            .map(Caller)
            .ok_or(DomainError::Unauthenticated)
    }

    /// Fetch a post and confirm the caller wrote it.
    ///
    /// `NotFound` if the post does not exist, `Forbidden` if it belongs to someone else.
    pub async fn require_ownership(
        &self,
        caller: &Caller,
        post_id: Uuid,
    ) -> Result<Owned<Post>, DomainError> {
        let post = self
            .posts
            .find_by_id(post_id)
            .await?
            .ok_or(DomainError::NotFound {
                entity_type: "Post",
                id: post_id,
            })?;

        if !post.is_owned_by(caller.id()) {
            tracing::warn!(
                post_id = %post_id,
                caller_id = %caller.id(),
                "Ownership check failed"
            );
            return Err(DomainError::Forbidden(
                "You can only modify your own resources",
            ));
        }

        Ok(Owned { resource: post })
    }
}
