//! Session authenticator - credentials in, session out, and back to a user on every request.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{SessionId, User};
use crate::error::{DomainError, RepoError};
use crate::ports::{AuthError, PasswordService, SessionStore, UserRepository};

/// Hashed once at startup so that failed lookups cost the same as failed comparisons.
const TIMING_DUMMY_PASSWORD: &str = "scribe-timing-dummy-password";

/// Name the colliding field from the unique constraint the store reported.
fn signup_collision(constraint: &str) -> DomainError {
    let message = if constraint.contains("email") {
        "Email already registered"
    } else if constraint.contains("username") {
        "Username already taken"
    } else {
        "Username or email already exists"
    };
    DomainError::Duplicate(message.to_string())
}

/// Validated signup payload.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Validated profile edit.
#[derive(Debug, Clone)]
pub struct ProfileChanges {
    pub username: String,
    pub email: String,
}

pub struct SessionAuthenticator {
    users: Arc<dyn UserRepository>,
    sessions: Arc<dyn SessionStore>,
    passwords: Arc<dyn PasswordService>,
    dummy_hash: String,
}

impl SessionAuthenticator {
    pub fn new(
        users: Arc<dyn UserRepository>,
        sessions: Arc<dyn SessionStore>,
        passwords: Arc<dyn PasswordService>,
    ) -> Result<Self, AuthError> {
        let dummy_hash = passwords.hash(TIMING_DUMMY_PASSWORD)?;

        Ok(Self {
            users,
            sessions,
            passwords,
            dummy_hash,
        })
    }

    /// Create a user account. An email collision is reported before a username one.
    pub async fn register(&self, new_user: NewUser) -> Result<User, DomainError> {
        if self.users.find_by_email(&new_user.email).await?.is_some() {
            return Err(DomainError::Duplicate("Email already registered".to_string()));
        }
        if self
            .users
            .find_by_username(&new_user.username)
            .await?
            .is_some()
        {
            return Err(DomainError::Duplicate("Username already taken".to_string()));
        }

        let password_hash = self
            .passwords
            .hash(&new_user.password)
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        let user = User::new(new_user.username, new_user.email, password_hash);

        // A concurrent signup can still win the race; the store's unique index decides.
        let saved = self.users.insert(user).await.map_err(|e| match e {
            RepoError::Duplicate(constraint) => signup_collision(&constraint),
            other => other.into(),
        })?;

        tracing::info!(user_id = %saved.id, "User registered");
        Ok(saved)
    }

    /// Check an email/password pair.
    ///
    /// Unknown email and wrong password fail with the same error, and both paths run
    /// one password verification.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let email = email.trim().to_lowercase();

        let Some(user) = self.users.find_by_email(&email).await? else {
            let _ = self.passwords.verify(password, &self.dummy_hash);
            return Err(AuthError::InvalidCredentials);
        };

        if !self.passwords.verify(password, &user.password_hash)? {
            return Err(AuthError::InvalidCredentials);
        }

        Ok(user)
    }

    /// Open a session for a freshly registered or logged-in user.
    pub async fn establish_session(&self, user: &User) -> Result<SessionId, AuthError> {
        let session = self.sessions.create(user.id).await?;
        tracing::debug!(user_id = %user.id, "Session established");
        Ok(session.id)
    }

    /// Map a session id back to the current user record.
    ///
    /// The user is re-read from the credential store on every call, so deleted users
    /// lose access immediately. `None` means "not authenticated".
    pub async fn resolve_session(&self, id: &SessionId) -> Result<Option<User>, AuthError> {
        let Some(session) = self.sessions.load(id).await? else {
            return Ok(None);
        };

        let user = self.users.find_by_id(session.user_id).await?;
        if user.is_none() {
            tracing::debug!(user_id = %session.user_id, "Session refers to a missing user");
        }

        Ok(user.map(|mut u| {
            u.password_hash.clear();
            u
        }))
    }

    /// Invalidate a session. Safe to call repeatedly.
    pub async fn destroy_session(&self, id: &SessionId) -> Result<(), AuthError> {
        self.sessions.destroy(id).await?;
        Ok(())
    }

    /// Re-read a user (profile view).
    pub async fn profile(&self, user_id: Uuid) -> Result<User, DomainError> {
        let mut user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(DomainError::NotFound {
                entity_type: "User",
                id: user_id,
            })?;
        user.password_hash.clear();
        Ok(user)
    }

    /// Change username and email, keeping both unique across users.
    pub async fn update_profile(
        &self,
        user_id: Uuid,
        changes: ProfileChanges,
    ) -> Result<User, DomainError> {
        let taken = |other: Option<User>| other.is_some_and(|u| u.id != user_id);

        if taken(self.users.find_by_email(&changes.email).await?)
            || taken(self.users.find_by_username(&changes.username).await?)
        {
            return Err(DomainError::Duplicate(
                "Username or email already exists".to_string(),
            ));
        }

        let mut user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(DomainError::NotFound {
                entity_type: "User",
                id: user_id,
            })?;
        user.rename(changes.username, changes.email);

        let mut saved = self.users.update(user).await.map_err(|e| match e {
            RepoError::Duplicate(_) => {
                DomainError::Duplicate("Username or email already exists".to_string())
            }
            RepoError::NotFound => DomainError::NotFound {
                entity_type: "User",
                id: user_id,
            },
            other => other.into(),
        })?;

        saved.password_hash.clear();
        Ok(saved)
    }
}
