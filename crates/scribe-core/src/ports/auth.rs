//! Authentication ports.

/// Password hashing service.
pub trait PasswordService: Send + Sync {
    /// Hash a plain text password with a fresh salt.
    fn hash(&self, password: &str) -> Result<String, AuthError>;

    /// Verify a password against a hash.
    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError>;
}

/// Authentication errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Unknown email or wrong password. Deliberately carries no detail.
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Hashing error: {0}")]
    HashingError(String),

    #[error("Session store error: {0}")]
    Session(#[from] super::SessionError),

    #[error("User lookup failed: {0}")]
    Repository(#[from] crate::error::RepoError),
}
