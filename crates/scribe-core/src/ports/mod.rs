//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod auth;
mod repository;
mod session;

pub use auth::{AuthError, PasswordService};
pub use repository::{BaseRepository, PostFilter, PostRepository, UserRepository};
pub use session::{SessionError, SessionStore};
