//! Request pipeline services composed from the ports.

mod access;
mod auth;
mod posts;

#[cfg(test)]
mod fakes;

pub use access::{AccessGuard, Caller, Owned};
pub use auth::{NewUser, ProfileChanges, SessionAuthenticator};
pub use posts::{AuthoredPost, PostQuery, PostService};
