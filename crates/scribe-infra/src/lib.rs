//! # Scribe Infrastructure
//!
//! Concrete implementations of the ports defined in `scribe-core`.
//! This crate contains the credential and post stores, session stores, and the
//! password hashing service.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external dependencies, in-memory only
//! - `postgres` - PostgreSQL user/post stores via SeaORM
//! - `redis` - Redis session store

pub mod auth;
pub mod database;
pub mod session;

// Re-exports - always available
pub use auth::Argon2PasswordService;
pub use database::{DatabaseConfig, InMemoryPostRepository, InMemoryUserRepository};
pub use session::InMemorySessionStore;

// Re-exports - Postgres
#[cfg(feature = "postgres")]
pub use database::{PostgresPostRepository, PostgresUserRepository};

// Re-exports - Redis
#[cfg(feature = "redis")]
pub use session::{RedisConfig, RedisSessionStore};
