//! Session store implementations - Redis and in-memory fallback.

mod memory;
#[cfg(feature = "redis")]
mod redis;

pub use memory::InMemorySessionStore;
#[cfg(feature = "redis")]
pub use self::redis::{RedisConfig, RedisSessionStore};

/// Default sliding expiry window: seven days.
pub const DEFAULT_SESSION_TTL_SECS: i64 = 7 * 24 * 60 * 60;
