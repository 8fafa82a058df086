//! SeaORM entities for the Postgres store.

pub mod post;
pub mod user;
