//! Request extractors and the error layer.

pub mod auth;
pub mod error;
