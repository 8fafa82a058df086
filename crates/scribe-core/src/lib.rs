//! # Scribe Core
//!
//! The domain layer of the Scribe blogging API.
//! This crate contains the entities, the ports infrastructure must implement, and the
//! request pipeline services (authentication, ownership, post queries) built on them.
//! It has zero infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod ports;
pub mod services;

pub use error::{DomainError, RepoError};
