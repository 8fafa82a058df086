//! # Scribe Shared
//!
//! Wire types for the HTTP API: request payloads, response bodies, and the
//! RFC 7807 error document. Kept free of server dependencies so a client can
//! reuse them.

pub mod dto;
pub mod response;

pub use response::{ErrorResponse, FieldError};
