//! Error handling - every failure leaves the server as an RFC 7807 document.

use std::sync::OnceLock;

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use thiserror::Error;

use scribe_core::ports::AuthError;
use scribe_core::{DomainError, RepoError};
use scribe_shared::{ErrorResponse, FieldError};

static EXPOSE_INTERNAL: OnceLock<bool> = OnceLock::new();

/// Show internal error details to clients. Only honoured on the first call.
pub fn expose_internal_errors(enabled: bool) {
    let _ = EXPOSE_INTERNAL.set(enabled);
}

fn internal_details_visible() -> bool {
    EXPOSE_INTERNAL.get().copied().unwrap_or(false)
}

/// Application-level error type that converts to RFC 7807 responses.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    #[error("{0}")]
    Duplicate(String),

    #[error("Please log in to access this resource")]
    Unauthenticated,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Invalid {0} ID")]
    MalformedId(&'static str),

    #[error("Internal error: {0}")]
    Internal(String),

    /// An extractor already produced its own response.
    #[error("{0}")]
    Rejected(actix_web::Error),
}

impl AppError {
    pub fn field(field: &str, message: &str) -> Self {
        AppError::Validation(vec![FieldError::new(field, message)])
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::Duplicate(_) | AppError::MalformedId(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::Unauthenticated | AppError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Rejected(err) => err.as_response_error().status_code(),
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error = match self {
            AppError::Validation(errors) => ErrorResponse::validation_failed(errors.clone()),
            AppError::Duplicate(detail) => ErrorResponse::bad_request(detail),
            AppError::Unauthenticated => {
                ErrorResponse::new(401, "Authentication required").with_detail(self.to_string())
            }
            AppError::InvalidCredentials => {
                ErrorResponse::new(401, "Login failed").with_detail(self.to_string())
            }
            AppError::Forbidden(detail) => ErrorResponse::forbidden(detail),
            AppError::NotFound(detail) => ErrorResponse::not_found(detail),
            AppError::MalformedId(_) => ErrorResponse::bad_request(self.to_string()),
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                let body = ErrorResponse::internal_error();
                if internal_details_visible() {
                    body.with_detail(detail)
                } else {
                    body.with_detail("Internal server error")
                }
            }
            AppError::Rejected(err) => return err.error_response(),
        };

        HttpResponse::build(self.status_code()).json(error)
    }
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound { entity_type, .. } => {
                AppError::NotFound(format!("{entity_type} not found"))
            }
            DomainError::Validation(msg) => AppError::field("body", &msg),
            DomainError::Duplicate(msg) => AppError::Duplicate(msg),
            DomainError::Unauthenticated => AppError::Unauthenticated,
            DomainError::Forbidden(msg) => AppError::Forbidden(msg.to_string()),
            DomainError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        DomainError::from(err).into()
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => AppError::InvalidCredentials,
            other => AppError::Internal(other.to_string()),
        }
    }
}

impl From<actix_web::Error> for AppError {
    fn from(err: actix_web::Error) -> Self {
        AppError::Rejected(err)
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;
