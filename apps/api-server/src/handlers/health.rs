//! Health check endpoint.

use actix_web::HttpResponse;

use scribe_shared::dto::HealthResponse;

use crate::middleware::auth::MaybeUser;
use crate::middleware::error::{AppError, AppResult};

/// Health check endpoint - returns server status.
///
/// GET /
pub async fn health_check(user: MaybeUser) -> HttpResponse {
    let response = HealthResponse {
        message: "Blog Platform API is running!".to_string(),
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
        authenticated: user.0.is_some(),
    };

    HttpResponse::Ok().json(response)
}

/// Fallback for unmatched routes.
pub async fn not_found() -> AppResult<HttpResponse> {
    Err(AppError::NotFound("Route not found".to_string()))
}
