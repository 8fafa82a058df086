//! Authentication handlers.

use actix_web::{HttpResponse, web};

use scribe_shared::dto::{
    AuthResponse, LoginRequest, MessageResponse, ProfileRequest, SignupRequest, UserEnvelope,
};

use super::views;
use crate::middleware::auth::{CurrentUser, SessionToken};
use crate::middleware::error::AppResult;
use crate::state::AppState;
use crate::validation;

/// POST /auth/signup
pub async fn signup(
    state: web::Data<AppState>,
    body: web::Json<SignupRequest>,
) -> AppResult<HttpResponse> {
    let new_user = validation::signup(body.into_inner())?;

    let user = state.auth.register(new_user).await?;
    let session = state.auth.establish_session(&user).await?;

    Ok(HttpResponse::Created()
        .cookie(state.cookies.issue(&session))
        .json(AuthResponse {
            message: "User registered successfully".to_string(),
            user: views::user(&user),
        }))
}

/// POST /auth/login
///
/// Any session the client already holds is replaced.
pub async fn login(
    state: web::Data<AppState>,
    previous: SessionToken,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let credentials = validation::login(body.into_inner())?;

    let user = state
        .auth
        .authenticate(&credentials.email, &credentials.password)
        .await?;

    if let Some(old) = previous.0 {
        state.auth.destroy_session(&old).await?;
    }
    let session = state.auth.establish_session(&user).await?;
    tracing::info!(user_id = %user.id, "User logged in");

    Ok(HttpResponse::Ok()
        .cookie(state.cookies.issue(&session))
        .json(AuthResponse {
            message: "Login successful".to_string(),
            user: views::user(&user),
        }))
}

/// GET /auth/logout
pub async fn logout(
    state: web::Data<AppState>,
    user: CurrentUser,
    session: SessionToken,
) -> AppResult<HttpResponse> {
    if let Some(id) = session.0 {
        state.auth.destroy_session(&id).await?;
    }
    tracing::info!(user_id = %user.0.id(), "User logged out");

    Ok(HttpResponse::Ok()
        .cookie(state.cookies.clear())
        .json(MessageResponse::new("Logout successful")))
}

/// GET /auth/me
pub async fn me(user: CurrentUser) -> AppResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(UserEnvelope {
        user: views::user(user.0.user()),
    }))
}

/// GET /auth/profile
pub async fn profile(state: web::Data<AppState>, user: CurrentUser) -> AppResult<HttpResponse> {
    let user = state.auth.profile(user.0.id()).await?;

    Ok(HttpResponse::Ok().json(UserEnvelope {
        user: views::user(&user),
    }))
}

/// PUT /auth/profile
pub async fn update_profile(
    state: web::Data<AppState>,
    user: CurrentUser,
    body: Result<web::Json<ProfileRequest>, actix_web::Error>,
) -> AppResult<HttpResponse> {
    let changes = validation::profile(body?.into_inner())?;

    let updated = state.auth.update_profile(user.0.id(), changes).await?;

    Ok(HttpResponse::Ok().json(AuthResponse {
        message: "Profile updated successfully".to_string(),
        user: views::user(&updated),
    }))
}
