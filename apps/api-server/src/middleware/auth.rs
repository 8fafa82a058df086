//! Authentication extractors.
//!
//! The session cookie is verified and resolved through the access guard before the
//! handler runs; a handler that takes [`CurrentUser`] is never invoked for an
//! anonymous request.

use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures::future::LocalBoxFuture;

use scribe_core::domain::SessionId;
use scribe_core::services::Caller;

use crate::middleware::error::AppError;
use crate::state::AppState;

fn app_state(req: &HttpRequest) -> Result<web::Data<AppState>, AppError> {
    req.app_data::<web::Data<AppState>>().cloned().ok_or_else(|| {
        tracing::error!("AppState not found in app data");
        AppError::Internal("Server configuration error".to_string())
    })
}

/// Authenticated caller extractor.
///
/// Use this in handlers to require authentication:
/// ```ignore
/// async fn protected_route(user: CurrentUser) -> impl Responder {
///     format!("Hello, {}!", user.0.user().username)
/// }
/// ```
pub struct CurrentUser(pub Caller);

impl FromRequest for CurrentUser {
    type Error = AppError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let state = app_state(req);
        let session = state.as_ref().ok().and_then(|s| s.cookies.read(req));

        Box::pin(async move {
            let caller = state?
                .guard
                .require_authenticated(session.as_ref())
                .await?;
            Ok(CurrentUser(caller))
        })
    }
}

/// Optional caller extractor - doesn't fail if not authenticated.
pub struct MaybeUser(pub Option<Caller>);

impl FromRequest for MaybeUser {
    type Error = AppError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let user = CurrentUser::from_request(req, payload);

        Box::pin(async move {
            match user.await {
                Ok(CurrentUser(caller)) => Ok(MaybeUser(Some(caller))),
                Err(AppError::Unauthenticated) => Ok(MaybeUser(None)),
                Err(e) => Err(e),
            }
        })
    }
}

/// The verified session id carried by the request, if any.
pub struct SessionToken(pub Option<SessionId>);

impl FromRequest for SessionToken {
    type Error = AppError;
    type Future = std::future::Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        std::future::ready(app_state(req).map(|s| SessionToken(s.cookies.read(req))))
    }
}
