//! Post handlers.
//!
//! Mutations run authentication, then ownership, then body validation. Bodies are
//! taken as `Result` so a malformed payload never outranks a 401 or 403.

use actix_web::{HttpResponse, web};

use scribe_core::services::AuthoredPost;
use scribe_shared::dto::{ListQuery, MessageResponse, PageQuery, PostEnvelope, PostPayload};

use super::views;
use crate::middleware::auth::CurrentUser;
use crate::middleware::error::AppResult;
use crate::state::AppState;
use crate::validation;

type Body = Result<web::Json<PostPayload>, actix_web::Error>;

fn envelope(message: Option<&str>, post: AuthoredPost) -> PostEnvelope {
    PostEnvelope {
        message: message.map(str::to_string),
        post: views::post(post),
    }
}

/// GET /posts
pub async fn list(
    state: web::Data<AppState>,
    query: web::Query<ListQuery>,
) -> AppResult<HttpResponse> {
    let query = validation::list_query(query.into_inner())?;
    let page = state.posts.list_published(query).await?;

    Ok(HttpResponse::Ok().json(views::post_list(page, None)))
}

/// GET /posts/category/{category}
pub async fn list_by_category(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let category = validation::category_param(&path)?;
    let page_request = validation::page_query(query.into_inner())?;
    let page = state.posts.list_by_category(category, page_request).await?;

    Ok(HttpResponse::Ok().json(views::post_list(page, Some(category.to_string()))))
}

/// GET /posts/user/my-posts
pub async fn my_posts(
    state: web::Data<AppState>,
    user: CurrentUser,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let page_request = validation::page_query(query.into_inner())?;
    let page = state.posts.list_own(&user.0, page_request).await?;

    Ok(HttpResponse::Ok().json(views::post_list(page, None)))
}

/// GET /posts/{id}
pub async fn get(state: web::Data<AppState>, path: web::Path<String>) -> AppResult<HttpResponse> {
    let id = validation::post_id(&path)?;
    let post = state.posts.get(id).await?;

    Ok(HttpResponse::Ok().json(envelope(None, post)))
}

/// POST /posts
pub async fn create(
    state: web::Data<AppState>,
    user: CurrentUser,
    body: Body,
) -> AppResult<HttpResponse> {
    let draft = validation::post(body?.into_inner())?;
    let post = state.posts.create(&user.0, draft).await?;

    Ok(HttpResponse::Created().json(envelope(Some("Post created successfully"), post)))
}

/// PUT /posts/{id}
pub async fn update(
    state: web::Data<AppState>,
    user: CurrentUser,
    path: web::Path<String>,
    body: Body,
) -> AppResult<HttpResponse> {
    let id = validation::post_id(&path)?;
    let owned = state.guard.require_ownership(&user.0, id).await?;
    let changes = validation::post(body?.into_inner())?;

    let post = state.posts.update(owned, changes).await?;

    Ok(HttpResponse::Ok().json(envelope(Some("Post updated successfully"), post)))
}

/// PATCH /posts/{id}/toggle-publish
pub async fn toggle_publish(
    state: web::Data<AppState>,
    user: CurrentUser,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id = validation::post_id(&path)?;
    let owned = state.guard.require_ownership(&user.0, id).await?;

    let post = state.posts.toggle_published(owned).await?;
    let message = if post.post.published {
        "Post published successfully"
    } else {
        "Post unpublished successfully"
    };

    Ok(HttpResponse::Ok().json(envelope(Some(message), post)))
}

/// DELETE /posts/{id}
pub async fn delete(
    state: web::Data<AppState>,
    user: CurrentUser,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id = validation::post_id(&path)?;
    let owned = state.guard.require_ownership(&user.0, id).await?;

    state.posts.delete(owned).await?;

    Ok(HttpResponse::Ok().json(MessageResponse::new("Post deleted successfully")))
}
