//! HTTP handlers and route configuration.

mod auth;
mod health;
mod posts;
mod views;

use actix_web::web;

use crate::middleware::error::AppError;

/// JSON bodies that fail to decode become validation failures.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req| AppError::field("body", &err.to_string()).into())
}

/// Query strings that fail to decode become validation failures.
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default()
        .error_handler(|err, _req| AppError::field("query", &err.to_string()).into())
}

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(health::health_check))
        .service(
            web::scope("/auth")
                .route("/signup", web::post().to(auth::signup))
                .route("/login", web::post().to(auth::login))
                .route("/logout", web::get().to(auth::logout))
                .route("/me", web::get().to(auth::me))
                .route("/profile", web::get().to(auth::profile))
                .route("/profile", web::put().to(auth::update_profile)),
        )
        .service(
            web::scope("/posts")
                .route("", web::get().to(posts::list))
                .route("", web::post().to(posts::create))
                .route("/user/my-posts", web::get().to(posts::my_posts))
                .route("/category/{category}", web::get().to(posts::list_by_category))
                .route("/{id}", web::get().to(posts::get))
                .route("/{id}", web::put().to(posts::update))
                .route("/{id}", web::delete().to(posts::delete))
                .route("/{id}/toggle-publish", web::patch().to(posts::toggle_publish)),
        )
        .default_service(web::to(health::not_found));
}
