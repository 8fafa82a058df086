//! # Scribe API Server
//!
//! Routes, extractors, and wiring for the blogging API. The binary in `main.rs`
//! only loads configuration and starts the server; tests build the same app
//! through [`configure_app`].

pub mod config;
pub mod handlers;
pub mod middleware;
pub mod session_cookie;
pub mod state;
pub mod telemetry;
pub mod validation;

use actix_web::web;

use state::AppState;

/// Register state, payload error handlers, and routes on an `App`.
pub fn configure_app(state: AppState) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        cfg.app_data(web::Data::new(state))
            .app_data(handlers::json_config())
            .app_data(handlers::query_config())
            .configure(handlers::configure_routes);
    }
}
