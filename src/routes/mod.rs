// src/routes/mod.rs
pub mod chat;
pub mod cors;

use crate::config::ProxyConfig;
use crate::state::SharedState;
use axum::{
    Router,
    http::StatusCode,
    routing::{MethodRouter, get, post},
};
use chat::{chat_handler, method_not_allowed};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

pub fn create_router(config: &ProxyConfig) -> Router<SharedState> {
    Router::new()
        .route("/chat", chat_route())
        // Path the site's widget posts to.
        .route("/api/chat", chat_route())
        .route("/health", get(|| async { "OK" }))
        .fallback_service(ServeDir::new(&config.static_dir))
        .layer(cors::cors_layer())
        .layer(TraceLayer::new_for_http())
}

fn chat_route() -> MethodRouter<SharedState> {
    post(chat_handler)
        // The CORS layer answers OPTIONS itself; this only matters without it.
        .options(|| async { StatusCode::OK })
        .fallback(method_not_allowed)
}
