//! HTTP proxy between a portfolio site's chat widget and a Gemini-style
//! text-generation backend.
pub mod config;
pub mod error;
pub mod message;
pub mod routes;
pub mod services;
pub mod state;

use std::sync::Arc;

use axum::Router;

use crate::config::ProxyConfig;
use crate::services::gemini::GeminiClient;
use crate::state::AppState;

/// Builds the full application with the Gemini backend wired in.
pub fn build_app(config: ProxyConfig) -> Result<Router, services::generator::BackendError> {
    let client = GeminiClient::new(&config.api_base, &config.model, config.request_timeout)?;
    let router = routes::create_router(&config);
    let state = AppState::new(config, Arc::new(client)).shared();
    Ok(router.with_state(state))
}
