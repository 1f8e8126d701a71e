use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};

use crate::{
    error::AppError,
    message::{ChatRequest, ChatResponse},
    state::SharedState,
};

/// One chat turn: validate, call the backend once, relay its first candidate.
pub async fn chat_handler(
    State(state): State<SharedState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, AppError> {
    // Checked before the body so a misconfigured deployment never reaches the backend.
    let api_key = state
        .config
        .api_key
        .as_deref()
        .ok_or(AppError::Configuration)?;

    let Json(request) = payload.map_err(|rejection| {
        tracing::debug!(%rejection, "could not parse chat body");
        AppError::BadRequest("Invalid request body".to_string())
    })?;

    let message = request
        .trimmed_message()
        .ok_or_else(|| AppError::BadRequest("Message is required".to_string()))?;

    let prompt = state.config.prompt.render(message);
    tracing::debug!(chars = message.chars().count(), model = %state.config.model, "forwarding chat message");

    let reply = state.generator.generate(api_key, &prompt).await?;

    Ok(Json(ChatResponse { reply }))
}

pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}
