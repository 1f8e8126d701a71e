// src/services/generator.rs
use async_trait::async_trait;
use thiserror::Error;

/// Ways a single backend call can fail.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BackendError {
    #[error("request to backend failed: {0}")]
    Transport(String),

    #[error("backend did not answer in time")]
    Timeout,

    #[error("backend returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("unexpected backend response: {0}")]
    MalformedResponse(String),
}

/// The text-generation backend seam. One call per chat turn, no retries.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generates a completion for `prompt` and returns the first candidate's text.
    async fn generate(&self, api_key: &str, prompt: &str) -> Result<String, BackendError>;
}
