// src/services/gemini.rs
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use super::generator::{BackendError, TextGenerator};

const API_KEY_HEADER: &str = "x-goog-api-key";
const GENERIC_FAILURE: &str = "Error fetching from Gemini";

#[derive(Serialize)]
struct GenerateReq<'a> {
    contents: [Content<'a>; 1],
}

#[derive(Serialize)]
struct Content<'a> {
    parts: [Part<'a>; 1],
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

/// Client for the `generateContent` endpoint of the Gemini API.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    api_base: String,
    model: String,
}

impl GeminiClient {
    pub fn new(api_base: impl Into<String>, model: impl Into<String>, timeout: Duration) -> Result<Self, BackendError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BackendError::Transport(e.without_url().to_string()))?;

        Ok(Self {
            http,
            api_base: api_base.into(),
            model: model.into(),
        })
    }

    pub fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.api_base.trim_end_matches('/'),
            self.model
        )
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, api_key: &str, prompt: &str) -> Result<String, BackendError> {
        let body = GenerateReq {
            contents: [Content {
                parts: [Part { text: prompt }],
            }],
        };

        let resp = self
            .http
            .post(self.endpoint())
            .header(API_KEY_HEADER, api_key)
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;

        let status = resp.status();
        let text = resp.text().await.map_err(transport_error)?;
        // The body may not be JSON at all (proxies, HTML error pages).
        let data: Option<Value> = serde_json::from_str(&text).ok();

        if !status.is_success() {
            let message = data
                .as_ref()
                .and_then(|v| v.pointer("/error/message"))
                .and_then(Value::as_str)
                .unwrap_or(GENERIC_FAILURE)
                .to_string();
            return Err(BackendError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let data = data.ok_or_else(|| BackendError::MalformedResponse("body is not JSON".into()))?;
        first_candidate_text(&data)
    }
}

/// Pulls `candidates[0].content.parts[0].text` out of a response.
pub fn first_candidate_text(data: &Value) -> Result<String, BackendError> {
    data.pointer("/candidates/0/content/parts/0/text")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| {
            let reason = data
                .pointer("/promptFeedback/blockReason")
                .and_then(Value::as_str)
                .map(|r| format!("prompt blocked: {r}"))
                .unwrap_or_else(|| "no candidate text".to_string());
            BackendError::MalformedResponse(reason)
        })
}

fn transport_error(e: reqwest::Error) -> BackendError {
    if e.is_timeout() {
        BackendError::Timeout
    } else {
        BackendError::Transport(e.without_url().to_string())
    }
}
