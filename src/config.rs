//! Runtime configuration for the chat proxy, read from the environment
//! (and a `.env` file when present) into the typed `ProxyConfig`.
use std::fmt;
use std::time::Duration;

use anyhow::{Context, Result};
use dotenvy::dotenv;
use tracing::Level;

use crate::services::prompt::PromptTemplate;

pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-pro";

#[derive(Clone)]
pub struct ProxyConfig {
    pub bind_addr: String,
    /// Backend credential. `None` is a reportable state, not a startup failure.
    pub api_key: Option<String>,
    pub api_base: String,
    pub model: String,
    pub prompt: PromptTemplate,
    pub request_timeout: Duration,
    pub static_dir: String,
    pub log_level: Level,
}

impl fmt::Debug for ProxyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProxyConfig")
            .field("bind_addr", &self.bind_addr)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .field("prompt", &self.prompt)
            .field("request_timeout", &self.request_timeout)
            .field("static_dir", &self.static_dir)
            .field("log_level", &self.log_level)
            .finish()
    }
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:3000".into(),
            api_key: None,
            api_base: DEFAULT_API_BASE.into(),
            model: DEFAULT_MODEL.into(),
            prompt: PromptTemplate::Verbatim,
            request_timeout: Duration::from_secs(30),
            static_dir: "public".into(),
            log_level: Level::INFO,
        }
    }
}

impl ProxyConfig {
    /// Reads configuration from the process environment.
    ///
    /// | Variable               | Default                                            |
    /// |------------------------|----------------------------------------------------|
    /// | `GEMINI_API_KEY`       | unset                                              |
    /// | `GEMINI_MODEL`         | `gemini-pro`                                       |
    /// | `GEMINI_API_BASE`      | `https://generativelanguage.googleapis.com/v1beta` |
    /// | `CHAT_PROMPT_TEMPLATE` | unset (message sent verbatim)                      |
    /// | `CHAT_TIMEOUT_SECS`    | `30`                                               |
    /// | `BIND_ADDR`            | `0.0.0.0:3000`                                     |
    /// | `STATIC_DIR`           | `public`                                           |
    /// | `LOG_LEVEL`            | `info`                                             |
    pub fn from_env() -> Result<Self> {
        dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds a config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        // Blank values are treated as unset.
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let request_timeout = match var("CHAT_TIMEOUT_SECS") {
            Some(raw) => {
                let secs: u64 = raw
                    .trim()
                    .parse()
                    .with_context(|| format!("CHAT_TIMEOUT_SECS must be a whole number, got {raw:?}"))?;
                Duration::from_secs(secs)
            }
            None => defaults.request_timeout,
        };

        let log_level = match var("LOG_LEVEL") {
            Some(raw) => raw
                .trim()
                .parse::<Level>()
                .map_err(|_| anyhow::anyhow!("LOG_LEVEL must be one of trace, debug, info, warn, error, got {raw:?}"))?,
            None => defaults.log_level,
        };

        Ok(Self {
            bind_addr: var("BIND_ADDR").unwrap_or(defaults.bind_addr),
            api_key: var("GEMINI_API_KEY").map(|k| k.trim().to_string()),
            api_base: var("GEMINI_API_BASE").unwrap_or(defaults.api_base),
            model: var("GEMINI_MODEL").unwrap_or(defaults.model),
            prompt: PromptTemplate::from_setting(var("CHAT_PROMPT_TEMPLATE")),
            request_timeout,
            static_dir: var("STATIC_DIR").unwrap_or(defaults.static_dir),
            log_level,
        })
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}
