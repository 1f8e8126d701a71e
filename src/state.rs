// src/state.rs
use std::sync::Arc;

use crate::config::ProxyConfig;
use crate::services::generator::TextGenerator;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub config: ProxyConfig,
    pub generator: Arc<dyn TextGenerator>,
}

impl AppState {
    pub fn new(config: ProxyConfig, generator: Arc<dyn TextGenerator>) -> Self {
        Self { config, generator }
    }

    pub fn shared(self) -> SharedState {
        Arc::new(self)
    }
}
