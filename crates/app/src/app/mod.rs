use std::sync::Arc;

use llmsh_llm::{CommandModel, OpenAiClient};

use crate::config::LlmshConfig;
use crate::services::AppServices;

/// Application state built once per invocation and handed to the front-end.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<LlmshConfig>,
    pub services: AppServices,
}

impl AppState {
    pub fn new(config: LlmshConfig, model: Arc<dyn CommandModel>) -> Self {
        let config = Arc::new(config);
        let services = AppServices::new(config.clone(), model);
        Self { config, services }
    }

    /// State backed by the HTTP chat-completions client.
    pub fn with_openai(config: LlmshConfig) -> Self {
        Self::new(config, Arc::new(OpenAiClient::new()))
    }
}
