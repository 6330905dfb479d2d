//! Chat-completion collaborator used to turn prompts into shell commands.

mod error;
mod fence;
mod openai;
mod provider;

use llmsh_core::TokenUsage;

pub use error::{LlmError, Result};
pub use fence::strip_code_fence;
pub use openai::{OpenAiClient, parse_chat_completion};
pub use provider::ProviderConfig;

/// A command produced by the model, with the usage the provider reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub command: String,
    pub model: String,
    pub usage: TokenUsage,
}

/// Anything that can answer a prompt with a single shell command.
pub trait CommandModel: Send + Sync {
    fn complete(&self, provider: &ProviderConfig, prompt: &str) -> Result<Completion>;
}
