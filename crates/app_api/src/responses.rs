use llmsh_app::CommandOutcome;
use llmsh_core::TokenUsage;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommandResult {
    pub command: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    pub cached: bool,
}

/// JSON object written to stdout. Either `result` or `error` is set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommandResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<CommandResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tokens: Option<TokenUsage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CommandResponse {
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            result: None,
            tokens: None,
            error: Some(message.into()),
        }
    }
}

impl From<CommandOutcome> for CommandResponse {
    fn from(outcome: CommandOutcome) -> Self {
        Self {
            result: Some(CommandResult {
                command: outcome.command,
                confidence: None,
                cached: outcome.cached,
            }),
            tokens: outcome.usage,
            error: None,
        }
    }
}
