use llmsh_core::TokenUsage;
use reqwest::blocking::Client;
use serde_json::{Value, json};
use tracing::{debug, instrument};

use crate::error::{LlmError, Result};
use crate::fence::strip_code_fence;
use crate::provider::ProviderConfig;
use crate::{CommandModel, Completion};

/// Blocking client for OpenAI-compatible `/chat/completions` endpoints.
#[derive(Debug, Clone, Default)]
pub struct OpenAiClient {
    http_client: Client,
}

impl OpenAiClient {
    pub fn new() -> Self {
        Self::default()
    }
}

pub(crate) fn request_body(provider: &ProviderConfig, prompt: &str) -> Value {
    let mut body = json!({
        "model": provider.model,
        "messages": [{ "role": "user", "content": prompt }],
    });
    if provider.max_tokens > 0 {
        body["max_tokens"] = json!(provider.max_tokens);
    }
    if provider.temperature >= 0.0 {
        body["temperature"] = json!(provider.temperature);
    }
    body
}

impl CommandModel for OpenAiClient {
    #[instrument(skip(self, provider, prompt), fields(model = %provider.model), level = "debug")]
    fn complete(&self, provider: &ProviderConfig, prompt: &str) -> Result<Completion> {
        let mut request = self
            .http_client
            .post(provider.chat_completions_url())
            .json(&request_body(provider, prompt));
        if !provider.api_key.is_empty() {
            request = request.bearer_auth(&provider.api_key);
        }

        let response = request.send()?;
        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().unwrap_or_default();
            return Err(LlmError::Provider(format!(
                "API error (status {}): {}",
                status, error_text
            )));
        }

        let body: Value = response
            .json()
            .map_err(|err| LlmError::Provider(format!("failed to parse response: {}", err)))?;
        let completion = parse_chat_completion(body, &provider.model)?;
        debug!(
            input_tokens = completion.usage.input_tokens,
            output_tokens = completion.usage.output_tokens,
            "completion received"
        );
        Ok(completion)
    }
}

/// Extracts the command and usage from a chat-completions response body.
/// `fallback_model` is used when the response does not name the model.
pub fn parse_chat_completion(response: Value, fallback_model: &str) -> Result<Completion> {
    let choice = match response["choices"].as_array() {
        Some(choices) if !choices.is_empty() => &choices[0],
        _ => return Err(LlmError::EmptyResponse),
    };
    let content = choice["message"]["content"].as_str().unwrap_or("");
    let model = response["model"]
        .as_str()
        .filter(|value| !value.is_empty())
        .unwrap_or(fallback_model)
        .to_string();

    let usage = &response["usage"];
    let read = |value: &Value| value.as_u64().unwrap_or(0);
    let usage = TokenUsage {
        input_tokens: read(&usage["prompt_tokens"]),
        output_tokens: read(&usage["completion_tokens"]),
        cache_creation_tokens: read(&usage["cache_creation_input_tokens"]),
        cache_read_tokens: read(&usage["prompt_tokens_details"]["cached_tokens"]),
    };

    Ok(Completion {
        command: strip_code_fence(content),
        model,
        usage,
    })
}
