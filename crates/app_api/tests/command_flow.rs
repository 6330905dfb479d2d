use std::sync::Arc;

use app_api::{AppContext, FailurePolicy, config_failure, handle_command};
use llmsh_app::{AppError, AppPaths, AppState, LlmshConfig};
use llmsh_core::{TokenUsage, UsageMethod};
use llmsh_llm::{CommandModel, Completion, LlmError, ProviderConfig};
use serde_json::json;
use tempfile::TempDir;

struct FixedModel(Option<&'static str>);

impl CommandModel for FixedModel {
    fn complete(&self, provider: &ProviderConfig, _prompt: &str) -> llmsh_llm::Result<Completion> {
        match self.0 {
            Some(command) => Ok(Completion {
                command: command.to_string(),
                model: provider.model.clone(),
                usage: TokenUsage {
                    input_tokens: 42,
                    output_tokens: 3,
                    cache_creation_tokens: 0,
                    cache_read_tokens: 0,
                },
            }),
            None => Err(LlmError::EmptyResponse),
        }
    }
}

fn context(model: FixedModel) -> (TempDir, AppContext) {
    let dir = tempfile::tempdir().expect("temp dir");
    let mut config = LlmshConfig::default();
    config.cache.enabled = false;
    config.cache.db_path = dir.path().join("cache.db");
    config.tracking.db_path = dir.path().join("tokens.json");
    let ctx = AppContext {
        app_state: AppState::new(config, Arc::new(model)),
        paths: AppPaths::new(dir.path().to_path_buf()),
    };
    (dir, ctx)
}

const PREDICT_REQUEST: &str = r#"{
    "method": "predict",
    "history": ["git status", "git add ."],
    "cwd": "/home/dev/project",
    "git_branch": "main",
    "os_info": "Linux",
    "timestamp": 1741594500
}"#;

#[test]
fn predict_response_carries_result_and_tokens() {
    let (_dir, ctx) = context(FixedModel(Some("git commit")));
    let response = handle_command(&ctx, UsageMethod::Predict, PREDICT_REQUEST, FailurePolicy::Silent)
        .expect("response");
    assert_eq!(
        serde_json::to_value(&response).expect("json"),
        json!({
            "result": { "command": "git commit", "cached": false },
            "tokens": {
                "input_tokens": 42,
                "output_tokens": 3,
                "cache_creation_tokens": 0,
                "cache_read_tokens": 0
            }
        })
    );
}

#[test]
fn provider_failure_is_silent_by_default() {
    let (_dir, ctx) = context(FixedModel(None));
    assert!(
        handle_command(&ctx, UsageMethod::Predict, PREDICT_REQUEST, FailurePolicy::Silent)
            .is_none()
    );

    let reported = handle_command(&ctx, UsageMethod::Predict, PREDICT_REQUEST, FailurePolicy::Report)
        .expect("reported failure");
    assert_eq!(reported.error.as_deref(), Some("empty response from API"));
    assert!(reported.result.is_none());
}

#[test]
fn validation_failures_are_always_reported() {
    let (_dir, ctx) = context(FixedModel(Some("git checkout")));
    let response = handle_command(
        &ctx,
        UsageMethod::Complete,
        r#"{"method":"complete","prefix":"g"}"#,
        FailurePolicy::Silent,
    )
    .expect("response");
    assert_eq!(
        serde_json::to_value(&response).expect("json"),
        json!({ "error": "prefix too short" })
    );
}

#[test]
fn malformed_request_is_reported() {
    let (_dir, ctx) = context(FixedModel(Some("ls")));
    let response = handle_command(&ctx, UsageMethod::Nl2cmd, "not json", FailurePolicy::Silent)
        .expect("response");
    let error = response.error.expect("error");
    assert!(error.starts_with("invalid request:"));
}

#[test]
fn request_fields_are_optional() {
    let (_dir, ctx) = context(FixedModel(Some("pwd")));
    let response = handle_command(&ctx, UsageMethod::Predict, "{}", FailurePolicy::Silent)
        .expect("response");
    assert_eq!(response.result.expect("result").command, "pwd");
}

#[test]
fn null_request_fields_read_as_absent() {
    let (_dir, ctx) = context(FixedModel(Some("git log")));
    let response = handle_command(
        &ctx,
        UsageMethod::Predict,
        r#"{"method":"predict","history":null,"cwd":"/repo","git_branch":null,"os_info":null,"timestamp":null}"#,
        FailurePolicy::Report,
    )
    .expect("response");
    assert!(response.error.is_none());
    assert_eq!(response.result.expect("result").command, "git log");
}

#[test]
fn config_failures_name_their_cause() {
    let response = config_failure(&AppError::Config("parse config: bad".to_string()));
    assert_eq!(response.error.as_deref(), Some("load config: parse config: bad"));
}
