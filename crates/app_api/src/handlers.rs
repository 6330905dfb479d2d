use llmsh_app::{AppError, CleanReport, Result, UsageReport};
use llmsh_core::{CleanupStats, UsageMethod};
use tracing::{debug, warn};

use crate::{AppContext, CommandRequest, CommandResponse};

/// How failures of a command request surface on stdout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Provider failures print nothing, so the prompt is left untouched.
    /// Bad requests and configuration errors still print `{error}`.
    #[default]
    Silent,
    /// Every failure prints `{error}`.
    Report,
}

impl FailurePolicy {
    /// The response to print for `err`, if any.
    pub fn response_for(&self, err: &AppError) -> Option<CommandResponse> {
        match self {
            Self::Silent if err.is_provider_failure() => None,
            _ => Some(CommandResponse::failure(err.to_string())),
        }
    }
}

pub fn decode_request(raw: &str) -> Result<CommandRequest> {
    serde_json::from_str(raw)
        .map_err(|err| AppError::InvalidInput(format!("invalid request: {}", err)))
}

/// Runs one predict / complete / nl2cmd request read from stdin.
/// Returns `None` when nothing should be printed.
pub fn handle_command(
    ctx: &AppContext,
    method: UsageMethod,
    raw: &str,
    policy: FailurePolicy,
) -> Option<CommandResponse> {
    let result = decode_request(raw).and_then(|req| {
        if let Some(declared) = req.method.as_deref()
            && declared != method.as_str()
        {
            debug!(declared, method = method.as_str(), "request method differs from command");
        }
        ctx.app_state.services.commands.run(method, &req.into())
    });
    match result {
        Ok(outcome) => Some(outcome.into()),
        Err(err) => {
            warn!(method = method.as_str(), error = %err, "command request failed");
            policy.response_for(&err)
        }
    }
}

/// Response for a configuration that could not be loaded.
pub fn config_failure(err: &AppError) -> CommandResponse {
    CommandResponse::failure(format!("load config: {}", err))
}

pub fn usage_report(ctx: &AppContext) -> Result<UsageReport> {
    ctx.app_state.services.usage.report()
}

pub fn cache_prune(ctx: &AppContext) -> Result<CleanupStats> {
    ctx.app_state.services.maintenance.prune_cache()
}

pub fn cache_clear(ctx: &AppContext) -> Result<usize> {
    ctx.app_state.services.maintenance.clear_cache()
}

pub fn clean(ctx: &AppContext, all: bool) -> CleanReport {
    ctx.app_state
        .services
        .maintenance
        .clean(all, &ctx.paths.log_file)
}
