use std::sync::Arc;

use llmsh_core::{TokenUsage, UsageMethod, filter_sensitive, fingerprint};
use llmsh_db::CacheDb;
use llmsh_ledger::NewUsage;
use llmsh_llm::{CommandModel, Completion};
use tracing::{debug, instrument, warn};

use crate::error::{AppError, Result};
use crate::prompts::{self, PromptContext};
use crate::services::{SharedConfig, ledger, open_cache};

/// Shell context sent by the plugin. Missing fields are empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandInput {
    pub history: Vec<String>,
    pub cwd: String,
    pub git_branch: String,
    pub os_info: String,
    pub prefix: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutcome {
    pub command: String,
    pub cached: bool,
    /// Provider-reported usage; `None` when served from the cache.
    pub usage: Option<TokenUsage>,
}

#[derive(Clone)]
pub struct CommandService {
    config: SharedConfig,
    model: Arc<dyn CommandModel>,
}

impl CommandService {
    pub(super) fn new(config: SharedConfig, model: Arc<dyn CommandModel>) -> Self {
        Self { config, model }
    }

    pub fn run(&self, method: UsageMethod, input: &CommandInput) -> Result<CommandOutcome> {
        match method {
            UsageMethod::Predict => self.predict(input),
            UsageMethod::Complete => self.complete(input),
            UsageMethod::Nl2cmd => self.generate(input),
        }
    }

    /// Predicts the next command, consulting the prediction cache first.
    #[instrument(skip_all, fields(method = "predict"))]
    pub fn predict(&self, input: &CommandInput) -> Result<CommandOutcome> {
        let history = self.prepare_history(&input.history);
        let key = fingerprint(&history, &input.cwd, &input.git_branch);

        let mut cache = self.cache();
        match cache.as_mut().map(|db| db.get(&key)) {
            Some(Ok(Some(entry))) => {
                debug!(fingerprint = %key, hits = entry.hit_count, "prediction cache hit");
                return Ok(CommandOutcome {
                    command: entry.command,
                    cached: true,
                    usage: None,
                });
            }
            Some(Ok(None)) => debug!(fingerprint = %key, "prediction cache miss"),
            Some(Err(err)) => {
                warn!(error = %err, "prediction cache lookup failed");
                cache = None;
            }
            None => {}
        }

        let prompt = prompts::predict_prompt(&self.context(input, &history));
        let (provider, completion) = self.call_model(&prompt)?;

        if let Some(db) = cache.as_mut() {
            self.store_prediction(db, &key, &completion.command);
        }
        self.track(UsageMethod::Predict, provider, &completion);
        Ok(outcome(completion))
    }

    #[instrument(skip_all, fields(method = "complete"))]
    pub fn complete(&self, input: &CommandInput) -> Result<CommandOutcome> {
        let min_len = self.config.prediction.min_prefix_length;
        if input.prefix.chars().count() < min_len {
            return Err(AppError::InvalidInput("prefix too short".to_string()));
        }
        let history = self.prepare_history(&input.history);
        let prompt = prompts::complete_prompt(&self.context(input, &history), &input.prefix);
        let (provider, completion) = self.call_model(&prompt)?;
        self.track(UsageMethod::Complete, provider, &completion);
        Ok(outcome(completion))
    }

    /// Turns a natural-language description into a command.
    #[instrument(skip_all, fields(method = "nl2cmd"))]
    pub fn generate(&self, input: &CommandInput) -> Result<CommandOutcome> {
        let description = input.description.trim();
        if description.is_empty() {
            return Err(AppError::InvalidInput("description is required".to_string()));
        }
        let history = self.prepare_history(&input.history);
        let prompt = prompts::nl2cmd_prompt(&self.context(input, &history), description);
        let (provider, completion) = self.call_model(&prompt)?;
        self.track(UsageMethod::Nl2cmd, provider, &completion);
        Ok(outcome(completion))
    }

    /// Keeps the configured number of most recent entries, redacted.
    fn prepare_history(&self, history: &[String]) -> Vec<String> {
        let limit = self.config.prediction.history_length;
        let start = if limit == 0 {
            0
        } else {
            history.len().saturating_sub(limit)
        };
        filter_sensitive(&history[start..])
    }

    fn context<'a>(&self, input: &'a CommandInput, history: &'a [String]) -> PromptContext<'a> {
        PromptContext {
            history,
            cwd: &input.cwd,
            git_branch: &input.git_branch,
            os_info: &input.os_info,
        }
    }

    fn call_model(&self, prompt: &str) -> Result<(&str, Completion)> {
        let (name, provider) = self.config.default_provider()?;
        debug!(provider = name, prompt_len = prompt.len(), "calling model");
        let completion = self.model.complete(provider, prompt)?;
        Ok((name, completion))
    }

    fn cache(&self) -> Option<CacheDb> {
        if !self.config.cache.enabled {
            return None;
        }
        match open_cache(&self.config) {
            Ok(db) => Some(db),
            Err(err) => {
                warn!(error = %err, path = %self.config.cache.db_path.display(), "open prediction cache failed");
                None
            }
        }
    }

    fn store_prediction(&self, db: &mut CacheDb, key: &str, command: &str) {
        if command.is_empty() {
            return;
        }
        if let Err(err) = db.set(key, command) {
            warn!(error = %err, "store prediction failed");
            return;
        }
        let cache = &self.config.cache;
        match db.evict(cache.ttl(), cache.max_entries) {
            Ok(stats) if stats.removed() > 0 => {
                debug!(expired = stats.expired, evicted = stats.evicted, "prediction cache trimmed");
            }
            Ok(_) => {}
            Err(err) => warn!(error = %err, "prediction cache eviction failed"),
        }
    }

    fn track(&self, method: UsageMethod, provider: &str, completion: &Completion) {
        if !self.config.tracking.enabled {
            return;
        }
        let usage = NewUsage {
            method,
            provider: provider.to_string(),
            model: completion.model.clone(),
            usage: completion.usage,
        };
        if let Err(err) = ledger(&self.config).record_usage(usage) {
            warn!(error = %err, "record token usage failed");
        }
    }
}

fn outcome(completion: Completion) -> CommandOutcome {
    CommandOutcome {
        command: completion.command,
        cached: false,
        usage: Some(completion.usage),
    }
}
