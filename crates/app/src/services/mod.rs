mod commands;
mod maintenance;
mod usage;

use std::sync::Arc;

use llmsh_db::CacheDb;
use llmsh_ledger::Ledger;
use llmsh_llm::CommandModel;

use crate::config::LlmshConfig;
use crate::error::Result;

pub use commands::{CommandInput, CommandOutcome, CommandService};
pub use maintenance::{CleanReport, CleanTarget, MaintenanceService};
pub use usage::{UsageReport, UsageService};

type SharedConfig = Arc<LlmshConfig>;

/// Service registry for the operations the CLI exposes.
#[derive(Clone)]
pub struct AppServices {
    pub commands: CommandService,
    pub usage: UsageService,
    pub maintenance: MaintenanceService,
}

impl AppServices {
    pub fn new(config: Arc<LlmshConfig>, model: Arc<dyn CommandModel>) -> Self {
        Self {
            commands: CommandService::new(config.clone(), model),
            usage: UsageService::new(config.clone()),
            maintenance: MaintenanceService::new(config),
        }
    }
}

fn open_cache(config: &SharedConfig) -> Result<CacheDb> {
    Ok(CacheDb::open(&config.cache.db_path)?)
}

fn ledger(config: &SharedConfig) -> Ledger {
    Ledger::new(&config.tracking.db_path)
}
