use llmsh_core::{CacheStats, DayStats, MethodStats, ProviderModelStats, UsageSummary};
use llmsh_db::CacheDb;
use llmsh_ledger::{aggregate_by_day, aggregate_by_method, aggregate_by_provider_model, summarize};
use serde::Serialize;
use tracing::warn;

use crate::error::Result;
use crate::services::{SharedConfig, ledger};

/// Everything `llmsh stats` prints, recomputed from the ledger on each call.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UsageReport {
    pub summary: UsageSummary,
    pub by_provider_model: Vec<ProviderModelStats>,
    /// Sorted by day ascending.
    pub by_day: Vec<DayStats>,
    pub by_method: Vec<MethodStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache: Option<CacheStats>,
}

impl UsageReport {
    pub fn is_empty(&self) -> bool {
        self.summary.requests == 0
    }
}

#[derive(Clone)]
pub struct UsageService {
    config: SharedConfig,
}

impl UsageService {
    pub(super) fn new(config: SharedConfig) -> Self {
        Self { config }
    }

    pub fn report(&self) -> Result<UsageReport> {
        let records = ledger(&self.config).load_records()?;
        Ok(UsageReport {
            summary: summarize(&records),
            by_provider_model: aggregate_by_provider_model(&records),
            by_day: aggregate_by_day(&records).into_values().collect(),
            by_method: aggregate_by_method(&records).into_values().collect(),
            cache: self.cache_stats(),
        })
    }

    /// Stats of an existing cache database; never creates one.
    pub fn cache_stats(&self) -> Option<CacheStats> {
        let path = &self.config.cache.db_path;
        if !path.exists() {
            return None;
        }
        match CacheDb::open(path).and_then(|db| db.stats()) {
            Ok(stats) => Some(stats),
            Err(err) => {
                warn!(error = %err, "read prediction cache stats failed");
                None
            }
        }
    }
}
