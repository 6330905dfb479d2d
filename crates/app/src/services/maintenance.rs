use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use llmsh_core::CleanupStats;
use tracing::{info, warn};

use crate::error::Result;
use crate::services::{SharedConfig, ledger, open_cache};

/// A group of files removed together by `clean`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleanTarget {
    DebugLog,
    CacheDatabase,
    TokenTracking,
}

impl CleanTarget {
    pub fn label(&self) -> &'static str {
        match self {
            Self::DebugLog => "debug log",
            Self::CacheDatabase => "cache database",
            Self::TokenTracking => "token tracking data",
        }
    }
}

#[derive(Debug, Default)]
pub struct CleanReport {
    pub cleaned: Vec<CleanTarget>,
    pub errors: Vec<(CleanTarget, io::Error)>,
}

impl CleanReport {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

#[derive(Clone)]
pub struct MaintenanceService {
    config: SharedConfig,
}

impl MaintenanceService {
    pub(super) fn new(config: SharedConfig) -> Self {
        Self { config }
    }

    /// Applies the configured TTL and capacity to the prediction cache.
    pub fn prune_cache(&self) -> Result<CleanupStats> {
        let cache = &self.config.cache;
        let mut db = open_cache(&self.config)?;
        let stats = db.cleanup(cache.ttl(), cache.max_entries)?;
        info!(
            expired = stats.expired,
            evicted = stats.evicted,
            "prediction cache pruned"
        );
        Ok(stats)
    }

    pub fn clear_cache(&self) -> Result<usize> {
        let db = open_cache(&self.config)?;
        let removed = db.clear()?;
        info!(removed, "prediction cache cleared");
        Ok(removed)
    }

    /// Removes the debug log and cache database; `all` also removes the usage ledger.
    /// The config file is never touched.
    pub fn clean(&self, all: bool, log_file: &Path) -> CleanReport {
        let mut report = CleanReport::default();

        record(&mut report, CleanTarget::DebugLog, remove_files(&[log_file.to_path_buf()]));

        let db_path = &self.config.cache.db_path;
        let cache_files = [
            db_path.clone(),
            side_file(db_path, "-wal"),
            side_file(db_path, "-shm"),
        ];
        record(&mut report, CleanTarget::CacheDatabase, remove_files(&cache_files));

        if all {
            let result = ledger(&self.config).clear().map_err(|err| match err {
                llmsh_ledger::LedgerError::Io(err) => err,
                other => io::Error::other(other.to_string()),
            });
            record(&mut report, CleanTarget::TokenTracking, result);
        }
        report
    }
}

fn record(report: &mut CleanReport, target: CleanTarget, result: io::Result<bool>) {
    match result {
        Ok(true) => {
            info!(target = target.label(), "cleaned");
            report.cleaned.push(target);
        }
        Ok(false) => {}
        Err(err) => {
            warn!(target = target.label(), error = %err, "clean failed");
            report.errors.push((target, err));
        }
    }
}

/// Returns whether the first file (the primary one) existed.
fn remove_files(paths: &[PathBuf]) -> io::Result<bool> {
    let mut removed_primary = false;
    for (idx, path) in paths.iter().enumerate() {
        match fs::remove_file(path) {
            Ok(()) => removed_primary |= idx == 0,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => return Err(err),
        }
    }
    Ok(removed_primary)
}

fn side_file(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(suffix);
    PathBuf::from(name)
}
