use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::Local;
use fs2::FileExt;
use llmsh_core::UsageRecord;
use tracing::debug;
use uuid::Uuid;

use crate::types::{LedgerDocument, LedgerError, NewUsage, Result};

/// Append-only token usage ledger stored as a single JSON document.
///
/// Every append is a read-modify-write of the whole file. Writers hold an exclusive
/// lock on a sibling `.lock` file and replace the ledger through a rename, so
/// concurrent shells never drop each other's records and readers never see a
/// partially written file.
#[derive(Debug, Clone)]
pub struct Ledger {
    path: PathBuf,
}

struct LockGuard {
    file: File,
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}

impl Ledger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn lock_path(&self) -> PathBuf {
        sibling(&self.path, ".lock")
    }

    fn temp_path(&self) -> PathBuf {
        sibling(&self.path, ".tmp")
    }

    pub fn record_usage(&self, usage: NewUsage) -> Result<UsageRecord> {
        let record = UsageRecord {
            id: Uuid::new_v4().to_string(),
            timestamp: Local::now().fixed_offset(),
            method: usage.method,
            provider: usage.provider,
            model: usage.model,
            input_tokens: usage.usage.input_tokens,
            output_tokens: usage.usage.output_tokens,
            cache_creation_tokens: usage.usage.cache_creation_tokens,
            cache_read_tokens: usage.usage.cache_read_tokens,
        };

        let _guard = self.lock(true)?;
        let mut document = self.read_document()?.unwrap_or_default();
        document.records.push(record.clone());
        self.write_document(&document)?;
        debug!(
            id = %record.id,
            method = %record.method,
            records = document.records.len(),
            "usage recorded"
        );
        Ok(record)
    }

    /// All records in append order. A missing ledger reads as empty.
    pub fn load_records(&self) -> Result<Vec<UsageRecord>> {
        Ok(self.load()?.records)
    }

    pub fn load(&self) -> Result<LedgerDocument> {
        if !self.path.exists() {
            return Ok(LedgerDocument::default());
        }
        let _guard = self.lock(false)?;
        Ok(self.read_document()?.unwrap_or_default())
    }

    /// Removes the ledger. Returns whether a ledger file existed.
    ///
    /// The lock file stays in place: other processes may already hold a handle
    /// to it, and unlinking it would let a new writer lock a different inode.
    pub fn clear(&self) -> Result<bool> {
        if !self.path.exists() {
            return Ok(false);
        }
        let _guard = self.lock(true)?;
        remove_if_exists(&self.path)?;
        Ok(true)
    }

    fn lock(&self, exclusive: bool) -> Result<LockGuard> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(self.lock_path())?;
        if exclusive {
            file.lock_exclusive()?;
        } else {
            FileExt::lock_shared(&file)?;
        }
        Ok(LockGuard { file })
    }

    fn read_document(&self) -> Result<Option<LedgerDocument>> {
        let data = match fs::read(&self.path) {
            Ok(data) => data,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        if data.iter().all(|byte| byte.is_ascii_whitespace()) {
            return Ok(None);
        }
        serde_json::from_slice(&data)
            .map(Some)
            .map_err(|source| LedgerError::Corrupt {
                path: self.path.display().to_string(),
                source,
            })
    }

    fn write_document(&self, document: &LedgerDocument) -> Result<()> {
        let contents = serde_json::to_vec_pretty(document)?;
        let temp_path = self.temp_path();
        {
            let mut file = File::create(&temp_path)?;
            file.write_all(&contents)?;
            file.sync_all()?;
        }
        fs::rename(&temp_path, &self.path)?;
        Ok(())
    }
}

fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}

fn remove_if_exists(path: &Path) -> io::Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(err),
    }
}
