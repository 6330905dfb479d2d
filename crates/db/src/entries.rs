use llmsh_core::{CacheEntry, CacheStats};
use rusqlite::{OptionalExtension, TransactionBehavior, params};
use tracing::debug;

use crate::error::Result;
use crate::helpers::{ENTRY_COLUMNS, row_to_cache_entry};
use crate::{CacheDb, now_epoch};

impl CacheDb {
    pub fn get(&mut self, fingerprint: &str) -> Result<Option<CacheEntry>> {
        self.get_at(fingerprint, now_epoch())
    }

    /// Looks up an entry and records the hit. The returned entry carries the values
    /// from before the hit; the stored row has `hit_count + 1` and `last_used = now`.
    pub fn get_at(&mut self, fingerprint: &str, now: i64) -> Result<Option<CacheEntry>> {
        let tx = self
            .conn_mut()?
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let entry = tx
            .query_row(
                &format!("SELECT {ENTRY_COLUMNS} FROM predictions WHERE context_hash = ?1"),
                params![fingerprint],
                row_to_cache_entry,
            )
            .optional()?;
        if entry.is_some() {
            tx.execute(
                r#"
                UPDATE predictions
                SET hit_count = hit_count + 1, last_used = MAX(?1, created_at)
                WHERE context_hash = ?2
                "#,
                params![now, fingerprint],
            )?;
        }
        tx.commit()?;
        debug!(fingerprint, hit = entry.is_some(), "cache lookup");
        Ok(entry)
    }

    /// Reads an entry without counting a hit.
    pub fn peek(&self, fingerprint: &str) -> Result<Option<CacheEntry>> {
        Ok(self
            .conn()?
            .query_row(
                &format!("SELECT {ENTRY_COLUMNS} FROM predictions WHERE context_hash = ?1"),
                params![fingerprint],
                row_to_cache_entry,
            )
            .optional()?)
    }

    pub fn set(&self, fingerprint: &str, command: &str) -> Result<()> {
        self.set_at(fingerprint, command, now_epoch())
    }

    /// Inserts or replaces an entry. Replacing resets the hit count and both timestamps.
    pub fn set_at(&self, fingerprint: &str, command: &str, now: i64) -> Result<()> {
        self.conn()?.execute(
            r#"
            INSERT OR REPLACE INTO predictions
              (context_hash, command, created_at, hit_count, last_used)
            VALUES (?1, ?2, ?3, 0, ?3)
            "#,
            params![fingerprint, command, now],
        )?;
        debug!(fingerprint, "cache entry stored");
        Ok(())
    }

    pub fn stats(&self) -> Result<CacheStats> {
        let (total_entries, total_hits) = self.conn()?.query_row(
            "SELECT COUNT(*), COALESCE(SUM(hit_count), 0) FROM predictions",
            [],
            |row| Ok((row.get::<_, i64>(0)?, row.get::<_, i64>(1)?)),
        )?;
        Ok(CacheStats {
            total_entries: total_entries.max(0) as u64,
            total_hits: total_hits.max(0) as u64,
        })
    }

    /// Most recently used entries first.
    pub fn list_entries(&self) -> Result<Vec<CacheEntry>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {ENTRY_COLUMNS} FROM predictions ORDER BY last_used DESC, context_hash DESC"
        ))?;
        let rows = stmt.query_map([], row_to_cache_entry)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    pub fn clear(&self) -> Result<usize> {
        Ok(self.conn()?.execute("DELETE FROM predictions", [])?)
    }
}
