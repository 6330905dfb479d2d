use chrono::Duration;
use llmsh_core::CleanupStats;
use rusqlite::{TransactionBehavior, params};
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::{CacheDb, now_epoch};

impl CacheDb {
    /// [`evict`](Self::evict), then reclaims the freed pages when anything was removed.
    pub fn cleanup(&mut self, max_age: Duration, max_entries: usize) -> Result<CleanupStats> {
        self.cleanup_at(max_age, max_entries, now_epoch())
    }

    pub fn cleanup_at(
        &mut self,
        max_age: Duration,
        max_entries: usize,
        now: i64,
    ) -> Result<CleanupStats> {
        let stats = self.evict_at(max_age, max_entries, now)?;
        if stats.removed() > 0
            && let Err(err) = self.compact()
        {
            warn!(error = %err, "cache vacuum failed");
        }
        Ok(stats)
    }

    /// Deletes expired and excess rows without compacting the file. Cheap enough to run
    /// after every cache write.
    pub fn evict(&mut self, max_age: Duration, max_entries: usize) -> Result<CleanupStats> {
        self.evict_at(max_age, max_entries, now_epoch())
    }

    /// Drops entries unused for longer than `max_age`, then trims the table to the
    /// `max_entries` most recently used rows. `max_entries == 0` means no size limit.
    /// Ties on `last_used` keep the greater fingerprint.
    pub fn evict_at(
        &mut self,
        max_age: Duration,
        max_entries: usize,
        now: i64,
    ) -> Result<CleanupStats> {
        let cutoff = now.saturating_sub(max_age.num_seconds());
        let tx = self
            .conn_mut()?
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let expired = tx.execute(
            "DELETE FROM predictions WHERE last_used < ?1",
            params![cutoff],
        )?;
        let evicted = if max_entries > 0 {
            tx.execute(
                r#"
                DELETE FROM predictions
                WHERE context_hash NOT IN (
                  SELECT context_hash FROM predictions
                  ORDER BY last_used DESC, context_hash DESC
                  LIMIT ?1
                )
                "#,
                params![i64::try_from(max_entries).unwrap_or(i64::MAX)],
            )?
        } else {
            0
        };
        tx.commit()?;

        let stats = CleanupStats { expired, evicted };
        if stats.removed() > 0 {
            info!(expired, evicted, "cache eviction removed entries");
        }
        Ok(stats)
    }

    /// Pages on the SQLite freelist, i.e. space a VACUUM would give back.
    pub fn free_pages(&self) -> Result<u64> {
        let count: i64 = self
            .conn()?
            .query_row("PRAGMA freelist_count", [], |row| row.get(0))?;
        Ok(u64::try_from(count).unwrap_or(0))
    }

    /// Rewrites the database file when it holds free pages. Returns whether it ran.
    pub fn compact(&self) -> Result<bool> {
        let free = self.free_pages()?;
        if free == 0 {
            return Ok(false);
        }
        self.conn()?.execute_batch("VACUUM")?;
        debug!(free_pages = free, "cache vacuumed");
        Ok(true)
    }
}
