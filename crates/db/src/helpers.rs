use llmsh_core::CacheEntry;
use rusqlite::Row;

pub(crate) const ENTRY_COLUMNS: &str = "context_hash, command, created_at, hit_count, last_used";

pub(crate) fn row_to_cache_entry(row: &Row<'_>) -> rusqlite::Result<CacheEntry> {
    Ok(CacheEntry {
        fingerprint: row.get(0)?,
        command: row.get(1)?,
        created_at: row.get(2)?,
        hit_count: row.get::<_, Option<i64>>(3)?.unwrap_or(0).max(0) as u64,
        last_used: row.get(4)?,
    })
}
