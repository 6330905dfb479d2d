mod entries;
mod error;
mod eviction;
mod helpers;
mod migrations;

use std::path::Path;
use std::time::Duration;

use chrono::Utc;
use rusqlite::Connection;

pub use error::{DbError, Result};
pub use migrations::MIGRATIONS;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// SQLite-backed prediction cache shared by every shell session.
pub struct CacheDb {
    conn: Option<Connection>,
}

impl CacheDb {
    /// Opens (or creates) the cache at `path`. Safe to call repeatedly on the same file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        conn.pragma_update(None, "temp_store", "MEMORY")?;
        let mut db = Self { conn: Some(conn) };
        db.migrate()?;
        Ok(db)
    }

    pub fn open_in_memory() -> Result<Self> {
        let mut db = Self {
            conn: Some(Connection::open_in_memory()?),
        };
        db.migrate()?;
        Ok(db)
    }

    pub fn is_closed(&self) -> bool {
        self.conn.is_none()
    }

    /// Releases the connection. Every later call fails with [`DbError::Closed`].
    pub fn close(&mut self) -> Result<()> {
        match self.conn.take() {
            Some(conn) => conn.close().map_err(|(_, err)| DbError::from(err)),
            None => Ok(()),
        }
    }

    fn conn(&self) -> Result<&Connection> {
        self.conn.as_ref().ok_or(DbError::Closed)
    }

    fn conn_mut(&mut self) -> Result<&mut Connection> {
        self.conn.as_mut().ok_or(DbError::Closed)
    }
}

pub(crate) fn now_epoch() -> i64 {
    Utc::now().timestamp()
}
