use crate::CacheDb;
use crate::error::Result;

const MIGRATION_0001: &str = include_str!("../migrations/0001_predictions.sql");

pub const MIGRATIONS: &[(&str, &str)] = &[("0001_predictions", MIGRATION_0001)];

impl CacheDb {
    /// Applies the schema. Every statement is create-if-absent, so re-running is a no-op.
    pub fn migrate(&mut self) -> Result<()> {
        let tx = self.conn_mut()?.transaction()?;
        for (_, sql) in MIGRATIONS {
            tx.execute_batch(sql)?;
        }
        tx.commit()?;
        Ok(())
    }
}
