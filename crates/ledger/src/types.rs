use llmsh_core::{TokenUsage, UsageMethod, UsageRecord};
use serde::{Deserialize, Deserializer, Serialize};

pub const LEDGER_VERSION: &str = "1.0";

/// On-disk shape of the ledger file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerDocument {
    pub version: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub records: Vec<UsageRecord>,
}

impl Default for LedgerDocument {
    fn default() -> Self {
        Self {
            version: LEDGER_VERSION.to_string(),
            records: Vec::new(),
        }
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<Vec<UsageRecord>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<UsageRecord>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Usage to append; the ledger assigns id and timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUsage {
    pub method: UsageMethod,
    pub provider: String,
    pub model: String,
    pub usage: TokenUsage,
}

#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("corrupt ledger {path}: {source}")]
    Corrupt {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("serialize ledger: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, LedgerError>;
