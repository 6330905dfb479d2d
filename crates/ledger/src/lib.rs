mod aggregate;
mod store;
mod types;

pub use aggregate::{aggregate_by_day, aggregate_by_method, aggregate_by_provider_model, summarize};
pub use store::Ledger;
pub use types::{LEDGER_VERSION, LedgerDocument, LedgerError, NewUsage, Result};
