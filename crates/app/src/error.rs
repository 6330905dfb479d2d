use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("cache error: {0}")]
    Db(#[from] llmsh_db::DbError),
    #[error("ledger error: {0}")]
    Ledger(#[from] llmsh_ledger::LedgerError),
    #[error("{0}")]
    Llm(#[from] llmsh_llm::LlmError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Config(String),
    #[error("{0}")]
    InvalidInput(String),
}

impl AppError {
    /// Failures of the model provider rather than of the request or local state.
    pub fn is_provider_failure(&self) -> bool {
        matches!(self, Self::Llm(_))
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
