#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("provider error: {0}")]
    Provider(String),
    #[error("empty response from API")]
    EmptyResponse,
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        Self::Provider(format!("API call failed: {}", err))
    }
}

pub type Result<T> = std::result::Result<T, LlmError>;
