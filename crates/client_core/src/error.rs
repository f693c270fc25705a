use shared::error::ErrorCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TranslationError {
    #[error("translation request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("translation provider returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("translation task ended before the provider answered")]
    Interrupted,
}

impl TranslationError {
    pub fn code(&self) -> ErrorCode {
        ErrorCode::Transport
    }
}
