use std::result::Result as StdResult;

use thiserror::Error;

/// Error type surfaced by the receipt builder and its collaborators.
#[derive(Debug, Error)]
pub enum ReceiptError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Render error: {0}")]
    Render(String),
}

impl ReceiptError {
    pub fn invalid(message: impl Into<String>) -> Self {
        ReceiptError::InvalidArgument(message.into())
    }

    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, ReceiptError::InvalidArgument(_))
    }
}

pub type Result<T> = StdResult<T, ReceiptError>;
