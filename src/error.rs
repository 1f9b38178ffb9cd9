use thiserror::Error;

use crate::storage::StorageError;

#[derive(Error, Debug, Clone)]
pub enum AppError {
    #[error("{0}")]
    Storage(#[from] StorageError),
    #[error("invalid input: {0}")]
    Invalid(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Other(String),
}

impl AppError {
    /// Text suitable for showing to the person at the keyboard.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            AppError::Storage(e) => e.message().to_string(),
            AppError::Invalid(s) | AppError::NotFound(s) | AppError::Unauthorized(s) | AppError::Other(s) => {
                s.clone()
            }
        }
    }
}

impl From<String> for AppError {
    fn from(e: String) -> Self {
        Self::Other(e)
    }
}

impl From<&str> for AppError {
    fn from(e: &str) -> Self {
        Self::Other(e.to_string())
    }
}
