use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::model::{ContestResult, Round, ScoreEntry};

pub mod memory;
pub mod rest;
pub mod sql;

pub use memory::MemoryStorage;
pub use rest::{RestStorage, RestStorageConfig};
pub use sql::SqlStorage;

pub const UNKNOWN_ERROR: &str = "Unknown error";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageErrorKind {
    /// The store could not be reached.
    Unavailable,
    /// The store answered and refused the request.
    Rejected,
    /// The store answered with something we could not decode.
    Malformed,
    TimedOut,
    Unknown,
}

#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct StorageError {
    kind: StorageErrorKind,
    message: String,
}

impl StorageError {
    /// An empty message is replaced with [`UNKNOWN_ERROR`] so callers always have text to show.
    #[must_use]
    pub fn new(kind: StorageErrorKind, message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.trim().is_empty() {
            UNKNOWN_ERROR.to_string()
        } else {
            message
        };
        Self { kind, message }
    }

    #[must_use]
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::new(StorageErrorKind::Rejected, message)
    }

    #[must_use]
    pub fn kind(&self) -> StorageErrorKind {
        self.kind
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<sql_middleware::SqlMiddlewareDbError> for StorageError {
    fn from(e: sql_middleware::SqlMiddlewareDbError) -> Self {
        Self::rejected(e.to_string())
    }
}

impl From<reqwest::Error> for StorageError {
    fn from(e: reqwest::Error) -> Self {
        let kind = if e.is_timeout() {
            StorageErrorKind::TimedOut
        } else if e.is_connect() || e.is_request() {
            StorageErrorKind::Unavailable
        } else if e.is_decode() {
            StorageErrorKind::Malformed
        } else {
            StorageErrorKind::Unknown
        };
        Self::new(kind, e.to_string())
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(e: serde_json::Error) -> Self {
        Self::new(StorageErrorKind::Malformed, e.to_string())
    }
}

/// Turn a failed response from a hosted store into a typed error.
///
/// The message is the first readable thing found: a `message` field, an `error`
/// field (string or nested object), the raw body, then the status line.
#[must_use]
pub fn classify_failure_body(status: u16, body: &str) -> StorageError {
    let kind = match status {
        408 | 504 => StorageErrorKind::TimedOut,
        502 | 503 => StorageErrorKind::Unavailable,
        400..=599 => StorageErrorKind::Rejected,
        _ => StorageErrorKind::Unknown,
    };

    let message = match serde_json::from_str::<Value>(body) {
        Ok(json) => readable_message(&json),
        Err(_) => Some(body.trim().to_string()).filter(|s| !s.is_empty()),
    }
    .unwrap_or_else(|| format!("store returned status {status}"));

    StorageError::new(kind, message)
}

fn readable_message(json: &Value) -> Option<String> {
    let text = |v: &Value| v.as_str().map(str::to_string).filter(|s| !s.is_empty());

    if let Some(message) = json.get("message").and_then(text) {
        return Some(message);
    }
    match json.get("error") {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        Some(nested @ Value::Object(_)) => readable_message(nested),
        _ => match json {
            Value::Null => None,
            Value::String(s) => Some(s.clone()).filter(|s| !s.is_empty()),
            other => Some(other.to_string()),
        },
    }
}

/// Thin query interface over the `scores` and `contests` tables.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Scores for a round, optionally narrowed to one hole.
    async fn select_scores(
        &self,
        round: Round,
        hole: Option<i32>,
    ) -> Result<Vec<ScoreEntry>, StorageError>;

    /// Insert or overwrite rows by `unique_hole_id`, as one write.
    async fn upsert_scores(&self, entries: &[ScoreEntry]) -> Result<(), StorageError>;

    async fn delete_score(&self, unique_hole_id: &str) -> Result<(), StorageError>;

    async fn select_contests(
        &self,
        round: Round,
        hole: Option<i32>,
    ) -> Result<Vec<ContestResult>, StorageError>;

    async fn delete_contest(&self, round: Round, hole: i32) -> Result<(), StorageError>;

    async fn insert_contest(&self, contest: &ContestResult) -> Result<(), StorageError>;
}
