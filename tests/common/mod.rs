#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::Mutex;

use fore_scorecard::model::{ContestResult, Round, ScoreEntry};
use fore_scorecard::storage::{MemoryStorage, Storage, StorageError};

/// One call made against the store, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    SelectScores(Option<i32>),
    UpsertScores(Vec<String>),
    DeleteScore(String),
    SelectContests(Option<i32>),
    DeleteContest(i32),
    InsertContest(String),
}

impl Op {
    #[must_use]
    pub fn is_write(&self) -> bool {
        !matches!(self, Op::SelectScores(_) | Op::SelectContests(_))
    }
}

#[derive(Debug, Clone, Default)]
pub enum Mode {
    #[default]
    Normal,
    /// Every write fails with this message; reads still work.
    FailWrites(String),
    /// Reads never answer.
    HangReads,
}

/// A [`MemoryStorage`] that records every call and can be told to misbehave.
#[derive(Default)]
pub struct RecordingStorage {
    pub inner: MemoryStorage,
    ops: Mutex<Vec<Op>>,
    mode: Mutex<Mode>,
}

impl RecordingStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_mode(mode: Mode) -> Self {
        let storage = Self::default();
        storage.set_mode(mode);
        storage
    }

    pub fn set_mode(&self, mode: Mode) {
        *self.mode.lock().unwrap() = mode;
    }

    pub fn ops(&self) -> Vec<Op> {
        self.ops.lock().unwrap().clone()
    }

    pub fn writes(&self) -> Vec<Op> {
        self.ops().into_iter().filter(Op::is_write).collect()
    }

    pub fn reset_ops(&self) {
        self.ops.lock().unwrap().clear();
    }

    fn record(&self, op: Op) -> Result<(), StorageError> {
        let write = op.is_write();
        self.ops.lock().unwrap().push(op);
        match &*self.mode.lock().unwrap() {
            Mode::FailWrites(message) if write => Err(StorageError::rejected(message.clone())),
            _ => Ok(()),
        }
    }

    async fn maybe_hang(&self) {
        let hang = matches!(*self.mode.lock().unwrap(), Mode::HangReads);
        if hang {
            std::future::pending::<()>().await;
        }
    }

    /// Seed rows without recording them.
    pub async fn seed_scores(&self, rows: &[ScoreEntry]) {
        self.inner.upsert_scores(rows).await.unwrap();
    }

    pub async fn seed_contest(&self, row: &ContestResult) {
        self.inner.insert_contest(row).await.unwrap();
    }
}

#[async_trait]
impl Storage for RecordingStorage {
    async fn select_scores(
        &self,
        round: Round,
        hole: Option<i32>,
    ) -> Result<Vec<ScoreEntry>, StorageError> {
        self.record(Op::SelectScores(hole))?;
        self.maybe_hang().await;
        self.inner.select_scores(round, hole).await
    }

    async fn upsert_scores(&self, entries: &[ScoreEntry]) -> Result<(), StorageError> {
        self.record(Op::UpsertScores(
            entries.iter().map(|e| e.unique_hole_id.clone()).collect(),
        ))?;
        self.inner.upsert_scores(entries).await
    }

    async fn delete_score(&self, unique_hole_id: &str) -> Result<(), StorageError> {
        self.record(Op::DeleteScore(unique_hole_id.to_string()))?;
        self.inner.delete_score(unique_hole_id).await
    }

    async fn select_contests(
        &self,
        round: Round,
        hole: Option<i32>,
    ) -> Result<Vec<ContestResult>, StorageError> {
        self.record(Op::SelectContests(hole))?;
        self.maybe_hang().await;
        self.inner.select_contests(round, hole).await
    }

    async fn delete_contest(&self, round: Round, hole: i32) -> Result<(), StorageError> {
        self.record(Op::DeleteContest(hole))?;
        self.inner.delete_contest(round, hole).await
    }

    async fn insert_contest(&self, contest: &ContestResult) -> Result<(), StorageError> {
        self.record(Op::InsertContest(contest.winner_name.clone()))?;
        self.inner.insert_contest(contest).await
    }
}
