use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::{Storage, StorageError};
use crate::model::{ContestResult, Round, ScoreEntry};

#[derive(Default)]
struct Tables {
    scores: BTreeMap<String, ScoreEntry>,
    contests: Vec<ContestResult>,
}

/// In-process tables, for running without a database and for tests.
#[derive(Clone, Default)]
pub struct MemoryStorage {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn score_count(&self) -> usize {
        self.tables.read().await.scores.len()
    }

    pub async fn contest_count(&self) -> usize {
        self.tables.read().await.contests.len()
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn select_scores(
        &self,
        round: Round,
        hole: Option<i32>,
    ) -> Result<Vec<ScoreEntry>, StorageError> {
        let tables = self.tables.read().await;
        Ok(tables
            .scores
            .values()
            .filter(|s| s.round == round.name() && hole.is_none_or(|h| s.hole_number == h))
            .cloned()
            .collect())
    }

    async fn upsert_scores(&self, entries: &[ScoreEntry]) -> Result<(), StorageError> {
        let mut tables = self.tables.write().await;
        for entry in entries {
            tables
                .scores
                .insert(entry.unique_hole_id.clone(), entry.clone());
        }
        Ok(())
    }

    async fn delete_score(&self, unique_hole_id: &str) -> Result<(), StorageError> {
        self.tables.write().await.scores.remove(unique_hole_id);
        Ok(())
    }

    async fn select_contests(
        &self,
        round: Round,
        hole: Option<i32>,
    ) -> Result<Vec<ContestResult>, StorageError> {
        let tables = self.tables.read().await;
        Ok(tables
            .contests
            .iter()
            .filter(|c| c.round == round.name() && hole.is_none_or(|h| c.hole_number == h))
            .cloned()
            .collect())
    }

    async fn delete_contest(&self, round: Round, hole: i32) -> Result<(), StorageError> {
        self.tables
            .write()
            .await
            .contests
            .retain(|c| !(c.round == round.name() && c.hole_number == hole));
        Ok(())
    }

    async fn insert_contest(&self, contest: &ContestResult) -> Result<(), StorageError> {
        let mut tables = self.tables.write().await;
        if tables
            .contests
            .iter()
            .any(|c| c.round == contest.round && c.hole_number == contest.hole_number)
        {
            return Err(StorageError::rejected(format!(
                "hole {} of {} already has a contest winner",
                contest.hole_number, contest.round
            )));
        }
        tables.contests.push(contest.clone());
        Ok(())
    }
}
