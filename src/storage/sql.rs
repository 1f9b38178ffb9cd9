use async_trait::async_trait;
use regex::Regex;
use sql_middleware::SqlMiddlewareDbError;
use sql_middleware::middleware::{ConfigAndPool, CustomDbRow, MiddlewarePoolConnection, RowValues};
use std::sync::OnceLock;

use super::{Storage, StorageError};
use crate::model::{ContestResult, Round, ScoreEntry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlDialect {
    Sqlite,
    Postgres,
}

const SCHEMA_SQLITE: &[&str] = &[
    include_str!("../sql/schema/sqlite/00_scores.sql"),
    include_str!("../sql/schema/sqlite/01_contests.sql"),
];

const SCHEMA_POSTGRES: &[&str] = &[
    include_str!("../sql/schema/postgres/00_scores.sql"),
    include_str!("../sql/schema/postgres/01_contests.sql"),
];

const SELECT_SCORES_FOR_ROUND: &str = "SELECT player_name, round, hole_number, strokes, unique_hole_id \
     FROM scores WHERE round = ?1 ORDER BY hole_number, player_name";
const SELECT_SCORES_FOR_HOLE: &str = "SELECT player_name, round, hole_number, strokes, unique_hole_id \
     FROM scores WHERE round = ?1 AND hole_number = ?2 ORDER BY player_name";
const DELETE_SCORE: &str = "DELETE FROM scores WHERE unique_hole_id = ?1";
const SELECT_CONTESTS_FOR_ROUND: &str =
    "SELECT round, hole_number, winner_name FROM contests WHERE round = ?1 ORDER BY hole_number";
const SELECT_CONTESTS_FOR_HOLE: &str =
    "SELECT round, hole_number, winner_name FROM contests WHERE round = ?1 AND hole_number = ?2";
const DELETE_CONTEST: &str = "DELETE FROM contests WHERE round = ?1 AND hole_number = ?2";
const INSERT_CONTEST: &str =
    "INSERT INTO contests (round, hole_number, winner_name) VALUES (?1, ?2, ?3)";

/// Rewrites `?N` placeholders into the dialect's form.
fn dialect_sql(query: &str, dialect: SqlDialect) -> String {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    match dialect {
        SqlDialect::Sqlite => query.to_string(),
        SqlDialect::Postgres => {
            let re = PLACEHOLDER.get_or_init(|| {
                Regex::new(r"\?(\d+)")
                    .expect("Invalid regex pattern - this is a programming error")
            });
            re.replace_all(query, "$$$1").into_owned()
        }
    }
}

/// Multi-row upsert keyed on `unique_hole_id`, so the batch is a single statement.
fn build_upsert(entries: &[ScoreEntry]) -> (String, Vec<RowValues>) {
    let mut values = Vec::with_capacity(entries.len());
    let mut params = Vec::with_capacity(entries.len() * 5);
    for (i, entry) in entries.iter().enumerate() {
        let base = i * 5;
        values.push(format!(
            "(?{}, ?{}, ?{}, ?{}, ?{})",
            base + 1,
            base + 2,
            base + 3,
            base + 4,
            base + 5
        ));
        params.push(RowValues::Text(entry.player_name.clone()));
        params.push(RowValues::Text(entry.round.clone()));
        params.push(RowValues::Int(i64::from(entry.hole_number)));
        params.push(RowValues::Int(i64::from(entry.strokes)));
        params.push(RowValues::Text(entry.unique_hole_id.clone()));
    }
    let query = format!(
        "INSERT INTO scores (player_name, round, hole_number, strokes, unique_hole_id) VALUES {} \
         ON CONFLICT (unique_hole_id) DO UPDATE SET player_name = excluded.player_name, \
         round = excluded.round, hole_number = excluded.hole_number, strokes = excluded.strokes",
        values.join(", ")
    );
    (query, params)
}

fn get_text(row: &CustomDbRow, column: &str) -> Result<String, SqlMiddlewareDbError> {
    row.get(column)
        .and_then(|v| v.as_text())
        .map(ToString::to_string)
        .ok_or_else(|| SqlMiddlewareDbError::Other(format!("{column} not found")))
}

fn get_int(row: &CustomDbRow, column: &str) -> Result<i32, SqlMiddlewareDbError> {
    let value = row
        .get(column)
        .and_then(|v| v.as_int())
        .copied()
        .ok_or_else(|| SqlMiddlewareDbError::Other(format!("{column} not found")))?;
    i32::try_from(value)
        .map_err(|e| SqlMiddlewareDbError::Other(format!("{column} out of range: {e}")))
}

#[derive(Clone)]
pub struct SqlStorage {
    config_and_pool: ConfigAndPool,
    dialect: SqlDialect,
}

impl SqlStorage {
    #[must_use]
    pub fn new(config_and_pool: ConfigAndPool, dialect: SqlDialect) -> Self {
        Self {
            config_and_pool,
            dialect,
        }
    }

    #[must_use]
    pub fn config_and_pool(&self) -> &ConfigAndPool {
        &self.config_and_pool
    }

    /// Creates the `scores` and `contests` tables when missing.
    ///
    /// # Errors
    ///
    /// Will return `Err` if the database query fails
    pub async fn ensure_schema(&self) -> Result<(), StorageError> {
        let ddl = match self.dialect {
            SqlDialect::Sqlite => SCHEMA_SQLITE,
            SqlDialect::Postgres => SCHEMA_POSTGRES,
        };
        self.execute_batch_sql(&ddl.join("\n")).await
    }

    /// # Errors
    ///
    /// Will return `Err` if the database query fails
    pub async fn execute_batch_sql(&self, sql: &str) -> Result<(), StorageError> {
        let mut conn = self.config_and_pool.get_connection().await?;
        conn.execute_batch(sql).await?;
        Ok(())
    }

    async fn select(
        &self,
        query: &str,
        params: Vec<RowValues>,
    ) -> Result<Vec<CustomDbRow>, SqlMiddlewareDbError> {
        let mut conn = self.config_and_pool.get_connection().await?;
        let query = dialect_sql(query, self.dialect);
        let result_set = execute_select(&mut conn, &query, &params).await?;
        Ok(result_set)
    }

    async fn dml(&self, query: &str, params: Vec<RowValues>) -> Result<(), SqlMiddlewareDbError> {
        let mut conn = self.config_and_pool.get_connection().await?;
        let query = dialect_sql(query, self.dialect);
        conn.query(&query).params(&params).dml().await?;
        Ok(())
    }
}

async fn execute_select(
    conn: &mut MiddlewarePoolConnection,
    query: &str,
    params: &[RowValues],
) -> Result<Vec<CustomDbRow>, SqlMiddlewareDbError> {
    let result_set = conn.query(query).params(params).select().await?;
    Ok(result_set.results)
}

fn round_params(round: Round, hole: Option<i32>) -> (Vec<RowValues>, bool) {
    let mut params = vec![RowValues::Text(round.name().to_string())];
    if let Some(hole) = hole {
        params.push(RowValues::Int(i64::from(hole)));
    }
    (params, hole.is_some())
}

#[async_trait]
impl Storage for SqlStorage {
    async fn select_scores(
        &self,
        round: Round,
        hole: Option<i32>,
    ) -> Result<Vec<ScoreEntry>, StorageError> {
        let (params, one_hole) = round_params(round, hole);
        let query = if one_hole {
            SELECT_SCORES_FOR_HOLE
        } else {
            SELECT_SCORES_FOR_ROUND
        };
        let rows = self.select(query, params).await?;
        let scores = rows
            .iter()
            .map(|row| {
                Ok(ScoreEntry {
                    player_name: get_text(row, "player_name")?,
                    round: get_text(row, "round")?,
                    hole_number: get_int(row, "hole_number")?,
                    strokes: get_int(row, "strokes")?,
                    unique_hole_id: get_text(row, "unique_hole_id")?,
                })
            })
            .collect::<Result<Vec<_>, SqlMiddlewareDbError>>()?;
        Ok(scores)
    }

    async fn upsert_scores(&self, entries: &[ScoreEntry]) -> Result<(), StorageError> {
        if entries.is_empty() {
            return Ok(());
        }
        let (query, params) = build_upsert(entries);
        self.dml(&query, params).await?;
        Ok(())
    }

    async fn delete_score(&self, unique_hole_id: &str) -> Result<(), StorageError> {
        self.dml(
            DELETE_SCORE,
            vec![RowValues::Text(unique_hole_id.to_string())],
        )
        .await?;
        Ok(())
    }

    async fn select_contests(
        &self,
        round: Round,
        hole: Option<i32>,
    ) -> Result<Vec<ContestResult>, StorageError> {
        let (params, one_hole) = round_params(round, hole);
        let query = if one_hole {
            SELECT_CONTESTS_FOR_HOLE
        } else {
            SELECT_CONTESTS_FOR_ROUND
        };
        let rows = self.select(query, params).await?;
        let contests = rows
            .iter()
            .map(|row| {
                Ok(ContestResult {
                    round: get_text(row, "round")?,
                    hole_number: get_int(row, "hole_number")?,
                    winner_name: get_text(row, "winner_name")?,
                })
            })
            .collect::<Result<Vec<_>, SqlMiddlewareDbError>>()?;
        Ok(contests)
    }

    async fn delete_contest(&self, round: Round, hole: i32) -> Result<(), StorageError> {
        self.dml(
            DELETE_CONTEST,
            vec![
                RowValues::Text(round.name().to_string()),
                RowValues::Int(i64::from(hole)),
            ],
        )
        .await?;
        Ok(())
    }

    async fn insert_contest(&self, contest: &ContestResult) -> Result<(), StorageError> {
        self.dml(
            INSERT_CONTEST,
            vec![
                RowValues::Text(contest.round.clone()),
                RowValues::Int(i64::from(contest.hole_number)),
                RowValues::Text(contest.winner_name.clone()),
            ],
        )
        .await?;
        Ok(())
    }
}
