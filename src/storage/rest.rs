use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

use super::{Storage, StorageError, StorageErrorKind, classify_failure_body};
use crate::model::{ContestResult, Round, ScoreEntry};

const SCORES_TABLE: &str = "scores";
const CONTESTS_TABLE: &str = "contests";

#[derive(Clone, Debug)]
pub struct RestStorageConfig {
    /// Project url, e.g. `https://example.supabase.co`.
    pub base_url: String,
    pub api_key: String,
    /// Per-request limit for selects.
    pub read_timeout: Duration,
    /// Per-request limit for upserts, inserts and deletes.
    pub write_timeout: Duration,
}

/// Tables served by a hosted backend over a PostgREST-style interface.
#[derive(Clone)]
pub struct RestStorage {
    client: reqwest::Client,
    config: RestStorageConfig,
}

impl RestStorage {
    /// # Errors
    ///
    /// Will return `Err` if the api key is not a valid header value or the client cannot be built.
    pub fn new(config: RestStorageConfig) -> Result<Self, StorageError> {
        let invalid_key =
            |e: reqwest::header::InvalidHeaderValue| StorageError::rejected(e.to_string());
        let mut headers = HeaderMap::new();
        headers.insert(
            "apikey",
            HeaderValue::from_str(&config.api_key).map_err(invalid_key)?,
        );
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", config.api_key)).map_err(invalid_key)?,
        );
        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.write_timeout.max(config.read_timeout))
            .build()?;
        Ok(Self { client, config })
    }

    fn table_url(&self, table: &str) -> String {
        let base = self.config.base_url.trim_end_matches('/');
        format!("{base}/rest/v1/{table}")
    }

    fn round_filter(round: Round, hole: Option<i32>) -> Vec<(&'static str, String)> {
        let mut filter = vec![("round", format!("eq.{}", round.name()))];
        if let Some(hole) = hole {
            filter.push(("hole_number", format!("eq.{hole}")));
        }
        filter
    }

    async fn check(resp: reqwest::Response) -> Result<reqwest::Response, StorageError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_default();
        Err(classify_failure_body(status.as_u16(), &body))
    }

    async fn get_rows<T: DeserializeOwned>(
        &self,
        table: &str,
        filter: &[(&str, String)],
    ) -> Result<Vec<T>, StorageError> {
        let resp = self
            .client
            .get(self.table_url(table))
            .timeout(self.config.read_timeout)
            .query(&[("select", "*")])
            .query(filter)
            .send()
            .await?;
        let resp = Self::check(resp).await?;
        let bytes = resp.bytes().await?;
        serde_json::from_slice::<Vec<T>>(&bytes).map_err(|e| {
            StorageError::new(
                StorageErrorKind::Malformed,
                format!("unexpected {table} payload: {e}"),
            )
        })
    }

    async fn post_rows<T: Serialize + ?Sized>(
        &self,
        table: &str,
        query: &[(&str, &str)],
        prefer: &'static str,
        body: &T,
    ) -> Result<(), StorageError> {
        let resp = self
            .client
            .post(self.table_url(table))
            .timeout(self.config.write_timeout)
            .query(query)
            .header("Prefer", prefer)
            .header(CONTENT_TYPE, "application/json")
            .json(body)
            .send()
            .await?;
        Self::check(resp).await?;
        Ok(())
    }

    async fn delete_rows(&self, table: &str, filter: &[(&str, String)]) -> Result<(), StorageError> {
        let resp = self
            .client
            .delete(self.table_url(table))
            .timeout(self.config.write_timeout)
            .query(filter)
            .send()
            .await?;
        Self::check(resp).await?;
        Ok(())
    }
}

#[async_trait]
impl Storage for RestStorage {
    async fn select_scores(
        &self,
        round: Round,
        hole: Option<i32>,
    ) -> Result<Vec<ScoreEntry>, StorageError> {
        self.get_rows(SCORES_TABLE, &Self::round_filter(round, hole))
            .await
    }

    async fn upsert_scores(&self, entries: &[ScoreEntry]) -> Result<(), StorageError> {
        if entries.is_empty() {
            return Ok(());
        }
        self.post_rows(
            SCORES_TABLE,
            &[("on_conflict", "unique_hole_id")],
            "resolution=merge-duplicates,return=minimal",
            entries,
        )
        .await
    }

    async fn delete_score(&self, unique_hole_id: &str) -> Result<(), StorageError> {
        self.delete_rows(
            SCORES_TABLE,
            &[("unique_hole_id", format!("eq.{unique_hole_id}"))],
        )
        .await
    }

    async fn select_contests(
        &self,
        round: Round,
        hole: Option<i32>,
    ) -> Result<Vec<ContestResult>, StorageError> {
        self.get_rows(CONTESTS_TABLE, &Self::round_filter(round, hole))
            .await
    }

    async fn delete_contest(&self, round: Round, hole: i32) -> Result<(), StorageError> {
        self.delete_rows(CONTESTS_TABLE, &Self::round_filter(round, Some(hole)))
            .await
    }

    async fn insert_contest(&self, contest: &ContestResult) -> Result<(), StorageError> {
        self.post_rows(CONTESTS_TABLE, &[], "return=minimal", contest)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(api_key: &str) -> RestStorageConfig {
        RestStorageConfig {
            base_url: "https://abc.example.co/".to_string(),
            api_key: api_key.to_string(),
            read_timeout: Duration::from_secs(3),
            write_timeout: Duration::from_secs(15),
        }
    }

    #[test]
    fn tables_and_filters_follow_postgrest() {
        let storage = RestStorage::new(config("anon")).unwrap();
        assert_eq!(
            storage.table_url(SCORES_TABLE),
            "https://abc.example.co/rest/v1/scores"
        );
        assert_eq!(
            RestStorage::round_filter(Round::GambleSands, Some(4)),
            vec![
                ("round", "eq.Gamble Sands".to_string()),
                ("hole_number", "eq.4".to_string())
            ]
        );
    }

    #[test]
    fn keys_must_be_header_safe() {
        let err = RestStorage::new(config("bad\nkey")).err().unwrap();
        assert_eq!(err.kind(), StorageErrorKind::Rejected);
    }
}
