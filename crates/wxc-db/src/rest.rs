//! Managed backend access over its REST interface (PostgREST dialect)

use crate::schema::{tables, LeaderboardEntry, MonthlyWinner, OBSERVATION_CONFLICT_TARGET};
use crate::{DbError, DbResult, WeatherStore};
use reqwest::header::CONTENT_RANGE;
use reqwest::{Client, Method, RequestBuilder, Response};
use tracing::{debug, instrument};
use wxc_core::ObservationRow;

const PREFER: &str = "Prefer";

/// Client for the `/rest/v1` endpoints of the managed backend
pub struct RestStore {
    client: Client,
    base_url: String,
    key: String,
}

impl RestStore {
    /// Create a store from the backend endpoint URL and access key
    pub fn new(base_url: impl Into<String>, key: impl Into<String>) -> DbResult<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let key = key.into();
        if base_url.is_empty() {
            return Err(DbError::ConfigError("empty backend URL".into()));
        }
        if key.is_empty() {
            return Err(DbError::ConfigError("empty backend key".into()));
        }

        let client = Client::builder().build()?;
        Ok(Self {
            client,
            base_url,
            key,
        })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn request(&self, method: Method, table: &str) -> RequestBuilder {
        self.client
            .request(method, self.table_url(table))
            .header("apikey", &self.key)
            .bearer_auth(&self.key)
    }

    async fn check(table: &'static str, resp: Response) -> DbResult<Response> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_default();
        Err(DbError::Backend {
            table,
            status: status.as_u16(),
            body,
        })
    }

    /// Delete every row of `table` and report how many went away
    async fn delete_all(&self, table: &'static str) -> DbResult<u64> {
        // The REST layer refuses unfiltered deletes; no row has id 0.
        let resp = self
            .request(Method::DELETE, table)
            .query(&[("id", "neq.0")])
            .header(PREFER, "return=minimal,count=exact")
            .send()
            .await?;
        let resp = Self::check(table, resp).await?;

        let deleted = resp
            .headers()
            .get(CONTENT_RANGE)
            .and_then(|v| v.to_str().ok())
            .and_then(content_range_total)
            .unwrap_or(0);

        debug!("Deleted {} rows from {}", deleted, table);
        Ok(deleted)
    }
}

/// Total from a `Content-Range` header such as `0-24/25` or `*/0`
pub fn content_range_total(value: &str) -> Option<u64> {
    value.rsplit_once('/')?.1.trim().parse().ok()
}

#[async_trait::async_trait]
impl WeatherStore for RestStore {
    fn name(&self) -> &str {
        "rest"
    }

    #[instrument(skip(self, row), fields(station = %row.station_id, date = %row.date))]
    async fn upsert_observation(&self, row: &ObservationRow) -> DbResult<()> {
        let resp = self
            .request(Method::POST, tables::ACTUAL_WEATHER)
            .query(&[("on_conflict", OBSERVATION_CONFLICT_TARGET)])
            .header(PREFER, "resolution=merge-duplicates,return=minimal")
            .json(row)
            .send()
            .await?;
        Self::check(tables::ACTUAL_WEATHER, resp).await?;

        debug!("Upserted observation");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn top_leaderboard_entry(&self) -> DbResult<Option<LeaderboardEntry>> {
        let resp = self
            .request(Method::GET, tables::MONTHLY_LEADERBOARD_VIEW)
            .query(&[("select", "*"), ("order", "grand_avg.asc"), ("limit", "1")])
            .send()
            .await?;
        let resp = Self::check(tables::MONTHLY_LEADERBOARD_VIEW, resp).await?;

        let rows: Vec<LeaderboardEntry> = resp.json().await?;
        Ok(rows.into_iter().next())
    }

    #[instrument(skip(self, winner), fields(user_id = %winner.user_id))]
    async fn insert_monthly_winner(&self, winner: &MonthlyWinner) -> DbResult<()> {
        let resp = self
            .request(Method::POST, tables::MONTHLY_WINNERS)
            .header(PREFER, "return=minimal")
            .json(winner)
            .send()
            .await?;
        Self::check(tables::MONTHLY_WINNERS, resp).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_all_predictions(&self) -> DbResult<u64> {
        self.delete_all(tables::PREDICTIONS).await
    }

    #[instrument(skip(self))]
    async fn delete_all_observations(&self) -> DbResult<u64> {
        self.delete_all(tables::ACTUAL_WEATHER).await
    }
}
