//! Direct Postgres access through an sqlx connection pool

use crate::schema::{tables, LeaderboardEntry, MonthlyWinner};
use crate::{DbResult, MonthClose, WeatherStore};
use sqlx::postgres::{PgExecutor, PgPool, PgPoolOptions};
use std::time::Duration;
use tracing::{debug, info, instrument};
use wxc_core::{MonthLabel, ObservationRow};

/// Store backed by a Postgres pool
///
/// A job runs a handful of statements in sequence, so the pool stays small.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Connect using a `postgres://` URL
    pub async fn connect(database_url: &str) -> DbResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(2)
            .acquire_timeout(Duration::from_secs(30))
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    /// Get reference to underlying pool for direct queries
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Test the database connection
    pub async fn ping(&self) -> DbResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

async fn top_entry<'c>(executor: impl PgExecutor<'c>) -> DbResult<Option<LeaderboardEntry>> {
    let entry = sqlx::query_as::<_, LeaderboardEntry>(
        r#"
        SELECT user_id::text AS user_id,
               username,
               grand_avg::float8 AS grand_avg
        FROM monthly_leaderboard_view
        ORDER BY grand_avg ASC
        LIMIT 1
        "#,
    )
    .fetch_optional(executor)
    .await?;

    Ok(entry)
}

async fn insert_winner<'c>(executor: impl PgExecutor<'c>, winner: &MonthlyWinner) -> DbResult<()> {
    // json_populate_record converts each field to the column's own type, so
    // user_id lands in a uuid or a text column unchanged
    let record = serde_json::to_string(winner)?;
    sqlx::query(
        r#"
        INSERT INTO monthly_winners (user_id, username, score, month_year)
        SELECT r.user_id, r.username, r.score, r.month_year
        FROM json_populate_record(NULL::monthly_winners, $1::json) AS r
        "#,
    )
    .bind(record)
    .execute(executor)
    .await?;

    Ok(())
}

async fn delete_all<'c>(executor: impl PgExecutor<'c>, table: &'static str) -> DbResult<u64> {
    let sql = format!("DELETE FROM {}", table);
    let result = sqlx::query(&sql).execute(executor).await?;

    let deleted = result.rows_affected();
    debug!("Deleted {} rows from {}", deleted, table);
    Ok(deleted)
}

#[async_trait::async_trait]
impl WeatherStore for PgStore {
    fn name(&self) -> &str {
        "postgres"
    }

    #[instrument(skip(self, row), fields(station = %row.station_id, date = %row.date))]
    async fn upsert_observation(&self, row: &ObservationRow) -> DbResult<()> {
        sqlx::query(
            r#"
            INSERT INTO actual_weather (station_id, date, temp, wind_speed, wind_dir, precip)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (station_id, date) DO UPDATE SET
                temp = EXCLUDED.temp,
                wind_speed = EXCLUDED.wind_speed,
                wind_dir = EXCLUDED.wind_dir,
                precip = EXCLUDED.precip
            "#,
        )
        .bind(row.station_id.as_str())
        .bind(row.date)
        .bind(row.temp)
        .bind(row.wind_speed)
        .bind(row.wind_dir)
        .bind(row.precip)
        .execute(&self.pool)
        .await?;

        debug!("Upserted observation");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn top_leaderboard_entry(&self) -> DbResult<Option<LeaderboardEntry>> {
        top_entry(&self.pool).await
    }

    #[instrument(skip(self, winner), fields(user_id = %winner.user_id))]
    async fn insert_monthly_winner(&self, winner: &MonthlyWinner) -> DbResult<()> {
        insert_winner(&self.pool, winner).await
    }

    #[instrument(skip(self))]
    async fn delete_all_predictions(&self) -> DbResult<u64> {
        delete_all(&self.pool, tables::PREDICTIONS).await
    }

    #[instrument(skip(self))]
    async fn delete_all_observations(&self) -> DbResult<u64> {
        delete_all(&self.pool, tables::ACTUAL_WEATHER).await
    }

    /// Archive and wipe inside one transaction; nothing is committed unless
    /// every step succeeds.
    #[instrument(skip(self), fields(month = %label))]
    async fn reset_month(&self, label: &MonthLabel) -> DbResult<MonthClose> {
        let mut tx = self.pool.begin().await?;

        let winner = top_entry(&mut *tx)
            .await?
            .map(|entry| MonthlyWinner::from_entry(entry, label.clone()));

        match &winner {
            Some(w) => {
                insert_winner(&mut *tx, w).await?;
                info!(user_id = %w.user_id, username = ?w.username, score = ?w.score, "Archived monthly winner");
            }
            None => info!("Leaderboard is empty, no winner archived"),
        }

        let predictions_deleted = delete_all(&mut *tx, tables::PREDICTIONS).await?;
        let observations_deleted = delete_all(&mut *tx, tables::ACTUAL_WEATHER).await?;

        tx.commit().await?;

        Ok(MonthClose {
            winner,
            predictions_deleted,
            observations_deleted,
        })
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}
